pub mod response;

pub use response::{
    AdjustmentOutcome, DifficultyAdjustment, FreezeOutcome, IntegrityReport, MilestoneStatus,
    QuizSubmissionOutcome, StreakInfo, StreakUpdateResult, UnchangedReason, XpAwardResult,
    XpProgress,
};
