use serde::Serialize;

use crate::models::domain::{ActivityType, TopicPerformance};

/// Why a difficulty evaluation left the level where it was. Callers must be
/// able to tell "not enough evidence" apart from "saturated at a bound".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnchangedReason {
    InsufficientAttempts,
    ModeratePerformance,
    AtUpperBound,
    AtLowerBound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AdjustmentOutcome {
    Raised,
    Lowered,
    Unchanged { reason: UnchangedReason },
}

/// Result of one difficulty evaluation. Transient; the new level is applied
/// to the stored aggregate by the adjuster, not carried here.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DifficultyAdjustment {
    pub old_difficulty: i16,
    pub new_difficulty: i16,
    pub outcome: AdjustmentOutcome,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StreakUpdateResult {
    pub previous_streak: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub days_since_last: i64,
    pub new_record: bool,
    pub streak_broken: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct XpProgress {
    pub current_level: i32,
    pub next_level: i32,
    pub current_xp: i64,
    pub xp_for_next_level: i64,
    pub xp_needed: i64,
    pub progress_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct XpAwardResult {
    pub user_id: String,
    pub activity_type: ActivityType,
    pub xp_awarded: i64,
    pub bonus_xp: i64,
    pub old_xp: i64,
    pub new_xp: i64,
    pub old_level: i32,
    pub new_level: i32,
    pub level_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakUpdateResult>,
    pub progress: XpProgress,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StreakInfo {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub at_risk: bool,
    pub freezes_remaining: i16,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MilestoneStatus {
    pub name: String,
    pub days: i32,
    pub achieved: bool,
    pub progress_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FreezeOutcome {
    pub success: bool,
    pub freezes_remaining: i16,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntegrityReport {
    pub user_id: String,
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Everything produced by one quiz submission: the refreshed performance
/// aggregate plus the XP awards it triggered.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuizSubmissionOutcome {
    pub performance: TopicPerformance,
    pub xp: XpAwardResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfect_bonus: Option<XpAwardResult>,
}
