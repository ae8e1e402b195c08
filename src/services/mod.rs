pub mod difficulty_adjuster;
pub mod integrity_validator;
pub mod performance_tracker;
pub mod progression_engine;
pub mod progression_ledger;
pub mod streak_tracker;
pub mod user_locks;

pub use difficulty_adjuster::DifficultyAdjuster;
pub use integrity_validator::IntegrityValidator;
pub use performance_tracker::PerformanceTracker;
pub use progression_engine::ProgressionEngine;
pub use progression_ledger::ProgressionLedger;
pub use streak_tracker::StreakTracker;
pub use user_locks::UserLocks;
