pub mod activity;
pub mod progression_profile;
pub mod quiz_attempt;
pub mod topic_performance;

pub use activity::ActivityType;
pub use progression_profile::ProgressionProfile;
pub use quiz_attempt::QuizAttempt;
pub use topic_performance::TopicPerformance;
