pub mod progression_profile_repository;
pub mod topic_performance_repository;

pub use progression_profile_repository::{
    MongoProgressionProfileRepository, ProgressionProfileRepository,
};
pub use topic_performance_repository::{
    MongoTopicPerformanceRepository, TopicPerformanceRepository,
};
