use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoProgressionProfileRepository, MongoTopicPerformanceRepository},
    services::ProgressionEngine,
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProgressionEngine>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let profile_repository = Arc::new(MongoProgressionProfileRepository::new(&db, &config));
        profile_repository.ensure_indexes().await?;

        let performance_repository =
            Arc::new(MongoTopicPerformanceRepository::new(&db, &config));
        performance_repository.ensure_indexes().await?;

        let engine = Arc::new(ProgressionEngine::new(
            profile_repository,
            performance_repository,
        ));

        Ok(Self {
            engine,
            config: Arc::new(config),
        })
    }
}
