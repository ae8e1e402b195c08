use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    config::Config,
    db::Database,
    errors::{AppError, AppResult},
    models::domain::ProgressionProfile,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressionProfileRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<ProgressionProfile>>;
    async fn create(&self, profile: ProgressionProfile) -> AppResult<ProgressionProfile>;
    async fn update(&self, user_id: &str, profile: ProgressionProfile)
        -> AppResult<ProgressionProfile>;
    /// Monthly batch trigger: zero every profile's freeze counter. Returns
    /// the number of profiles touched.
    async fn reset_all_freezes(&self) -> AppResult<u64>;
}

pub struct MongoProgressionProfileRepository {
    collection: Collection<ProgressionProfile>,
}

impl MongoProgressionProfileRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        let collection = db.get_collection(&config.profiles_collection);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for progression profiles collection");

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_index).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressionProfileRepository for MongoProgressionProfileRepository {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<ProgressionProfile>> {
        let profile = self
            .collection
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(profile)
    }

    async fn create(&self, profile: ProgressionProfile) -> AppResult<ProgressionProfile> {
        self.collection.insert_one(&profile).await?;
        Ok(profile)
    }

    async fn update(
        &self,
        user_id: &str,
        profile: ProgressionProfile,
    ) -> AppResult<ProgressionProfile> {
        let filter = doc! { "user_id": user_id };
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(filter, &profile)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Progression profile for user '{}' not found",
                user_id
            )));
        }

        Ok(profile)
    }

    async fn reset_all_freezes(&self) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(doc! {}, doc! { "$set": { "streak_freeze_count": 0 } })
            .await?;

        log::info!(
            "Monthly freeze reset cleared counters on {} profiles",
            result.modified_count
        );
        Ok(result.modified_count)
    }
}
