use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson},
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    models::domain::TopicPerformance,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicPerformanceRepository: Send + Sync {
    async fn find(
        &self,
        user_id: &str,
        subject: &str,
        topic: &str,
        grade: i16,
    ) -> AppResult<Option<TopicPerformance>>;
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<TopicPerformance>>;
    async fn upsert(&self, perf: TopicPerformance) -> AppResult<TopicPerformance>;
    /// Lifetime attempt count across every topic the user has touched.
    async fn total_attempts(&self, user_id: &str) -> AppResult<i64>;
}

pub struct MongoTopicPerformanceRepository {
    collection: Collection<TopicPerformance>,
}

impl MongoTopicPerformanceRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        let collection = db.get_collection(&config.performance_collection);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for topic performance collection");

        let key_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "subject": 1, "topic": 1, "grade": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_subject_topic_grade_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        self.collection.create_index(key_index).await?;
        self.collection.create_index(user_index).await?;
        Ok(())
    }
}

#[async_trait]
impl TopicPerformanceRepository for MongoTopicPerformanceRepository {
    async fn find(
        &self,
        user_id: &str,
        subject: &str,
        topic: &str,
        grade: i16,
    ) -> AppResult<Option<TopicPerformance>> {
        let perf = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "subject": subject,
                "topic": topic,
                "grade": grade as i32,
            })
            .await?;
        Ok(perf)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<TopicPerformance>> {
        let records = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "subject": 1, "topic": 1, "grade": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    async fn upsert(&self, perf: TopicPerformance) -> AppResult<TopicPerformance> {
        let filter = doc! {
            "user_id": &perf.user_id,
            "subject": &perf.subject,
            "topic": &perf.topic,
            "grade": perf.grade as i32,
        };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &perf)
            .with_options(options)
            .await?;

        Ok(perf)
    }

    async fn total_attempts(&self, user_id: &str) -> AppResult<i64> {
        let pipeline = vec![
            doc! { "$match": { "user_id": user_id } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$attempts" } } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let Some(result) = cursor.try_next().await? else {
            return Ok(0);
        };

        let total = match result.get("total") {
            Some(Bson::Int64(v)) => *v,
            Some(Bson::Int32(v)) => *v as i64,
            Some(Bson::Double(v)) => *v as i64,
            _ => 0,
        };
        Ok(total)
    }
}
