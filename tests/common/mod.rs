#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use mastery_engine::{
    errors::{AppError, AppResult},
    models::domain::{ProgressionProfile, QuizAttempt, TopicPerformance},
    repositories::{ProgressionProfileRepository, TopicPerformanceRepository},
    services::ProgressionEngine,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct InMemoryProgressionProfileRepository {
    profiles: Arc<RwLock<HashMap<String, ProgressionProfile>>>,
}

impl InMemoryProgressionProfileRepository {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn seed(&self, profile: ProgressionProfile) {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.user_id.clone(), profile);
    }

    pub async fn get(&self, user_id: &str) -> Option<ProgressionProfile> {
        let profiles = self.profiles.read().await;
        profiles.get(user_id).cloned()
    }
}

#[async_trait]
impl ProgressionProfileRepository for InMemoryProgressionProfileRepository {
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<ProgressionProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }

    async fn create(&self, profile: ProgressionProfile) -> AppResult<ProgressionProfile> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.user_id) {
            return Err(AppError::AlreadyExists(format!(
                "Progression profile for user '{}' already exists",
                profile.user_id
            )));
        }
        profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn update(
        &self,
        user_id: &str,
        profile: ProgressionProfile,
    ) -> AppResult<ProgressionProfile> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(user_id) {
            return Err(AppError::NotFound(format!(
                "Progression profile for user '{}' not found",
                user_id
            )));
        }
        profiles.insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }

    async fn reset_all_freezes(&self) -> AppResult<u64> {
        let mut profiles = self.profiles.write().await;
        let mut modified = 0;
        for profile in profiles.values_mut() {
            if profile.streak_freeze_count != 0 {
                profile.streak_freeze_count = 0;
                modified += 1;
            }
        }
        Ok(modified)
    }
}

type TopicKey = (String, String, String, i16);

pub struct InMemoryTopicPerformanceRepository {
    records: Arc<RwLock<HashMap<TopicKey, TopicPerformance>>>,
}

impl InMemoryTopicPerformanceRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn key(perf: &TopicPerformance) -> TopicKey {
        (
            perf.user_id.clone(),
            perf.subject.clone(),
            perf.topic.clone(),
            perf.grade,
        )
    }
}

#[async_trait]
impl TopicPerformanceRepository for InMemoryTopicPerformanceRepository {
    async fn find(
        &self,
        user_id: &str,
        subject: &str,
        topic: &str,
        grade: i16,
    ) -> AppResult<Option<TopicPerformance>> {
        let records = self.records.read().await;
        let key = (
            user_id.to_string(),
            subject.to_string(),
            topic.to_string(),
            grade,
        );
        Ok(records.get(&key).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<TopicPerformance>> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            (&a.subject, &a.topic, a.grade).cmp(&(&b.subject, &b.topic, b.grade))
        });
        Ok(items)
    }

    async fn upsert(&self, perf: TopicPerformance) -> AppResult<TopicPerformance> {
        let mut records = self.records.write().await;
        records.insert(Self::key(&perf), perf.clone());
        Ok(perf)
    }

    async fn total_attempts(&self, user_id: &str) -> AppResult<i64> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.attempts)
            .sum())
    }
}

pub struct TestHarness {
    pub profiles: Arc<InMemoryProgressionProfileRepository>,
    pub performance: Arc<InMemoryTopicPerformanceRepository>,
    pub engine: Arc<ProgressionEngine>,
}

pub fn memory_engine() -> TestHarness {
    let profiles = Arc::new(InMemoryProgressionProfileRepository::new());
    let performance = Arc::new(InMemoryTopicPerformanceRepository::new());
    let engine = Arc::new(ProgressionEngine::new(
        profiles.clone(),
        performance.clone(),
    ));
    TestHarness {
        profiles,
        performance,
        engine,
    }
}

pub fn attempt(
    user_id: &str,
    subject: &str,
    topic: &str,
    score: i32,
    max_score: i32,
) -> QuizAttempt {
    QuizAttempt {
        id: format!("attempt-{}", uuid::Uuid::new_v4()),
        user_id: user_id.to_string(),
        subject: subject.to_string(),
        topic: topic.to_string(),
        grade: 6,
        score,
        max_score,
        difficulty_level: 5,
        bloom_level: 2,
        completed_at: Utc::now(),
        time_taken_seconds: 240,
    }
}
