use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::QuizAttempt;

pub const MIN_DIFFICULTY: i16 = 1;
pub const MAX_DIFFICULTY: i16 = 10;

/// Most recent per-attempt score ratios kept for trend inspection.
pub const RECENT_SCORES_CAPACITY: usize = 5;

/// Running performance aggregate for one user on one (subject, topic, grade)
/// tuple. Never deleted; evidence only accumulates. Difficulty is stored here
/// but decided by the adjuster.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TopicPerformance {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub topic: String,
    pub grade: i16,
    pub attempts: i64,
    pub total_score: i64,
    pub max_possible_score: i64,
    pub current_difficulty: i16,
    pub recent_scores: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl TopicPerformance {
    /// Fresh aggregate seeded from the first observed attempt. The starting
    /// difficulty is whatever the quiz subsystem served that attempt at.
    pub fn for_attempt(attempt: &QuizAttempt) -> Self {
        TopicPerformance {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: attempt.user_id.clone(),
            subject: attempt.subject.clone(),
            topic: attempt.topic.clone(),
            grade: attempt.grade,
            attempts: 0,
            total_score: 0,
            max_possible_score: 0,
            current_difficulty: attempt
                .difficulty_level
                .clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            recent_scores: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// Lifetime success rate: cumulative score over cumulative max, not just
    /// the recent window. 0.0 when there is no evidence yet.
    pub fn success_rate(&self) -> f64 {
        if self.max_possible_score <= 0 {
            return 0.0;
        }
        self.total_score as f64 / self.max_possible_score as f64
    }

    pub fn push_recent_score(&mut self, ratio: f64) {
        if self.recent_scores.len() >= RECENT_SCORES_CAPACITY {
            self.recent_scores.remove(0);
        }
        self.recent_scores.push(ratio);
    }
}
