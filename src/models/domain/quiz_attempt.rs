use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A completed quiz attempt, produced by the quiz subsystem and consumed
/// read-only here. Attempts are append-only; the engine never mutates them.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub topic: String,
    pub grade: i16,

    #[validate(range(min = 0))]
    pub score: i32,

    #[validate(range(min = 1))]
    pub max_score: i32,

    /// Difficulty the question set was generated at, 1..=10.
    #[validate(range(min = 1, max = 10))]
    pub difficulty_level: i16,

    /// Bloom's taxonomy level of the question set, 1..=6.
    #[validate(range(min = 1, max = 6))]
    pub bloom_level: i16,

    pub completed_at: DateTime<Utc>,

    #[validate(range(min = 0))]
    pub time_taken_seconds: i32,
}

impl QuizAttempt {
    pub fn is_perfect(&self) -> bool {
        self.max_score > 0 && self.score == self.max_score
    }

    pub fn score_ratio(&self) -> f64 {
        if self.max_score <= 0 {
            return 0.0;
        }
        self.score as f64 / self.max_score as f64
    }
}
