use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::AppResult,
    models::domain::{QuizAttempt, TopicPerformance},
    repositories::TopicPerformanceRepository,
};

/// Accumulates per-topic evidence from quiz attempts. Never decides
/// difficulty; that belongs to the adjuster.
pub struct PerformanceTracker {
    repository: Arc<dyn TopicPerformanceRepository>,
}

impl PerformanceTracker {
    pub fn new(repository: Arc<dyn TopicPerformanceRepository>) -> Self {
        Self { repository }
    }

    /// Fold one attempt into the aggregate: lifetime totals plus the bounded
    /// recent-score window.
    pub fn apply(perf: &mut TopicPerformance, attempt: &QuizAttempt) {
        perf.attempts += 1;
        perf.total_score += attempt.score as i64;
        perf.max_possible_score += attempt.max_score as i64;
        perf.push_recent_score(attempt.score_ratio());
        perf.modified_at = Some(Utc::now());
    }

    pub async fn record(&self, attempt: &QuizAttempt) -> AppResult<TopicPerformance> {
        let mut perf = self
            .repository
            .find(
                &attempt.user_id,
                &attempt.subject,
                &attempt.topic,
                attempt.grade,
            )
            .await?
            .unwrap_or_else(|| TopicPerformance::for_attempt(attempt));

        Self::apply(&mut perf, attempt);

        log::debug!(
            "Recorded attempt for user {} on {}/{} (grade {}): {} attempts, success rate {:.2}",
            attempt.user_id,
            attempt.subject,
            attempt.topic,
            attempt.grade,
            perf.attempts,
            perf.success_rate()
        );

        self.repository.upsert(perf).await
    }

    pub async fn overview(&self, user_id: &str) -> AppResult<Vec<TopicPerformance>> {
        self.repository.find_by_user(user_id).await
    }
}
