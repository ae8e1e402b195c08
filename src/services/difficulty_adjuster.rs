use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::topic_performance::{MAX_DIFFICULTY, MIN_DIFFICULTY},
    models::domain::TopicPerformance,
    models::dto::{AdjustmentOutcome, DifficultyAdjustment, UnchangedReason},
    repositories::TopicPerformanceRepository,
};

/// Minimum evidence before the difficulty is allowed to move. Early data is
/// too noisy to act on.
pub const MIN_ATTEMPTS_FOR_ADJUSTMENT: i64 = 3;

/// Lifetime success rate above which difficulty steps up.
pub const RAISE_THRESHOLD: f64 = 0.80;

/// Lifetime success rate below which difficulty steps down.
pub const LOWER_THRESHOLD: f64 = 0.50;

pub struct DifficultyAdjuster {
    repository: Arc<dyn TopicPerformanceRepository>,
}

impl DifficultyAdjuster {
    pub fn new(repository: Arc<dyn TopicPerformanceRepository>) -> Self {
        Self { repository }
    }

    /// Decide the next difficulty from the lifetime aggregate. One step per
    /// evaluation, saturating at the 1..=10 bounds.
    pub fn evaluate(perf: &TopicPerformance) -> DifficultyAdjustment {
        let current = perf.current_difficulty;

        if perf.attempts < MIN_ATTEMPTS_FOR_ADJUSTMENT {
            return DifficultyAdjustment {
                old_difficulty: current,
                new_difficulty: current,
                outcome: AdjustmentOutcome::Unchanged {
                    reason: UnchangedReason::InsufficientAttempts,
                },
                reason: format!(
                    "insufficient attempts ({} of {} required)",
                    perf.attempts, MIN_ATTEMPTS_FOR_ADJUSTMENT
                ),
            };
        }

        let rate = perf.success_rate();

        if rate > RAISE_THRESHOLD {
            if current >= MAX_DIFFICULTY {
                return DifficultyAdjustment {
                    old_difficulty: current,
                    new_difficulty: current,
                    outcome: AdjustmentOutcome::Unchanged {
                        reason: UnchangedReason::AtUpperBound,
                    },
                    reason: format!(
                        "success rate {:.0}% is high but difficulty is already at maximum",
                        rate * 100.0
                    ),
                };
            }
            return DifficultyAdjustment {
                old_difficulty: current,
                new_difficulty: current + 1,
                outcome: AdjustmentOutcome::Raised,
                reason: format!(
                    "success rate {:.0}% above {:.0}%; difficulty raised to {}",
                    rate * 100.0,
                    RAISE_THRESHOLD * 100.0,
                    current + 1
                ),
            };
        }

        if rate < LOWER_THRESHOLD {
            if current <= MIN_DIFFICULTY {
                return DifficultyAdjustment {
                    old_difficulty: current,
                    new_difficulty: current,
                    outcome: AdjustmentOutcome::Unchanged {
                        reason: UnchangedReason::AtLowerBound,
                    },
                    reason: format!(
                        "success rate {:.0}% is low but difficulty is already at minimum",
                        rate * 100.0
                    ),
                };
            }
            return DifficultyAdjustment {
                old_difficulty: current,
                new_difficulty: current - 1,
                outcome: AdjustmentOutcome::Lowered,
                reason: format!(
                    "success rate {:.0}% below {:.0}%; difficulty lowered to {}",
                    rate * 100.0,
                    LOWER_THRESHOLD * 100.0,
                    current - 1
                ),
            };
        }

        DifficultyAdjustment {
            old_difficulty: current,
            new_difficulty: current,
            outcome: AdjustmentOutcome::Unchanged {
                reason: UnchangedReason::ModeratePerformance,
            },
            reason: format!(
                "success rate {:.0}% within target range; difficulty unchanged",
                rate * 100.0
            ),
        }
    }

    /// Evaluate and immediately apply the result to the stored aggregate.
    pub async fn next_difficulty(
        &self,
        user_id: &str,
        subject: &str,
        topic: &str,
        grade: i16,
    ) -> AppResult<DifficultyAdjustment> {
        let mut perf = self
            .repository
            .find(user_id, subject, topic, grade)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No performance record for user '{}' on {}/{} (grade {})",
                    user_id, subject, topic, grade
                ))
            })?;

        let adjustment = Self::evaluate(&perf);

        if adjustment.new_difficulty != perf.current_difficulty {
            log::info!(
                "Difficulty for user {} on {}/{} moves {} -> {}",
                user_id,
                subject,
                topic,
                adjustment.old_difficulty,
                adjustment.new_difficulty
            );
            perf.current_difficulty = adjustment.new_difficulty;
            perf.modified_at = Some(Utc::now());
            self.repository.upsert(perf).await?;
        }

        Ok(adjustment)
    }
}
