use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use validator::Validate;

use crate::{
    errors::AppResult,
    models::domain::{ActivityType, QuizAttempt, TopicPerformance},
    models::dto::{
        DifficultyAdjustment, FreezeOutcome, IntegrityReport, QuizSubmissionOutcome, StreakInfo,
        XpAwardResult,
    },
    repositories::{ProgressionProfileRepository, TopicPerformanceRepository},
    services::{
        difficulty_adjuster::DifficultyAdjuster, integrity_validator::IntegrityValidator,
        performance_tracker::PerformanceTracker, progression_ledger::ProgressionLedger,
        streak_tracker::StreakTracker, user_locks::UserLocks,
    },
};

/// Facade over the progression subsystem. All mutating entry points take the
/// per-user lock before touching state; reads go straight through. Callers
/// are responsible for retry idempotency (keyed by attempt id) since a retry
/// here would double-apply XP and streak movement.
pub struct ProgressionEngine {
    performance: PerformanceTracker,
    adjuster: DifficultyAdjuster,
    ledger: ProgressionLedger,
    streaks: StreakTracker,
    integrity: IntegrityValidator,
    locks: UserLocks,
}

impl ProgressionEngine {
    pub fn new(
        profiles: Arc<dyn ProgressionProfileRepository>,
        performance: Arc<dyn TopicPerformanceRepository>,
    ) -> Self {
        Self {
            performance: PerformanceTracker::new(performance.clone()),
            adjuster: DifficultyAdjuster::new(performance.clone()),
            ledger: ProgressionLedger::new(profiles.clone()),
            streaks: StreakTracker::new(profiles.clone()),
            integrity: IntegrityValidator::new(profiles, performance),
            locks: UserLocks::new(),
        }
    }

    /// Sole entry point for quiz-submission events: fan the attempt out to
    /// the performance aggregate and the XP ledger. A perfect score earns a
    /// second, separate award.
    pub async fn submit_attempt(&self, attempt: QuizAttempt) -> AppResult<QuizSubmissionOutcome> {
        attempt.validate()?;

        let _guard = self.locks.acquire(&attempt.user_id).await;

        let performance = self.performance.record(&attempt).await?;
        let xp = self
            .ledger
            .award_xp(&attempt.user_id, ActivityType::QuizCompletion, None, None)
            .await?;

        let perfect_bonus = if attempt.is_perfect() {
            Some(
                self.ledger
                    .award_xp(&attempt.user_id, ActivityType::PerfectQuiz, None, None)
                    .await?,
            )
        } else {
            None
        };

        Ok(QuizSubmissionOutcome {
            performance,
            xp,
            perfect_bonus,
        })
    }

    pub async fn award_xp(
        &self,
        user_id: &str,
        activity: ActivityType,
        amount: Option<i64>,
        metadata: Option<Value>,
    ) -> AppResult<XpAwardResult> {
        let _guard = self.locks.acquire(user_id).await;
        self.ledger.award_xp(user_id, activity, amount, metadata).await
    }

    /// Backfill/replay variant of `award_xp` with an explicit activity date.
    pub async fn award_xp_on(
        &self,
        user_id: &str,
        activity: ActivityType,
        amount: Option<i64>,
        metadata: Option<Value>,
        date: NaiveDate,
    ) -> AppResult<XpAwardResult> {
        let _guard = self.locks.acquire(user_id).await;
        self.ledger
            .award_xp_on(user_id, activity, amount, metadata, date)
            .await
    }

    pub async fn next_difficulty(
        &self,
        user_id: &str,
        subject: &str,
        topic: &str,
        grade: i16,
    ) -> AppResult<DifficultyAdjustment> {
        let _guard = self.locks.acquire(user_id).await;
        self.adjuster
            .next_difficulty(user_id, subject, topic, grade)
            .await
    }

    pub async fn get_streak_info(&self, user_id: &str) -> AppResult<StreakInfo> {
        self.streaks.get_streak_info(user_id).await
    }

    pub async fn use_streak_freeze(&self, user_id: &str) -> AppResult<FreezeOutcome> {
        let _guard = self.locks.acquire(user_id).await;
        self.streaks.use_streak_freeze(user_id).await
    }

    pub async fn validate_integrity(&self, user_id: &str) -> AppResult<IntegrityReport> {
        self.integrity.validate(user_id).await
    }

    pub async fn performance_overview(&self, user_id: &str) -> AppResult<Vec<TopicPerformance>> {
        self.performance.overview(user_id).await
    }

    /// External monthly trigger; not reachable from any user action.
    pub async fn reset_monthly_freezes(&self) -> AppResult<u64> {
        self.streaks.reset_monthly_freezes().await
    }
}
