use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::ProgressionProfile,
    models::dto::IntegrityReport,
    repositories::{ProgressionProfileRepository, TopicPerformanceRepository},
    services::progression_ledger::ProgressionLedger,
};

// Plausibility band per observed attempt: half the smallest sensible award
// up to double the largest.
const MIN_XP_PER_ATTEMPT: i64 = 50;
const MAX_XP_PER_ATTEMPT: i64 = 500;

/// Diagnostic cross-check of a user's XP/level state against their observed
/// activity volume. Never mutates anything.
pub struct IntegrityValidator {
    profiles: Arc<dyn ProgressionProfileRepository>,
    performance: Arc<dyn TopicPerformanceRepository>,
}

impl IntegrityValidator {
    pub fn new(
        profiles: Arc<dyn ProgressionProfileRepository>,
        performance: Arc<dyn TopicPerformanceRepository>,
    ) -> Self {
        Self {
            profiles,
            performance,
        }
    }

    pub fn check(profile: &ProgressionProfile, attempts: i64) -> IntegrityReport {
        let mut issues = Vec::new();

        let lower_bound = attempts * MIN_XP_PER_ATTEMPT / 2;
        let upper_bound = attempts * MAX_XP_PER_ATTEMPT * 2;

        if profile.total_xp < lower_bound {
            issues.push(format!(
                "total XP {} is implausibly low for {} recorded attempts (expected at least {})",
                profile.total_xp, attempts, lower_bound
            ));
        }
        if profile.total_xp > upper_bound {
            issues.push(format!(
                "total XP {} is implausibly high for {} recorded attempts (expected at most {})",
                profile.total_xp, attempts, upper_bound
            ));
        }

        let derived_level = ProgressionLedger::calculate_level(profile.total_xp);
        if derived_level != profile.current_level {
            issues.push(format!(
                "stored level {} does not match level {} derived from {} XP",
                profile.current_level, derived_level, profile.total_xp
            ));
        }

        IntegrityReport {
            user_id: profile.user_id.clone(),
            valid: issues.is_empty(),
            issues,
        }
    }

    pub async fn validate(&self, user_id: &str) -> AppResult<IntegrityReport> {
        let Some(profile) = self.profiles.find_by_user(user_id).await? else {
            return Ok(IntegrityReport {
                user_id: user_id.to_string(),
                valid: true,
                issues: Vec::new(),
            });
        };

        let attempts = self.performance.total_attempts(user_id).await?;
        let report = Self::check(&profile, attempts);

        if !report.valid {
            log::warn!(
                "Integrity check flagged user {}: {}",
                user_id,
                report.issues.join("; ")
            );
        }

        Ok(report)
    }
}
