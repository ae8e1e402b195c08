use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::progression_profile::MONTHLY_FREEZE_ALLOWANCE,
    models::domain::ProgressionProfile,
    models::dto::{FreezeOutcome, MilestoneStatus, StreakInfo, StreakUpdateResult},
    repositories::ProgressionProfileRepository,
};

/// Streak lengths that pay a bonus when reached as a new record.
pub const MILESTONE_BONUS_DAYS: [i32; 5] = [7, 14, 30, 60, 100];

/// The full milestone ladder reported to users, bonus-paying or not.
const STREAK_MILESTONES: [(&str, i32); 6] = [
    ("Week Warrior", 7),
    ("Fortnight Focus", 14),
    ("Monthly Master", 30),
    ("Dedication", 60),
    ("Century Club", 100),
    ("Year-Long Legend", 365),
];

pub struct StreakTracker {
    repository: Arc<dyn ProgressionProfileRepository>,
}

impl StreakTracker {
    pub fn new(repository: Arc<dyn ProgressionProfileRepository>) -> Self {
        Self { repository }
    }

    /// Fold one day of activity into the profile. Same-day re-activity is a
    /// no-op; a one-day gap extends the streak; anything longer breaks it.
    /// The watermark never moves backwards.
    pub fn apply_activity(
        profile: &mut ProgressionProfile,
        activity_date: NaiveDate,
    ) -> AppResult<StreakUpdateResult> {
        let previous_streak = profile.current_streak;
        let days_since_last = match profile.last_activity_date {
            Some(last) => (activity_date - last).num_days(),
            None => 1,
        };

        if days_since_last < 0 {
            return Err(AppError::InvalidActivityDate(format!(
                "activity date {} precedes the last recorded activity {}; \
                 the stored date cannot be in the future",
                activity_date,
                profile
                    .last_activity_date
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            )));
        }

        if days_since_last == 0 {
            return Ok(StreakUpdateResult {
                previous_streak,
                current_streak: profile.current_streak,
                longest_streak: profile.longest_streak,
                days_since_last,
                new_record: false,
                streak_broken: false,
            });
        }

        let mut new_record = false;
        let mut streak_broken = false;

        if days_since_last == 1 {
            profile.current_streak += 1;
            if profile.current_streak > profile.longest_streak {
                profile.longest_streak = profile.current_streak;
                new_record = true;
            }
        } else {
            profile.current_streak = 1;
            streak_broken = true;
            if profile.longest_streak < 1 {
                profile.longest_streak = 1;
            }
        }

        profile.last_activity_date = Some(activity_date);
        profile.modified_at = Some(Utc::now());

        Ok(StreakUpdateResult {
            previous_streak,
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            days_since_last,
            new_record,
            streak_broken,
        })
    }

    pub fn milestones(current_streak: i32) -> Vec<MilestoneStatus> {
        STREAK_MILESTONES
            .iter()
            .map(|&(name, days)| {
                let achieved = current_streak >= days;
                let progress_percent = if achieved {
                    100.0
                } else {
                    (current_streak.max(0) as f64 / days as f64) * 100.0
                };
                MilestoneStatus {
                    name: name.to_string(),
                    days,
                    achieved,
                    progress_percent,
                }
            })
            .collect()
    }

    pub async fn get_streak_info(&self, user_id: &str) -> AppResult<StreakInfo> {
        self.streak_info_on(user_id, Utc::now().date_naive()).await
    }

    pub async fn streak_info_on(&self, user_id: &str, today: NaiveDate) -> AppResult<StreakInfo> {
        let Some(profile) = self.repository.find_by_user(user_id).await? else {
            return Ok(StreakInfo {
                current_streak: 0,
                longest_streak: 0,
                at_risk: false,
                freezes_remaining: MONTHLY_FREEZE_ALLOWANCE,
            });
        };

        // at risk: streak survives only if the user acts (or freezes) today
        let at_risk = profile.current_streak > 0
            && profile.last_activity_date == Some(today - Duration::days(1));

        Ok(StreakInfo {
            current_streak: profile.current_streak,
            longest_streak: profile.longest_streak,
            at_risk,
            freezes_remaining: profile.freezes_remaining(),
        })
    }

    /// Spend one of the monthly freezes to bridge a missed day. The watermark
    /// advances one day so the next real activity reads as consecutive.
    pub async fn use_streak_freeze(&self, user_id: &str) -> AppResult<FreezeOutcome> {
        let mut profile = self
            .repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Progression profile for user '{}' not found", user_id))
            })?;

        if profile.streak_freeze_count >= MONTHLY_FREEZE_ALLOWANCE {
            return Ok(FreezeOutcome {
                success: false,
                freezes_remaining: 0,
                message: "no freezes remaining".to_string(),
            });
        }

        profile.streak_freeze_count += 1;
        profile.last_activity_date = Some(match profile.last_activity_date {
            Some(last) => last + Duration::days(1),
            None => Utc::now().date_naive(),
        });
        profile.modified_at = Some(Utc::now());

        let freezes_remaining = profile.freezes_remaining();
        log::info!(
            "User {} used a streak freeze ({} remaining this month)",
            user_id,
            freezes_remaining
        );

        self.repository.update(user_id, profile).await?;

        Ok(FreezeOutcome {
            success: true,
            freezes_remaining,
            message: "streak freeze applied".to_string(),
        })
    }

    pub async fn reset_monthly_freezes(&self) -> AppResult<u64> {
        self.repository.reset_all_freezes().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::progression_profile_repository::MockProgressionProfileRepository;
    use crate::test_utils::fixtures::test_profile;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn first_ever_activity_starts_a_streak_record() {
        let mut profile = ProgressionProfile::new("user-1");
        let result = StreakTracker::apply_activity(&mut profile, date(2026, 3, 1)).unwrap();

        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 1);
        assert!(result.new_record);
        assert_eq!(profile.last_activity_date, Some(date(2026, 3, 1)));
    }

    #[test]
    fn same_day_activity_is_idempotent() {
        let mut profile = test_profile("user-1", 0, 3);
        profile.last_activity_date = Some(date(2026, 3, 10));

        let result = StreakTracker::apply_activity(&mut profile, date(2026, 3, 10)).unwrap();

        assert_eq!(result.days_since_last, 0);
        assert_eq!(result.current_streak, 3);
        assert!(!result.new_record);
        assert_eq!(profile.current_streak, 3);
    }

    #[test]
    fn consecutive_day_extends_streak_and_sets_record() {
        let mut profile = test_profile("user-1", 0, 5);
        profile.longest_streak = 5;
        profile.last_activity_date = Some(date(2026, 3, 10));

        let result = StreakTracker::apply_activity(&mut profile, date(2026, 3, 11)).unwrap();

        assert_eq!(result.previous_streak, 5);
        assert_eq!(result.current_streak, 6);
        assert_eq!(result.longest_streak, 6);
        assert!(result.new_record);
    }

    #[test]
    fn consecutive_day_below_record_is_not_a_record() {
        let mut profile = test_profile("user-1", 0, 2);
        profile.longest_streak = 10;
        profile.last_activity_date = Some(date(2026, 3, 10));

        let result = StreakTracker::apply_activity(&mut profile, date(2026, 3, 11)).unwrap();

        assert_eq!(result.current_streak, 3);
        assert_eq!(result.longest_streak, 10);
        assert!(!result.new_record);
    }

    #[test]
    fn multi_day_gap_resets_streak_to_one() {
        let mut profile = test_profile("user-1", 0, 12);
        profile.longest_streak = 12;
        profile.last_activity_date = Some(date(2026, 3, 10));

        let result = StreakTracker::apply_activity(&mut profile, date(2026, 3, 14)).unwrap();

        assert_eq!(result.current_streak, 1);
        assert_eq!(result.longest_streak, 12);
        assert!(result.streak_broken);
        assert!(!result.new_record);
        assert_eq!(profile.last_activity_date, Some(date(2026, 3, 14)));
    }

    #[test]
    fn backdated_activity_is_rejected_without_mutation() {
        let mut profile = test_profile("user-1", 0, 4);
        profile.longest_streak = 4;
        profile.last_activity_date = Some(date(2026, 3, 10));

        let err = StreakTracker::apply_activity(&mut profile, date(2026, 3, 8))
            .expect_err("backdated activity should fail");

        assert!(matches!(err, AppError::InvalidActivityDate(_)));
        assert_eq!(profile.current_streak, 4);
        assert_eq!(profile.last_activity_date, Some(date(2026, 3, 10)));
    }

    #[test]
    fn milestone_ladder_reports_progress_and_achievement() {
        let milestones = StreakTracker::milestones(30);

        assert_eq!(milestones.len(), 6);
        assert!(milestones[0].achieved); // 7
        assert!(milestones[2].achieved); // 30
        assert_eq!(milestones[2].progress_percent, 100.0);
        assert!(!milestones[3].achieved); // 60
        assert_eq!(milestones[3].progress_percent, 50.0);
        assert_eq!(milestones[5].days, 365);
    }

    #[tokio::test]
    async fn streak_info_flags_at_risk_when_watermark_is_yesterday() {
        let mut profile = test_profile("user-1", 0, 6);
        profile.last_activity_date = Some(date(2026, 3, 9));

        let mut repo = MockProgressionProfileRepository::new();
        let seeded = profile.clone();
        repo.expect_find_by_user()
            .returning(move |_| Ok(Some(seeded.clone())));

        let tracker = StreakTracker::new(Arc::new(repo));
        let info = tracker.streak_info_on("user-1", date(2026, 3, 10)).await.unwrap();

        assert_eq!(info.current_streak, 6);
        assert!(info.at_risk);
    }

    #[tokio::test]
    async fn streak_info_for_unknown_user_is_empty() {
        let mut repo = MockProgressionProfileRepository::new();
        repo.expect_find_by_user().returning(|_| Ok(None));

        let tracker = StreakTracker::new(Arc::new(repo));
        let info = tracker.get_streak_info("user-9").await.unwrap();

        assert_eq!(info.current_streak, 0);
        assert!(!info.at_risk);
        assert_eq!(info.freezes_remaining, MONTHLY_FREEZE_ALLOWANCE);
    }

    #[tokio::test]
    async fn freeze_advances_watermark_and_counts_down() {
        let mut profile = test_profile("user-1", 0, 6);
        profile.last_activity_date = Some(date(2026, 3, 9));

        let mut repo = MockProgressionProfileRepository::new();
        let seeded = profile.clone();
        repo.expect_find_by_user()
            .returning(move |_| Ok(Some(seeded.clone())));
        repo.expect_update()
            .withf(|_, p: &ProgressionProfile| {
                p.streak_freeze_count == 1
                    && p.last_activity_date == NaiveDate::from_ymd_opt(2026, 3, 10)
            })
            .returning(|_, p| Ok(p));

        let tracker = StreakTracker::new(Arc::new(repo));
        let outcome = tracker.use_streak_freeze("user-1").await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.freezes_remaining, 1);
    }

    #[tokio::test]
    async fn freeze_at_monthly_cap_fails_without_mutation() {
        let mut profile = test_profile("user-1", 0, 6);
        profile.streak_freeze_count = MONTHLY_FREEZE_ALLOWANCE;

        let mut repo = MockProgressionProfileRepository::new();
        let seeded = profile.clone();
        repo.expect_find_by_user()
            .returning(move |_| Ok(Some(seeded.clone())));
        // no expect_update: any write would fail the test

        let tracker = StreakTracker::new(Arc::new(repo));
        let outcome = tracker.use_streak_freeze("user-1").await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.freezes_remaining, 0);
        assert_eq!(outcome.message, "no freezes remaining");
    }
}
