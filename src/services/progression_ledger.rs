use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::domain::activity::MAX_XP_PER_AWARD,
    models::domain::{ActivityType, ProgressionProfile},
    models::dto::{StreakUpdateResult, XpAwardResult, XpProgress},
    repositories::ProgressionProfileRepository,
    services::streak_tracker::{StreakTracker, MILESTONE_BONUS_DAYS},
};

pub struct ProgressionLedger {
    repository: Arc<dyn ProgressionProfileRepository>,
}

impl ProgressionLedger {
    pub fn new(repository: Arc<dyn ProgressionProfileRepository>) -> Self {
        Self { repository }
    }

    /// Level for a given XP total: `max(1, floor(sqrt(xp / 100)))`.
    pub fn calculate_level(xp: i64) -> i32 {
        if xp <= 0 {
            return 1;
        }
        let level = ((xp as f64) / 100.0).sqrt().floor() as i32;
        level.max(1)
    }

    /// XP threshold at which a level begins. Level 1 starts at zero.
    pub fn xp_for_level(level: i32) -> i64 {
        if level <= 1 {
            return 0;
        }
        (level as i64) * (level as i64) * 100
    }

    pub fn xp_progress(xp: i64) -> XpProgress {
        let xp = xp.max(0);
        let current_level = Self::calculate_level(xp);
        let next_level = current_level + 1;
        let floor = Self::xp_for_level(current_level);
        let ceiling = Self::xp_for_level(next_level);
        let span = ceiling - floor;

        let progress_percent = if span > 0 {
            (((xp - floor) as f64 / span as f64) * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        XpProgress {
            current_level,
            next_level,
            current_xp: xp,
            xp_for_next_level: ceiling,
            xp_needed: (ceiling - xp).max(0),
            progress_percent,
        }
    }

    pub async fn award_xp(
        &self,
        user_id: &str,
        activity: ActivityType,
        amount: Option<i64>,
        metadata: Option<Value>,
    ) -> AppResult<XpAwardResult> {
        self.award_xp_on(user_id, activity, amount, metadata, Utc::now().date_naive())
            .await
    }

    /// Date-parameterized award, used directly by replays and tests. Callers
    /// must serialize awards per user; this method performs a plain
    /// read-modify-write against the profile store.
    pub async fn award_xp_on(
        &self,
        user_id: &str,
        activity: ActivityType,
        amount: Option<i64>,
        metadata: Option<Value>,
        today: NaiveDate,
    ) -> AppResult<XpAwardResult> {
        let amount = amount.unwrap_or_else(|| activity.base_xp());
        if !(0..=MAX_XP_PER_AWARD).contains(&amount) {
            return Err(AppError::InvalidAwardAmount(format!(
                "{} is outside the allowed range 0..={}",
                amount, MAX_XP_PER_AWARD
            )));
        }

        let existing = self.repository.find_by_user(user_id).await?;
        let created = existing.is_none();
        let mut profile = existing.unwrap_or_else(|| ProgressionProfile::new(user_id));

        let old_xp = profile.total_xp;
        let old_level = Self::calculate_level(old_xp);
        profile.total_xp += amount;

        if activity == ActivityType::AchievementUnlock {
            if let Some(id) = metadata
                .as_ref()
                .and_then(|m| m.get("achievement_id"))
                .and_then(|v| v.as_str())
            {
                profile.unlock_achievement(id);
            }
        }

        let mut bonus_xp = 0;
        let streak: Option<StreakUpdateResult> = if profile.last_activity_date != Some(today) {
            let update = StreakTracker::apply_activity(&mut profile, today)?;
            if update.new_record && MILESTONE_BONUS_DAYS.contains(&update.current_streak) {
                bonus_xp = 25 * (update.current_streak as i64 / 7);
                profile.total_xp += bonus_xp;
                profile.unlock_achievement(&format!("streak_{}", update.current_streak));
                log::info!(
                    "User {} reached a {}-day streak milestone (+{} bonus XP)",
                    user_id,
                    update.current_streak,
                    bonus_xp
                );
            }
            Some(update)
        } else {
            None
        };

        let new_level = Self::calculate_level(profile.total_xp);
        let level_up = new_level > old_level;
        if level_up {
            profile.current_level = new_level;
            log::info!("User {} leveled up to {}", user_id, new_level);
        }
        profile.modified_at = Some(Utc::now());

        let new_xp = profile.total_xp;
        if created {
            self.repository.create(profile).await?;
        } else {
            self.repository.update(user_id, profile).await?;
        }

        Ok(XpAwardResult {
            user_id: user_id.to_string(),
            activity_type: activity,
            xp_awarded: amount,
            bonus_xp,
            old_xp,
            new_xp,
            old_level,
            new_level,
            level_up,
            streak,
            progress: Self::xp_progress(new_xp),
        })
    }
}
