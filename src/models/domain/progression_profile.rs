use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Monthly allowance of streak freezes. Zeroed by the external monthly reset.
pub const MONTHLY_FREEZE_ALLOWANCE: i16 = 2;

/// Per-user XP, level, and streak state. Created lazily on first activity and
/// never deleted. All read-modify-write cycles on a profile must be serialized
/// per user by the caller.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProgressionProfile {
    pub id: String,
    pub user_id: String,
    pub total_xp: i64,
    pub current_level: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_date: Option<NaiveDate>,
    pub streak_freeze_count: i16,
    pub unlocked_achievements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl ProgressionProfile {
    pub fn new(user_id: &str) -> Self {
        ProgressionProfile {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            total_xp: 0,
            current_level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            streak_freeze_count: 0,
            unlocked_achievements: Vec::new(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn freezes_remaining(&self) -> i16 {
        (MONTHLY_FREEZE_ALLOWANCE - self.streak_freeze_count).max(0)
    }

    /// Set semantics over the stored achievement ids. Returns true when the
    /// id was newly added.
    pub fn unlock_achievement(&mut self, achievement_id: &str) -> bool {
        if self
            .unlocked_achievements
            .iter()
            .any(|a| a == achievement_id)
        {
            return false;
        }
        self.unlocked_achievements.push(achievement_id.to_string());
        true
    }
}
