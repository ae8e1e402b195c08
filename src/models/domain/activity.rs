use serde::{Deserialize, Serialize};

/// Hard anti-cheat ceiling for any single XP award.
pub const MAX_XP_PER_AWARD: i64 = 1000;

/// XP-earning activity kinds. Unknown types deserialize to `Unknown` and
/// earn nothing rather than failing the award.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    LessonCompletion,
    QuizCompletion,
    DailyLogin,
    PerfectQuiz,
    StreakMilestone,
    AchievementUnlock,
    #[serde(other)]
    Unknown,
}

impl ActivityType {
    /// Default award when the caller does not supply an explicit amount.
    pub fn base_xp(&self) -> i64 {
        match self {
            ActivityType::LessonCompletion => 50,
            ActivityType::QuizCompletion => 100,
            ActivityType::DailyLogin => 10,
            ActivityType::PerfectQuiz => 50,
            ActivityType::StreakMilestone => 25,
            ActivityType::AchievementUnlock => 75,
            ActivityType::Unknown => 0,
        }
    }
}
