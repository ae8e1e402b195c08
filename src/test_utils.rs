use crate::models::domain::{ProgressionProfile, QuizAttempt, TopicPerformance};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use chrono::Utc;

    /// Creates a quiz attempt with sensible defaults for the given scores
    pub fn test_attempt(
        user_id: &str,
        subject: &str,
        topic: &str,
        score: i32,
        max_score: i32,
    ) -> QuizAttempt {
        QuizAttempt {
            id: format!("attempt-{}", uuid::Uuid::new_v4()),
            user_id: user_id.to_string(),
            subject: subject.to_string(),
            topic: topic.to_string(),
            grade: 6,
            score,
            max_score,
            difficulty_level: 5,
            bloom_level: 2,
            completed_at: Utc::now(),
            time_taken_seconds: 240,
        }
    }

    /// Creates a topic performance aggregate with the given lifetime totals
    pub fn test_performance(
        user_id: &str,
        attempts: i64,
        total_score: i64,
        max_possible_score: i64,
        current_difficulty: i16,
    ) -> TopicPerformance {
        let attempt = test_attempt(user_id, "math", "fractions", 0, 5);
        let mut perf = TopicPerformance::for_attempt(&attempt);
        perf.attempts = attempts;
        perf.total_score = total_score;
        perf.max_possible_score = max_possible_score;
        perf.current_difficulty = current_difficulty;
        perf
    }

    /// Creates a progression profile with the given XP and streak
    pub fn test_profile(user_id: &str, total_xp: i64, current_streak: i32) -> ProgressionProfile {
        let mut profile = ProgressionProfile::new(user_id);
        profile.total_xp = total_xp;
        profile.current_level = crate::services::ProgressionLedger::calculate_level(total_xp);
        profile.current_streak = current_streak;
        profile.longest_streak = current_streak;
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_attempt() {
        let attempt = test_attempt("user-1", "math", "fractions", 4, 5);
        assert_eq!(attempt.user_id, "user-1");
        assert_eq!(attempt.score, 4);
        assert_eq!(attempt.max_score, 5);
    }

    #[test]
    fn test_fixtures_test_performance() {
        let perf = test_performance("user-1", 5, 450, 500, 5);
        assert_eq!(perf.attempts, 5);
        assert!((perf.success_rate() - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fixtures_test_profile_derives_level() {
        let profile = test_profile("user-1", 900, 3);
        assert_eq!(profile.current_level, 3);
        assert_eq!(profile.longest_streak, 3);
    }
}
