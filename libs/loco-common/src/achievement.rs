use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A gamification achievement definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    pub xp_reward: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub condition_type: String,
    #[serde(default)]
    pub condition_value: String,
}

/// An achievement a specific user has unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievement {
    pub id: i64,
    pub user_id: i64,
    pub achievement_id: i64,
    pub unlocked_at: DateTime<Utc>,
    pub achievement: Achievement,
}
