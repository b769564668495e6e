use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user's own account, as returned by `/auth/me` and the
/// login/register envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: String,
    pub email_verified: bool,
    #[serde(default)]
    pub total_xp: i64,
    #[serde(default)]
    pub level: i32,
    /// Profile stats snapshot. Absent on the lightweight auth envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<UserStats>,
    pub created_at: DateTime<Utc>,
}

/// Another user's public profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate solving stats attached to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_submissions: i64,
    pub accepted_submissions: i64,
    pub problems_solved: i64,
    pub acceptance_rate: f64,
    pub rank: i64,
    pub streak: i64,
    #[serde(default)]
    pub solved_distribution: Vec<DifficultyStat>,
}

/// Solved count for one difficulty bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStat {
    pub difficulty: String,
    pub count: i64,
}
