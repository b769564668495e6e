//! Achievement endpoints.

use loco_common::{Achievement, DataEnvelope, UserAchievement};

use crate::error::ClientError;
use crate::gateway::request::ApiRequest;
use crate::gateway::Gateway;

/// Every achievement the platform defines.
pub async fn list(gateway: &Gateway) -> Result<Vec<Achievement>, ClientError> {
    let envelope: DataEnvelope<Vec<Achievement>> =
        gateway.send(ApiRequest::get("/achievements")).await?;
    Ok(envelope.data)
}

/// Achievements the current user has unlocked.
pub async fn list_mine(gateway: &Gateway) -> Result<Vec<UserAchievement>, ClientError> {
    let envelope: DataEnvelope<Vec<UserAchievement>> =
        gateway.send(ApiRequest::get("/users/me/achievements")).await?;
    Ok(envelope.data)
}

/// Achievements another user has unlocked.
pub async fn list_for_user(
    gateway: &Gateway,
    username: &str,
) -> Result<Vec<UserAchievement>, ClientError> {
    let envelope: DataEnvelope<Vec<UserAchievement>> = gateway
        .send(ApiRequest::get(format!("/users/{username}/achievements")))
        .await?;
    Ok(envelope.data)
}
