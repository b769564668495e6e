//! Server-push event envelope and payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every pushed event is `{ "type": ..., "data": ... }`; `data` stays raw
/// until the type is recognized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

/// Event types pushed over the notification stream.
pub struct EventName;

impl EventName {
    /// Handshake emitted by the server as soon as the stream is accepted.
    pub const CONNECTED: &'static str = "connected";
    pub const ACHIEVEMENT_UNLOCKED: &'static str = "achievement_unlocked";
}

/// Payload of an `achievement_unlocked` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementUnlocked {
    pub user_id: i64,
    pub achievement_id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub xp_reward: i64,
    #[serde(default)]
    pub icon_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_achievement_event() {
        let raw = r#"{"type":"achievement_unlocked","data":{
            "user_id":1,"achievement_id":2,"slug":"first-blood",
            "name":"First Blood","description":"Solve your first problem",
            "xp_reward":50,"icon_url":""}}"#;
        let envelope: EventEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.event_type, EventName::ACHIEVEMENT_UNLOCKED);
        let payload: AchievementUnlocked = serde_json::from_value(envelope.data).unwrap();
        assert_eq!(payload.slug, "first-blood");
        assert_eq!(payload.xp_reward, 50);
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let envelope: EventEnvelope = serde_json::from_str(r#"{"type":"connected"}"#).unwrap();
        assert_eq!(envelope.event_type, EventName::CONNECTED);
        assert!(envelope.data.is_null());
    }
}
