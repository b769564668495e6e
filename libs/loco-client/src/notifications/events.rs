//! Typed push events and the dispatch table that routes them.

use dashmap::DashMap;
use loco_common::notification::{AchievementUnlocked, EventEnvelope, EventName};
use serde_json::Value;

/// A pushed event after type resolution. Types this client has no variant
/// for land in `Unknown` and can still be dispatched to handlers registered
/// under their raw type string.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// Handshake the server emits as soon as the stream is accepted.
    Connected,
    AchievementUnlocked(AchievementUnlocked),
    Unknown { event_type: String, data: Value },
}

impl NotificationEvent {
    /// Resolve an envelope into a typed event. Fails only when a *known*
    /// type carries data that does not match its schema.
    pub fn from_envelope(envelope: EventEnvelope) -> Result<Self, serde_json::Error> {
        match envelope.event_type.as_str() {
            EventName::CONNECTED => Ok(Self::Connected),
            EventName::ACHIEVEMENT_UNLOCKED => Ok(Self::AchievementUnlocked(
                serde_json::from_value(envelope.data)?,
            )),
            _ => Ok(Self::Unknown {
                event_type: envelope.event_type,
                data: envelope.data,
            }),
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::Connected => EventName::CONNECTED,
            Self::AchievementUnlocked(_) => EventName::ACHIEVEMENT_UNLOCKED,
            Self::Unknown { event_type, .. } => event_type,
        }
    }
}

type Handler = Box<dyn Fn(&NotificationEvent) + Send + Sync>;

/// Lookup table from event type to subscriber callbacks.
pub struct EventRouter {
    handlers: DashMap<String, Vec<Handler>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Register a callback for one event type (e.g.
    /// [`EventName::ACHIEVEMENT_UNLOCKED`]). Multiple callbacks per type
    /// are allowed and fire in registration order.
    pub fn on(
        &self,
        event_type: impl Into<String>,
        handler: impl Fn(&NotificationEvent) + Send + Sync + 'static,
    ) {
        self.handlers
            .entry(event_type.into())
            .or_default()
            .push(Box::new(handler));
    }

    pub fn dispatch(&self, event: &NotificationEvent) {
        match self.handlers.get(event.event_type()) {
            Some(handlers) => {
                for handler in handlers.iter() {
                    handler(event);
                }
            }
            None => {
                tracing::debug!(event_type = event.event_type(), "unhandled event dropped");
            }
        }
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}
