//! Server-push notifications over SSE.

pub mod channel;
pub mod events;
pub mod sse;

pub use channel::{ChannelState, NotificationChannel};
pub use events::{EventRouter, NotificationEvent};
