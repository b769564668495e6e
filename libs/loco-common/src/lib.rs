//! Wire-contract types for the Loco platform API.
//!
//! Everything here mirrors the JSON the platform emits and accepts; the
//! client core (`loco-client`) builds on these but owns no wire shapes of
//! its own.

pub mod achievement;
pub mod api;
pub mod auth;
pub mod notification;
pub mod submission;
pub mod user;

pub use achievement::{Achievement, UserAchievement};
pub use api::{ApiErrorBody, DataEnvelope, Paginated};
pub use auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use notification::{AchievementUnlocked, EventEnvelope, EventName};
pub use submission::{RunResult, Submission, SubmissionStatus, TestCaseResult};
pub use user::{PublicUser, User, UserStats};
