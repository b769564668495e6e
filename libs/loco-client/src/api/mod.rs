//! Typed wrappers over the platform's REST endpoints. Everything routes
//! through the gateway — there is no other sanctioned way to reach the API.

pub mod achievements;
pub mod auth;
pub mod submissions;
