//! Outbound request descriptors and the platform's endpoint paths.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Canonical endpoint paths.
pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH: &str = "/auth/refresh";
    pub const ME: &str = "/auth/me";
    pub const VERIFY_EMAIL: &str = "/auth/verify-email";
    pub const RESEND_VERIFICATION: &str = "/auth/resend-verification";
    pub const NOTIFICATIONS_STREAM: &str = "/notifications/stream";
}

/// Endpoints that are never retried on 401: a 401 from one of these is an
/// answer, not an expired token.
const AUTH_ENDPOINTS: [&str; 4] = [
    paths::LOGIN,
    paths::REGISTER,
    paths::REFRESH,
    paths::LOGOUT,
];

/// An outbound HTTP operation, held so it can be replayed after a refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body. Serialization of the crate's own wire types is
    /// infallible in practice; a failure drops the body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = serde_json::to_value(body).ok();
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn is_auth_endpoint(&self) -> bool {
        AUTH_ENDPOINTS.contains(&self.path.as_str())
    }

    pub fn is_refresh(&self) -> bool {
        self.path == paths::REFRESH
    }
}
