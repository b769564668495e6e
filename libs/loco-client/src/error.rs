use loco_common::ApiErrorBody;
use thiserror::Error;

/// Everything that can go wrong between this client and the platform.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure: connect, DNS, timeout, body read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status and (usually) a
    /// structured `{ error, fields? }` body.
    #[error("api error (HTTP {status}): {}", .body.error)]
    Api { status: u16, body: ApiErrorBody },

    /// Response body did not match the expected shape.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A response was missing a payload the contract promises.
    #[error("response missing expected payload: {0}")]
    UnexpectedResponse(&'static str),

    /// The token refresh failed; the session has been force-cleared and the
    /// user must log in again.
    #[error("session expired")]
    SessionExpired,
}

impl ClientError {
    /// HTTP status of a structured API failure, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures that mean "not logged in" — an unrecovered 401 or
    /// a dead session after refresh failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::SessionExpired) || self.status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_classification() {
        let unauthorized = ClientError::Api {
            status: 401,
            body: ApiErrorBody {
                error: "unauthorized".to_string(),
                fields: None,
            },
        };
        assert!(unauthorized.is_auth_failure());
        assert!(ClientError::SessionExpired.is_auth_failure());

        let server_error = ClientError::Api {
            status: 500,
            body: ApiErrorBody {
                error: "boom".to_string(),
                fields: None,
            },
        };
        assert!(!server_error.is_auth_failure());
        assert_eq!(server_error.status(), Some(500));
    }
}
