//! Resilient request gateway.
//!
//! Every authenticated HTTP call goes through [`Gateway::send`]: it detects
//! session expiry (401), coordinates a single shared refresh across all
//! concurrent callers, replays each failed request exactly once after a
//! successful refresh, and forces logout when the refresh itself fails.

pub mod refresh;
pub mod request;

use std::sync::Arc;

use loco_common::ApiErrorBody;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::session::SessionStore;

use refresh::{RefreshCoordinator, RefreshOutcome};
use request::{paths, ApiRequest};

pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    refresh: RefreshCoordinator,
}

impl Gateway {
    pub fn new(http: reqwest::Client, base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            refresh: RefreshCoordinator::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Issue a request, transparently recovering from session expiry once.
    ///
    /// - Non-401 responses are classified and returned as-is.
    /// - A 401 from an auth endpoint is final; if that endpoint was the
    ///   refresh itself, the session is cleared.
    /// - A 401 elsewhere runs (or joins) the single-flight refresh, then
    ///   replays the original request exactly once. A second 401 on the
    ///   replay propagates: the retry budget is one.
    /// - A failed refresh clears the session and surfaces
    ///   [`ClientError::SessionExpired`] instead of the original error.
    pub async fn send<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T, ClientError> {
        let response = self.execute(&req).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::classify(response).await;
        }

        let unauthorized = Self::error_from(response).await;
        if req.is_auth_endpoint() {
            if req.is_refresh() {
                self.session.clear();
            }
            return Err(unauthorized);
        }

        tracing::debug!(path = %req.path, "session expired mid-request; refreshing");
        match self.refresh.run(|| self.call_refresh()).await {
            RefreshOutcome::Refreshed => {
                let replay = self.execute(&req).await?;
                Self::classify(replay).await
            }
            RefreshOutcome::Failed => {
                self.session.clear();
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// The refresh call itself. Goes through [`Self::execute`] directly so
    /// a 401 here can never recurse into another refresh.
    async fn call_refresh(&self) -> Result<(), ClientError> {
        let response = self.execute(&ApiRequest::post(paths::REFRESH)).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn execute(&self, req: &ApiRequest) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.base_url, req.path);
        let mut builder = self.http.request(req.method.clone(), url);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    async fn classify<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        if response.status().is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(ClientError::from);
        }
        Err(Self::error_from(response).await)
    }

    /// Turn a non-success response into [`ClientError::Api`], tolerating
    /// bodies that are not the structured `{ error, fields? }` envelope.
    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let raw = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiErrorBody>(&raw).unwrap_or_else(|_| ApiErrorBody {
            error: if raw.is_empty() {
                format!("HTTP {status}")
            } else {
                raw
            },
            fields: None,
        });
        ClientError::Api { status, body }
    }
}
