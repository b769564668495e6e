//! Client core for the Loco competitive-programming platform.
//!
//! This crate is the asynchronous-state-reconciliation layer that keeps a
//! client's view of the platform consistent with the server: who is logged
//! in ([`session`]), what in-flight requests should do about token expiry
//! ([`gateway`]), what happened to a submitted solution ([`poll`]), and
//! what the server pushed unprompted ([`notifications`]). UI layers sit on
//! top and only ever talk to these interfaces.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod notifications;
pub mod poll;
pub mod session;

use std::sync::Arc;

use loco_common::{LoginRequest, RegisterRequest, Submission, User};
use tokio::task::JoinHandle;

use config::Config;
use error::ClientError;
use gateway::Gateway;
use notifications::NotificationChannel;
use poll::{PollHandle, PollOptions, PollRegistry};
use session::{Session, SessionStore};

/// One of everything, wired together: the root handle the application
/// embeds.
pub struct LocoClient {
    config: Config,
    session: Arc<SessionStore>,
    gateway: Arc<Gateway>,
    polls: PollRegistry,
    notifications: Arc<NotificationChannel>,
}

impl LocoClient {
    /// Build a client against the configured API origin. One HTTP client
    /// (and one cookie jar — the session credential rides a cookie) is
    /// shared by the gateway and the notification stream.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        let session = Arc::new(SessionStore::new());
        let gateway = Arc::new(Gateway::new(
            http.clone(),
            &config.api_base_url,
            session.clone(),
        ));
        let polls = PollRegistry::new(gateway.clone(), PollOptions::from_config(&config));
        let notifications = Arc::new(NotificationChannel::new(
            http,
            &config.api_base_url,
            config.notify_debounce,
        ));
        Ok(Self {
            config,
            session,
            gateway,
            polls,
            notifications,
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(Config::from_env())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn polls(&self) -> &PollRegistry {
        &self.polls
    }

    pub fn notifications(&self) -> &Arc<NotificationChannel> {
        &self.notifications
    }

    // -----------------------------------------------------------------
    // Auth flows
    // -----------------------------------------------------------------

    /// Log in and store the returned identity.
    pub async fn login(&self, req: &LoginRequest) -> Result<User, ClientError> {
        let response = api::auth::login(&self.gateway, req).await?;
        let user = response
            .user
            .ok_or(ClientError::UnexpectedResponse("login returned no user"))?;
        self.session.set_identity(user.clone());
        Ok(user)
    }

    /// Register and store the returned identity.
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, ClientError> {
        let response = api::auth::register(&self.gateway, req).await?;
        let user = response
            .user
            .ok_or(ClientError::UnexpectedResponse("register returned no user"))?;
        self.session.set_identity(user.clone());
        Ok(user)
    }

    /// End the session. The server call is best-effort; the local session
    /// is cleared no matter what.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = api::auth::logout(&self.gateway).await;
        self.session.clear();
        result.map(|_| ())
    }

    /// Reconcile local belief with the server at startup: `GET /auth/me`
    /// either confirms the cookie session (storing the fresh identity) or
    /// — after the gateway's one refresh attempt — proves it dead, in
    /// which case the session is cleared without error.
    pub async fn bootstrap(&self) -> Result<Session, ClientError> {
        match api::auth::me(&self.gateway).await {
            Ok(user) => self.session.set_identity(user),
            Err(err) if err.is_auth_failure() => self.session.clear(),
            Err(err) => return Err(err),
        }
        Ok(self.session.read())
    }

    // -----------------------------------------------------------------
    // Submissions
    // -----------------------------------------------------------------

    /// Submit a solution and immediately start watching its verdict.
    pub async fn submit_and_watch(
        &self,
        problem_id: i64,
        language_id: i64,
        code: &str,
    ) -> Result<(Submission, PollHandle), ClientError> {
        let submission = api::submissions::submit(&self.gateway, problem_id, language_id, code).await?;
        let handle = self.polls.start(submission.id);
        Ok((submission, handle))
    }

    // -----------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------

    pub fn connect_notifications(&self) {
        self.notifications.connect();
    }

    pub fn disconnect_notifications(&self) {
        self.notifications.disconnect();
    }

    /// Tie the notification channel to the session: opened on login,
    /// closed on logout, superseded on re-login.
    pub fn watch_session(&self) -> JoinHandle<()> {
        self.notifications.watch_session(self.session.subscribe())
    }
}
