use std::time::Duration;

/// Client configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform API origin (e.g. `http://localhost:8080`).
    pub api_base_url: String,
    /// Delay between submission-status poll ticks.
    pub poll_interval: Duration,
    /// Poll ticks before a submission is declared timed out.
    pub poll_max_attempts: u32,
    /// Delay between authentication and opening the notification stream.
    pub notify_debounce: Duration,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// platform defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("LOCO_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            poll_interval: Duration::from_millis(parsed_var("LOCO_POLL_INTERVAL_MS", 1000)),
            poll_max_attempts: parsed_var("LOCO_POLL_MAX_ATTEMPTS", 20) as u32,
            notify_debounce: Duration::from_millis(parsed_var("LOCO_NOTIFY_DEBOUNCE_MS", 1000)),
        }
    }

    /// Defaults with an explicit base URL. Handy for tests and embedding.
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            poll_interval: Duration::from_millis(1000),
            poll_max_attempts: 20,
            notify_debounce: Duration::from_millis(1000),
        }
    }
}

fn parsed_var(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
