//! Client Configuration
//!
//! Resolved once at startup from build-time environment.

use std::sync::OnceLock;
use std::time::Duration;

use taskhub_realtime::ReconnectPolicy;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend origin, without the `/api` suffix
    pub api_base_url: String,
    /// Socket server origin (http/https; converted to ws/wss by the codec)
    pub socket_base_url: String,
    pub reconnect: ReconnectPolicy,
    pub deadline_poll_interval: Duration,
    pub reminder_window: Duration,
    pub toast_ttl: Duration,
    /// Ring buffer size for the console logger
    pub log_capacity: usize,
}

impl AppConfig {
    pub fn from_values(api_url: Option<&str>, socket_url: Option<&str>) -> Self {
        let api_base_url = api_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let socket_base_url = socket_url
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| api_base_url.clone());

        Self {
            api_base_url,
            socket_base_url,
            reconnect: ReconnectPolicy::default(),
            deadline_poll_interval: Duration::from_secs(5 * 60),
            reminder_window: Duration::from_secs(60 * 60),
            toast_ttl: Duration::from_secs(4),
            log_capacity: 500,
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.api_base_url, path)
    }
}

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Global config, built from `TASKHUB_API_URL` / `TASKHUB_SOCKET_URL` at compile time
pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(|| AppConfig::from_values(option_env!("TASKHUB_API_URL"), option_env!("TASKHUB_SOCKET_URL")))
}
