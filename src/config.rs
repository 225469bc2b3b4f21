use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Health Advisor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Gemini REST endpoint base.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for advice generation.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default per-request timeout for the Gemini client, in seconds.
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;

/// Default bind address for the local server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "health_advisor=info,tower_http=info".to_string()
}

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Invalid bind address '{0}'")]
    InvalidBindAddr(String),
}

/// Gemini client configuration, resolved from the environment.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Resolve from `GEMINI_API_KEY` (required), `GEMINI_BASE_URL`,
    /// `GEMINI_MODEL`, and `GEMINI_TIMEOUT_SECS` (all optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            api_key,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            timeout_secs: std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GEMINI_TIMEOUT_SECS),
        })
    }
}

/// Bind address for the local server, from `ADVISOR_ADDR` or the default.
pub fn bind_addr() -> Result<SocketAddr, ConfigError> {
    let raw = std::env::var("ADVISOR_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    raw.parse().map_err(|_| ConfigError::InvalidBindAddr(raw))
}
