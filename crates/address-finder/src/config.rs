use std::env;
use std::time::Duration;

/// Runtime configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub onemap_base_url: String,
    pub request_timeout: Duration,
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let onemap_base_url = get("ONEMAP_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| onemap_client::DEFAULT_BASE_URL.to_string());

        let request_timeout = get("ONEMAP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(onemap_client::DEFAULT_TIMEOUT);

        // Use JSON format for structured log collection when LOG_FORMAT=json
        let json_logs = get("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

        Self {
            onemap_base_url,
            request_timeout,
            json_logs,
        }
    }
}
