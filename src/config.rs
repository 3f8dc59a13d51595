use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub feeds: FeedsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    pub power_url: String,
    pub activity_url: String,
    pub timeout_secs: u64,
}

const DEFAULT_POWER_FEED_URL: &str =
    "https://opticoolweb-backend.onrender.com/api/v1/powerconsumptions";
const DEFAULT_ACTIVITY_FEED_URL: &str =
    "https://opticoolweb-backend.onrender.com/api/v1/activity-logs";

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let power_url = env::var("POWER_FEED_URL")
            .unwrap_or_else(|_| DEFAULT_POWER_FEED_URL.to_string());

        let activity_url = env::var("ACTIVITY_FEED_URL")
            .unwrap_or_else(|_| DEFAULT_ACTIVITY_FEED_URL.to_string());

        let timeout_secs = env::var("FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        Ok(Config {
            server: ServerConfig { host, port },
            feeds: FeedsConfig {
                power_url,
                activity_url,
                timeout_secs,
            },
        })
    }
}
