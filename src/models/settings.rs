use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("api_base_url must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),
    #[error("{0} must be at least 1 second")]
    ZeroDuration(&'static str),
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardSettings {
    pub api_base_url: String,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub bind_addr: String,
    pub show_stale_indicator: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            refresh_interval_secs: 5 * 60,
            request_timeout_secs: 30,
            bind_addr: "127.0.0.1:8080".to_string(),
            show_stale_indicator: true,
        }
    }
}

impl DashboardSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the patterns endpoint, tolerant of a trailing slash on the base.
    pub fn patterns_url(&self) -> String {
        format!("{}/api/patterns", self.api_base_url.trim().trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.api_base_url.clone()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("refresh_interval_secs"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("request_timeout_secs"));
        }
        Ok(())
    }
}
