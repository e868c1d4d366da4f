use std::time::Duration;

use reqwest::StatusCode;

use crate::models::{DashboardSettings, PatternSet};

// Enough of an error body to identify it in a log line.
const ERROR_BODY_EXCERPT: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("patterns request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("patterns API error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode patterns payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(e) if e.is_timeout() => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}

/// Thin client for the pattern detection backend.
#[derive(Debug, Clone)]
pub struct PatternClient {
    http: reqwest::Client,
    url: String,
}

impl PatternClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn from_settings(settings: &DashboardSettings) -> Result<Self, FetchError> {
        Self::new(settings.patterns_url(), settings.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_patterns(&self) -> Result<PatternSet, FetchError> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: text.chars().take(ERROR_BODY_EXCERPT).collect(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
