//! Search error taxonomy

use crate::query::EmptyQueryError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of a failed search, for the rendering layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyFilter,
    RateLimited,
    InvalidQuery,
    NotFound,
    NetworkError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFilter => write!(f, "No search filter given"),
            Self::RateLimited => write!(f, "Rate limit exceeded"),
            Self::InvalidQuery => write!(f, "Invalid search query"),
            Self::NotFound => write!(f, "Not found"),
            Self::NetworkError => write!(f, "Network error"),
        }
    }
}

/// Failure of a search or lookup
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    EmptyFilter(#[from] EmptyQueryError),

    #[error("GitHub API rate limit exceeded")]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyFilter(_) => ErrorKind::EmptyFilter,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::InvalidQuery(_) => ErrorKind::InvalidQuery,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Network(_) => ErrorKind::NetworkError,
        }
    }

    /// Classify a non-2xx HTTP response
    ///
    /// `reset` is the raw `x-ratelimit-reset` header (epoch seconds), if any.
    pub fn from_status(status: u16, body: &str, reset: Option<&str>) -> Self {
        match status {
            403 | 429 => Self::RateLimited {
                reset_at: reset
                    .and_then(|r| r.trim().parse::<i64>().ok())
                    .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
            },
            422 => Self::InvalidQuery(api_message(body).unwrap_or_else(|| status.to_string())),
            404 => Self::NotFound(api_message(body).unwrap_or_else(|| "Not Found".to_string())),
            _ => Self::Network(format!("HTTP error: {}", status)),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network("request timed out".to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Network(format!("failed to parse response: {}", e))
    }
}

/// Extract the `message` field of a GitHub error body
fn api_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(|m| m.to_string())
}
