//! Provider traits and types

use crate::query::Query;
use crate::results::{SearchError, SearchPage, UserProfile};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// Parameters for one page of a user search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Provider-formatted query
    pub query: Query,
    /// Page number (1-indexed)
    pub page: u32,
    /// Results per page
    pub per_page: u32,
    /// Sort field
    pub sort: String,
    /// Sort direction
    pub order: String,
}

/// HTTP request to be made by a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercased names)
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, SearchError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value by lowercase name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    /// Turn a non-2xx response into a classified error
    pub fn error_for_status(&self) -> Result<(), SearchError> {
        if self.is_success() {
            return Ok(());
        }
        Err(SearchError::from_status(
            self.status,
            &self.text,
            self.header("x-ratelimit-reset"),
        ))
    }
}

/// Remote user directory that can be searched page by page
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Fetch one page of users matching the request
    async fn search_users(&self, request: &SearchRequest) -> Result<SearchPage, SearchError>;

    /// Look up a single user by login
    async fn fetch_user(&self, login: &str) -> Result<UserProfile, SearchError>;
}
