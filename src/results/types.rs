//! Result type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user item as returned by the search API
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub score: f64,
}

/// Body of a `/search/users` response
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<RawUser>,
}

/// A single user search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Numeric account id
    pub id: u64,
    /// Account handle
    pub login: String,
    /// Avatar image URL
    pub avatar_url: String,
    /// Profile page URL
    pub profile_url: String,
    /// Provider relevance score
    pub score: f64,
}

impl From<RawUser> for UserSummary {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            login: raw.login,
            avatar_url: raw.avatar_url,
            profile_url: raw.html_url,
            score: raw.score,
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Users on this page, in provider order
    pub items: Vec<UserSummary>,
    /// Total matches reported by the provider
    pub total_count: u64,
    /// Provider timed out before collecting every match
    pub incomplete_results: bool,
}

impl From<RawSearchResponse> for SearchPage {
    fn from(raw: RawSearchResponse) -> Self {
        Self {
            items: raw.items.into_iter().map(UserSummary::from).collect(),
            total_count: raw.total_count,
            incomplete_results: raw.incomplete_results,
        }
    }
}

/// Full profile from `/users/{login}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    #[serde(rename(deserialize = "html_url"))]
    pub profile_url: String,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: Option<DateTime<Utc>>,
}
