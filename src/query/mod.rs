//! Query building module
//!
//! Turns the raw fields of a user search form into GitHub's user search
//! syntax. Clauses are emitted in a fixed order:
//! - Free-text keyword: `octocat`
//! - Location qualifier: `location:berlin`, `location:"San Francisco"`
//! - Repository count qualifier: `repos:>=10`
//!
//! The provider requires the free-text token to precede qualifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between query clauses
const CLAUSE_SEPARATOR: &str = " ";

/// Base URL of the web (non-API) user search page
const WEB_SEARCH_URL: &str = "https://github.com/search";

/// Raw search criteria as entered by the user
///
/// All fields may be blank; at least one must carry a usable value for a
/// query to be built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    /// Free-text keyword (login, name, email fragment)
    pub keyword: String,
    /// Location filter
    pub location: String,
    /// Minimum public repository count, kept as typed
    pub min_repos: String,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on keyword only
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::new().with_keyword(keyword)
    }

    /// Set keyword
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Set location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the raw minimum repository count
    pub fn with_min_repos(mut self, min_repos: impl Into<String>) -> Self {
        self.min_repos = min_repos.into();
        self
    }

    /// Parsed minimum repository count
    ///
    /// Blank, negative or non-numeric input yields `None`.
    pub fn min_repos(&self) -> Option<u32> {
        self.min_repos.trim().parse::<u32>().ok()
    }

    /// Check if no field would contribute a clause
    pub fn is_empty(&self) -> bool {
        self.keyword.trim().is_empty()
            && location_clause(&self.location).is_none()
            && self.min_repos().is_none()
    }
}

/// Provider-formatted search query
///
/// Only `build_query` creates one, so a `Query` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// The query string as sent in the `q` parameter
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Link to the same search on github.com
    pub fn web_url(&self) -> String {
        format!(
            "{}?q={}&type=users",
            WEB_SEARCH_URL,
            urlencoding::encode(&self.0)
        )
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// No filter field produced a usable clause
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("at least one search filter must be provided")]
pub struct EmptyQueryError;

/// Build the provider query for a filter set
pub fn build_query(filters: &FilterSet) -> Result<Query, EmptyQueryError> {
    let mut clauses = Vec::with_capacity(3);

    let keyword = filters.keyword.trim();
    if !keyword.is_empty() {
        clauses.push(keyword.to_string());
    }

    if let Some(clause) = location_clause(&filters.location) {
        clauses.push(clause);
    }

    if let Some(min_repos) = filters.min_repos() {
        clauses.push(format!("repos:>={}", min_repos));
    }

    if clauses.is_empty() {
        return Err(EmptyQueryError);
    }

    Ok(Query(clauses.join(CLAUSE_SEPARATOR)))
}

fn location_clause(location: &str) -> Option<String> {
    // quotes delimit qualifier values and cannot be escaped
    let location = location.replace('"', "");
    let words: Vec<&str> = location.split_whitespace().collect();
    match words.as_slice() {
        [] => None,
        [word] => Some(format!("location:{}", word)),
        _ => Some(format!("location:\"{}\"", words.join(" "))),
    }
}
