//! GitHub user search provider
//!
//! Uses GitHub's official REST API: `/search/users` for paginated search and
//! `/users/{login}` for single-user lookup.

use super::traits::*;
use crate::config::Settings;
use crate::network::HttpClient;
use crate::query::EmptyQueryError;
use crate::results::{RawSearchResponse, SearchError, SearchPage, UserProfile};
use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

/// API version pinned through the `X-GitHub-Api-Version` header
const API_VERSION: &str = "2022-11-28";

/// GitHub user search provider
pub struct GitHub {
    client: HttpClient,
    api_url: Url,
}

impl GitHub {
    /// Create a provider against the given API root
    pub fn new(client: HttpClient, base_url: &str) -> anyhow::Result<Self> {
        // Url::join replaces the last path segment unless it ends with '/'
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Ok(Self {
            client,
            api_url: Url::parse(&base)?,
        })
    }

    /// Create a provider and its HTTP client from settings
    pub fn with_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = HttpClient::with_settings(settings)?;
        Self::new(client, &settings.api.base_url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        self.api_url
            .join(path)
            .map_err(|e| SearchError::Network(format!("invalid API URL: {}", e)))
    }

    /// Build the HTTP request for a search page
    pub fn search_request(&self, params: &SearchRequest) -> Result<ProviderRequest, SearchError> {
        let url = self.endpoint("search/users")?;

        Ok(ProviderRequest::get(url.as_str())
            .header("X-GitHub-Api-Version", API_VERSION)
            .param("q", params.query.as_str())
            .param("page", params.page.to_string())
            .param("per_page", params.per_page.to_string())
            .param("sort", params.sort.as_str())
            .param("order", params.order.as_str()))
    }

    /// Parse a search response into a page of users
    pub fn parse_search(&self, response: ProviderResponse) -> Result<SearchPage, SearchError> {
        response.error_for_status()?;

        let raw: RawSearchResponse = response.json()?;
        if raw.incomplete_results {
            warn!("GitHub reported incomplete results for {}", response.url);
        }

        Ok(SearchPage::from(raw))
    }

    /// Build the HTTP request for a single-user lookup
    pub fn user_request(&self, login: &str) -> Result<ProviderRequest, SearchError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(EmptyQueryError.into());
        }

        let url = self.endpoint(&format!("users/{}", urlencoding::encode(login)))?;
        Ok(ProviderRequest::get(url.as_str()).header("X-GitHub-Api-Version", API_VERSION))
    }

    /// Parse a user profile response
    pub fn parse_user(&self, response: ProviderResponse) -> Result<UserProfile, SearchError> {
        response.error_for_status()?;
        response.json()
    }
}

#[async_trait]
impl SearchProvider for GitHub {
    fn name(&self) -> &str {
        "github"
    }

    async fn search_users(&self, params: &SearchRequest) -> Result<SearchPage, SearchError> {
        let request = self.search_request(params)?;
        let response = self.client.execute(request).await?;

        debug!(
            "GitHub search '{}' page {} returned status {}",
            params.query, params.page, response.status
        );

        self.parse_search(response)
    }

    async fn fetch_user(&self, login: &str) -> Result<UserProfile, SearchError> {
        let request = self.user_request(login)?;
        let response = self.client.execute(request).await?;
        self.parse_user(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_query, FilterSet};
    use crate::results::ErrorKind;
    use std::collections::HashMap;

    fn github() -> GitHub {
        GitHub::new(HttpClient::new().unwrap(), "https://api.github.com").unwrap()
    }

    fn response(status: u16, text: &str) -> ProviderResponse {
        ProviderResponse {
            status,
            headers: HashMap::new(),
            text: text.to_string(),
            url: "https://api.github.com/search/users".to_string(),
        }
    }

    #[test]
    fn test_github_request() {
        let params = SearchRequest {
            query: build_query(&FilterSet::keyword("rust").with_min_repos("3")).unwrap(),
            page: 2,
            per_page: 30,
            sort: "followers".to_string(),
            order: "desc".to_string(),
        };
        let request = github().search_request(&params).unwrap();

        assert_eq!(request.url, "https://api.github.com/search/users");
        assert_eq!(request.get_param("q"), Some("rust repos:>=3"));
        assert_eq!(request.get_param("page"), Some("2"));
        assert_eq!(request.get_param("per_page"), Some("30"));
        assert_eq!(request.get_param("sort"), Some("followers"));
        assert_eq!(request.get_param("order"), Some("desc"));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(github().name(), "github");
    }

    #[test]
    fn test_base_url_with_path() {
        let provider =
            GitHub::new(HttpClient::new().unwrap(), "https://ghe.example.com/api/v3").unwrap();
        let request = provider.user_request("octocat").unwrap();
        assert_eq!(request.url, "https://ghe.example.com/api/v3/users/octocat");
    }

    #[test]
    fn test_blank_login_rejected() {
        let err = github().user_request("  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyFilter);
    }

    #[test]
    fn test_parse_search() {
        let body = r#"{"total_count": 1, "incomplete_results": false,
            "items": [{"id": 7, "login": "ferris", "avatar_url": "a",
                       "html_url": "https://github.com/ferris", "score": 1.0}]}"#;
        let page = github().parse_search(response(200, body)).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].login, "ferris");
    }

    #[test]
    fn test_parse_search_garbage() {
        let err = github().parse_search(response(200, "<html>")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
    }

    #[test]
    fn test_parse_search_errors() {
        let provider = github();
        assert_eq!(
            provider.parse_search(response(403, "")).unwrap_err().kind(),
            ErrorKind::RateLimited
        );
        assert_eq!(
            provider.parse_search(response(422, "{}")).unwrap_err().kind(),
            ErrorKind::InvalidQuery
        );
        assert_eq!(
            provider.parse_user(response(404, "")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
