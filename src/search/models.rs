//! Session state and its transitions
//!
//! Every mutation of a search session goes through the methods here. The
//! async driver in `session` only decides when to call them.

use crate::query::{build_query, FilterSet, Query};
use crate::results::{ErrorKind, SearchError, SearchPage, UserSummary};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a search session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// A fetch issued by a transition, to be completed with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Search generation the fetch belongs to
    pub generation: u64,
    /// Page being fetched
    pub page: u32,
    /// Replace items instead of appending
    pub replace: bool,
    /// Query for the fetch
    pub query: Query,
}

/// Observable state of one search-and-paginate interaction
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Filters of the current search
    pub filters: FilterSet,
    /// Query built from `filters`, if any
    pub query: Option<Query>,
    /// Current page (1-indexed)
    pub page: u32,
    /// Accumulated results in arrival order
    pub items: Vec<UserSummary>,
    /// Total matches reported by the provider
    pub total_count: u64,
    /// Whether `load_more` can fetch another page
    pub has_more: bool,
    pub status: Status,
    /// Last failure, cleared by the next success or search
    pub error: Option<SearchError>,
    /// Provider flagged the last page as incomplete
    pub incomplete_results: bool,
    generation: u64,
    result_cap: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(crate::PROVIDER_RESULT_CAP)
    }
}

impl SessionState {
    /// Create an idle state paginating up to `result_cap` results
    pub fn new(result_cap: u64) -> Self {
        Self {
            filters: FilterSet::default(),
            query: None,
            page: 1,
            items: Vec::new(),
            total_count: 0,
            has_more: false,
            status: Status::Idle,
            error: None,
            incomplete_results: false,
            generation: 0,
            result_cap,
        }
    }

    /// Current search generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result_cap(&self) -> u64 {
        self.result_cap
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(SearchError::kind)
    }

    /// Number of results reachable through pagination
    pub fn reachable(&self) -> u64 {
        self.total_count.min(self.result_cap)
    }

    /// Return to idle, invalidating any in-flight fetch
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new(self.result_cap);
        self.generation = generation;
    }

    /// Start a new search, discarding previous results
    ///
    /// Returns the fetch to perform, or `None` when the filters build no
    /// query, in which case the state is already in `Error`.
    pub fn begin_search(&mut self, filters: FilterSet) -> Option<FetchTicket> {
        self.reset();
        self.filters = filters;

        match build_query(&self.filters) {
            Ok(query) => {
                self.query = Some(query.clone());
                self.status = Status::Loading;
                Some(FetchTicket {
                    generation: self.generation,
                    page: 1,
                    replace: true,
                    query,
                })
            }
            Err(e) => {
                self.status = Status::Error;
                self.error = Some(e.into());
                None
            }
        }
    }

    /// Start fetching the next page
    ///
    /// Only valid after a successful fetch with more results remaining;
    /// returns `None` otherwise and leaves the state untouched.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.status != Status::Success || !self.has_more {
            return None;
        }
        let query = self.query.clone()?;

        self.page += 1;
        self.status = Status::Loading;
        Some(FetchTicket {
            generation: self.generation,
            page: self.page,
            replace: false,
            query,
        })
    }

    /// Apply the outcome of a fetch
    ///
    /// Returns `false` without touching the state when the ticket belongs to
    /// a superseded search.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<SearchPage, SearchError>,
    ) -> bool {
        if ticket.generation != self.generation || self.status != Status::Loading {
            return false;
        }

        match outcome {
            Ok(page) => {
                let received = page.items.len();
                if ticket.replace {
                    self.items = page.items;
                } else {
                    self.items.extend(page.items);
                }
                self.total_count = page.total_count;
                self.incomplete_results = page.incomplete_results;
                self.has_more = received > 0 && (self.items.len() as u64) < self.reachable();
                self.status = Status::Success;
                self.error = None;
            }
            Err(e) => {
                if ticket.replace {
                    self.items.clear();
                    self.total_count = 0;
                } else {
                    // page stays on the last one that actually arrived
                    self.page = ticket.page.saturating_sub(1).max(1);
                }
                self.has_more = false;
                self.status = Status::Error;
                self.error = Some(e);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(start: u64, count: u64) -> Vec<UserSummary> {
        (start..start + count)
            .map(|id| UserSummary {
                id,
                login: format!("user{}", id),
                avatar_url: String::new(),
                profile_url: format!("https://github.com/user{}", id),
                score: 1.0,
            })
            .collect()
    }

    fn page(start: u64, count: u64, total: u64) -> Result<SearchPage, SearchError> {
        Ok(SearchPage {
            items: users(start, count),
            total_count: total,
            incomplete_results: false,
        })
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::default();
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.page, 1);
        assert!(state.items.is_empty());
        assert!(!state.has_more);
        assert!(state.error_kind().is_none());
    }

    #[test]
    fn test_status_display_matches_serde() {
        for status in [Status::Idle, Status::Loading, Status::Success, Status::Error] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_begin_search() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("react")).unwrap();

        assert_eq!(state.status, Status::Loading);
        assert_eq!(ticket.page, 1);
        assert!(ticket.replace);
        assert_eq!(ticket.query.as_str(), "react");
        assert_eq!(ticket.generation, state.generation());
    }

    #[test]
    fn test_empty_filters_fail_without_fetch() {
        let mut state = SessionState::default();
        assert!(state.begin_search(FilterSet::new()).is_none());
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.error_kind(), Some(ErrorKind::EmptyFilter));
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_accumulates_until_total() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("react")).unwrap();
        assert!(state.complete(&ticket, page(0, 100, 250)));
        assert!(state.has_more);

        let ticket = state.begin_load_more().unwrap();
        assert_eq!(ticket.page, 2);
        assert!(!ticket.replace);
        assert!(state.complete(&ticket, page(100, 100, 250)));
        assert!(state.has_more);

        let ticket = state.begin_load_more().unwrap();
        assert!(state.complete(&ticket, page(200, 100, 250)));

        assert_eq!(state.items.len(), 300);
        assert_eq!(state.page, 3);
        assert!(!state.has_more);
        assert_eq!(state.status, Status::Success);
        assert!(state.begin_load_more().is_none());
    }

    #[test]
    fn test_result_cap_bounds_pagination() {
        let mut state = SessionState::new(200);
        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        state.complete(&ticket, page(0, 100, 50_000));
        assert!(state.has_more);

        let ticket = state.begin_load_more().unwrap();
        state.complete(&ticket, page(100, 100, 50_000));
        assert_eq!(state.total_count, 50_000);
        assert!(!state.has_more);
    }

    #[test]
    fn test_empty_page_stops_pagination() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        state.complete(&ticket, page(0, 0, 40));
        assert!(!state.has_more);
    }

    #[test]
    fn test_no_dedup_across_pages() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        state.complete(&ticket, page(0, 2, 10));
        let ticket = state.begin_load_more().unwrap();
        state.complete(&ticket, page(1, 2, 10));

        let ids: Vec<u64> = state.items.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![0, 1, 1, 2]);
    }

    #[test]
    fn test_load_more_guarded_while_loading() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        assert!(state.begin_load_more().is_none());

        state.complete(&ticket, page(0, 10, 100));
        assert!(state.begin_load_more().is_some());
        assert!(state.begin_load_more().is_none());
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_load_more_failure_keeps_items() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        state.complete(&ticket, page(0, 30, 100));

        let ticket = state.begin_load_more().unwrap();
        state.complete(&ticket, Err(SearchError::RateLimited { reset_at: None }));

        assert_eq!(state.items.len(), 30);
        assert_eq!(state.total_count, 100);
        assert_eq!(state.page, 1);
        assert!(!state.has_more);
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.error_kind(), Some(ErrorKind::RateLimited));
    }

    #[test]
    fn test_search_failure_clears_items() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        state.complete(&ticket, page(0, 30, 100));

        let ticket = state.begin_search(FilterSet::keyword("b")).unwrap();
        assert!(state.items.is_empty());
        state.complete(&ticket, Err(SearchError::Network("reset".to_string())));

        assert!(state.items.is_empty());
        assert_eq!(state.total_count, 0);
        assert!(!state.has_more);
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.error_kind(), Some(ErrorKind::NetworkError));
    }

    #[test]
    fn test_stale_ticket_discarded() {
        let mut state = SessionState::default();
        let stale = state.begin_search(FilterSet::keyword("a")).unwrap();
        let fresh = state.begin_search(FilterSet::keyword("b")).unwrap();
        assert!(fresh.generation > stale.generation);

        assert!(!state.complete(&stale, page(0, 5, 5)));
        assert_eq!(state.status, Status::Loading);
        assert!(state.items.is_empty());

        assert!(state.complete(&fresh, page(100, 3, 3)));
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.items[0].id, 100);
    }

    #[test]
    fn test_error_then_search_recovers() {
        let mut state = SessionState::default();
        state.begin_search(FilterSet::new());
        assert_eq!(state.status, Status::Error);

        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        assert!(state.error.is_none());
        state.complete(&ticket, page(0, 1, 1));
        assert_eq!(state.status, Status::Success);
    }

    #[test]
    fn test_reset_invalidates_in_flight() {
        let mut state = SessionState::default();
        let ticket = state.begin_search(FilterSet::keyword("a")).unwrap();
        state.reset();
        assert_eq!(state.status, Status::Idle);
        assert!(!state.complete(&ticket, page(0, 1, 1)));
        assert!(state.items.is_empty());
    }
}
