//! Paginated search session

use super::models::{FetchTicket, SessionState};
use crate::config::{SearchSettings, Settings};
use crate::providers::{GitHub, SearchProvider, SearchRequest};
use crate::query::FilterSet;
use crate::results::{SearchError, UserProfile};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Stateful controller for one search-and-paginate interaction
///
/// Cloning yields another handle to the same session. State lives in a watch
/// channel: each transition runs under the channel's lock and no lock is held
/// while a request is outstanding, so a newer `search` can start while an
/// older one is still in flight.
#[derive(Clone)]
pub struct SearchSession {
    provider: Arc<dyn SearchProvider>,
    settings: SearchSettings,
    state: Arc<watch::Sender<SessionState>>,
}

impl SearchSession {
    /// Create a session over a provider
    pub fn new(provider: Arc<dyn SearchProvider>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SessionState::new(settings.result_cap));
        Self {
            provider,
            settings,
            state: Arc::new(state),
        }
    }

    /// Create a session against the GitHub API described by `settings`
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let provider = GitHub::with_settings(settings)?;
        info!("Search session using {}", settings.api.base_url);
        Ok(Self::new(Arc::new(provider), settings.search.clone()))
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every applied transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Run a new search, replacing filters and results
    pub async fn search(&self, filters: FilterSet) {
        let mut ticket = None;
        self.state
            .send_modify(|state| ticket = state.begin_search(filters));

        match ticket {
            Some(ticket) => {
                info!(
                    "Searching {} users for '{}'",
                    self.provider.name(),
                    ticket.query
                );
                self.fetch_page(ticket).await;
            }
            None => debug!("Search rejected: no usable filter"),
        }
    }

    /// Fetch and append the next page
    ///
    /// Returns `false` without issuing a request unless the last fetch
    /// succeeded and more results remain.
    pub async fn load_more(&self) -> bool {
        let mut ticket = None;
        self.state.send_if_modified(|state| {
            ticket = state.begin_load_more();
            ticket.is_some()
        });

        match ticket {
            Some(ticket) => {
                debug!("Loading page {} of '{}'", ticket.page, ticket.query);
                self.fetch_page(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Return to idle and ignore any response still in flight
    pub fn reset(&self) {
        self.state.send_modify(SessionState::reset);
    }

    /// Look up a single user; does not touch the session state
    pub async fn lookup_user(&self, login: &str) -> Result<UserProfile, SearchError> {
        self.provider.fetch_user(login).await
    }

    async fn fetch_page(&self, ticket: FetchTicket) {
        let request = SearchRequest {
            query: ticket.query.clone(),
            page: ticket.page,
            per_page: self.settings.effective_per_page(),
            sort: self.settings.sort.clone(),
            order: self.settings.order.clone(),
        };

        let outcome = self.provider.search_users(&request).await;
        match outcome {
            Ok(ref page) => debug!(
                "{} page {} of '{}' returned {} of {} users",
                self.provider.name(),
                ticket.page,
                ticket.query,
                page.items.len(),
                page.total_count
            ),
            Err(ref e) => warn!(
                "Search '{}' page {} failed ({}): {}",
                ticket.query,
                ticket.page,
                e.kind(),
                e
            ),
        }

        let applied = self
            .state
            .send_if_modified(|state| state.complete(&ticket, outcome));
        if applied {
            debug!(
                "Session for '{}' is now {}",
                ticket.query,
                self.state.borrow().status
            );
        } else {
            debug!(
                "Discarding stale response for '{}' (generation {})",
                ticket.query, ticket.generation
            );
        }
    }
}
