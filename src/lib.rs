//! gh-user-search: paginated GitHub user search
//!
//! Builds GitHub search queries from form-style filters, fetches result
//! pages, and keeps an accumulated, observable session state for a
//! rendering layer to display.

pub mod config;
pub mod network;
pub mod providers;
pub mod query;
pub mod results;
pub mod search;

pub use config::Settings;
pub use providers::{GitHub, SearchProvider};
pub use query::{build_query, EmptyQueryError, FilterSet, Query};
pub use results::{ErrorKind, SearchError, UserProfile, UserSummary};
pub use search::{SearchSession, SessionState, Status};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for API requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Default number of users per page
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Largest page size the search API accepts
pub const MAX_PER_PAGE: u32 = 100;

/// The search API never returns more than this many results per query
pub const PROVIDER_RESULT_CAP: u64 = 1000;
