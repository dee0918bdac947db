//! Search session module
//!
//! Owns the paginated search state, drives the query builder and the
//! provider, and applies the accumulation policy across pages.

mod models;
mod session;

pub use models::*;
pub use session::SearchSession;
