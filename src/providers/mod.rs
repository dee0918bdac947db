//! Search provider module
//!
//! Defines the SearchProvider trait and the GitHub implementation.

mod traits;

pub mod github;

pub use github::GitHub;
pub use traits::*;
