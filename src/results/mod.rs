//! Result types and errors
//!
//! Read-only projections of provider responses plus the classified error
//! taxonomy every search operation reports.

mod error;
mod types;

pub use error::{ErrorKind, SearchError};
pub use types::*;
