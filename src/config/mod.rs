//! Configuration module for gh-user-search
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;
