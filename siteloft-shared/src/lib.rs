//! # Siteloft Shared Library
//!
//! This crate contains the domain models, data layer, and business logic
//! shared by the Siteloft API server and supporting tools.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Session resolution, permission evaluation, authorization
//! - `ops`: Authorized operations (member lifecycle, site selection, registration)
//! - `slug`: Account slug validation and availability checks
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod ops;
pub mod slug;

/// Current version of the Siteloft shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
