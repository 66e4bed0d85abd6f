/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `members`: Member status transitions (suspend/activate)
/// - `permissions`: Effective permission lookup for the current member
/// - `sites`: Site selection and per-site preferences
/// - `registration`: Pre-account onboarding workflow
/// - `slugs`: Public slug availability check

pub mod health;
pub mod members;
pub mod permissions;
pub mod registration;
pub mod sites;
pub mod slugs;

use serde::{Deserialize, Serialize};

/// Standard success response for state-mutating operations
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always true on the success path
    pub success: bool,
}

impl SuccessResponse {
    /// The canonical `{"success": true}` body
    pub fn ok() -> Self {
        Self { success: true }
    }
}
