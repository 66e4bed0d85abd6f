/// Authorized operations
///
/// Each operation takes an explicit identity (or registration token),
/// performs its own authorization against the backing store, and applies a
/// state change. Handlers and tests both go through these functions so there
/// is exactly one code path per operation.
///
/// # Modules
///
/// - `members`: Member status state machine (suspend/activate)
/// - `sites`: Site selection and per-site preferences
/// - `registration`: Interview saves and registration completion
///
/// # Error taxonomy
///
/// [`OpError`] mirrors the system-wide taxonomy. Expected failures carry
/// stable user-facing reasons; database failures stay opaque and are mapped
/// to an internal error at the HTTP boundary.

pub mod members;
pub mod registration;
pub mod sites;

use crate::auth::authorization::AuthzError;
use crate::slug::SlugError;

/// Error type for authorized operations
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    /// Entity absent, or reported absent to avoid leaking cross-tenant
    /// existence
    #[error("{0}")]
    NotFound(&'static str),

    /// Authenticated but lacking permission
    #[error("{0}")]
    Forbidden(String),

    /// Operation not legal from the entity's current state
    #[error("{0}")]
    InvalidState(&'static str),

    /// Malformed or missing input
    #[error("{0}")]
    Validation(&'static str),

    /// The temp registration referenced by the caller's token is gone;
    /// the caller must clear the dangling token and start over
    #[error("Registration not found; please start over")]
    RegistrationExpired,

    /// Slug rejected with a user-facing reason
    #[error(transparent)]
    Slug(#[from] SlugError),

    /// Unexpected store failure; surfaced to the caller as an opaque
    /// internal error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<AuthzError> for OpError {
    fn from(err: AuthzError) -> Self {
        match err {
            // Tenant boundary: a non-member must not learn the target exists.
            AuthzError::NotMember(_) => OpError::NotFound("Member not found"),
            AuthzError::MissingPermission(permission) => {
                OpError::Forbidden(format!("Missing required permission: {permission}"))
            }
            AuthzError::Database(err) => OpError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_member_masks_as_not_found() {
        let err = OpError::from(AuthzError::NotMember(Uuid::new_v4()));
        assert!(matches!(err, OpError::NotFound(_)));
    }

    #[test]
    fn test_missing_permission_is_forbidden() {
        let err = OpError::from(AuthzError::MissingPermission("members:edit".to_string()));
        assert!(matches!(err, OpError::Forbidden(_)));
    }
}
