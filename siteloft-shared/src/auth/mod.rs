/// Authentication and authorization
///
/// This module covers the identity and permission side of the system:
///
/// - `session`: Resolves opaque session/registration tokens to identities
/// - `permissions`: Derives a member's effective permission set
/// - `authorization`: `require_*` gates used by state-mutating operations
///
/// # Design
///
/// Identity is resolved once per request into an explicit [`session::Identity`]
/// value and passed by parameter into every component; no component reads
/// ambient request state.

pub mod authorization;
pub mod permissions;
pub mod session;

pub use authorization::AuthzError;
pub use session::Identity;
