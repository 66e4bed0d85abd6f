/// Database models for Siteloft
///
/// This module contains all database models and their query operations.
///
/// # Models
///
/// - `user`: User identity records
/// - `account`: Tenant accounts with unique slugs
/// - `role`: Named permission bundles owned by an account
/// - `member`: User-account memberships with the status state machine
/// - `site`: Managed properties belonging to an account
/// - `site_preference`: Per (user, site) language/timezone overrides
/// - `registration`: Pre-account temporary registration records
///
/// # Example
///
/// ```no_run
/// use siteloft_shared::models::user::{User, CreateUser};
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod member;
pub mod registration;
pub mod role;
pub mod site;
pub mod site_preference;
pub mod user;
