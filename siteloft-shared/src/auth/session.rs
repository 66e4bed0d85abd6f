/// Session resolution
///
/// Maps opaque, caller-supplied tokens to identities. Token issuance and
/// expiry live outside this core; the resolver only performs the lookup and
/// is strictly read-only.
///
/// Two independent tokens exist:
///
/// - the session token (user identity), carried in the session cookie;
/// - the registration token (pre-account onboarding), carried in a distinct
///   cookie and resolved to a [`TempRegistration`] id without any user
///   session.
///
/// "No identity" (absent/unknown token, inactive user) is distinct from
/// "identity found but forbidden", which is decided later by the permission
/// evaluator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::registration::TempRegistration;
use crate::models::user::User;

/// A resolved user identity
///
/// Produced once per request by [`resolve_session`] and passed explicitly
/// into every subsequent component call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// The authenticated user
    pub user: User,
}

impl Identity {
    /// The authenticated user's ID
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// The account the user last operated in, if any
    pub fn active_account_id(&self) -> Option<Uuid> {
        self.user.last_selected_account_id
    }
}

/// Session record binding an opaque token to a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Opaque token (primary key)
    #[serde(skip_serializing)]
    pub token: String,

    /// User bound to this session
    pub user_id: Uuid,

    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Binds an opaque token to a user
    pub async fn create(pool: &PgPool, token: &str, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, user_id)
            VALUES ($1, $2)
            RETURNING token, user_id, created_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }
}

/// Resolves a session token to a user identity
///
/// Returns None when the token is unknown or the bound user has been
/// deactivated. Read-only; never touches the session row.
pub async fn resolve_session(
    pool: &PgPool,
    token: &str,
) -> Result<Option<Identity>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.email, u.is_active, u.is_super_admin, u.registration_step,
               u.last_selected_account_id, u.created_at, u.updated_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND u.is_active
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user.map(|user| Identity { user }))
}

/// Resolves a registration token to a temp registration ID
///
/// Independent of any user session. Returns None when the token no longer
/// maps to a row (expired or garbage-collected registration); the caller is
/// responsible for clearing the now-dangling cookie.
pub async fn resolve_registration(
    pool: &PgPool,
    token: &str,
) -> Result<Option<Uuid>, sqlx::Error> {
    let id: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM temp_registrations WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Convenience wrapper: resolves the registration token straight to the full
/// record
pub async fn resolve_registration_record(
    pool: &PgPool,
    token: &str,
) -> Result<Option<TempRegistration>, sqlx::Error> {
    match resolve_registration(pool, token).await? {
        Some(id) => TempRegistration::find_by_id(pool, id).await,
        None => Ok(None),
    }
}
