/// User model and database operations
///
/// Users are identity records. They can belong to multiple accounts via the
/// `account_members` table and are never hard-deleted; admin deactivation
/// flips `is_active` instead.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_super_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     registration_step TEXT,
///     last_selected_account_id UUID,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an identity record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (unique, case-insensitive)
    pub email: String,

    /// Whether the user may authenticate; set to false by admin deactivation
    pub is_active: bool,

    /// Platform-wide administrative flag
    pub is_super_admin: bool,

    /// Onboarding step recorded at signup time, if the user arrived through
    /// the registration workflow
    pub registration_step: Option<String>,

    /// The account this user last operated in; site selection and
    /// permission lookups are scoped to it
    pub last_selected_account_id: Option<Uuid>,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email)
            VALUES ($1)
            RETURNING id, email, is_active, is_super_admin, registration_step,
                      last_selected_account_id, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, is_active, is_super_admin, registration_step,
                   last_selected_account_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Sets the user's active flag
    ///
    /// Deactivated users fail session resolution; their memberships are left
    /// untouched.
    pub async fn set_active(pool: &PgPool, id: Uuid, is_active: bool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(is_active)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Records the account the user last operated in
    pub async fn set_last_selected_account(
        pool: &PgPool,
        id: Uuid,
        account_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_selected_account_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(account_id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
