/// Account model and database operations
///
/// Accounts are the tenant entity for multi-tenant isolation. Every user
/// belongs to one or more accounts via the `account_members` table. The
/// human-readable slug is globally unique and enforced by a database
/// constraint; the advisory check in [`crate::slug`] is a pre-check only.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     slug VARCHAR(50) NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT accounts_slug_key UNIQUE (slug)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account model representing a tenant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Globally unique, URL-friendly identifier
    pub slug: String,

    /// Display name
    pub name: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Globally unique slug (validated by the caller before insert; the
    /// unique constraint is the authoritative check)
    pub slug: String,

    /// Display name
    pub name: String,
}

impl Account {
    /// Creates a new account
    ///
    /// # Errors
    ///
    /// Returns a database error on slug collision (unique constraint
    /// violation); callers translate it via
    /// [`crate::slug::is_slug_unique_violation`].
    pub async fn create(pool: &PgPool, data: CreateAccount) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (slug, name)
            VALUES ($1, $2)
            RETURNING id, slug, name, created_at, updated_at
            "#,
        )
        .bind(data.slug)
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, slug, name, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Checks whether an account with this slug already exists
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE slug = $1)
            "#,
        )
        .bind(slug)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
