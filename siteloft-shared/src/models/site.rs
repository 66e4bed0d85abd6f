/// Site model and database operations
///
/// A site is a managed property belonging to exactly one account. Site
/// selection (`ops::sites`) must only ever point a member at a site owned by
/// the member's own account.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sites (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Site model representing a managed property
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Site {
    /// Unique site ID (UUID v4)
    pub id: Uuid,

    /// Owning account
    pub account_id: Uuid,

    /// Display name
    pub name: String,

    /// When the site was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSite {
    /// Owning account
    pub account_id: Uuid,

    /// Display name
    pub name: String,
}

impl Site {
    /// Creates a new site
    pub async fn create(pool: &PgPool, data: CreateSite) -> Result<Self, sqlx::Error> {
        let site = sqlx::query_as::<_, Site>(
            r#"
            INSERT INTO sites (account_id, name)
            VALUES ($1, $2)
            RETURNING id, account_id, name, created_at
            "#,
        )
        .bind(data.account_id)
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(site)
    }

    /// Checks whether a site exists inside the given account
    ///
    /// Used by site selection to decide between success and NotFound without
    /// revealing whether the site exists under some other tenant.
    pub async fn belongs_to_account(
        pool: &PgPool,
        site_id: Uuid,
        account_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sites
                WHERE id = $1 AND account_id = $2
            )
            "#,
        )
        .bind(site_id)
        .bind(account_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
