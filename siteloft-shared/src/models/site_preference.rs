/// Per (user, site) preference overrides
///
/// At most one record exists per (user, site) pair, enforced by the
/// composite primary key. Absent fields mean "no override"; the caller
/// falls back to its own defaults.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_site_preferences (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     site_id UUID NOT NULL REFERENCES sites(id) ON DELETE CASCADE,
///     language TEXT,
///     timezone TEXT,
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, site_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Language/timezone override for one user on one site
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSitePreference {
    /// User the override applies to
    pub user_id: Uuid,

    /// Site the override applies to
    pub site_id: Uuid,

    /// Preferred language, if overridden
    pub language: Option<String>,

    /// Preferred timezone, if overridden
    pub timezone: Option<String>,

    /// When the preference was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserSitePreference {
    /// Finds the preference record for a (user, site) pair
    pub async fn find(
        pool: &PgPool,
        user_id: Uuid,
        site_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let pref = sqlx::query_as::<_, UserSitePreference>(
            r#"
            SELECT user_id, site_id, language, timezone, updated_at
            FROM user_site_preferences
            WHERE user_id = $1 AND site_id = $2
            "#,
        )
        .bind(user_id)
        .bind(site_id)
        .fetch_optional(pool)
        .await?;

        Ok(pref)
    }

    /// Creates or updates the preference record for a (user, site) pair
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        site_id: Uuid,
        language: Option<String>,
        timezone: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        let pref = sqlx::query_as::<_, UserSitePreference>(
            r#"
            INSERT INTO user_site_preferences (user_id, site_id, language, timezone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, site_id)
            DO UPDATE SET language = EXCLUDED.language,
                          timezone = EXCLUDED.timezone,
                          updated_at = NOW()
            RETURNING user_id, site_id, language, timezone, updated_at
            "#,
        )
        .bind(user_id)
        .bind(site_id)
        .bind(language)
        .bind(timezone)
        .fetch_one(pool)
        .await?;

        Ok(pref)
    }
}
