/// Role model and database operations
///
/// A role is a named permission bundle owned by an account. Many members may
/// share a role. Permissions are stored as a JSONB array of permission token
/// strings in `"resource:action"` form (e.g. `"members:edit"`).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     name VARCHAR(100) NOT NULL,
///     permissions JSONB NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Role model representing a named permission bundle
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role ID (UUID v4)
    pub id: Uuid,

    /// Owning account
    pub account_id: Uuid,

    /// Role name; a role literally named "owner" (case-insensitive) grants
    /// the owner wildcard regardless of the permission list
    pub name: String,

    /// JSONB array of permission token strings
    pub permissions: JsonValue,

    /// When the role was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    /// Owning account
    pub account_id: Uuid,

    /// Role name
    pub name: String,

    /// Permission token strings
    pub permissions: Vec<String>,
}

impl Role {
    /// Returns the configured permission list
    ///
    /// Non-string entries and non-array values map to an empty list, never
    /// to an error: a malformed role must fail closed.
    pub fn permission_list(&self) -> Vec<String> {
        match &self.permissions {
            JsonValue::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Creates a new role
    pub async fn create(pool: &PgPool, data: CreateRole) -> Result<Self, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (account_id, name, permissions)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, name, permissions, created_at
            "#,
        )
        .bind(data.account_id)
        .bind(data.name)
        .bind(JsonValue::from(data.permissions))
        .fetch_one(pool)
        .await?;

        Ok(role)
    }

    /// Finds a role by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, account_id, name, permissions, created_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role_with_permissions(permissions: JsonValue) -> Role {
        Role {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: "editor".to_string(),
            permissions,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_permission_list_from_array() {
        let role = role_with_permissions(json!(["members:edit", "sites:view"]));
        assert_eq!(role.permission_list(), vec!["members:edit", "sites:view"]);
    }

    #[test]
    fn test_permission_list_skips_non_strings() {
        let role = role_with_permissions(json!(["members:edit", 42, null]));
        assert_eq!(role.permission_list(), vec!["members:edit"]);
    }

    #[test]
    fn test_permission_list_empty_for_non_array() {
        let role = role_with_permissions(json!({"members": "edit"}));
        assert!(role.permission_list().is_empty());

        let role = role_with_permissions(JsonValue::Null);
        assert!(role.permission_list().is_empty());
    }
}
