/// Account membership model and the status state machine
///
/// `AccountMember` binds a user to an account. There is exactly one row per
/// (account, user) pair, enforced by a unique constraint. A member never
/// moves to another account; the only mutations are the ACTIVE↔SUSPENDED
/// status transitions and site-selection updates.
///
/// Status transitions are compare-and-swap UPDATEs conditioned on the
/// current status, so two concurrent transition calls can never both apply.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE account_members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status TEXT NOT NULL DEFAULT 'active',
///     is_owner BOOLEAN NOT NULL DEFAULT FALSE,
///     role_id UUID REFERENCES roles(id) ON DELETE SET NULL,
///     last_selected_site_id UUID REFERENCES sites(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT account_members_account_user_key UNIQUE (account_id, user_id),
///     CONSTRAINT account_members_status_check CHECK (status IN ('active', 'suspended'))
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Membership status
///
/// The only two legal states; transitions go ACTIVE↔SUSPENDED and nowhere
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Member may act within the account
    Active,

    /// Member is locked out of the account until reactivated
    Suspended,
}

impl MemberStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Suspended => "suspended",
        }
    }

    /// Parses status from its database representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MemberStatus::Active),
            "suspended" => Some(MemberStatus::Suspended),
            _ => None,
        }
    }
}

impl TryFrom<String> for MemberStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MemberStatus::from_str(&value).ok_or_else(|| format!("unknown member status: {value}"))
    }
}

/// Membership model binding a user to an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountMember {
    /// Unique membership ID (UUID v4)
    pub id: Uuid,

    /// Account this membership belongs to
    pub account_id: Uuid,

    /// Member user
    pub user_id: Uuid,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: MemberStatus,

    /// Whether this member is the account creator/owner. Exactly one member
    /// per account carries this flag by convention. Owners can never be
    /// suspended.
    pub is_owner: bool,

    /// Role assigned to this member, if any
    pub role_id: Option<Uuid>,

    /// The site this member last selected within the account
    pub last_selected_site_id: Option<Uuid>,

    /// When the membership was created
    pub created_at: DateTime<Utc>,

    /// When the membership was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountMember {
    /// Account to join
    pub account_id: Uuid,

    /// Joining user
    pub user_id: Uuid,

    /// Owner flag; set for the account creator only
    #[serde(default)]
    pub is_owner: bool,

    /// Role to assign, if any
    pub role_id: Option<Uuid>,
}

const MEMBER_COLUMNS: &str = "id, account_id, user_id, status, is_owner, role_id, \
                              last_selected_site_id, created_at, updated_at";

impl AccountMember {
    /// Creates a new membership with status ACTIVE
    ///
    /// # Errors
    ///
    /// Returns an error if the (account, user) pair already has a membership
    /// (unique constraint violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateAccountMember) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, AccountMember>(&format!(
            r#"
            INSERT INTO account_members (account_id, user_id, is_owner, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEMBER_COLUMNS}
            "#,
        ))
        .bind(data.account_id)
        .bind(data.user_id)
        .bind(data.is_owner)
        .bind(data.role_id)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Finds a membership by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, AccountMember>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM account_members
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Finds the membership for a (user, account) pair
    pub async fn find_by_user_and_account(
        pool: &PgPool,
        user_id: Uuid,
        account_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, AccountMember>(&format!(
            r#"
            SELECT {MEMBER_COLUMNS}
            FROM account_members
            WHERE user_id = $1 AND account_id = $2
            "#,
        ))
        .bind(user_id)
        .bind(account_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Suspends the member if (and only if) it is currently ACTIVE
    ///
    /// The owner guard is repeated in SQL so the transition and its
    /// preconditions apply as one atomic unit: of two concurrent suspend
    /// calls exactly one observes `status = 'active'` and wins.
    ///
    /// Returns `true` if the transition applied, `false` if the member was
    /// not in the required state (or is the owner).
    pub async fn suspend_if_active(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE account_members
            SET status = 'suspended', updated_at = NOW()
            WHERE id = $1 AND status = 'active' AND NOT is_owner
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Activates the member if (and only if) it is currently SUSPENDED
    ///
    /// Returns `true` if the transition applied, `false` if the member was
    /// not suspended.
    pub async fn activate_if_suspended(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE account_members
            SET status = 'active', updated_at = NOW()
            WHERE id = $1 AND status = 'suspended'
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Records the last-selected site on every membership row matching the
    /// (user, account) pair
    ///
    /// There is exactly one such row under the unique constraint, but the
    /// update is defined over all matches so a duplicate row can never hold
    /// a stale selection.
    pub async fn set_last_selected_site(
        pool: &PgPool,
        user_id: Uuid,
        account_id: Uuid,
        site_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE account_members
            SET last_selected_site_id = $3, updated_at = NOW()
            WHERE user_id = $1 AND account_id = $2
            "#,
        )
        .bind(user_id)
        .bind(account_id)
        .bind(site_id)
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(MemberStatus::from_str("active"), Some(MemberStatus::Active));
        assert_eq!(
            MemberStatus::from_str("suspended"),
            Some(MemberStatus::Suspended)
        );
        assert_eq!(MemberStatus::Active.as_str(), "active");
        assert_eq!(MemberStatus::Suspended.as_str(), "suspended");
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert_eq!(MemberStatus::from_str("deleted"), None);
        assert_eq!(MemberStatus::from_str("ACTIVE"), None);
        assert!(MemberStatus::try_from("banned".to_string()).is_err());
    }
}
