/// Authorization gates
///
/// `require_*` helpers used by every state-mutating operation. Each helper
/// resolves the caller's membership in a specific account and checks the
/// relevant capability via the permission evaluator.
///
/// # Tenant boundary
///
/// A caller with no membership in the target account gets
/// [`AuthzError::NotMember`], which the API layer reports as NotFound (never
/// Forbidden) so cross-tenant probes cannot confirm that an entity exists.
///
/// # Example
///
/// ```no_run
/// use siteloft_shared::auth::authorization::require_member_management;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, account_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// require_member_management(&pool, user_id, account_id).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::permissions::member_has_permission;
use crate::models::member::AccountMember;
use crate::models::role::Role;

/// Resource/action pair for the member-management capability
pub const MEMBERS_RESOURCE: &str = "members";
pub const EDIT_ACTION: &str = "edit";

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller is not a member of the account (reported as NotFound upstream)
    #[error("Not a member of account {0}")]
    NotMember(Uuid),

    /// Caller is a member but lacks the required permission
    #[error("Missing required permission: {0}")]
    MissingPermission(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Loads the role referenced by a membership, if any
pub async fn load_member_role(
    pool: &PgPool,
    member: &AccountMember,
) -> Result<Option<Role>, sqlx::Error> {
    match member.role_id {
        Some(role_id) => Role::find_by_id(pool, role_id).await,
        None => Ok(None),
    }
}

/// Requires that the user is a member of the account
///
/// Returns the membership so callers can continue evaluating permissions on
/// it without a second lookup.
pub async fn require_membership(
    pool: &PgPool,
    user_id: Uuid,
    account_id: Uuid,
) -> Result<AccountMember, AuthzError> {
    AccountMember::find_by_user_and_account(pool, user_id, account_id)
        .await?
        .ok_or(AuthzError::NotMember(account_id))
}

/// Requires the member-management capability on the account
///
/// Satisfied by owners (flag or owner-named role) or by holders of the
/// `members:edit` permission.
pub async fn require_member_management(
    pool: &PgPool,
    user_id: Uuid,
    account_id: Uuid,
) -> Result<AccountMember, AuthzError> {
    let caller = require_membership(pool, user_id, account_id).await?;
    let role = load_member_role(pool, &caller).await?;

    if !member_has_permission(&caller, role.as_ref(), MEMBERS_RESOURCE, EDIT_ACTION) {
        return Err(AuthzError::MissingPermission(format!(
            "{MEMBERS_RESOURCE}:{EDIT_ACTION}"
        )));
    }

    Ok(caller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::NotMember(Uuid::new_v4());
        assert!(err.to_string().contains("Not a member"));

        let err = AuthzError::MissingPermission("members:edit".to_string());
        assert!(err.to_string().contains("members:edit"));
    }
}
