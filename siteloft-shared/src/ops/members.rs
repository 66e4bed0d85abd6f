/// Member lifecycle operations
///
/// Suspend and activate run the same sequence: fetch the target, authorize
/// the caller against the target's own account, check transition
/// preconditions, then apply the compare-and-swap transition. The precondition
/// checks give precise reasons; the conditional UPDATE guarantees at most one
/// concurrent transition applies.
///
/// Cross-account callers are rejected as NotFound (never Forbidden): the
/// target's existence must not leak across the tenant boundary.

use sqlx::PgPool;
use uuid::Uuid;

use super::OpError;
use crate::auth::authorization::require_member_management;
use crate::auth::session::Identity;
use crate::models::member::{AccountMember, MemberStatus};

/// Suspends an ACTIVE member
///
/// # Errors
///
/// - `NotFound`: target absent, or caller not a member of the target's
///   account
/// - `Forbidden`: caller is a member but lacks `members:edit` and is not an
///   owner
/// - `InvalidState`: target is the owner, target is the caller, or target is
///   not currently ACTIVE (including losing the race to a concurrent
///   suspend)
pub async fn suspend_member(
    pool: &PgPool,
    identity: &Identity,
    member_id: Uuid,
) -> Result<(), OpError> {
    let target = AccountMember::find_by_id(pool, member_id)
        .await?
        .ok_or(OpError::NotFound("Member not found"))?;

    require_member_management(pool, identity.user_id(), target.account_id).await?;

    if target.is_owner {
        return Err(OpError::InvalidState("The account owner cannot be suspended"));
    }

    if target.user_id == identity.user_id() {
        return Err(OpError::InvalidState("You cannot suspend yourself"));
    }

    if target.status != MemberStatus::Active {
        return Err(OpError::InvalidState("Member is not active"));
    }

    let applied = AccountMember::suspend_if_active(pool, member_id).await?;
    if !applied {
        // Lost the race: someone else transitioned the member first.
        return Err(OpError::InvalidState("Member is not active"));
    }

    tracing::info!(member_id = %member_id, account_id = %target.account_id, "Member suspended");
    Ok(())
}

/// Activates a SUSPENDED member
///
/// # Errors
///
/// Same shape as [`suspend_member`]; `InvalidState` when the target is not
/// currently SUSPENDED.
pub async fn activate_member(
    pool: &PgPool,
    identity: &Identity,
    member_id: Uuid,
) -> Result<(), OpError> {
    let target = AccountMember::find_by_id(pool, member_id)
        .await?
        .ok_or(OpError::NotFound("Member not found"))?;

    require_member_management(pool, identity.user_id(), target.account_id).await?;

    if target.status != MemberStatus::Suspended {
        return Err(OpError::InvalidState("Member is not suspended"));
    }

    let applied = AccountMember::activate_if_suspended(pool, member_id).await?;
    if !applied {
        return Err(OpError::InvalidState("Member is not suspended"));
    }

    tracing::info!(member_id = %member_id, account_id = %target.account_id, "Member activated");
    Ok(())
}
