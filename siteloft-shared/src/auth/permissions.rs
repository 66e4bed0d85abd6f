/// Permission evaluation
///
/// Derives a member's effective permission set from its membership row and
/// eagerly loaded role.
///
/// # Rules
///
/// 1. A member is an owner if the explicit `is_owner` flag is set OR its
///    role is literally named "owner" (case-insensitive). Both forms are
///    authoritative and equivalent; [`is_owner_member`] is the single
///    predicate every call site shares.
/// 2. Owners get the universal wildcard, superseding any finite permission
///    list on the role.
/// 3. Everyone else gets exactly the role's configured list; a missing role
///    or empty list evaluates to the empty set, never to null.
///
/// Permission tokens pair a resource and an action as `"resource:action"`.
///
/// # Example
///
/// ```
/// use siteloft_shared::auth::permissions::EffectivePermissions;
///
/// let perms = EffectivePermissions::from_list(vec!["members:edit".to_string()]);
/// assert!(perms.allows("members", "edit"));
/// assert!(!perms.allows("billing", "edit"));
/// ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::member::AccountMember;
use crate::models::role::Role;

/// The universal permission token granted to owners
pub const WILDCARD: &str = "*";

/// Role name that grants owner-equivalent permissions
const OWNER_ROLE_NAME: &str = "owner";

/// A member's effective permission set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivePermissions {
    /// Whether the member evaluated as an owner
    pub is_owner: bool,

    /// Granted permission tokens; `{"*"}` for owners
    pub permissions: HashSet<String>,
}

impl EffectivePermissions {
    /// The owner permission set: wildcard only
    pub fn owner() -> Self {
        Self {
            is_owner: true,
            permissions: HashSet::from([WILDCARD.to_string()]),
        }
    }

    /// A non-owner set built from a role's configured list
    pub fn from_list(permissions: Vec<String>) -> Self {
        Self {
            is_owner: false,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Whether the set allows the given action on the given resource
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        if self.is_owner || self.permissions.contains(WILDCARD) {
            return true;
        }
        self.permissions.contains(&format!("{resource}:{action}"))
    }
}

/// The one authoritative owner predicate
///
/// Owner by explicit flag OR by a role literally named "owner",
/// case-insensitively. The two concepts are independent: either alone is
/// sufficient.
pub fn is_owner_member(member: &AccountMember, role: Option<&Role>) -> bool {
    if member.is_owner {
        return true;
    }
    role.is_some_and(|r| r.name.eq_ignore_ascii_case(OWNER_ROLE_NAME))
}

/// Derives the effective permission set for a member
pub fn evaluate(member: &AccountMember, role: Option<&Role>) -> EffectivePermissions {
    if is_owner_member(member, role) {
        return EffectivePermissions::owner();
    }

    EffectivePermissions::from_list(role.map(Role::permission_list).unwrap_or_default())
}

/// Single authorization gate for state-mutating operations
///
/// True iff the member is an owner or the role's permission set contains
/// `"{resource}:{action}"`.
pub fn member_has_permission(
    member: &AccountMember,
    role: Option<&Role>,
    resource: &str,
    action: &str,
) -> bool {
    evaluate(member, role).allows(resource, action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::member::MemberStatus;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn member(is_owner: bool) -> AccountMember {
        AccountMember {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: MemberStatus::Active,
            is_owner,
            role_id: None,
            last_selected_site_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn role(name: &str, permissions: serde_json::Value) -> Role {
        Role {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: name.to_string(),
            permissions,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_flag_grants_everything() {
        let m = member(true);

        // No role at all, empty list: still full access.
        assert!(member_has_permission(&m, None, "members", "edit"));
        assert!(member_has_permission(&m, None, "anything", "at-all"));

        let perms = evaluate(&m, None);
        assert!(perms.is_owner);
        assert_eq!(perms.permissions, HashSet::from([WILDCARD.to_string()]));
    }

    #[test]
    fn test_owner_named_role_is_equivalent_to_flag() {
        let m = member(false);
        let r = role("Owner", json!([]));

        assert!(is_owner_member(&m, Some(&r)));
        assert!(member_has_permission(&m, Some(&r), "billing", "edit"));

        // Case-insensitive.
        let r = role("OWNER", json!([]));
        assert!(is_owner_member(&m, Some(&r)));
    }

    #[test]
    fn test_non_owner_gets_exactly_the_role_list() {
        let m = member(false);
        let r = role("editor", json!(["members:edit", "sites:view"]));

        let perms = evaluate(&m, Some(&r));
        assert!(!perms.is_owner);
        assert!(perms.allows("members", "edit"));
        assert!(perms.allows("sites", "view"));
        assert!(!perms.allows("members", "delete"));
        assert!(!perms.allows("billing", "edit"));
    }

    #[test]
    fn test_missing_role_is_empty_set_not_null() {
        let m = member(false);
        let perms = evaluate(&m, None);
        assert!(!perms.is_owner);
        assert!(perms.permissions.is_empty());
        assert!(!perms.allows("members", "edit"));
    }

    #[test]
    fn test_owner_wildcard_supersedes_finite_list() {
        let m = member(true);
        let r = role("limited", json!(["sites:view"]));

        let perms = evaluate(&m, Some(&r));
        assert_eq!(perms.permissions, HashSet::from([WILDCARD.to_string()]));
        assert!(perms.allows("members", "edit"));
    }
}
