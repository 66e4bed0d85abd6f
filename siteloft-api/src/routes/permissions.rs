/// Effective permission lookup
///
/// Returns the caller's effective permission set within their active
/// account: the role name, the owner flag, and the granted permission
/// tokens (the wildcard `"*"` for owners).
///
/// # Endpoint
///
/// ```text
/// GET /v1/me/permissions
/// ```
///
/// # Response
///
/// ```json
/// {
///   "role": "editor",
///   "is_owner": false,
///   "permissions": ["members:edit", "sites:view"]
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use siteloft_shared::auth::authorization::load_member_role;
use siteloft_shared::auth::permissions::evaluate;
use siteloft_shared::auth::session::Identity;
use siteloft_shared::models::member::AccountMember;

/// Permissions response
#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionsResponse {
    /// Name of the member's role, if one is assigned
    pub role: Option<String>,

    /// Whether the member evaluated as an owner
    pub is_owner: bool,

    /// Granted permission tokens, sorted for stable output
    pub permissions: Vec<String>,
}

/// Get the caller's effective permissions in their active account
pub async fn get_permissions(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<PermissionsResponse>> {
    let account_id = identity
        .active_account_id()
        .ok_or_else(|| ApiError::NotFound("No active account".to_string()))?;

    let member =
        AccountMember::find_by_user_and_account(&state.db, identity.user_id(), account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Membership not found".to_string()))?;

    let role = load_member_role(&state.db, &member)
        .await
        .map_err(ApiError::from)?;

    let effective = evaluate(&member, role.as_ref());

    let mut permissions: Vec<String> = effective.permissions.into_iter().collect();
    permissions.sort();

    Ok(Json(PermissionsResponse {
        role: role.map(|r| r.name),
        is_owner: effective.is_owner,
        permissions,
    }))
}
