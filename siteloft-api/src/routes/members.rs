/// Member lifecycle endpoints
///
/// Status transitions for account members. Both endpoints require a session
/// and the member-management capability (owner, or `members:edit`) in the
/// target member's own account; callers outside that account receive 404.
///
/// # Endpoints
///
/// - `POST /v1/members/:id/suspend` - Suspend an active member
/// - `POST /v1/members/:id/activate` - Reactivate a suspended member
///
/// # Errors
///
/// - `401 Unauthorized`: No or invalid session
/// - `403 Forbidden`: Member of the account but lacking `members:edit`
/// - `404 Not Found`: Member absent, or caller outside the account
/// - `400 Invalid State`: Owner target, self target, or wrong current status

use crate::{app::AppState, error::ApiResult, routes::SuccessResponse};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use siteloft_shared::auth::session::Identity;
use siteloft_shared::ops;
use uuid::Uuid;

/// Suspend a member
///
/// ```text
/// POST /v1/members/:id/suspend
/// ```
///
/// Response:
/// ```json
/// { "success": true }
/// ```
pub async fn suspend_member(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    ops::members::suspend_member(&state.db, &identity, member_id).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Activate a member
///
/// ```text
/// POST /v1/members/:id/activate
/// ```
///
/// Response:
/// ```json
/// { "success": true }
/// ```
pub async fn activate_member(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(member_id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    ops::members::activate_member(&state.db, &identity, member_id).await?;

    Ok(Json(SuccessResponse::ok()))
}
