/// Pre-account registration endpoints
///
/// These endpoints run the onboarding workflow against the temp
/// registration resolved from the registration cookie. Saving interview
/// answers needs no user session; completing the registration needs both
/// the session and the registration cookie.
///
/// # Endpoints
///
/// - `POST /v1/registration/interview` - Save answers, optionally advance
/// - `POST /v1/registration/complete` - Create the account, consume the record
///
/// When the registration cookie points at a record that no longer exists
/// (expired and garbage-collected), the response is a distinct 404 that also
/// clears the dangling cookie so the client can start over.

use crate::{
    app::{cookie_value, AppState, REGISTRATION_COOKIE},
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use siteloft_shared::auth::session::Identity;
use siteloft_shared::ops;
use validator::Validate;

/// Interview save request
#[derive(Debug, Deserialize)]
pub struct SaveInterviewRequest {
    /// Answers to merge into the accumulated interview data; defaults to an
    /// empty object so a bare completion assertion is valid
    pub interview_data: Option<JsonValue>,

    /// Explicit assertion that the current step is complete. Omitting it
    /// (or passing false) saves the answers without advancing the step.
    #[serde(default)]
    pub is_complete: bool,
}

/// Interview save response
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveInterviewResponse {
    /// Always true on the success path
    pub success: bool,

    /// The recorded step after this save
    pub current_step: String,
}

/// Save interview answers for the registration in progress
///
/// ```text
/// POST /v1/registration/interview
/// Content-Type: application/json
///
/// { "interview_data": { "company_size": "11-50" }, "is_complete": false }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: no registration cookie, or answers not an object
/// - `404 Not Found`: registration expired; the response clears the cookie
pub async fn save_interview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveInterviewRequest>,
) -> ApiResult<Json<SaveInterviewResponse>> {
    let token = cookie_value(&headers, REGISTRATION_COOKIE)
        .ok_or_else(|| ApiError::BadRequest("No registration in progress".to_string()))?;

    let answers = req.interview_data.unwrap_or_else(|| JsonValue::Object(Default::default()));

    let outcome =
        ops::registration::save_interview(&state.db, &token, &answers, req.is_complete).await?;

    Ok(Json(SaveInterviewResponse {
        success: true,
        current_step: outcome.registration.current_step.as_str().to_string(),
    }))
}

/// Registration completion request
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteRegistrationRequest {
    /// Desired account slug; validated and reserved atomically
    pub slug: String,

    /// Account display name
    #[validate(length(max = 255, message = "Account name must be at most 255 characters"))]
    pub account_name: Option<String>,
}

/// Registration completion response
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteRegistrationResponse {
    /// Always true on the success path
    pub success: bool,

    /// ID of the newly created account
    pub account_id: String,

    /// ID of the caller's owner membership
    pub member_id: String,
}

/// Complete the registration: create the account and its owner membership
///
/// ```text
/// POST /v1/registration/complete
/// Content-Type: application/json
///
/// { "slug": "acme-sites", "account_name": "Acme Sites" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: no registration cookie, or slug rejected (including
///   "already taken", which the database constraint decides at commit)
/// - `404 Not Found`: registration expired; the response clears the cookie
pub async fn complete_registration(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    headers: HeaderMap,
    Json(req): Json<CompleteRegistrationRequest>,
) -> ApiResult<Json<CompleteRegistrationResponse>> {
    req.validate()?;

    let token = cookie_value(&headers, REGISTRATION_COOKIE)
        .ok_or_else(|| ApiError::BadRequest("No registration in progress".to_string()))?;

    let account_name = req.account_name.unwrap_or_else(|| req.slug.clone());

    let completed = ops::registration::complete_registration(
        &state.db,
        &identity,
        &token,
        &req.slug,
        &account_name,
    )
    .await?;

    Ok(Json(CompleteRegistrationResponse {
        success: true,
        account_id: completed.account.id.to_string(),
        member_id: completed.member.id.to_string(),
    }))
}
