/// Site selection and per-site preference endpoints
///
/// # Endpoints
///
/// - `POST /v1/sites/select` - Mark a site as the caller's selection
/// - `GET  /v1/me/site-preference?site_id=` - Fetch the caller's overrides
///
/// Site selection only ever succeeds for sites inside the caller's active
/// account; anything else is a 404, never a 403.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::SuccessResponse,
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use siteloft_shared::auth::session::Identity;
use siteloft_shared::ops;
use uuid::Uuid;

/// Select site request
#[derive(Debug, Deserialize)]
pub struct SelectSiteRequest {
    /// Site to select; required
    pub site_id: Option<Uuid>,
}

/// Select a site within the caller's active account
///
/// ```text
/// POST /v1/sites/select
/// Content-Type: application/json
///
/// { "site_id": "uuid" }
/// ```
///
/// Idempotent: reselecting the current site returns the same success body.
///
/// # Errors
///
/// - `400 Bad Request`: site_id missing
/// - `404 Not Found`: no active account, or the site is not in it
pub async fn select_site(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<SelectSiteRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let site_id = req
        .site_id
        .ok_or_else(|| ApiError::BadRequest("site_id is required".to_string()))?;

    ops::sites::select_site(&state.db, &identity, site_id).await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Site preference query parameters
#[derive(Debug, Deserialize)]
pub struct SitePreferenceQuery {
    /// Site to look up; required
    pub site_id: Option<Uuid>,
}

/// Site preference response
///
/// Both fields are null when the caller has never set overrides for the
/// site.
#[derive(Debug, Serialize, Deserialize)]
pub struct SitePreferenceResponse {
    /// Preferred language, if overridden
    pub language: Option<String>,

    /// Preferred timezone, if overridden
    pub timezone: Option<String>,
}

/// Get the caller's preference overrides for a site
///
/// ```text
/// GET /v1/me/site-preference?site_id=uuid
/// ```
pub async fn get_site_preference(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<SitePreferenceQuery>,
) -> ApiResult<Json<SitePreferenceResponse>> {
    let site_id = query
        .site_id
        .ok_or_else(|| ApiError::BadRequest("site_id is required".to_string()))?;

    let pref = ops::sites::get_site_preference(&state.db, &identity, site_id).await?;

    Ok(Json(match pref {
        Some(pref) => SitePreferenceResponse {
            language: pref.language,
            timezone: pref.timezone,
        },
        None => SitePreferenceResponse {
            language: None,
            timezone: None,
        },
    }))
}
