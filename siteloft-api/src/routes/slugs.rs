/// Public slug availability check
///
/// Availability failures are part of the normal response shape (200 with
/// `available: false` and a reason), not HTTP errors; only a missing slug
/// field is a 400. The check is advisory; the database unique constraint
/// decides for real at account creation.
///
/// # Endpoint
///
/// ```text
/// POST /v1/slugs/check
/// Content-Type: application/json
///
/// { "slug": "acme-sites" }
/// ```
///
/// # Response
///
/// ```json
/// { "available": false, "error": "This address is already taken" }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use siteloft_shared::slug::check_slug_availability;

/// Slug check request
#[derive(Debug, Deserialize)]
pub struct CheckSlugRequest {
    /// Slug to check; required
    pub slug: Option<String>,
}

/// Slug check response
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckSlugResponse {
    /// Whether the slug passed all checks
    pub available: bool,

    /// Rejection reason when unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check whether a slug is available
pub async fn check_slug(
    State(state): State<AppState>,
    Json(req): Json<CheckSlugRequest>,
) -> ApiResult<Json<CheckSlugResponse>> {
    let slug = req
        .slug
        .ok_or_else(|| ApiError::BadRequest("slug is required".to_string()))?;

    let rejection = check_slug_availability(&state.db, &slug).await?;

    Ok(Json(CheckSlugResponse {
        available: rejection.is_none(),
        error: rejection.map(|reason| reason.to_string()),
    }))
}
