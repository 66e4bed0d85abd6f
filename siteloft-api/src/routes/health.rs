/// Service health endpoint
///
/// Reports whether the API can reach its database, reusing the same probe
/// the pool runs at startup. Always answers 200; a degraded database shows
/// up in the body, not the status code, so load balancers keep routing to
/// the instance that can still explain itself.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "healthy", "database": true }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use siteloft_shared::db::pool;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when the database answers, "degraded" otherwise
    pub status: String,

    /// Whether the database reachability probe succeeded
    pub database: bool,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = pool::health_check(&state.db).await.is_ok();

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" }.to_string(),
        database,
    })
}
