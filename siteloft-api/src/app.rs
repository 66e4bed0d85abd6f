/// Application state and router builder
///
/// This module defines the shared application state, the cookie-based
/// session middleware, and the function that assembles the Axum router.
///
/// # Example
///
/// ```no_run
/// use siteloft_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = siteloft_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use siteloft_shared::auth::session::resolve_session;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Cookie carrying the opaque session token
pub const SESSION_COOKIE: &str = "siteloft_session";

/// Cookie carrying the opaque pre-account registration token
///
/// Distinct from the session cookie: the registration workflow runs before a
/// user session exists.
pub const REGISTRATION_COOKIE: &str = "siteloft_registration";

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Extracts a named cookie's value from the request headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                            # Health check (public)
/// └── /v1/                               # API v1 (versioned)
///     ├── POST /members/:id/suspend      # session + member management
///     ├── POST /members/:id/activate     # session + member management
///     ├── GET  /me/permissions           # session
///     ├── GET  /me/site-preference       # session
///     ├── POST /sites/select             # session
///     ├── POST /registration/complete    # session + registration cookie
///     ├── POST /registration/interview   # registration cookie only
///     └── POST /slugs/check              # public
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Routes that require a resolved user session
    let session_routes = Router::new()
        .route("/members/:id/suspend", post(routes::members::suspend_member))
        .route(
            "/members/:id/activate",
            post(routes::members::activate_member),
        )
        .route("/me/permissions", get(routes::permissions::get_permissions))
        .route(
            "/me/site-preference",
            get(routes::sites::get_site_preference),
        )
        .route("/sites/select", post(routes::sites::select_site))
        .route(
            "/registration/complete",
            post(routes::registration::complete_registration),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Pre-account routes: identified by the registration cookie, which the
    // handlers read themselves (no user session exists yet)
    let registration_routes = Router::new().route(
        "/registration/interview",
        post(routes::registration::save_interview),
    );

    // Public routes
    let public_routes = Router::new().route("/slugs/check", post(routes::slugs::check_slug));

    let v1_routes = Router::new()
        .merge(session_routes)
        .merge(registration_routes)
        .merge(public_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Resolves the session cookie to an [`Identity`] exactly once and injects
/// it into request extensions; handlers and operations receive the identity
/// by value and never read request state themselves.
///
/// [`Identity`]: siteloft_shared::auth::session::Identity
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = cookie_value(req.headers(), SESSION_COOKIE).ok_or_else(|| {
        crate::error::ApiError::Unauthorized("Missing session cookie".to_string())
    })?;

    // Unknown token and deactivated user resolve the same way: no identity.
    let identity = resolve_session(&state.db, &token)
        .await
        .map_err(crate::error::ApiError::from)?
        .ok_or_else(|| crate::error::ApiError::Unauthorized("Invalid session".to_string()))?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_cookie_value_single() {
        let headers = headers_with_cookie("siteloft_session=abc123");
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_cookie_value_multiple() {
        let headers =
            headers_with_cookie("other=x; siteloft_session=abc123; siteloft_registration=reg456");
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE),
            Some("abc123".to_string())
        );
        assert_eq!(
            cookie_value(&headers, REGISTRATION_COOKIE),
            Some("reg456".to_string())
        );
    }

    #[test]
    fn test_cookie_value_missing() {
        let headers = headers_with_cookie("other=x");
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);

        let empty = HeaderMap::new();
        assert_eq!(cookie_value(&empty, SESSION_COOKIE), None);
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let headers = headers_with_cookie("xsiteloft_session=abc123");
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);
    }
}
