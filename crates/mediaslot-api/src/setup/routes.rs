//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use mediaslot_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::auth::{service_auth_middleware, AuthState, ServiceVerifier};
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn build_router(
    config: &Config,
    state: Arc<AppState>,
    verifier: Arc<dyn ServiceVerifier>,
) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState { verifier });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/media/file/{stored_name}",
            get(handlers::media_file::get_media_file),
        )
        .route(
            "/media/company-logo/file/{company_id}",
            get(handlers::logo_get::get_company_logo_file),
        );

    // Protected routes (require the authenticated-service header pair)
    let protected_routes = Router::new()
        .route("/media/upload", post(handlers::media_upload::upload_media))
        .route(
            "/media/entity/{entity_id}",
            get(handlers::media_list::list_entity_media),
        )
        .route(
            "/media/{entity_id}/{position}",
            delete(handlers::media_delete::delete_media),
        )
        .route(
            "/media/company-logo",
            post(handlers::logo_upload::upload_company_logo),
        )
        .route(
            "/media/company-logo/{company_id}",
            get(handlers::logo_get::get_company_logo),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            service_auth_middleware,
        ));

    // Multipart batches carry several files plus form overhead; the per-file
    // cap is enforced by validation, this layer only bounds the whole body.
    let body_limit = config.max_upload_size_bytes.saturating_mul(4);

    let app = public_routes
        .merge(protected_routes)
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };

    Ok(cors)
}
