use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use mediaslot_core::models::LogoResponse;
use mediaslot_core::AppError;
use serde::Deserialize;

use super::media_file::content_type_for_key;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogoQuery {
    #[serde(default)]
    pub metadata: bool,
}

async fn stream_current_logo(
    state: &AppState,
    company_id: &str,
    cache_control: &'static str,
) -> Result<Response, HttpAppError> {
    let current = state.logos.resolve_current(company_id).await?;

    let stream = state
        .logo_storage
        .download_stream(&current.key)
        .await
        .map_err(HttpAppError::from)?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_key(&current.key))
        .header(header::CACHE_CONTROL, cache_control)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })
}

/// Fetch a tenant's logo: the raw binary by default, or with
/// `?metadata=true` the stored descriptor plus its derived file URL.
#[utoipa::path(
    get,
    path = "/media/company-logo/{company_id}",
    tag = "logo",
    params(
        ("company_id" = String, Path, description = "Tenant"),
        ("metadata" = Option<bool>, Query, description = "Return the descriptor instead of raw bytes")
    ),
    responses(
        (status = 200, description = "Logo content or metadata", body = LogoResponse),
        (status = 401, description = "Missing or invalid service credentials", body = ErrorResponse),
        (status = 404, description = "No logo for this tenant", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_company_logo"))]
pub async fn get_company_logo(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
    Query(query): Query<LogoQuery>,
) -> Result<Response, HttpAppError> {
    if query.metadata {
        let metadata = state.logos.metadata(&company_id).await?;
        return Ok(Json(metadata).into_response());
    }

    stream_current_logo(&state, &company_id, "private, max-age=3600").await
}

/// Public logo route: resolves the most-recently-modified matching logo
/// object for the tenant (no auth).
#[utoipa::path(
    get,
    path = "/media/company-logo/file/{company_id}",
    tag = "logo",
    params(("company_id" = String, Path, description = "Tenant")),
    responses(
        (status = 200, description = "Logo content"),
        (status = 404, description = "No logo for this tenant", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_company_logo_file"))]
pub async fn get_company_logo_file(
    State(state): State<Arc<AppState>>,
    Path(company_id): Path<String>,
) -> Result<Response, HttpAppError> {
    stream_current_logo(&state, &company_id, "public, max-age=3600").await
}
