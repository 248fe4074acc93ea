//! Public file route: serves a stored binary by its slot key (no auth).

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use mediaslot_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Content type derived from a slot key's extension. The binary store keeps
/// no per-object content type, so serving works backwards from the key.
pub(crate) fn content_type_for_key(key: &str) -> &'static str {
    let extension = key.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Stream a stored binary. Unauthenticated: slot keys are served with a
/// one-year cache directive and an open cross-origin allowance.
#[utoipa::path(
    get,
    path = "/media/file/{stored_name}",
    tag = "media",
    params(("stored_name" = String, Path, description = "Slot key of the binary")),
    responses(
        (status = 200, description = "Binary content"),
        (status = 404, description = "No binary at this slot", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_media_file"))]
pub async fn get_media_file(
    State(state): State<Arc<AppState>>,
    Path(stored_name): Path<String>,
) -> Result<Response, HttpAppError> {
    let stream = state
        .media_storage
        .download_stream(&stored_name)
        .await
        .map_err(HttpAppError::from)?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_key(&stored_name))
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("E1-0.png"), "image/png");
        assert_eq!(content_type_for_key("E1-1.JPG"), "image/jpeg");
        assert_eq!(content_type_for_key("logo-C1.webm"), "video/webm");
        assert_eq!(content_type_for_key("E1-2.unknown"), "application/octet-stream");
        assert_eq!(content_type_for_key("noextension"), "application/octet-stream");
    }
}
