use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use mediaslot_core::models::AssetResponse;
use mediaslot_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::UploadedFile;
use crate::state::AppState;

/// Upload one or more binaries for an entity.
///
/// Each file lands in the slot matching its ordinal within the request, so
/// the first file of every upload targets position 0. Writing to an occupied
/// slot replaces its contents.
///
/// # Errors
/// - `AppError::InvalidInput` - no files, missing form fields, or disallowed content type
/// - `AppError::PayloadTooLarge` - a file exceeds the size limit
/// - `AppError::Storage` - blob store failure
#[utoipa::path(
    post,
    path = "/media/upload",
    tag = "media",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Assets stored", body = Vec<AssetResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid service credentials", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_media"))]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<AssetResponse>>, HttpAppError> {
    let mut entity_id: Option<String> = None;
    let mut entity_type: Option<String> = None;
    let mut company_id: Option<String> = None;
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        HttpAppError(AppError::InvalidInput(format!(
            "Malformed multipart body: {}",
            e
        )))
    })? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(filename) = field.file_name() {
            let original_name = filename.to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| {
                    HttpAppError(AppError::InvalidInput(format!(
                        "Failed to read file part: {}",
                        e
                    )))
                })?
                .to_vec();

            files.push(UploadedFile {
                original_name,
                content_type,
                data,
            });
        } else {
            let value = field.text().await.map_err(|e| {
                HttpAppError(AppError::InvalidInput(format!(
                    "Failed to read form field: {}",
                    e
                )))
            })?;

            match name.as_str() {
                "entityId" => entity_id = Some(value),
                "entityType" => entity_type = Some(value),
                "companyId" => company_id = Some(value),
                _ => {}
            }
        }
    }

    let entity_id =
        entity_id.ok_or_else(|| AppError::InvalidInput("Missing entityId field".to_string()))?;
    let entity_type =
        entity_type.ok_or_else(|| AppError::InvalidInput("Missing entityType field".to_string()))?;
    let company_id =
        company_id.ok_or_else(|| AppError::InvalidInput("Missing companyId field".to_string()))?;

    let descriptors = state
        .slots
        .upload(&entity_id, &entity_type, &company_id, files)
        .await?;

    Ok(Json(descriptors.iter().map(AssetResponse::from).collect()))
}
