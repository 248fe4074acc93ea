use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use mediaslot_core::models::LogoResponse;
use mediaslot_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::UploadedFile;
use crate::state::AppState;

/// Replace a tenant's logo slot with a freshly uploaded binary.
///
/// Exactly one file part plus a `companyId` field. The previous logo, if
/// any, is removed as part of the replacement protocol.
#[utoipa::path(
    post,
    path = "/media/company-logo",
    tag = "logo",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Logo stored", body = LogoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid service credentials", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_company_logo"))]
pub async fn upload_company_logo(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<LogoResponse>, HttpAppError> {
    let mut company_id: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

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

            file = Some(UploadedFile {
                original_name,
                content_type,
                data,
            });
        } else if name == "companyId" {
            company_id = Some(field.text().await.map_err(|e| {
                HttpAppError(AppError::InvalidInput(format!(
                    "Failed to read form field: {}",
                    e
                )))
            })?);
        }
    }

    let company_id =
        company_id.ok_or_else(|| AppError::InvalidInput("Missing companyId field".to_string()))?;
    let file = file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    let descriptor = state.logos.replace(&company_id, file).await?;
    let url = state.config.logo_url(&company_id);

    Ok(Json(LogoResponse::from_descriptor(&descriptor, url)))
}
