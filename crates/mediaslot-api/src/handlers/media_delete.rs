use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use mediaslot_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(rename = "companyId")]
    pub company_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    /// How many binary objects were removed from the slot.
    pub deleted: u32,
}

/// Delete the binaries at `(entity_id, position)` and drop the slot's cache
/// entry.
///
/// Ownership is checked against the cache only: a warm entry recorded for a
/// different company rejects the request, a cold cache lets it through. The
/// entity's metadata aggregate is not rewritten here; its entry goes stale
/// until the next upload.
#[utoipa::path(
    delete,
    path = "/media/{entity_id}/{position}",
    tag = "media",
    params(
        ("entity_id" = String, Path, description = "Owning entity"),
        ("position" = u32, Path, description = "Slot ordinal"),
        ("companyId" = String, Query, description = "Asserted owning company")
    ),
    responses(
        (status = 200, description = "Slot deleted", body = DeleteResponse),
        (status = 400, description = "Missing companyId", body = ErrorResponse),
        (status = 401, description = "Missing or invalid service credentials", body = ErrorResponse),
        (status = 403, description = "Cached owner differs", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_media"))]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    Path((entity_id, position)): Path<(String, u32)>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let company_id = query
        .company_id
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing companyId query parameter".to_string()))?;

    let deleted = state.slots.delete(&entity_id, position, &company_id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
