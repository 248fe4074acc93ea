use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use mediaslot_core::models::AssetListEntry;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List an entity's assets from its metadata aggregate, sorted by position.
///
/// The aggregate is the authoritative source; an entity without one lists as
/// an empty array, not an error.
#[utoipa::path(
    get,
    path = "/media/entity/{entity_id}",
    tag = "media",
    params(("entity_id" = String, Path, description = "Owning entity")),
    responses(
        (status = 200, description = "Asset listing", body = Vec<AssetListEntry>),
        (status = 401, description = "Missing or invalid service credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_entity_media"))]
pub async fn list_entity_media(
    State(state): State<Arc<AppState>>,
    Path(entity_id): Path<String>,
) -> Result<Json<Vec<AssetListEntry>>, HttpAppError> {
    let entries = state.slots.list(&entity_id).await?;
    Ok(Json(entries))
}
