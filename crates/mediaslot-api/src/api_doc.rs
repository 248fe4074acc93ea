//! OpenAPI document for the media API.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health,
        crate::handlers::media_upload::upload_media,
        crate::handlers::media_list::list_entity_media,
        crate::handlers::media_file::get_media_file,
        crate::handlers::media_delete::delete_media,
        crate::handlers::logo_upload::upload_company_logo,
        crate::handlers::logo_get::get_company_logo,
        crate::handlers::logo_get::get_company_logo_file,
    ),
    components(schemas(
        mediaslot_core::models::AssetDescriptor,
        mediaslot_core::models::AssetResponse,
        mediaslot_core::models::AssetListEntry,
        mediaslot_core::models::LogoResponse,
        crate::error::ErrorResponse,
        crate::handlers::media_delete::DeleteResponse,
    )),
    tags(
        (name = "media", description = "Position-addressed asset slots"),
        (name = "logo", description = "Single-slot company logos"),
        (name = "health", description = "Liveness"),
    ),
    info(
        title = "Mediaslot API",
        description = "Position-addressed media-asset store"
    )
)]
pub struct ApiDoc;
