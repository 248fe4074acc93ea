//! Shared test fixtures: a fully wired application over temp-dir storage
//! with a static service verifier.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use mediaslot_api::auth::StaticServiceVerifier;
use mediaslot_api::services::{AssetSlotService, LogoSlotManager, UploadedFile};
use mediaslot_api::setup::routes::build_router;
use mediaslot_api::state::AppState;
use mediaslot_core::Config;
use mediaslot_infra::AssetCache;
use mediaslot_storage::{LocalStorage, Storage};
use std::time::Duration;
use tempfile::TempDir;

pub const SERVICE_ID: &str = "test-service";
pub const SERVICE_KEY: &str = "test-secret";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    _media_dir: TempDir,
    _logo_dir: TempDir,
}

pub fn test_config() -> Config {
    Config {
        server_port: 4000,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        public_base_url: "http://localhost:4000".to_string(),
        media_storage_path: "./unused".to_string(),
        logo_storage_path: "./unused".to_string(),
        max_upload_size_bytes: 10 * 1024 * 1024,
        allowed_content_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/gif".to_string(),
            "image/webp".to_string(),
            "video/mp4".to_string(),
            "video/quicktime".to_string(),
            "video/x-msvideo".to_string(),
            "video/x-ms-wmv".to_string(),
            "video/webm".to_string(),
        ],
        auth_verify_url: None,
        service_id: Some(SERVICE_ID.to_string()),
        service_key: Some(SERVICE_KEY.to_string()),
        cache_ttl_secs: 7200,
        cache_sweep_interval_secs: 600,
        database_url: None,
    }
}

pub async fn spawn_app() -> TestApp {
    let media_dir = TempDir::new().expect("media tempdir");
    let logo_dir = TempDir::new().expect("logo tempdir");

    let config = test_config();

    let media_storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(media_dir.path())
            .await
            .expect("media storage"),
    );
    let logo_storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(logo_dir.path())
            .await
            .expect("logo storage"),
    );

    let cache = AssetCache::new(Duration::from_secs(config.cache_ttl_secs));

    let slots = AssetSlotService::new(
        media_storage.clone(),
        cache.clone(),
        config.clone(),
        None,
    );
    let logos = LogoSlotManager::new(logo_storage.clone(), cache.clone(), config.clone());

    let state = Arc::new(AppState {
        config: config.clone(),
        media_storage,
        logo_storage,
        cache,
        slots,
        logos,
    });

    let verifier = Arc::new(StaticServiceVerifier::new(
        SERVICE_ID.to_string(),
        SERVICE_KEY.to_string(),
    ));

    let router = build_router(&config, state.clone(), verifier).expect("router");

    TestApp {
        state,
        router,
        _media_dir: media_dir,
        _logo_dir: logo_dir,
    }
}

pub fn png_file(name: &str) -> UploadedFile {
    UploadedFile {
        original_name: name.to_string(),
        content_type: "image/png".to_string(),
        data: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4],
    }
}

pub fn file_with_type(name: &str, content_type: &str) -> UploadedFile {
    UploadedFile {
        original_name: name.to_string(),
        content_type: content_type.to_string(),
        data: vec![1, 2, 3, 4, 5],
    }
}
