//! Application initialization: storage namespaces, cache, services, routes.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use mediaslot_core::Config;
use mediaslot_db::ShadowAssetRepository;
use mediaslot_infra::AssetCache;
use mediaslot_storage::{LocalStorage, Storage};

use crate::auth::{RemoteServiceVerifier, ServiceVerifier, StaticServiceVerifier};
use crate::services::{AssetSlotService, LogoSlotManager};
use crate::state::AppState;

/// Wire up every component and return the router plus the cache sweeper
/// handle (to be aborted on shutdown).
pub async fn initialize_app(config: Config) -> Result<(Router, tokio::task::JoinHandle<()>)> {
    let media_storage: Arc<dyn Storage> =
        Arc::new(LocalStorage::new(config.media_storage_path.clone()).await?);
    let logo_storage: Arc<dyn Storage> =
        Arc::new(LocalStorage::new(config.logo_storage_path.clone()).await?);

    let cache = AssetCache::new(Duration::from_secs(config.cache_ttl_secs));
    let sweeper = cache.spawn_sweeper(Duration::from_secs(config.cache_sweep_interval_secs));

    // The shadow store is an optional collaborator: a failed connection is
    // reported, not fatal, because nothing on the read path depends on it.
    let shadow = match &config.database_url {
        Some(url) => match ShadowAssetRepository::connect(url).await {
            Ok(repo) => {
                tracing::info!("Shadow store connected");
                Some(repo)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Shadow store unavailable; continuing without it");
                None
            }
        },
        None => None,
    };

    let slots = AssetSlotService::new(
        media_storage.clone(),
        cache.clone(),
        config.clone(),
        shadow,
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

    let verifier: Arc<dyn ServiceVerifier> = match &config.auth_verify_url {
        Some(url) => Arc::new(RemoteServiceVerifier::new(url.clone())),
        None => Arc::new(StaticServiceVerifier::new(
            config
                .service_id
                .clone()
                .ok_or_else(|| anyhow::anyhow!("SERVICE_ID must be set"))?,
            config
                .service_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("SERVICE_KEY must be set"))?,
        )),
    };

    let app = routes::build_router(&config, state, verifier)?;

    Ok((app, sweeper))
}
