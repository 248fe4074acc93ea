//! Application state.
//!
//! All process-wide components are constructed once at startup and injected
//! into handlers through this state; nothing lives in ambient globals. The
//! cache and the keyed locks inside the services share the lifetime of the
//! state; the cache sweeper task is owned by the bootstrap code.

use std::sync::Arc;

use mediaslot_core::Config;
use mediaslot_infra::AssetCache;
use mediaslot_storage::Storage;

use crate::services::{AssetSlotService, LogoSlotManager};

/// Main application state: injected into every handler as `Arc<AppState>`.
pub struct AppState {
    pub config: Config,
    /// General asset namespace.
    pub media_storage: Arc<dyn Storage>,
    /// Segregated logo namespace.
    pub logo_storage: Arc<dyn Storage>,
    pub cache: AssetCache,
    pub slots: AssetSlotService,
    pub logos: LogoSlotManager,
}
