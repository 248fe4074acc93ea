//! Single-slot company logo management.
//!
//! Each tenant owns at most one logo binary. Every upload replaces the slot
//! wholesale: incoming bytes land on a globally-unique staging key, then,
//! under the tenant's lock, every existing match of the tenant's logo
//! prefix is deleted and the staging object is moved onto the canonical key.
//! Reads tolerate race debris from other processes by serving the most
//! recently modified match.

use std::sync::Arc;

use chrono::Utc;
use mediaslot_core::models::{AssetDescriptor, LogoResponse};
use mediaslot_core::validation::file_extension;
use mediaslot_core::{AppError, Config, MediaValidator};
use mediaslot_infra::{AssetCache, KeyedLocks};
use mediaslot_storage::{keys, ObjectInfo, Storage, StorageError};
use uuid::Uuid;

use super::slots::UploadedFile;
use crate::error::{storage_error_to_app, validation_error_to_app};

/// Orchestrates the single-slot replacement protocol over the logo namespace.
#[derive(Clone)]
pub struct LogoSlotManager {
    storage: Arc<dyn Storage>,
    cache: AssetCache,
    tenant_locks: KeyedLocks,
    config: Config,
}

impl LogoSlotManager {
    pub fn new(storage: Arc<dyn Storage>, cache: AssetCache, config: Config) -> Self {
        Self {
            storage,
            cache,
            tenant_locks: KeyedLocks::new(),
            config,
        }
    }

    fn validator(&self) -> MediaValidator {
        MediaValidator::new(
            self.config.max_upload_size_bytes,
            self.config.allowed_content_types.clone(),
        )
    }

    /// Replace the tenant's logo slot with the uploaded file.
    ///
    /// Staging first means the incoming bytes can never collide with the
    /// live slot; the list-delete-rename sequence runs under the tenant's
    /// lock so two in-process uploads cannot interleave. Returns the new
    /// descriptor.
    #[tracing::instrument(skip(self, file), fields(company_id = %company_id))]
    pub async fn replace(
        &self,
        company_id: &str,
        file: UploadedFile,
    ) -> Result<AssetDescriptor, AppError> {
        if company_id.trim().is_empty() {
            return Err(AppError::InvalidInput("companyId is required".to_string()));
        }

        self.validator()
            .validate_all(&file.original_name, &file.content_type, file.data.len())
            .map_err(validation_error_to_app)?;

        let extension = file_extension(&file.original_name);
        let staging = keys::staging_key(&extension);
        let size_bytes = file.data.len() as i64;

        self.storage
            .upload_with_key(&staging, file.data)
            .await
            .map_err(storage_error_to_app)?;

        let canonical = keys::logo_key(company_id, &extension);

        let _guard = self.tenant_locks.acquire(company_id).await;

        let existing = self
            .storage
            .list_prefix(&keys::logo_prefix(company_id))
            .await
            .map_err(storage_error_to_app)?;
        for object in &existing {
            self.storage
                .delete(&object.key)
                .await
                .map_err(storage_error_to_app)?;
        }

        self.storage
            .rename(&staging, &canonical)
            .await
            .map_err(storage_error_to_app)?;

        let descriptor = AssetDescriptor {
            id: Uuid::new_v4(),
            entity_id: company_id.to_string(),
            entity_type: "company-logo".to_string(),
            company_id: company_id.to_string(),
            stored_name: canonical,
            original_name: file.original_name,
            mime_type: file.content_type,
            size_bytes,
            position: None,
            created_at: Utc::now(),
        };

        let metadata = serde_json::to_vec_pretty(&descriptor)?;
        self.storage
            .upload_with_key(&keys::aggregate_key(company_id), metadata)
            .await
            .map_err(storage_error_to_app)?;

        self.cache
            .set(
                &AssetDescriptor::logo_cache_key(company_id),
                descriptor.clone(),
            )
            .await;

        tracing::info!(
            replaced = existing.len(),
            stored_name = %descriptor.stored_name,
            "Replaced company logo slot"
        );

        Ok(descriptor)
    }

    /// Resolve the tenant's current logo object.
    ///
    /// None matching is Not Found; exactly one is served as-is; several
    /// (transient duplicates left by a race) tie-break on the most recent
    /// modification timestamp.
    pub async fn resolve_current(&self, company_id: &str) -> Result<ObjectInfo, AppError> {
        let matches = self
            .storage
            .list_prefix(&keys::logo_prefix(company_id))
            .await
            .map_err(storage_error_to_app)?;

        if matches.len() > 1 {
            tracing::warn!(
                company_id = %company_id,
                count = matches.len(),
                "Multiple logo objects for tenant; serving most recent"
            );
        }

        matches
            .into_iter()
            .max_by_key(|object| object.last_modified)
            .ok_or_else(|| AppError::NotFound(format!("No logo for company {}", company_id)))
    }

    /// Stored descriptor plus the derived retrieval URL, cache-first with
    /// read-through to the tenant's metadata document.
    #[tracing::instrument(skip(self), fields(company_id = %company_id))]
    pub async fn metadata(&self, company_id: &str) -> Result<LogoResponse, AppError> {
        let cache_key = AssetDescriptor::logo_cache_key(company_id);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(LogoResponse::from_descriptor(
                &cached,
                self.config.logo_url(company_id),
            ));
        }

        let bytes = match self.storage.download(&keys::aggregate_key(company_id)).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => {
                return Err(AppError::NotFound(format!(
                    "No logo for company {}",
                    company_id
                )))
            }
            Err(e) => return Err(storage_error_to_app(e)),
        };

        let descriptor: AssetDescriptor = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(company_id = %company_id, error = %e, "Corrupt logo metadata document");
            AppError::Internal("Corrupt logo metadata document".to_string())
        })?;

        self.cache.set(&cache_key, descriptor.clone()).await;

        Ok(LogoResponse::from_descriptor(
            &descriptor,
            self.config.logo_url(company_id),
        ))
    }
}
