//! Positioned asset slots: upload, listing, ownership checks, deletion.
//!
//! An upload writes each binary to its computed slot key, shadows the new
//! descriptors in the cache, and folds them into the entity's durable
//! metadata aggregate under a per-entity lock so concurrent uploads cannot
//! lose each other's merge.

use std::sync::Arc;

use chrono::Utc;
use mediaslot_core::models::{
    AssetDescriptor, AssetListEntry, MetadataAggregate,
};
use mediaslot_core::validation::file_extension;
use mediaslot_core::{AppError, Config, MediaValidator};
use mediaslot_db::ShadowAssetRepository;
use mediaslot_infra::{AssetCache, KeyedLocks};
use mediaslot_storage::{keys, Storage, StorageError};
use uuid::Uuid;

use crate::error::{storage_error_to_app, validation_error_to_app};

/// One binary part of a multipart upload, already read into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Upload, listing, and deletion over the general asset namespace.
#[derive(Clone)]
pub struct AssetSlotService {
    storage: Arc<dyn Storage>,
    cache: AssetCache,
    entity_locks: KeyedLocks,
    config: Config,
    shadow: Option<ShadowAssetRepository>,
}

impl AssetSlotService {
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: AssetCache,
        config: Config,
        shadow: Option<ShadowAssetRepository>,
    ) -> Self {
        Self {
            storage,
            cache,
            entity_locks: KeyedLocks::new(),
            config,
            shadow,
        }
    }

    fn validator(&self) -> MediaValidator {
        MediaValidator::new(
            self.config.max_upload_size_bytes,
            self.config.allowed_content_types.clone(),
        )
    }

    /// Store an upload batch for one entity.
    ///
    /// Positions are the file's ordinal within the batch: file 0 lands in
    /// slot 0, and a single-file upload always targets slot 0 and replaces
    /// whatever occupied it. Every file is validated before the first byte
    /// is written, so a rejected request leaves no partial state.
    #[tracing::instrument(skip(self, files), fields(entity_id = %entity_id, company_id = %company_id, file_count = files.len()))]
    pub async fn upload(
        &self,
        entity_id: &str,
        entity_type: &str,
        company_id: &str,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<AssetDescriptor>, AppError> {
        if entity_id.trim().is_empty() || entity_type.trim().is_empty() || company_id.trim().is_empty()
        {
            return Err(AppError::InvalidInput(
                "entityId, entityType and companyId are required".to_string(),
            ));
        }
        if files.is_empty() {
            return Err(AppError::InvalidInput("No files provided".to_string()));
        }

        let validator = self.validator();
        for file in &files {
            validator
                .validate_all(&file.original_name, &file.content_type, file.data.len())
                .map_err(validation_error_to_app)?;
        }

        let mut descriptors = Vec::with_capacity(files.len());
        for (index, file) in files.into_iter().enumerate() {
            let position = index as u32;
            let extension = file_extension(&file.original_name);
            let stored_name = keys::asset_key(entity_id, position, &extension);
            let size_bytes = file.data.len() as i64;

            self.storage
                .upload_with_key(&stored_name, file.data)
                .await
                .map_err(storage_error_to_app)?;

            let descriptor = AssetDescriptor {
                id: Uuid::new_v4(),
                entity_id: entity_id.to_string(),
                entity_type: entity_type.to_string(),
                company_id: company_id.to_string(),
                stored_name,
                original_name: file.original_name,
                mime_type: file.content_type,
                size_bytes,
                position: Some(position),
                created_at: Utc::now(),
            };

            self.cache
                .set(
                    &AssetDescriptor::cache_key(entity_id, position),
                    descriptor.clone(),
                )
                .await;

            descriptors.push(descriptor);
        }

        // Serialize the read-merge-write per entity: without this, two
        // concurrent uploads both read the old aggregate and the last
        // writer silently drops the other's entries.
        {
            let _guard = self.entity_locks.acquire(entity_id).await;
            let mut aggregate = self.load_aggregate_for_write(entity_id, entity_type).await?;
            aggregate.apply_batch(descriptors.clone());
            self.store_aggregate(&aggregate).await?;
        }

        if let Some(shadow) = self.shadow.clone() {
            let mirrored = descriptors.clone();
            tokio::spawn(async move {
                if let Err(e) = shadow.record_descriptors(&mirrored).await {
                    tracing::warn!(error = %e, "Shadow store write failed");
                }
            });
        }

        Ok(descriptors)
    }

    /// Read the aggregate as the base for a merge. A missing document is an
    /// empty base; an unparseable one is reported and dropped (recoverable
    /// with data loss, never a request failure).
    async fn load_aggregate_for_write(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> Result<MetadataAggregate, AppError> {
        let key = keys::aggregate_key(entity_id);
        match self.storage.download(&key).await {
            Ok(bytes) => match MetadataAggregate::from_slice(&bytes) {
                Ok(aggregate) => Ok(aggregate),
                Err(e) => {
                    tracing::warn!(
                        entity_id = %entity_id,
                        error = %e,
                        "Corrupt metadata aggregate; proceeding with empty base"
                    );
                    Ok(MetadataAggregate::new(entity_id, entity_type))
                }
            },
            Err(StorageError::NotFound(_)) => Ok(MetadataAggregate::new(entity_id, entity_type)),
            Err(e) => Err(storage_error_to_app(e)),
        }
    }

    async fn store_aggregate(&self, aggregate: &MetadataAggregate) -> Result<(), AppError> {
        let bytes = aggregate.to_pretty_bytes()?;
        self.storage
            .upload_with_key(&keys::aggregate_key(&aggregate.entity_id), bytes)
            .await
            .map_err(storage_error_to_app)
    }

    /// The aggregate is the authoritative listing; the cache is never
    /// consulted here. An entity without an aggregate lists as empty.
    #[tracing::instrument(skip(self), fields(entity_id = %entity_id))]
    pub async fn list(&self, entity_id: &str) -> Result<Vec<AssetListEntry>, AppError> {
        let key = keys::aggregate_key(entity_id);
        let bytes = match self.storage.download(&key).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(storage_error_to_app(e)),
        };

        let aggregate = match MetadataAggregate::from_slice(&bytes) {
            Ok(aggregate) => aggregate,
            Err(e) => {
                tracing::warn!(
                    entity_id = %entity_id,
                    error = %e,
                    "Corrupt metadata aggregate; listing as empty"
                );
                return Ok(Vec::new());
            }
        };

        Ok(aggregate
            .assets
            .iter()
            .map(|d| AssetListEntry::from_descriptor(d, self.config.file_url(&d.stored_name)))
            .collect())
    }

    /// Ownership check for a slot: cache-first, and cache-only.
    ///
    /// A warm entry whose recorded company differs from the asserted one is
    /// a Forbidden; a warm match allows; a cold cache allows without any
    /// fallback to the durable aggregate. The asymmetry is a deliberate,
    /// documented property of this system.
    pub async fn check_ownership(
        &self,
        entity_id: &str,
        position: u32,
        company_id: &str,
    ) -> Result<(), AppError> {
        let key = AssetDescriptor::cache_key(entity_id, position);
        if let Some(cached) = self.cache.get(&key).await {
            if cached.company_id != company_id {
                return Err(AppError::Forbidden(
                    "Asset belongs to another company".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Remove the slot's binaries (all extensions) and its cache entry.
    /// The aggregate is intentionally left untouched: the stale entry stays
    /// until the entity's next upload rewrites the document.
    #[tracing::instrument(skip(self), fields(entity_id = %entity_id, position = position))]
    pub async fn delete(
        &self,
        entity_id: &str,
        position: u32,
        company_id: &str,
    ) -> Result<u32, AppError> {
        self.check_ownership(entity_id, position, company_id).await?;

        let deleted = self
            .storage
            .delete_prefix(&keys::asset_prefix(entity_id, position))
            .await
            .map_err(storage_error_to_app)?;

        self.cache
            .del(&AssetDescriptor::cache_key(entity_id, position))
            .await;

        tracing::info!(deleted, "Deleted asset slot binaries");

        Ok(deleted)
    }
}
