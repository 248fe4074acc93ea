//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata for one stored object, as reported by a prefix scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub key: String,
    pub size_bytes: u64,
    /// Last-modified timestamp; the tie-break for transient duplicate slots.
    pub last_modified: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// The slot store: durable blob storage addressed by the keys the `keys`
/// module produces. Writing to an existing key replaces its contents, which
/// is how upsert-by-slot works. Prefix scans and prefix deletes exist because
/// a slot's extension is not known at delete time.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write data to a specific storage key, replacing any previous object.
    async fn upload_with_key(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Download an object by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Download an object as a stream of chunks (for large files)
    async fn download_stream(
        &self,
        storage_key: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>>;

    /// Delete an object by its storage key. Deleting an absent key is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Delete every object whose key starts with `prefix`. Returns how many
    /// objects were removed.
    async fn delete_prefix(&self, prefix: &str) -> StorageResult<u32>;

    /// List every object whose key starts with `prefix`, with size and
    /// last-modified metadata.
    async fn list_prefix(&self, prefix: &str) -> StorageResult<Vec<ObjectInfo>>;

    /// Move an object from one key to another, replacing any object already
    /// at the destination.
    async fn rename(&self, from_key: &str, to_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
