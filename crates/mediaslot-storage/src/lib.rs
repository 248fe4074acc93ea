//! Mediaslot Storage Library
//!
//! This crate provides the slot-store abstraction: the `Storage` trait, the
//! local filesystem backend, and slot-key naming.
//!
//! # Slot key format
//!
//! Keys are flat within a namespace (one namespace for general assets, one
//! for logos), plus two one-level sub-namespaces: `meta/` for per-entity and
//! per-tenant metadata documents, and `staging/` for in-flight logo uploads.
//!
//! - **Slot asset**: `{entity_id}-{position}{extension}`
//! - **Logo**: `logo-{company_id}{extension}`
//! - **Metadata document**: `meta/{entity_id}.json`
//! - **Staging object**: `staging/{uuid}{extension}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so every caller stays consistent; colliding keys for
//! the same slot are the upsert mechanism, not an error.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{ObjectInfo, Storage, StorageError, StorageResult};
