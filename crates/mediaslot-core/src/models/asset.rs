use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One stored binary and its provenance.
///
/// `stored_name` is always derivable from `(entity_id, position)` plus the
/// extension of `original_name`; two descriptors with equal entity and
/// position therefore collide on the same slot key, which is the intended
/// upsert mechanism rather than an error.
///
/// The logo variant is the same record with `position` absent, keyed solely
/// by `company_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetDescriptor {
    pub id: Uuid,
    pub entity_id: String,
    pub entity_type: String,
    /// Tenant scope; the authorization boundary for deletes.
    pub company_id: String,
    /// The computed slot key, acts as filename inside the namespace.
    pub stored_name: String,
    /// Caller-supplied name, untrusted.
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl AssetDescriptor {
    /// Composite cache key for a slot asset: `"{entity_id}:{position}"`.
    pub fn cache_key(entity_id: &str, position: u32) -> String {
        format!("{}:{}", entity_id, position)
    }

    /// Composite cache key for a tenant's logo: `"logo:{company_id}"`.
    pub fn logo_cache_key(company_id: &str) -> String {
        format!("logo:{}", company_id)
    }
}

/// Upload response shape: the created descriptor fields a caller needs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetResponse {
    pub id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&AssetDescriptor> for AssetResponse {
    fn from(d: &AssetDescriptor) -> Self {
        AssetResponse {
            id: d.id,
            stored_name: d.stored_name.clone(),
            original_name: d.original_name.clone(),
            mime_type: d.mime_type.clone(),
            size_bytes: d.size_bytes,
            position: d.position.unwrap_or(0),
            created_at: d.created_at,
        }
    }
}

/// Listing entry: descriptor plus the derived retrieval URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetListEntry {
    pub id: Uuid,
    pub stored_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub url: String,
    pub position: u32,
}

impl AssetListEntry {
    pub fn from_descriptor(d: &AssetDescriptor, url: String) -> Self {
        AssetListEntry {
            id: d.id,
            stored_name: d.stored_name.clone(),
            original_name: d.original_name.clone(),
            mime_type: d.mime_type.clone(),
            url,
            position: d.position.unwrap_or(0),
        }
    }
}

/// Logo metadata response: the stored descriptor plus a derived file URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoResponse {
    pub id: Uuid,
    pub company_id: String,
    pub stored_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl LogoResponse {
    pub fn from_descriptor(d: &AssetDescriptor, url: String) -> Self {
        LogoResponse {
            id: d.id,
            company_id: d.company_id.clone(),
            stored_name: d.stored_name.clone(),
            original_name: d.original_name.clone(),
            mime_type: d.mime_type.clone(),
            size_bytes: d.size_bytes,
            url,
            created_at: d.created_at,
        }
    }
}
