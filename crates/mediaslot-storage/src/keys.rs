//! Shared slot-key generation.
//!
//! Pure and deterministic: the mapping from `(entity, position)` or tenant to
//! a storage key is the naming scheme the whole system hangs off. Writing to
//! an occupied slot key replaces its contents by construction.

use uuid::Uuid;

/// Slot key for a positioned asset: `{entity_id}-{position}{extension}`.
///
/// `extension` carries its leading dot (e.g. `".png"`) or is empty.
pub fn asset_key(entity_id: &str, position: u32, extension: &str) -> String {
    format!("{}-{}{}", entity_id, position, extension)
}

/// Scan/delete prefix for one slot: `{entity_id}-{position}.`
///
/// The trailing dot keeps position 1 from matching position 10 and up.
pub fn asset_prefix(entity_id: &str, position: u32) -> String {
    format!("{}-{}.", entity_id, position)
}

/// Logo slot key for a tenant: `logo-{company_id}{extension}`.
pub fn logo_key(company_id: &str, extension: &str) -> String {
    format!("logo-{}{}", company_id, extension)
}

/// Scan/delete prefix for a tenant's logo slot: `logo-{company_id}.`
pub fn logo_prefix(company_id: &str) -> String {
    format!("logo-{}.", company_id)
}

/// Globally-unique staging key for an in-flight logo upload. Embeds a fresh
/// identifier, so concurrent uploads can never collide here.
pub fn staging_key(extension: &str) -> String {
    format!("staging/{}{}", Uuid::new_v4(), extension)
}

/// Key of the metadata document for an entity (or, in the logo namespace,
/// for a tenant).
pub fn aggregate_key(entity_id: &str) -> String {
    format!("meta/{}.json", entity_id)
}
