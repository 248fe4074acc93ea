//! Per-entity metadata aggregate and its merge algorithm.
//!
//! The aggregate is the authoritative listing source for an entity's assets.
//! Invariant after every write: entries are unique by position (last writer
//! for a given position wins) and sorted ascending by position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::AssetDescriptor;

/// Durable, per-entity ordered collection of asset descriptors.
///
/// Persisted as a pretty-printed JSON document so the stored record stays
/// human-readable next to the binaries it describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataAggregate {
    pub entity_id: String,
    pub entity_type: String,
    pub updated_at: DateTime<Utc>,
    pub assets: Vec<AssetDescriptor>,
}

impl MetadataAggregate {
    pub fn new(entity_id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        MetadataAggregate {
            entity_id: entity_id.into(),
            entity_type: entity_type.into(),
            updated_at: Utc::now(),
            assets: Vec::new(),
        }
    }

    /// Parse a stored aggregate document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize for storage. Pretty-printed: the document doubles as the
    /// human-readable metadata record for the entity.
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Merge a batch of freshly written descriptors into this aggregate and
    /// restore the position invariant.
    pub fn apply_batch(&mut self, batch: Vec<AssetDescriptor>) {
        let existing = std::mem::take(&mut self.assets);
        self.assets = merge_descriptors(existing, batch);
        self.updated_at = Utc::now();
    }
}

/// Merge old and new descriptors without losing or duplicating positions.
///
/// Single pass over old-then-new: an element whose position already occurs
/// earlier in the running result replaces it in place, otherwise it is
/// appended; afterwards the result is sorted ascending by position. New
/// descriptors always win ties against old ones, and when the batch itself
/// repeats a position the later element wins.
pub fn merge_descriptors(
    existing: Vec<AssetDescriptor>,
    batch: Vec<AssetDescriptor>,
) -> Vec<AssetDescriptor> {
    let mut merged: Vec<AssetDescriptor> = Vec::with_capacity(existing.len() + batch.len());
    for descriptor in existing.into_iter().chain(batch) {
        match merged
            .iter_mut()
            .find(|d| d.position == descriptor.position)
        {
            Some(slot) => *slot = descriptor,
            None => merged.push(descriptor),
        }
    }
    merged.sort_by_key(|d| d.position);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn descriptor(entity_id: &str, position: u32, original_name: &str) -> AssetDescriptor {
        AssetDescriptor {
            id: Uuid::new_v4(),
            entity_id: entity_id.to_string(),
            entity_type: "product".to_string(),
            company_id: "C1".to_string(),
            stored_name: format!("{}-{}.png", entity_id, position),
            original_name: original_name.to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 128,
            position: Some(position),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_into_empty_keeps_batch_order_sorted() {
        let batch = vec![
            descriptor("E1", 0, "a.png"),
            descriptor("E1", 1, "b.png"),
            descriptor("E1", 2, "c.png"),
        ];
        let merged = merge_descriptors(Vec::new(), batch);

        assert_eq!(merged.len(), 3);
        let positions: Vec<u32> = merged.iter().filter_map(|d| d.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_merge_replaces_occupied_position_without_growth() {
        let existing = vec![descriptor("E1", 0, "old.png"), descriptor("E1", 1, "b.png")];
        let replacement = descriptor("E1", 0, "new.png");
        let replacement_id = replacement.id;

        let merged = merge_descriptors(existing, vec![replacement]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, replacement_id);
        assert_eq!(merged[0].original_name, "new.png");
        assert_eq!(merged[1].original_name, "b.png");
    }

    #[test]
    fn test_merge_sorts_out_of_order_existing_entries() {
        let existing = vec![descriptor("E1", 3, "d.png"), descriptor("E1", 1, "b.png")];
        let batch = vec![descriptor("E1", 0, "a.png"), descriptor("E1", 2, "c.png")];

        let merged = merge_descriptors(existing, batch);

        let positions: Vec<u32> = merged.iter().filter_map(|d| d.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_merge_duplicate_positions_in_batch_later_wins() {
        let batch = vec![descriptor("E1", 0, "first.png"), descriptor("E1", 0, "second.png")];

        let merged = merge_descriptors(Vec::new(), batch);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].original_name, "second.png");
    }

    #[test]
    fn test_apply_batch_touches_updated_at_and_keeps_invariant() {
        let mut aggregate = MetadataAggregate::new("E1", "product");
        aggregate.apply_batch(vec![descriptor("E1", 1, "b.png"), descriptor("E1", 0, "a.png")]);
        let first_update = aggregate.updated_at;

        aggregate.apply_batch(vec![descriptor("E1", 1, "b2.png")]);

        assert_eq!(aggregate.assets.len(), 2);
        assert_eq!(aggregate.assets[1].original_name, "b2.png");
        assert!(aggregate.updated_at >= first_update);
    }

    #[test]
    fn test_aggregate_round_trips_through_pretty_json() {
        let mut aggregate = MetadataAggregate::new("E1", "product");
        aggregate.apply_batch(vec![descriptor("E1", 0, "a.png")]);

        let bytes = aggregate.to_pretty_bytes().unwrap();
        let parsed = MetadataAggregate::from_slice(&bytes).unwrap();

        assert_eq!(parsed.entity_id, "E1");
        assert_eq!(parsed.assets.len(), 1);
        assert_eq!(parsed.assets[0].stored_name, "E1-0.png");
    }

    #[test]
    fn test_corrupt_document_fails_to_parse() {
        assert!(MetadataAggregate::from_slice(b"{ not json").is_err());
    }
}
