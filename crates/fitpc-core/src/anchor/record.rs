//! Persisted anchor representation.
//!
//! This is the array attached 1:1 to each part record and snapshotted into
//! saved builds. It carries no anchor ids; ids are assigned on load.

use super::{Anchor, AnchorType, CompatibleType, ConnectionAxis, Direction, Vector3};
use crate::catalog;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One anchor as stored by the catalog and build services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub name: AnchorType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub rotation: Vector3,
    /// Missing in records written before directions existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_axis: Option<ConnectionAxis>,
    #[serde(default)]
    pub compatible_types: Vec<CompatibleType>,
}

impl From<&Anchor> for AnchorRecord {
    fn from(anchor: &Anchor) -> Self {
        Self {
            name: anchor.kind,
            label: anchor.label.clone(),
            position: anchor.position,
            rotation: anchor.rotation,
            direction: Some(anchor.direction),
            connection_axis: Some(anchor.connection_axis),
            compatible_types: anchor.compatible_with.iter().cloned().collect(),
        }
    }
}

impl From<&AnchorRecord> for Anchor {
    fn from(record: &AnchorRecord) -> Self {
        let descriptor = catalog::descriptor(record.name);
        Self {
            id: Uuid::new_v4(),
            kind: record.name,
            label: record.label.clone(),
            position: record.position,
            rotation: record.rotation,
            direction: record.direction.unwrap_or(descriptor.direction),
            connection_axis: record.connection_axis.unwrap_or(descriptor.default_axis),
            compatible_with: record.compatible_types.iter().cloned().collect(),
        }
    }
}

impl AnchorRecord {
    /// Whether loading this record yields an anchor equal to `anchor` apart
    /// from its id. Omitted direction and axis compare as catalog defaults.
    pub fn describes(&self, anchor: &Anchor) -> bool {
        let descriptor = catalog::descriptor(self.name);
        self.name == anchor.kind
            && self.label == anchor.label
            && self.position == anchor.position
            && self.rotation == anchor.rotation
            && self.direction.unwrap_or(descriptor.direction) == anchor.direction
            && self.connection_axis.unwrap_or(descriptor.default_axis) == anchor.connection_axis
            && self.compatible_types.len() == anchor.compatible_with.len()
            && self.compatible_types.iter().all(|entry| anchor.compatible_with.contains(entry))
    }
}

/// Convert persisted records to anchors, assigning fresh ids.
pub fn anchors_from_records(records: &[AnchorRecord]) -> Vec<Anchor> {
    records.iter().map(Anchor::from).collect()
}

/// Convert anchors to their persisted form, preserving order.
pub fn anchors_to_records(anchors: &[Anchor]) -> Vec<AnchorRecord> {
    anchors.iter().map(AnchorRecord::from).collect()
}

/// Parse a persisted anchor array.
pub fn records_from_json(json: &str) -> Result<Vec<AnchorRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize anchors to a persisted anchor array.
pub fn records_to_json(anchors: &[Anchor]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&anchors_to_records(anchors))
}
