//! Anchor definitions: attachment points on parts.

mod kind;
mod record;

pub use kind::{AnchorRole, AnchorType, CompatibleType, ConnectionAxis, Direction};
pub use record::{AnchorRecord, anchors_from_records, anchors_to_records, records_from_json, records_to_json};

use crate::catalog;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unique identifier for anchors.
pub type AnchorId = Uuid;

/// Serializable 3D vector (`{"x", "y", "z"}` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<DVec3> for Vector3 {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for DVec3 {
    fn from(v: Vector3) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

/// A named, positioned, oriented attachment point on a part.
///
/// Position is part-local in model units (centimeters); rotation is a
/// part-local Euler triple in radians, applied in XYZ order.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub(crate) id: AnchorId,
    /// Kind of attachment point.
    pub kind: AnchorType,
    /// Human readable label (not unique).
    pub label: String,
    /// Part-local position.
    pub position: Vector3,
    /// Part-local Euler rotation.
    pub rotation: Vector3,
    /// Input (connector) or output (slot).
    pub direction: Direction,
    /// Insertion direction of the connection.
    pub connection_axis: ConnectionAxis,
    /// Anchor kinds, categories or attribute values this anchor accepts.
    pub compatible_with: BTreeSet<CompatibleType>,
}

impl Anchor {
    /// Create an anchor at the origin using the catalog defaults for `kind`.
    pub fn new(kind: AnchorType, label: impl Into<String>) -> Self {
        let descriptor = catalog::descriptor(kind);
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            position: Vector3::ZERO,
            rotation: Vector3::ZERO,
            direction: descriptor.direction,
            connection_axis: descriptor.default_axis,
            compatible_with: descriptor
                .default_compatible
                .iter()
                .copied()
                .map(CompatibleType::Anchor)
                .collect(),
        }
    }

    /// Builder: set the part-local position.
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    /// Builder: set the part-local rotation.
    pub fn rotated(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    /// Get the unique identifier.
    pub fn id(&self) -> AnchorId {
        self.id
    }

    /// Whether this anchor accepts or offers the given kind.
    pub fn accepts(&self, kind: AnchorType) -> bool {
        self.compatible_with.contains(&CompatibleType::Anchor(kind))
    }

    /// Whether any entry names `value` (a category or attribute value).
    pub fn accepts_value(&self, value: &str) -> bool {
        self.compatible_with.iter().any(|entry| entry.matches(value))
    }

    /// A valid attachment exists when either side's kind is listed by the other.
    pub fn mates_with(&self, other: &Anchor) -> bool {
        self.accepts(other.kind) || other.accepts(self.kind)
    }

    /// Whether this anchor is a slot exposed by a host part.
    pub fn is_slot(&self) -> bool {
        self.direction == Direction::Output
    }

    /// Position as a glam vector.
    pub fn local_position(&self) -> DVec3 {
        self.position.into()
    }

    /// Rotation as a glam vector.
    pub fn local_rotation(&self) -> DVec3 {
        self.rotation.into()
    }

    /// Copy of this anchor with a fresh identifier.
    pub(crate) fn with_new_id(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}
