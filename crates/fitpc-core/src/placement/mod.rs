//! Placement composer: world transforms derived from matched anchors.
//!
//! No part is positioned by hand. The case sits at the identity transform and
//! every other part is placed by walking [`edges::EDGES`]: the parent's world
//! transform, the parent slot anchor and the child connector anchor together
//! determine the child's world transform. Composition is a pure function of
//! the selection and config.

pub mod edges;
mod ram;

pub use edges::{AlternateParent, EDGES, MOTHERBOARD_UPRIGHT, PlacementEdge, RAM_FALLBACK_OFFSET};

use crate::anchor::Anchor;
use crate::build::BuildSelection;
use crate::config::PlacementConfig;
use crate::part::{BuildStep, Category};
use glam::{DQuat, DVec3, EulerRot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Final position and orientation of a part in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldTransform {
    pub position: DVec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: DVec3,
}

impl WorldTransform {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DVec3::ZERO,
    };

    pub fn new(position: DVec3, rotation: DVec3) -> Self {
        Self { position, rotation }
    }

    /// Rotate a local vector by this transform's rotation.
    pub fn rotate(&self, v: DVec3) -> DVec3 {
        rotate(v, self.rotation)
    }

    /// Map a local point (already in scene units) into world space.
    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.position + self.rotate(local)
    }
}

/// Identifies one placed instance. Only memory has more than one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlacementKey {
    pub step: BuildStep,
    pub instance: usize,
}

impl PlacementKey {
    pub fn new(step: BuildStep, instance: usize) -> Self {
        Self { step, instance }
    }

    /// The single instance of a step.
    pub fn single(step: BuildStep) -> Self {
        Self::new(step, 0)
    }
}

impl fmt::Display for PlacementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == Category::Ram {
            write!(f, "{}[{}]", self.step, self.instance)
        } else {
            write!(f, "{}", self.step)
        }
    }
}

/// Composer output, ordered by build step then instance.
pub type Placements = BTreeMap<PlacementKey, WorldTransform>;

/// Rotate `v` by Euler angles applied in XYZ order.
pub fn rotate(v: DVec3, euler: DVec3) -> DVec3 {
    if euler == DVec3::ZERO {
        return v;
    }
    DQuat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z) * v
}

/// Place a child by matching its connector to a parent slot.
///
/// `rotation = parent.rotation + slot.rotation + correction` and
/// `position = parent.position + R(parent)·slot − R(child)·connector`, with
/// anchor positions scaled to scene units first. Without a connector the
/// subtraction is dropped.
pub fn attach(
    parent: &WorldTransform,
    slot: &Anchor,
    connector: Option<&Anchor>,
    correction: DVec3,
    unit_scale: f64,
) -> WorldTransform {
    let rotation = parent.rotation + slot.local_rotation() + correction;
    let mut position = parent.transform_point(slot.local_position() * unit_scale);
    if let Some(connector) = connector {
        position -= rotate(connector.local_position() * unit_scale, rotation);
    }
    WorldTransform { position, rotation }
}

/// Compute the world transform of every selected part.
pub fn compose(selection: &BuildSelection<'_>, config: &PlacementConfig) -> Placements {
    let mut placements = Placements::new();

    if selection.part(Category::Case).is_some() {
        placements.insert(PlacementKey::single(Category::Case), WorldTransform::IDENTITY);
    }

    for edge in EDGES {
        if selection.part(edge.child).is_none() {
            continue;
        }
        let transform = place_edge(edge, selection, &placements, config);
        placements.insert(PlacementKey::single(edge.child), transform);
    }

    let modules = ram::place_modules(selection, &placements, config);
    placements.extend(modules);

    log::debug!("Composed {} placements", placements.len());
    placements
}

/// Transform of an already placed step; absent parents act as the scene root.
fn placed(placements: &Placements, step: BuildStep) -> WorldTransform {
    placements
        .get(&PlacementKey::single(step))
        .copied()
        .unwrap_or(WorldTransform::IDENTITY)
}

fn place_edge(
    edge: &PlacementEdge,
    selection: &BuildSelection<'_>,
    placements: &Placements,
    config: &PlacementConfig,
) -> WorldTransform {
    let parent_transform = placed(placements, edge.parent);
    let connector = selection
        .part(edge.child)
        .and_then(|child| child.find_anchor(edge.child_anchor));

    let slot = selection
        .part(edge.parent)
        .and_then(|parent| parent.find_anchor(edge.parent_anchor));
    if let Some(slot) = slot {
        if connector.is_none() {
            log::debug!("{} has no {} anchor; placing without correction", edge.child, edge.child_anchor);
        }
        return attach(&parent_transform, slot, connector, edge.correction, config.unit_scale);
    }

    if let Some(alternate) = &edge.alternate {
        let bay = selection.part(alternate.parent).and_then(|part| {
            alternate.anchors.iter().find_map(|kind| part.find_anchor(*kind))
        });
        if let Some(bay) = bay {
            log::debug!("Placing {} in {} {}", edge.child, alternate.parent, bay.kind);
            let base = placed(placements, alternate.parent);
            return attach(&base, bay, None, DVec3::ZERO, config.unit_scale);
        }
    }

    log::warn!(
        "No {} anchor on {}; using fallback placement for {}",
        edge.parent_anchor,
        edge.parent,
        edge.child
    );
    WorldTransform {
        position: parent_transform.transform_point(edge.fallback),
        rotation: parent_transform.rotation + edge.correction,
    }
}
