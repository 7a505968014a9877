//! The fixed dependency chain between build steps.

use crate::anchor::AnchorType;
use crate::part::Category;
use glam::DVec3;
use std::f64::consts::FRAC_PI_2;

/// Rotation added to the motherboard so a board authored lying flat stands upright.
pub const MOTHERBOARD_UPRIGHT: DVec3 = DVec3::new(-FRAC_PI_2, 0.0, 0.0);

/// Fallback offset for a memory module when the motherboard has no slots.
pub const RAM_FALLBACK_OFFSET: DVec3 = DVec3::new(0.5, 0.2, 0.0);

/// Secondary parent tried when the primary parent anchor is missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlternateParent {
    pub parent: Category,
    /// Tried in order; the first kind present on the parent wins.
    pub anchors: &'static [AnchorType],
}

/// One attachment in the chain: a parent slot receives a child connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementEdge {
    pub parent: Category,
    pub parent_anchor: AnchorType,
    pub child: Category,
    pub child_anchor: AnchorType,
    /// Offset from the parent transform, in scene units, used when the parent
    /// anchor is missing.
    pub fallback: DVec3,
    /// Euler rotation added to the child.
    pub correction: DVec3,
    pub alternate: Option<AlternateParent>,
}

impl PlacementEdge {
    const fn new(
        parent: Category,
        parent_anchor: AnchorType,
        child: Category,
        child_anchor: AnchorType,
        fallback: DVec3,
    ) -> Self {
        Self {
            parent,
            parent_anchor,
            child,
            child_anchor,
            fallback,
            correction: DVec3::ZERO,
            alternate: None,
        }
    }

    const fn corrected(mut self, correction: DVec3) -> Self {
        self.correction = correction;
        self
    }

    const fn or_else(mut self, alternate: AlternateParent) -> Self {
        self.alternate = Some(alternate);
        self
    }
}

/// Edges in dependency order: every parent is placed before its children.
/// Memory modules are replicated separately, see `ram`.
pub const EDGES: &[PlacementEdge] = &[
    PlacementEdge::new(
        Category::Case,
        AnchorType::MoboMountArea,
        Category::Motherboard,
        AnchorType::MoboBackplate,
        DVec3::new(0.0, 0.5, 0.0),
    )
    .corrected(MOTHERBOARD_UPRIGHT),
    PlacementEdge::new(
        Category::Motherboard,
        AnchorType::CpuSocket,
        Category::Cpu,
        AnchorType::CpuBottom,
        DVec3::new(0.0, 0.1, 0.0),
    ),
    PlacementEdge::new(
        Category::Cpu,
        AnchorType::CoolerPlate,
        Category::CpuCooler,
        AnchorType::CoolerBase,
        DVec3::new(0.0, 0.1, 0.0),
    ),
    PlacementEdge::new(
        Category::Motherboard,
        AnchorType::PcieX16,
        Category::Gpu,
        AnchorType::PcieEdge,
        DVec3::new(0.0, -0.5, 0.3),
    ),
    PlacementEdge::new(
        Category::Case,
        AnchorType::PsuBay,
        Category::Psu,
        AnchorType::PsuMount,
        DVec3::new(0.0, -1.5, 0.0),
    ),
    PlacementEdge::new(
        Category::Motherboard,
        AnchorType::M2Slot,
        Category::Storage,
        AnchorType::M2Edge,
        DVec3::new(0.3, -1.0, 0.0),
    )
    .or_else(AlternateParent {
        parent: Category::Case,
        anchors: &[AnchorType::DriveBay25, AnchorType::DriveBay35],
    }),
];

/// The edge that places `child`, if any.
pub fn edge_for(child: Category) -> Option<&'static PlacementEdge> {
    EDGES.iter().find(|edge| edge.child == child)
}
