//! Static table of anchor kinds and their default semantics.

use crate::anchor::{AnchorRole, AnchorType, ConnectionAxis, Direction};
use crate::part::Category;

/// Defaults applied when an anchor of a given kind is first created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorTypeDescriptor {
    pub kind: AnchorType,
    /// Label prefix used for generated anchor labels.
    pub display_label: &'static str,
    pub direction: Direction,
    pub default_axis: ConnectionAxis,
    pub default_compatible: &'static [AnchorType],
    pub role: AnchorRole,
    /// Category of part that carries a connector of this kind, if any.
    pub host_category: Option<Category>,
}

const fn slot(
    kind: AnchorType,
    display_label: &'static str,
    default_axis: ConnectionAxis,
    default_compatible: &'static [AnchorType],
) -> AnchorTypeDescriptor {
    AnchorTypeDescriptor {
        kind,
        display_label,
        direction: Direction::Output,
        default_axis,
        default_compatible,
        role: AnchorRole::Provider,
        host_category: None,
    }
}

const fn connector(
    kind: AnchorType,
    display_label: &'static str,
    default_axis: ConnectionAxis,
    default_compatible: &'static [AnchorType],
    host_category: Option<Category>,
) -> AnchorTypeDescriptor {
    AnchorTypeDescriptor {
        kind,
        display_label,
        direction: Direction::Input,
        default_axis,
        default_compatible,
        role: AnchorRole::Connector,
        host_category,
    }
}

use AnchorType as A;
use ConnectionAxis as Axis;

/// Indexed by `AnchorType as usize`.
static CATALOG: [AnchorTypeDescriptor; 19] = [
    slot(A::MoboMountArea, "Motherboard Mount", Axis::ZNeg, &[A::MoboBackplate]),
    connector(A::MoboBackplate, "Motherboard Backplate", Axis::ZPos, &[A::MoboMountArea], Some(Category::Motherboard)),
    slot(A::CpuSocket, "CPU Socket", Axis::YNeg, &[A::CpuBottom]),
    connector(A::CpuBottom, "CPU Contact", Axis::YNeg, &[A::CpuSocket], Some(Category::Cpu)),
    // Top surface of the CPU heat spreader.
    slot(A::CoolerPlate, "Cooler Plate", Axis::YNeg, &[A::CoolerBase]),
    connector(A::CoolerBase, "Cooler Base", Axis::YNeg, &[A::CoolerPlate], Some(Category::CpuCooler)),
    slot(A::RamSlot, "RAM Slot", Axis::YNeg, &[A::RamEdge]),
    connector(A::RamEdge, "RAM Edge", Axis::YNeg, &[A::RamSlot], Some(Category::Ram)),
    slot(A::PcieX16, "PCIe x16 Slot", Axis::YNeg, &[A::PcieEdge]),
    connector(A::PcieEdge, "PCIe Edge", Axis::YNeg, &[A::PcieX16], Some(Category::Gpu)),
    slot(A::M2Slot, "M.2 Slot", Axis::XNeg, &[A::M2Edge]),
    connector(A::M2Edge, "M.2 Edge", Axis::XNeg, &[A::M2Slot], Some(Category::Storage)),
    slot(A::DriveBay25, "2.5\" Drive Bay", Axis::XNeg, &[A::DriveMount]),
    slot(A::DriveBay35, "3.5\" Drive Bay", Axis::XNeg, &[A::DriveMount]),
    connector(A::DriveMount, "Drive Mount", Axis::XNeg, &[A::DriveBay25, A::DriveBay35], Some(Category::Storage)),
    slot(A::PsuBay, "PSU Bay", Axis::YNeg, &[A::PsuMount]),
    connector(A::PsuMount, "PSU Mount", Axis::YNeg, &[A::PsuBay], Some(Category::Psu)),
    slot(A::FanMount, "Fan Mount", Axis::ZNeg, &[A::FanEdge]),
    // Fans are not a build step.
    connector(A::FanEdge, "Fan Frame", Axis::ZNeg, &[A::FanMount], None),
];

/// Look up the descriptor for an anchor kind.
pub fn descriptor(kind: AnchorType) -> &'static AnchorTypeDescriptor {
    &CATALOG[kind.index()]
}

/// All descriptors in catalog order.
pub fn all() -> &'static [AnchorTypeDescriptor] {
    &CATALOG
}

/// Descriptors of slot kinds exposed by host parts.
pub fn providers() -> impl Iterator<Item = &'static AnchorTypeDescriptor> {
    CATALOG.iter().filter(|d| d.role == AnchorRole::Provider)
}

/// Descriptors of connector kinds exposed by attachable parts.
pub fn connectors() -> impl Iterator<Item = &'static AnchorTypeDescriptor> {
    CATALOG.iter().filter(|d| d.role == AnchorRole::Connector)
}
