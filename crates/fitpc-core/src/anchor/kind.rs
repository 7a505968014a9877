//! Closed enumerations describing anchors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of attachment point.
///
/// Declaration order matters: it is the index into the anchor catalog and
/// the iteration order of compatible-type sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum AnchorType {
    MoboMountArea,
    MoboBackplate,
    CpuSocket,
    CpuBottom,
    CoolerPlate,
    CoolerBase,
    RamSlot,
    RamEdge,
    PcieX16,
    PcieEdge,
    M2Slot,
    M2Edge,
    #[serde(rename = "drive_bay_25")]
    DriveBay25,
    #[serde(rename = "drive_bay_35")]
    DriveBay35,
    DriveMount,
    PsuBay,
    PsuMount,
    FanMount,
    FanEdge,
}

impl AnchorType {
    /// Every anchor kind, in catalog order.
    pub const ALL: [AnchorType; 19] = [
        AnchorType::MoboMountArea,
        AnchorType::MoboBackplate,
        AnchorType::CpuSocket,
        AnchorType::CpuBottom,
        AnchorType::CoolerPlate,
        AnchorType::CoolerBase,
        AnchorType::RamSlot,
        AnchorType::RamEdge,
        AnchorType::PcieX16,
        AnchorType::PcieEdge,
        AnchorType::M2Slot,
        AnchorType::M2Edge,
        AnchorType::DriveBay25,
        AnchorType::DriveBay35,
        AnchorType::DriveMount,
        AnchorType::PsuBay,
        AnchorType::PsuMount,
        AnchorType::FanMount,
        AnchorType::FanEdge,
    ];

    /// Wire name used in persisted anchor lists.
    pub fn as_str(self) -> &'static str {
        match self {
            AnchorType::MoboMountArea => "mobo_mount_area",
            AnchorType::MoboBackplate => "mobo_backplate",
            AnchorType::CpuSocket => "cpu_socket",
            AnchorType::CpuBottom => "cpu_bottom",
            AnchorType::CoolerPlate => "cooler_plate",
            AnchorType::CoolerBase => "cooler_base",
            AnchorType::RamSlot => "ram_slot",
            AnchorType::RamEdge => "ram_edge",
            AnchorType::PcieX16 => "pcie_x16",
            AnchorType::PcieEdge => "pcie_edge",
            AnchorType::M2Slot => "m2_slot",
            AnchorType::M2Edge => "m2_edge",
            AnchorType::DriveBay25 => "drive_bay_25",
            AnchorType::DriveBay35 => "drive_bay_35",
            AnchorType::DriveMount => "drive_mount",
            AnchorType::PsuBay => "psu_bay",
            AnchorType::PsuMount => "psu_mount",
            AnchorType::FanMount => "fan_mount",
            AnchorType::FanEdge => "fan_edge",
        }
    }

    /// Position of this kind in [`AnchorType::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AnchorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorType {
    type Err = String;

    /// Accepts wire names and numbered legacy names such as `ram_slot_1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let exact = |name: &str| AnchorType::ALL.iter().copied().find(|kind| kind.as_str() == name);
        exact(s)
            .or_else(|| {
                let (base, counter) = s.rsplit_once('_')?;
                if counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                exact(base)
            })
            .ok_or_else(|| format!("unknown anchor type '{}'", s))
    }
}

impl TryFrom<String> for AnchorType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One entry of an anchor's compatible set.
///
/// Either an anchor kind, or a free token matched against a candidate's
/// category or a declared attribute value (`cpu`, `LGA1700`, `DDR5`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompatibleType {
    Anchor(AnchorType),
    Token(String),
}

impl CompatibleType {
    /// Wire form.
    pub fn as_str(&self) -> &str {
        match self {
            CompatibleType::Anchor(kind) => kind.as_str(),
            CompatibleType::Token(token) => token,
        }
    }

    /// The anchor kind, if this entry names one.
    pub fn anchor(&self) -> Option<AnchorType> {
        match self {
            CompatibleType::Anchor(kind) => Some(*kind),
            CompatibleType::Token(_) => None,
        }
    }

    /// Trimmed, ASCII case-insensitive comparison against a category name or
    /// attribute value.
    pub fn matches(&self, value: &str) -> bool {
        self.as_str().trim().eq_ignore_ascii_case(value.trim())
    }
}

impl From<AnchorType> for CompatibleType {
    fn from(kind: AnchorType) -> Self {
        CompatibleType::Anchor(kind)
    }
}

impl From<&str> for CompatibleType {
    fn from(value: &str) -> Self {
        value
            .parse()
            .map(CompatibleType::Anchor)
            .unwrap_or_else(|_| CompatibleType::Token(value.to_string()))
    }
}

impl fmt::Display for CompatibleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an anchor receives another part or plugs into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Connector on an attachable part (CPU, memory, GPU, drive, cooler, PSU, fan).
    Input,
    /// Slot on a host part (case, motherboard, CPU top surface).
    Output,
}

/// One of six signed principal axes, the insertion direction of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionAxis {
    XPos,
    XNeg,
    YPos,
    YNeg,
    ZPos,
    ZNeg,
}

impl ConnectionAxis {
    /// Unit vector pointing along this axis.
    pub fn unit(self) -> glam::DVec3 {
        match self {
            ConnectionAxis::XPos => glam::DVec3::X,
            ConnectionAxis::XNeg => glam::DVec3::NEG_X,
            ConnectionAxis::YPos => glam::DVec3::Y,
            ConnectionAxis::YNeg => glam::DVec3::NEG_Y,
            ConnectionAxis::ZPos => glam::DVec3::Z,
            ConnectionAxis::ZNeg => glam::DVec3::NEG_Z,
        }
    }

    /// The axis pointing the opposite way.
    pub fn opposite(self) -> Self {
        match self {
            ConnectionAxis::XPos => ConnectionAxis::XNeg,
            ConnectionAxis::XNeg => ConnectionAxis::XPos,
            ConnectionAxis::YPos => ConnectionAxis::YNeg,
            ConnectionAxis::YNeg => ConnectionAxis::YPos,
            ConnectionAxis::ZPos => ConnectionAxis::ZNeg,
            ConnectionAxis::ZNeg => ConnectionAxis::ZPos,
        }
    }
}

/// Which side of a connection an anchor kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorRole {
    /// Belongs to a host component.
    Provider,
    /// Belongs to an attachable component.
    Connector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for kind in AnchorType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<AnchorType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        for (i, kind) in AnchorType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_connection_axis_wire_format() {
        assert_eq!(serde_json::to_string(&ConnectionAxis::YNeg).unwrap(), "\"Y_NEG\"");
        let axis: ConnectionAxis = serde_json::from_str("\"X_POS\"").unwrap();
        assert_eq!(axis, ConnectionAxis::XPos);
        assert_eq!(axis.opposite(), ConnectionAxis::XNeg);
    }

    #[test]
    fn test_unknown_anchor_type() {
        assert!("ram_stick".parse::<AnchorType>().is_err());
        assert!("ram_slot_".parse::<AnchorType>().is_err());
        assert!(serde_json::from_str::<AnchorType>("\"ram_stick\"").is_err());
    }

    #[test]
    fn test_numbered_legacy_names() {
        assert_eq!("ram_slot_1".parse::<AnchorType>().unwrap(), AnchorType::RamSlot);
        assert_eq!("drive_bay_25".parse::<AnchorType>().unwrap(), AnchorType::DriveBay25);
        let kind: AnchorType = serde_json::from_str("\"pcie_x16_2\"").unwrap();
        assert_eq!(kind, AnchorType::PcieX16);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"pcie_x16\"");
    }

    #[test]
    fn test_compatible_type_tokens() {
        let types: Vec<CompatibleType> =
            serde_json::from_str(r#"["cpu", "LGA1700", "cpu_bottom"]"#).unwrap();
        assert_eq!(types[0], CompatibleType::Token("cpu".into()));
        assert_eq!(types[1], CompatibleType::Token("LGA1700".into()));
        assert_eq!(types[2], CompatibleType::Anchor(AnchorType::CpuBottom));
        assert!(types[1].matches(" lga1700"));
        assert_eq!(CompatibleType::from("ram_edge").anchor(), Some(AnchorType::RamEdge));
        assert_eq!(serde_json::to_string(&types).unwrap(), r#"["cpu","LGA1700","cpu_bottom"]"#);
    }
}
