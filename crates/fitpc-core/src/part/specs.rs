//! Typed technical specifications, one schema per part category.

use super::Category;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys not covered by a schema, kept verbatim for snapshots.
pub type ExtraSpecs = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_motherboards: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gpu_length_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cpu_cooler_height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotherboardSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_slots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m2_slots: Option<u32>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdp_w: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoolerSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdp_w: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RamSpecs {
    /// Memory generation, e.g. `DDR5`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_mhz: Option<u32>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdp_w: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_gb: Option<u32>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsuSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wattage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraSpecs,
}

/// Technical specifications keyed by part category.
#[derive(Debug, Clone, PartialEq)]
pub enum TechnicalSpecs {
    Case(CaseSpecs),
    Motherboard(MotherboardSpecs),
    Cpu(CpuSpecs),
    CpuCooler(CoolerSpecs),
    Ram(RamSpecs),
    Gpu(GpuSpecs),
    Storage(StorageSpecs),
    Psu(PsuSpecs),
}

/// Attribute referenced by a compatibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    FormFactor,
    SupportedMotherboards,
    Socket,
    /// Memory generation of a RAM module.
    MemoryType,
    /// Memory generation a motherboard takes.
    SupportedMemory,
    LengthMm,
    MaxGpuLengthMm,
    HeightMm,
    MaxCoolerHeightMm,
}

impl Attribute {
    /// JSON key of this attribute.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::FormFactor => "form_factor",
            Attribute::SupportedMotherboards => "supported_motherboards",
            Attribute::Socket => "socket",
            Attribute::MemoryType => "type",
            Attribute::SupportedMemory => "ram_type",
            Attribute::LengthMm => "length_mm",
            Attribute::MaxGpuLengthMm => "max_gpu_length_mm",
            Attribute::HeightMm => "height_mm",
            Attribute::MaxCoolerHeightMm => "max_cpu_cooler_height_mm",
        }
    }

    /// Whether the attribute holds text rather than a measurement.
    pub fn is_textual(self) -> bool {
        !matches!(
            self,
            Attribute::LengthMm
                | Attribute::MaxGpuLengthMm
                | Attribute::HeightMm
                | Attribute::MaxCoolerHeightMm
        )
    }

    /// Wording used in verdict reasons.
    pub fn noun(self) -> &'static str {
        match self {
            Attribute::FormFactor | Attribute::SupportedMotherboards => "form factor",
            Attribute::Socket => "socket",
            Attribute::MemoryType | Attribute::SupportedMemory => "memory type",
            Attribute::LengthMm | Attribute::MaxGpuLengthMm => "length",
            Attribute::HeightMm | Attribute::MaxCoolerHeightMm => "height",
        }
    }
}

/// Borrowed attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecValue<'a> {
    Text(&'a str),
    TextSet(&'a [String]),
    Millimeters(f64),
}

impl TechnicalSpecs {
    /// Empty specs for a category.
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Case => TechnicalSpecs::Case(CaseSpecs::default()),
            Category::Motherboard => TechnicalSpecs::Motherboard(MotherboardSpecs::default()),
            Category::Cpu => TechnicalSpecs::Cpu(CpuSpecs::default()),
            Category::CpuCooler => TechnicalSpecs::CpuCooler(CoolerSpecs::default()),
            Category::Ram => TechnicalSpecs::Ram(RamSpecs::default()),
            Category::Gpu => TechnicalSpecs::Gpu(GpuSpecs::default()),
            Category::Storage => TechnicalSpecs::Storage(StorageSpecs::default()),
            Category::Psu => TechnicalSpecs::Psu(PsuSpecs::default()),
        }
    }

    /// Decode an untyped specs object into the schema for `category`.
    ///
    /// `null` yields empty specs. Returns a message describing the first
    /// problem found.
    pub fn from_value(category: Category, value: Value) -> Result<Self, String> {
        if value.is_null() {
            return Ok(Self::empty(category));
        }
        if !value.is_object() {
            return Err(format!("expected an object, got {}", value));
        }
        let specs = match category {
            Category::Case => TechnicalSpecs::Case(decode(value)?),
            Category::Motherboard => TechnicalSpecs::Motherboard(decode(value)?),
            Category::Cpu => TechnicalSpecs::Cpu(decode(value)?),
            Category::CpuCooler => TechnicalSpecs::CpuCooler(decode(value)?),
            Category::Ram => TechnicalSpecs::Ram(decode(value)?),
            Category::Gpu => TechnicalSpecs::Gpu(decode(value)?),
            Category::Storage => TechnicalSpecs::Storage(decode(value)?),
            Category::Psu => TechnicalSpecs::Psu(decode(value)?),
        };
        specs.validate()?;
        Ok(specs)
    }

    /// Untyped JSON object, including preserved extra keys.
    pub fn to_value(&self) -> Value {
        let value = match self {
            TechnicalSpecs::Case(s) => serde_json::to_value(s),
            TechnicalSpecs::Motherboard(s) => serde_json::to_value(s),
            TechnicalSpecs::Cpu(s) => serde_json::to_value(s),
            TechnicalSpecs::CpuCooler(s) => serde_json::to_value(s),
            TechnicalSpecs::Ram(s) => serde_json::to_value(s),
            TechnicalSpecs::Gpu(s) => serde_json::to_value(s),
            TechnicalSpecs::Storage(s) => serde_json::to_value(s),
            TechnicalSpecs::Psu(s) => serde_json::to_value(s),
        };
        value.unwrap_or_default()
    }

    /// Category these specs belong to.
    pub fn category(&self) -> Category {
        match self {
            TechnicalSpecs::Case(_) => Category::Case,
            TechnicalSpecs::Motherboard(_) => Category::Motherboard,
            TechnicalSpecs::Cpu(_) => Category::Cpu,
            TechnicalSpecs::CpuCooler(_) => Category::CpuCooler,
            TechnicalSpecs::Ram(_) => Category::Ram,
            TechnicalSpecs::Gpu(_) => Category::Gpu,
            TechnicalSpecs::Storage(_) => Category::Storage,
            TechnicalSpecs::Psu(_) => Category::Psu,
        }
    }

    /// Look up an attribute. None when the schema has no such attribute or
    /// the part does not declare it.
    pub fn attribute(&self, attribute: Attribute) -> Option<SpecValue<'_>> {
        use Attribute as A;
        use TechnicalSpecs as T;

        match (self, attribute) {
            (T::Case(s), A::SupportedMotherboards) => {
                s.supported_motherboards.as_deref().map(SpecValue::TextSet)
            }
            (T::Case(s), A::MaxGpuLengthMm) => s.max_gpu_length_mm.map(SpecValue::Millimeters),
            (T::Case(s), A::MaxCoolerHeightMm) => {
                s.max_cpu_cooler_height_mm.map(SpecValue::Millimeters)
            }
            (T::Case(s), A::FormFactor) => text(&s.form_factor),
            (T::Motherboard(s), A::FormFactor) => text(&s.form_factor),
            (T::Motherboard(s), A::Socket) => text(&s.socket),
            (T::Motherboard(s), A::SupportedMemory) => text(&s.ram_type),
            (T::Cpu(s), A::Socket) => text(&s.socket),
            (T::Ram(s), A::MemoryType) => text(&s.memory_type),
            (T::Gpu(s), A::LengthMm) => s.length_mm.map(SpecValue::Millimeters),
            (T::CpuCooler(s), A::HeightMm) => s.height_mm.map(SpecValue::Millimeters),
            (T::Psu(s), A::FormFactor) => text(&s.form_factor),
            _ => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        let dimensions = match self {
            TechnicalSpecs::Case(s) => vec![
                ("max_gpu_length_mm", s.max_gpu_length_mm),
                ("max_cpu_cooler_height_mm", s.max_cpu_cooler_height_mm),
            ],
            TechnicalSpecs::Gpu(s) => vec![("length_mm", s.length_mm)],
            TechnicalSpecs::CpuCooler(s) => vec![("height_mm", s.height_mm)],
            _ => Vec::new(),
        };
        for (key, value) in dimensions {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!("{} must be a non-negative number, got {}", key, v));
                }
            }
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Blank strings count as absent.
fn text(value: &Option<String>) -> Option<SpecValue<'_>> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SpecValue::Text)
}
