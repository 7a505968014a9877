//! Parts (catalog products) and their ingestion.

mod specs;

pub use specs::{
    Attribute, CaseSpecs, CoolerSpecs, CpuSpecs, ExtraSpecs, GpuSpecs, MotherboardSpecs, PsuSpecs,
    RamSpecs, SpecValue, StorageSpecs, TechnicalSpecs,
};

use crate::anchor::{Anchor, AnchorRecord, AnchorType, anchors_from_records, anchors_to_records};
use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Part category. Doubles as the build step a part fills, in build order.
///
/// Deserialization is case-insensitive (`"CPU"`); serialization is snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Category {
    Case,
    Motherboard,
    Cpu,
    CpuCooler,
    Ram,
    Gpu,
    Storage,
    Psu,
}

/// A build step is one of the part categories.
pub type BuildStep = Category;

impl Category {
    /// Every category in build order.
    pub const ALL: [Category; 8] = [
        Category::Case,
        Category::Motherboard,
        Category::Cpu,
        Category::CpuCooler,
        Category::Ram,
        Category::Gpu,
        Category::Storage,
        Category::Psu,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Case => "case",
            Category::Motherboard => "motherboard",
            Category::Cpu => "cpu",
            Category::CpuCooler => "cpu_cooler",
            Category::Ram => "ram",
            Category::Gpu => "gpu",
            Category::Storage => "storage",
            Category::Psu => "psu",
        }
    }

    /// Name shown in verdict reasons.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Case => "Case",
            Category::Motherboard => "Motherboard",
            Category::Cpu => "CPU",
            Category::CpuCooler => "Cooler",
            Category::Ram => "RAM",
            Category::Gpu => "GPU",
            Category::Storage => "Storage",
            Category::Psu => "PSU",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Product record as served by the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub model_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub technical_specs: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub anchor_points: Vec<AnchorRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<AnchorRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let list: Option<Vec<AnchorRecord>> = Option::deserialize(deserializer)?;
    Ok(list.unwrap_or_default())
}

/// A validated, read-only part.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: u64,
    pub name: String,
    pub sku: String,
    pub category: Category,
    pub price: f64,
    pub model_url: String,
    pub thumbnail_url: String,
    pub technical_specs: TechnicalSpecs,
    pub anchors: Vec<Anchor>,
    /// Anchor records exactly as ingested.
    persisted: Vec<AnchorRecord>,
}

impl Part {
    /// Create a part with empty specs and no anchors.
    pub fn new(id: u64, name: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            sku: String::new(),
            category,
            price: 0.0,
            model_url: String::new(),
            thumbnail_url: String::new(),
            technical_specs: TechnicalSpecs::empty(category),
            anchors: Vec::new(),
            persisted: Vec::new(),
        }
    }

    /// Builder: attach anchors.
    pub fn with_anchors(mut self, anchors: Vec<Anchor>) -> Self {
        self.anchors = anchors;
        self.persisted.clear();
        self
    }

    /// Builder: set technical specs.
    pub fn with_specs(mut self, specs: TechnicalSpecs) -> Self {
        self.technical_specs = specs;
        self
    }

    /// Builder: set price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Validate a catalog record. This is the only place untyped specs are read.
    pub fn from_record(record: PartRecord) -> CatalogResult<Self> {
        let category: Category = record.category.parse()?;
        let technical_specs = TechnicalSpecs::from_value(category, record.technical_specs)
            .map_err(|message| CatalogError::InvalidSpecs {
                part_id: record.id,
                message,
            })?;
        let anchors = anchors_from_records(&record.anchor_points);
        log::debug!(
            "Ingested {} part {} ({}) with {} anchors",
            category,
            record.id,
            record.name,
            anchors.len()
        );

        Ok(Self {
            id: record.id,
            name: record.name,
            sku: record.sku,
            category,
            price: record.price,
            model_url: record.model_url,
            thumbnail_url: record.thumbnail_url,
            technical_specs,
            anchors,
            persisted: record.anchor_points,
        })
    }

    /// Convert back to the catalog record shape.
    pub fn to_record(&self) -> PartRecord {
        PartRecord {
            id: self.id,
            name: self.name.clone(),
            sku: self.sku.clone(),
            category: self.category.as_str().to_string(),
            price: self.price,
            model_url: self.model_url.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            technical_specs: self.technical_specs.to_value(),
            anchor_points: self.anchor_records(),
        }
    }

    /// Persisted form of the anchors.
    ///
    /// Anchors unchanged since ingestion keep their record as loaded, with
    /// omitted fields still omitted and compatible entries in stored order.
    pub fn anchor_records(&self) -> Vec<AnchorRecord> {
        if self.persisted.is_empty() {
            return anchors_to_records(&self.anchors);
        }
        self.anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| match self.persisted.get(i) {
                Some(record) if record.describes(anchor) => record.clone(),
                _ => AnchorRecord::from(anchor),
            })
            .collect()
    }

    /// Parse and validate one product JSON object.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let record: PartRecord = serde_json::from_str(json)?;
        Self::from_record(record)
    }

    /// Parse and validate a JSON array of products.
    pub fn list_from_json(json: &str) -> CatalogResult<Vec<Self>> {
        let records: Vec<PartRecord> = serde_json::from_str(json)?;
        records.into_iter().map(Self::from_record).collect()
    }

    /// First anchor of the given kind.
    pub fn find_anchor(&self, kind: AnchorType) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.kind == kind)
    }

    /// All anchors of the given kind, in declaration order.
    pub fn anchors_of(&self, kind: AnchorType) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter().filter(move |a| a.kind == kind)
    }
}
