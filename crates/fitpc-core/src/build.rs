//! Build selection and saved-build snapshots.

use crate::anchor::AnchorRecord;
use crate::error::CatalogResult;
use crate::part::{BuildStep, Category, Part, PartRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A part chosen for one build step.
#[derive(Debug, Clone, Copy)]
pub struct SelectedPart<'a> {
    pub part: &'a Part,
    /// Only meaningful for memory modules.
    pub quantity: Option<u32>,
}

/// Parts chosen for a build, one per step.
///
/// Borrows already-loaded parts; it owns no anchors.
#[derive(Debug, Clone, Default)]
pub struct BuildSelection<'a> {
    entries: BTreeMap<BuildStep, SelectedPart<'a>>,
}

impl<'a> BuildSelection<'a> {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a part for a step, replacing any previous choice.
    pub fn select(&mut self, step: BuildStep, part: &'a Part) {
        self.select_with_quantity(step, part, None);
    }

    /// Choose a part with an explicit quantity.
    pub fn select_with_quantity(&mut self, step: BuildStep, part: &'a Part, quantity: Option<u32>) {
        if part.category != step {
            log::warn!(
                "Part {} is a {} but was selected for the {} step",
                part.id,
                part.category,
                step
            );
        }
        self.entries.insert(step, SelectedPart { part, quantity });
    }

    /// Builder form of [`select`](Self::select).
    pub fn with(mut self, step: BuildStep, part: &'a Part) -> Self {
        self.select(step, part);
        self
    }

    /// Builder form of [`select_with_quantity`](Self::select_with_quantity).
    pub fn with_quantity(mut self, step: BuildStep, part: &'a Part, quantity: u32) -> Self {
        self.select_with_quantity(step, part, Some(quantity));
        self
    }

    /// Clear a step.
    pub fn deselect(&mut self, step: BuildStep) -> Option<SelectedPart<'a>> {
        self.entries.remove(&step)
    }

    pub fn get(&self, step: BuildStep) -> Option<&SelectedPart<'a>> {
        self.entries.get(&step)
    }

    /// The part chosen for a step.
    pub fn part(&self, step: BuildStep) -> Option<&'a Part> {
        self.entries.get(&step).map(|s| s.part)
    }

    /// Normalized quantity: absent or zero counts as one.
    pub fn quantity(&self, step: BuildStep) -> u32 {
        self.entries
            .get(&step)
            .and_then(|s| s.quantity)
            .filter(|&q| q > 0)
            .unwrap_or(1)
    }

    /// Selected steps in build order.
    pub fn iter(&self) -> impl Iterator<Item = (BuildStep, &SelectedPart<'a>)> {
        self.entries.iter().map(|(step, selected)| (*step, selected))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of price times quantity.
    pub fn total_price(&self) -> f64 {
        self.iter()
            .map(|(step, selected)| selected.part.price * self.quantity(step) as f64)
            .sum()
    }

    /// Copy every selected part into saved-build components, in build order.
    pub fn snapshot(&self) -> Vec<BuildComponent> {
        self.iter()
            .map(|(step, selected)| BuildComponent::from_part(selected.part, self.quantity(step)))
            .collect()
    }
}

/// Snapshot of one part stored inside a saved build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildComponent {
    pub id: u64,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub model_url: String,
    #[serde(default)]
    pub technical_specs: serde_json::Value,
    #[serde(default)]
    pub anchor_points: Vec<AnchorRecord>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub quantity: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl BuildComponent {
    /// Snapshot a part; anchors are copied verbatim in persisted form.
    pub fn from_part(part: &Part, quantity: u32) -> Self {
        Self {
            id: part.id,
            name: part.name.clone(),
            category: part.category,
            price: part.price,
            model_url: part.model_url.clone(),
            technical_specs: part.technical_specs.to_value(),
            anchor_points: part.anchor_records(),
            quantity,
        }
    }

    /// Rebuild a validated part from the snapshot.
    pub fn to_part(&self) -> CatalogResult<Part> {
        Part::from_record(PartRecord {
            id: self.id,
            name: self.name.clone(),
            sku: String::new(),
            category: self.category.as_str().to_string(),
            price: self.price,
            model_url: self.model_url.clone(),
            thumbnail_url: String::new(),
            technical_specs: self.technical_specs.clone(),
            anchor_points: self.anchor_points.clone(),
        })
    }

    /// Quantity with zero treated as one.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }
}

/// A saved build as handed to the persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBuild {
    pub name: String,
    pub components: Vec<BuildComponent>,
    #[serde(default)]
    pub total_price: f64,
}

impl SavedBuild {
    /// Snapshot a selection under a name.
    pub fn from_selection(name: impl Into<String>, selection: &BuildSelection<'_>) -> Self {
        Self {
            name: name.into(),
            components: selection.snapshot(),
            total_price: selection.total_price(),
        }
    }

    /// Recompute quantities and the total from the components.
    pub fn normalize(&mut self) {
        for component in &mut self.components {
            component.quantity = component.effective_quantity();
        }
        self.total_price = self
            .components
            .iter()
            .map(|c| c.price * c.quantity as f64)
            .sum();
    }

    /// Rebuild every component as a part, paired with its quantity.
    pub fn parts(&self) -> CatalogResult<Vec<(Part, u32)>> {
        self.components
            .iter()
            .map(|c| Ok((c.to_part()?, c.effective_quantity())))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Build a selection from owned parts, keyed by each part's category.
/// Later parts of the same category replace earlier ones.
pub fn selection_from_parts(parts: &[(Part, u32)]) -> BuildSelection<'_> {
    let mut selection = BuildSelection::new();
    for (part, quantity) in parts {
        selection.select_with_quantity(part.category, part, Some(*quantity));
    }
    selection
}
