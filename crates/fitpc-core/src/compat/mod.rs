//! Compatibility resolution between a placed parent part and candidates.
//!
//! Two gates share the rule table in [`rules`]:
//!
//! - [`catalog_matches`] narrows a catalog listing: anchor-type gate first,
//!   then the rule table as a filter.
//! - [`check`] / [`resolve`] produce a verdict with a reason for every
//!   candidate so the UI can flag, never hide, incompatible parts.
//!
//! Missing data never excludes a candidate: a rule whose attribute is absent
//! on either side is skipped.

pub mod rules;

pub use rules::{AttributeRule, Comparison, RULES, RuleOutcome, rules_between};

use crate::anchor::{AnchorType, CompatibleType};
use crate::catalog;
use crate::part::{Attribute, Part, SpecValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Message attached to an empty listing for a part without anchors.
pub const NO_ANCHORS_MESSAGE: &str = "No anchor points defined for this part";

/// Whether a candidate may attach to a parent, with a reason when it may not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub compatible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn compatible() -> Self {
        Self {
            compatible: true,
            reason: None,
        }
    }

    pub fn incompatible(reason: impl Into<String>) -> Self {
        Self {
            compatible: false,
            reason: Some(reason.into()),
        }
    }
}

/// Verdict for one candidate of a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateVerdict<'a> {
    #[serde(rename = "part_id", serialize_with = "serialize_part_id")]
    pub part: &'a Part,
    #[serde(flatten)]
    pub verdict: Verdict,
}

fn serialize_part_id<S: serde::Serializer>(part: &&Part, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(part.id)
}

/// Catalog-level listing of candidates admissible for a parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogMatches<'a> {
    pub parts: Vec<&'a Part>,
    /// Compatible entries offered by each anchor kind on the parent.
    pub anchor_compatibility: BTreeMap<AnchorType, BTreeSet<CompatibleType>>,
    pub message: Option<&'static str>,
}

/// Rule violations between two parts, in rule table order.
fn violations(parent: &Part, candidate: &Part) -> Vec<String> {
    rules_between(parent.category, candidate.category)
        .filter_map(|(rule, parent_is_host)| {
            let (host, guest) = if parent_is_host {
                (parent, candidate)
            } else {
                (candidate, parent)
            };
            match rule.evaluate(&host.technical_specs, &guest.technical_specs) {
                RuleOutcome::Violated(reason) => Some(reason),
                RuleOutcome::Satisfied | RuleOutcome::Skipped => None,
            }
        })
        .collect()
}

/// Attribute gate for one candidate.
pub fn check(parent: &Part, candidate: &Part) -> Verdict {
    let reasons = violations(parent, candidate);
    if reasons.is_empty() {
        Verdict::compatible()
    } else {
        Verdict::incompatible(reasons.join("; "))
    }
}

/// Attribute gate for a listing. Every candidate gets a verdict, in input order.
pub fn resolve<'a>(
    parent: &Part,
    candidates: impl IntoIterator<Item = &'a Part>,
) -> Vec<CandidateVerdict<'a>> {
    candidates
        .into_iter()
        .map(|part| {
            let verdict = check(parent, part);
            if let Some(reason) = &verdict.reason {
                log::debug!("Part {} flagged against {}: {}", part.id, parent.id, reason);
            }
            CandidateVerdict { part, verdict }
        })
        .collect()
}

/// Attributes whose declared values are matched against anchor tokens.
const DECLARED: &[Attribute] = &[Attribute::Socket, Attribute::MemoryType, Attribute::FormFactor];

/// Textual attributes the rule table reads from `candidate` when paired with `parent`.
fn paired_attributes(parent: &Part, candidate: &Part) -> Vec<Attribute> {
    rules_between(parent.category, candidate.category)
        .map(|(rule, parent_is_host)| {
            if parent_is_host {
                rule.guest_attribute
            } else {
                rule.host_attribute
            }
        })
        .filter(|attribute| attribute.is_textual())
        .collect()
}

/// Type gate for one candidate against the union of the parent's entries.
fn offers(parent: &Part, offered: &BTreeSet<CompatibleType>, candidate: &Part) -> bool {
    if offered.iter().any(|entry| entry.matches(candidate.category.as_str())) {
        return true;
    }

    let hosted = offered.iter().filter_map(CompatibleType::anchor).any(|kind| {
        catalog::descriptor(kind).host_category == Some(candidate.category)
            || candidate.anchors.iter().any(|a| a.kind == kind)
    });
    if hosted {
        return true;
    }

    let paired = paired_attributes(parent, candidate);
    if paired.iter().any(|attribute| candidate.technical_specs.attribute(*attribute).is_none()) {
        return true;
    }

    DECLARED
        .iter()
        .chain(&paired)
        .filter_map(|attribute| candidate.technical_specs.attribute(*attribute))
        .any(|value| match value {
            SpecValue::Text(text) => offered.iter().any(|entry| entry.matches(text)),
            SpecValue::TextSet(texts) => texts
                .iter()
                .any(|text| offered.iter().any(|entry| entry.matches(text))),
            SpecValue::Millimeters(_) => false,
        })
}

/// Anchor-type gate followed by the rule table in filter mode.
///
/// The parent's anchors offer the union of their compatible entries. A
/// candidate passes the type gate when an entry names its category, names a
/// kind its category hosts or one of its own anchors carries, or equals a
/// declared socket, memory type or form factor. A candidate missing an
/// attribute the rule table reads for this pairing also passes.
pub fn catalog_matches<'a>(
    parent: &Part,
    candidates: impl IntoIterator<Item = &'a Part>,
) -> CatalogMatches<'a> {
    if parent.anchors.is_empty() {
        return CatalogMatches {
            message: Some(NO_ANCHORS_MESSAGE),
            ..CatalogMatches::default()
        };
    }

    let mut anchor_compatibility: BTreeMap<AnchorType, BTreeSet<CompatibleType>> = BTreeMap::new();
    for anchor in &parent.anchors {
        anchor_compatibility
            .entry(anchor.kind)
            .or_default()
            .extend(anchor.compatible_with.iter().cloned());
    }
    let offered: BTreeSet<CompatibleType> =
        anchor_compatibility.values().flatten().cloned().collect();

    let parts: Vec<&Part> = candidates
        .into_iter()
        .filter(|candidate| offers(parent, &offered, candidate))
        .filter(|candidate| violations(parent, candidate).is_empty())
        .collect();

    log::debug!("Part {} admits {} catalog candidates", parent.id, parts.len());
    CatalogMatches {
        parts,
        anchor_compatibility,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::part::{Category, CpuSpecs, GpuSpecs, MotherboardSpecs, TechnicalSpecs};

    fn motherboard() -> Part {
        Part::new(1, "Board", Category::Motherboard)
            .with_specs(TechnicalSpecs::Motherboard(MotherboardSpecs {
                socket: Some("LGA1700".into()),
                ram_type: Some("DDR5".into()),
                ..MotherboardSpecs::default()
            }))
            .with_anchors(vec![
                Anchor::new(AnchorType::CpuSocket, "CPU"),
                Anchor::new(AnchorType::RamSlot, "RAM Slot 1"),
            ])
    }

    fn cpu(id: u64, socket: Option<&str>) -> Part {
        Part::new(id, "CPU", Category::Cpu).with_specs(TechnicalSpecs::Cpu(CpuSpecs {
            socket: socket.map(str::to_string),
            ..CpuSpecs::default()
        }))
    }

    #[test]
    fn test_check_socket() {
        let board = motherboard();
        assert_eq!(check(&board, &cpu(10, Some("LGA1700"))), Verdict::compatible());

        let verdict = check(&board, &cpu(11, Some("AM5")));
        assert!(!verdict.compatible);
        assert!(verdict.reason.unwrap().contains("LGA1700"));
    }

    #[test]
    fn test_check_reverse_orientation() {
        // A motherboard candidate checked against an already chosen CPU.
        let verdict = check(&cpu(11, Some("AM5")), &motherboard());
        assert!(!verdict.compatible);
    }

    #[test]
    fn test_resolve_keeps_every_candidate() {
        let board = motherboard();
        let candidates = vec![cpu(10, Some("LGA1700")), cpu(11, Some("AM5")), cpu(12, None)];
        let verdicts = resolve(&board, &candidates);

        assert_eq!(verdicts.len(), 3);
        assert!(verdicts[0].verdict.compatible);
        assert!(!verdicts[1].verdict.compatible);
        assert!(verdicts[2].verdict.compatible);
    }

    #[test]
    fn test_catalog_matches_filters() {
        let board = motherboard();
        let gpu = Part::new(20, "GPU", Category::Gpu).with_specs(TechnicalSpecs::Gpu(GpuSpecs {
            length_mm: Some(300.0),
            ..GpuSpecs::default()
        }));
        let candidates = vec![cpu(10, Some("LGA1700")), cpu(11, Some("AM5")), cpu(12, None), gpu];
        let matches = catalog_matches(&board, &candidates);

        let ids: Vec<u64> = matches.parts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert_eq!(matches.message, None);
        assert!(
            matches.anchor_compatibility[&AnchorType::CpuSocket]
                .contains(&CompatibleType::Anchor(AnchorType::CpuBottom))
        );
    }

    #[test]
    fn test_catalog_matches_by_candidate_anchor() {
        let board = motherboard();
        // A part of a category nothing on the board hosts, but carrying a matching anchor.
        let odd = Part::new(30, "Riser", Category::Storage)
            .with_anchors(vec![Anchor::new(AnchorType::RamEdge, "Edge")]);
        let matches = catalog_matches(&board, [&odd]);
        assert_eq!(matches.parts.len(), 1);
    }

    #[test]
    fn test_catalog_matches_socket_tokens() {
        // Parent anchor listing only a socket name.
        let mut socket = Anchor::new(AnchorType::CpuSocket, "CPU Socket");
        socket.compatible_with = BTreeSet::from([CompatibleType::from("LGA1700")]);
        let board = Part::new(1, "Board", Category::Motherboard).with_anchors(vec![socket]);
        let psu = Part::new(40, "PSU", Category::Psu);
        let candidates = vec![cpu(10, Some("LGA1700")), cpu(11, Some("AM5")), cpu(12, None), psu];

        let matches = catalog_matches(&board, &candidates);
        let ids: Vec<u64> = matches.parts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 12]);
    }

    #[test]
    fn test_catalog_matches_without_anchors() {
        let bare = Part::new(1, "Bare case", Category::Case);
        let candidates = vec![cpu(10, None)];
        let matches = catalog_matches(&bare, &candidates);
        assert!(matches.parts.is_empty());
        assert_eq!(matches.message, Some(NO_ANCHORS_MESSAGE));
    }

    #[test]
    fn test_verdict_serialization() {
        let board = motherboard();
        let candidates = vec![cpu(11, Some("AM5"))];
        let verdicts = resolve(&board, &candidates);
        let value = serde_json::to_value(&verdicts).unwrap();
        assert_eq!(value[0]["part_id"], 11);
        assert_eq!(value[0]["compatible"], false);
        assert!(value[0]["reason"].as_str().unwrap().contains("AM5"));
    }
}
