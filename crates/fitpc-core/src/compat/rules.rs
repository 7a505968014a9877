//! Declarative attribute rules between part categories.

use crate::part::{Attribute, Category, SpecValue, TechnicalSpecs};

/// How a guest attribute is compared with a host attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Guest text is one of the host's listed values.
    MemberOf,
    /// Guest text equals host text.
    Equals,
    /// Guest measurement does not exceed the host's limit.
    AtMost,
}

/// One attribute comparison for a category pairing.
///
/// The host is the part that receives (case, motherboard); the guest is the
/// part that fits into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRule {
    pub host: Category,
    pub guest: Category,
    pub host_attribute: Attribute,
    pub guest_attribute: Attribute,
    pub comparison: Comparison,
}

/// Every supported pairing. Pairings not listed here are always compatible.
pub const RULES: &[AttributeRule] = &[
    AttributeRule {
        host: Category::Case,
        guest: Category::Motherboard,
        host_attribute: Attribute::SupportedMotherboards,
        guest_attribute: Attribute::FormFactor,
        comparison: Comparison::MemberOf,
    },
    AttributeRule {
        host: Category::Motherboard,
        guest: Category::Cpu,
        host_attribute: Attribute::Socket,
        guest_attribute: Attribute::Socket,
        comparison: Comparison::Equals,
    },
    AttributeRule {
        host: Category::Motherboard,
        guest: Category::Ram,
        host_attribute: Attribute::SupportedMemory,
        guest_attribute: Attribute::MemoryType,
        comparison: Comparison::Equals,
    },
    AttributeRule {
        host: Category::Case,
        guest: Category::Gpu,
        host_attribute: Attribute::MaxGpuLengthMm,
        guest_attribute: Attribute::LengthMm,
        comparison: Comparison::AtMost,
    },
    AttributeRule {
        host: Category::Case,
        guest: Category::CpuCooler,
        host_attribute: Attribute::MaxCoolerHeightMm,
        guest_attribute: Attribute::HeightMm,
        comparison: Comparison::AtMost,
    },
];

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Satisfied,
    /// An attribute is absent on one side, so the rule does not apply.
    Skipped,
    Violated(String),
}

impl AttributeRule {
    /// Whether the rule concerns these two categories, in either order.
    pub fn applies_to(&self, a: Category, b: Category) -> bool {
        (self.host == a && self.guest == b) || (self.host == b && self.guest == a)
    }

    /// Compare the guest's attribute against the host's.
    pub fn evaluate(&self, host: &TechnicalSpecs, guest: &TechnicalSpecs) -> RuleOutcome {
        let (Some(host_value), Some(guest_value)) = (
            host.attribute(self.host_attribute),
            guest.attribute(self.guest_attribute),
        ) else {
            return RuleOutcome::Skipped;
        };

        let noun = self.guest_attribute.noun();
        match (self.comparison, host_value, guest_value) {
            (Comparison::MemberOf, SpecValue::TextSet(allowed), SpecValue::Text(value)) => {
                if allowed.iter().any(|a| same_text(a, value)) {
                    RuleOutcome::Satisfied
                } else {
                    RuleOutcome::Violated(format!(
                        "{} supports {} {} {} (got {})",
                        self.host.display_name(),
                        self.guest.as_str(),
                        noun,
                        allowed.join(", "),
                        value
                    ))
                }
            }
            (Comparison::Equals, SpecValue::Text(required), SpecValue::Text(value)) => {
                if same_text(required, value) {
                    RuleOutcome::Satisfied
                } else {
                    RuleOutcome::Violated(format!("Requires {} {} (got {})", noun, required, value))
                }
            }
            (Comparison::AtMost, SpecValue::Millimeters(max), SpecValue::Millimeters(value)) => {
                if value <= max {
                    RuleOutcome::Satisfied
                } else {
                    RuleOutcome::Violated(format!(
                        "{} {} {} mm exceeds {} maximum of {} mm",
                        self.guest.display_name(),
                        noun,
                        value,
                        self.host.as_str(),
                        max
                    ))
                }
            }
            _ => {
                log::warn!(
                    "Rule {:?} -> {:?} compares mismatched value shapes; skipping",
                    self.host_attribute,
                    self.guest_attribute
                );
                RuleOutcome::Skipped
            }
        }
    }
}

/// Rules for a pairing together with which side is the host.
///
/// Yields `(rule, parent_is_host)`.
pub fn rules_between(
    parent: Category,
    candidate: Category,
) -> impl Iterator<Item = (&'static AttributeRule, bool)> {
    RULES
        .iter()
        .filter(move |rule| rule.applies_to(parent, candidate))
        .map(move |rule| (rule, rule.host == parent && rule.guest == candidate))
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
