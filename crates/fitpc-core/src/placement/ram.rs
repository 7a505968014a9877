//! Memory module replication across motherboard slots.

use super::{PlacementKey, Placements, WorldTransform, attach, placed, rotate};
use crate::anchor::{Anchor, AnchorType};
use crate::build::BuildSelection;
use crate::config::PlacementConfig;
use crate::part::Category;
use crate::placement::edges::RAM_FALLBACK_OFFSET;
use glam::DVec3;

/// Motherboard slots ordered by label. Ties keep declaration order.
fn ordered_slots<'a>(board: impl Iterator<Item = &'a Anchor>) -> Vec<&'a Anchor> {
    let mut slots: Vec<&Anchor> = board.collect();
    slots.sort_by(|a, b| a.label.cmp(&b.label));
    slots
}

/// One transform per requested module.
///
/// Modules fill slots in label order. Modules beyond the slot count are laid
/// out along the board's X axis past the outermost slot, `ram_spacing` apart.
pub(super) fn place_modules(
    selection: &BuildSelection<'_>,
    placements: &Placements,
    config: &PlacementConfig,
) -> Placements {
    let mut modules = Placements::new();
    let Some(stick) = selection.part(Category::Ram) else {
        return modules;
    };
    let requested = selection.quantity(Category::Ram) as usize;
    let quantity = requested.min(config.max_ram_modules);
    if quantity < requested {
        log::warn!(
            "Requested {} memory modules; placing {}",
            requested,
            config.max_ram_modules
        );
    }
    let board_transform = placed(placements, Category::Motherboard);
    let connector = stick.find_anchor(AnchorType::RamEdge);

    let slots = selection
        .part(Category::Motherboard)
        .map(|board| ordered_slots(board.anchors_of(AnchorType::RamSlot)))
        .unwrap_or_default();

    for (instance, slot) in slots.iter().take(quantity).enumerate() {
        let transform = attach(&board_transform, slot, connector, DVec3::ZERO, config.unit_scale);
        modules.insert(PlacementKey::new(Category::Ram, instance), transform);
    }

    let extra = quantity.saturating_sub(slots.len());
    if extra == 0 {
        return modules;
    }
    log::debug!("{} memory modules exceed {} slots", extra, slots.len());

    let outermost = slots.iter().copied().max_by(|a, b| a.position.x.total_cmp(&b.position.x));
    let (base, first_step) = match outermost {
        Some(slot) => (
            attach(&board_transform, slot, connector, DVec3::ZERO, config.unit_scale),
            1.0,
        ),
        None => {
            log::warn!("No {} anchors on motherboard; using fallback placement for memory", AnchorType::RamSlot);
            (
                WorldTransform {
                    position: board_transform.transform_point(RAM_FALLBACK_OFFSET),
                    rotation: board_transform.rotation,
                },
                0.0,
            )
        }
    };

    for k in 0..extra {
        let offset = DVec3::X * config.ram_spacing * (first_step + k as f64);
        let transform = WorldTransform {
            position: base.position + rotate(offset, board_transform.rotation),
            rotation: base.rotation,
        };
        modules.insert(PlacementKey::new(Category::Ram, slots.len() + k), transform);
    }
    modules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::Part;
    use crate::placement::compose;

    fn board(labels: &[(&str, f64)]) -> Part {
        Part::new(1, "Board", Category::Motherboard).with_anchors(
            labels
                .iter()
                .map(|(label, x)| Anchor::new(AnchorType::RamSlot, *label).at(*x, 0.0, 0.0))
                .collect(),
        )
    }

    #[test]
    fn test_slots_sorted_by_label() {
        let board = board(&[("RAM Slot 3", 3.0), ("RAM Slot 1", 1.0), ("RAM Slot 2", 2.0)]);
        let slots = ordered_slots(board.anchors_of(AnchorType::RamSlot));
        let labels: Vec<&str> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["RAM Slot 1", "RAM Slot 2", "RAM Slot 3"]);
    }

    #[test]
    fn test_modules_without_board_use_fallback() {
        let stick = Part::new(2, "Stick", Category::Ram);
        let selection = BuildSelection::new().with_quantity(Category::Ram, &stick, 2);

        let placements = compose(&selection, &PlacementConfig::default());
        let first = placements[&PlacementKey::new(Category::Ram, 0)];
        let second = placements[&PlacementKey::new(Category::Ram, 1)];
        assert_eq!(first.position, RAM_FALLBACK_OFFSET);
        assert!((second.position - first.position - DVec3::new(0.15, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_quantity_is_capped() {
        let board = board(&[("RAM Slot 1", 1.0), ("RAM Slot 2", 2.0)]);
        let stick = Part::new(2, "Stick", Category::Ram);
        let selection = BuildSelection::new()
            .with(Category::Motherboard, &board)
            .with_quantity(Category::Ram, &stick, 4_000_000_000);
        let config = PlacementConfig::default();

        let placements = compose(&selection, &config);
        let ram = placements.keys().filter(|k| k.step == Category::Ram).count();
        assert_eq!(ram, config.max_ram_modules);
        assert!(placements.contains_key(&PlacementKey::new(Category::Ram, 31)));
    }

    #[test]
    fn test_single_module_by_default() {
        let board = board(&[("RAM Slot 1", 1.0), ("RAM Slot 2", 2.0)]);
        let stick = Part::new(2, "Stick", Category::Ram);
        let selection = BuildSelection::new()
            .with(Category::Motherboard, &board)
            .with(Category::Ram, &stick);

        let placements = compose(&selection, &PlacementConfig::default());
        let ram: Vec<_> = placements.keys().filter(|k| k.step == Category::Ram).collect();
        assert_eq!(ram.len(), 1);
    }
}
