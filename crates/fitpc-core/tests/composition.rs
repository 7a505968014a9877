use fitpc_core::placement::{MOTHERBOARD_UPRIGHT, PlacementKey, compose, rotate};
use fitpc_core::{
    Anchor, AnchorType, BuildSelection, Category, Part, PlacementConfig, Vector3,
    selection_from_parts,
};
use glam::DVec3;
use pretty_assertions::assert_eq;
use std::f64::consts::FRAC_PI_2;

const EPSILON: f64 = 1e-9;

fn assert_near(actual: DVec3, expected: DVec3) {
    assert!(
        (actual - expected).length() < EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

fn fixture() -> Vec<Part> {
    Part::list_from_json(
        r#"[
        {
            "id": 1, "name": "Mid Tower", "category": "case", "price": 89.99,
            "technical_specs": {"max_gpu_length_mm": 360},
            "anchor_points": [
                {"name": "mobo_mount_area", "label": "Motherboard Mount", "position": {"x": 0, "y": 5, "z": 0}},
                {"name": "psu_bay", "label": "PSU Bay", "position": {"x": 0, "y": -12, "z": 1}},
                {"name": "drive_bay_25", "label": "2.5\" Bay", "position": {"x": 4, "y": -8, "z": 0}}
            ]
        },
        {
            "id": 2, "name": "Z790 Board", "category": "motherboard", "price": 249.0,
            "technical_specs": {"socket": "LGA1700", "ram_type": "DDR5", "form_factor": "ATX"},
            "anchor_points": [
                {"name": "mobo_backplate", "label": "Backplate", "position": {"x": 0, "y": 0, "z": 0}},
                {"name": "cpu_socket", "label": "CPU Socket", "position": {"x": 2, "y": 0, "z": 0}},
                {"name": "pcie_x16", "label": "PCIe x16 Slot 1", "position": {"x": 0, "y": -4, "z": 0}},
                {"name": "ram_slot", "label": "RAM Slot 3", "position": {"x": 5, "y": 0, "z": 0}},
                {"name": "ram_slot", "label": "RAM Slot 1", "position": {"x": 4, "y": 0, "z": 0}},
                {"name": "ram_slot", "label": "RAM Slot 4", "position": {"x": 5.5, "y": 0, "z": 0}},
                {"name": "ram_slot", "label": "RAM Slot 2", "position": {"x": 4.5, "y": 0, "z": 0}}
            ]
        },
        {
            "id": 3, "name": "Core i7", "category": "cpu", "price": 399.0,
            "technical_specs": {"socket": "LGA1700"},
            "anchor_points": [
                {"name": "cpu_bottom", "label": "CPU Contact", "position": {"x": 0, "y": 0, "z": 0}},
                {"name": "cooler_plate", "label": "Cooler Plate", "position": {"x": 0, "y": 0.5, "z": 0}}
            ]
        },
        {
            "id": 4, "name": "DDR5 16GB", "category": "ram", "price": 59.0,
            "technical_specs": {"type": "DDR5"},
            "anchor_points": [
                {"name": "ram_edge", "label": "RAM Edge", "position": {"x": 0, "y": 0, "z": 0}}
            ]
        },
        {
            "id": 5, "name": "850W", "category": "psu", "price": 129.0,
            "anchor_points": [
                {"name": "psu_mount", "label": "PSU Mount", "position": {"x": 0, "y": 0, "z": 0}}
            ]
        },
        {
            "id": 6, "name": "SATA SSD", "category": "storage", "price": 79.0,
            "technical_specs": {"interface": "SATA"},
            "anchor_points": [
                {"name": "drive_mount", "label": "Drive Mount", "position": {"x": 0, "y": 0, "z": 0}}
            ]
        }
    ]"#,
    )
    .unwrap()
}

fn by_category(parts: &[Part], category: Category) -> &Part {
    parts.iter().find(|p| p.category == category).unwrap()
}

fn by_category_mut(parts: &mut [Part], category: Category) -> &mut Part {
    parts.iter_mut().find(|p| p.category == category).unwrap()
}

fn cooler() -> Part {
    Part::new(7, "Tower Cooler", Category::CpuCooler)
        .with_anchors(vec![Anchor::new(AnchorType::CoolerBase, "Cooler Base").at(0.0, -0.2, 0.0)])
}

fn gpu() -> Part {
    Part::new(8, "RTX", Category::Gpu)
        .with_anchors(vec![Anchor::new(AnchorType::PcieEdge, "PCIe Edge").at(0.0, 0.5, 0.0)])
}

#[test]
fn test_chain_composition() {
    let parts = fixture();
    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
        .with(Category::Cpu, by_category(&parts, Category::Cpu));

    let placements = compose(&selection, &PlacementConfig::default());

    let case = placements[&PlacementKey::single(Category::Case)];
    assert_eq!(case.position, DVec3::ZERO);

    let board = placements[&PlacementKey::single(Category::Motherboard)];
    assert_near(board.position, DVec3::new(0.0, 0.5, 0.0));
    assert_eq!(board.rotation, MOTHERBOARD_UPRIGHT);

    let cpu = placements[&PlacementKey::single(Category::Cpu)];
    assert_near(cpu.position, DVec3::new(0.2, 0.5, 0.0));
    assert_eq!(cpu.rotation, MOTHERBOARD_UPRIGHT);
}

#[test]
fn test_composition_is_deterministic() {
    let parts = fixture();
    let owned: Vec<(Part, u32)> = parts.iter().cloned().map(|p| (p, 2)).collect();
    let selection = selection_from_parts(&owned);
    let config = PlacementConfig::default();

    assert_eq!(compose(&selection, &config), compose(&selection, &config));
}

#[test]
fn test_ram_fills_slots_in_label_order() {
    let parts = fixture();
    let board = by_category(&parts, Category::Motherboard);
    let selection = BuildSelection::new()
        .with(Category::Motherboard, board)
        .with_quantity(Category::Ram, by_category(&parts, Category::Ram), 3);

    let placements = compose(&selection, &PlacementConfig::default());
    let board_transform = placements[&PlacementKey::single(Category::Motherboard)];
    let modules: Vec<DVec3> = (0..)
        .map_while(|i| placements.get(&PlacementKey::new(Category::Ram, i)))
        .map(|t| t.position)
        .collect();

    assert_eq!(modules.len(), 3);
    // Slots 1, 2, 3 sit at x = 4, 4.5, 5 on the board.
    for (module, x) in modules.iter().zip([4.0, 4.5, 5.0]) {
        assert_near(*module, board_transform.transform_point(DVec3::new(x * 0.1, 0.0, 0.0)));
    }
}

#[test]
fn test_ram_beyond_slot_count_is_distinct() {
    let parts = fixture();
    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
        .with_quantity(Category::Ram, by_category(&parts, Category::Ram), 6);

    let placements = compose(&selection, &PlacementConfig::default());
    let modules: Vec<DVec3> = placements
        .iter()
        .filter(|(key, _)| key.step == Category::Ram)
        .map(|(_, t)| t.position)
        .collect();

    assert_eq!(modules.len(), 6);
    for (i, a) in modules.iter().enumerate() {
        for b in &modules[i + 1..] {
            assert!((*a - *b).length() > EPSILON, "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn test_psu_fallback_without_bay() {
    let mut parts = fixture();
    let case = parts.iter_mut().find(|p| p.category == Category::Case).unwrap();
    case.anchors.retain(|a| a.kind != AnchorType::PsuBay);

    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Psu, by_category(&parts, Category::Psu));

    let placements = compose(&selection, &PlacementConfig::default());
    let psu = placements[&PlacementKey::single(Category::Psu)];
    assert_eq!(psu.position, DVec3::new(0.0, -1.5, 0.0));
    assert_eq!(psu.rotation, DVec3::ZERO);
}

#[test]
fn test_psu_uses_bay_when_present() {
    let parts = fixture();
    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Psu, by_category(&parts, Category::Psu));

    let placements = compose(&selection, &PlacementConfig::default());
    let psu = placements[&PlacementKey::single(Category::Psu)];
    assert_near(psu.position, DVec3::new(0.0, -1.2, 0.1));
}

#[test]
fn test_storage_falls_back_to_drive_bay() {
    let parts = fixture();
    // The board has no M.2 slot, so the drive goes into the case bay.
    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
        .with(Category::Storage, by_category(&parts, Category::Storage));

    let placements = compose(&selection, &PlacementConfig::default());
    let drive = placements[&PlacementKey::single(Category::Storage)];
    assert_near(drive.position, DVec3::new(0.4, -0.8, 0.0));
    assert_eq!(drive.rotation, DVec3::ZERO);
}

#[test]
fn test_unit_scale_from_config() {
    let parts = fixture();
    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Psu, by_category(&parts, Category::Psu));
    let config = PlacementConfig::from_json(r#"{"unit_scale": 0.01}"#).unwrap();

    let placements = compose(&selection, &config);
    let psu = placements[&PlacementKey::single(Category::Psu)];
    assert_near(psu.position, DVec3::new(0.0, -0.12, 0.01));
}

#[test]
fn test_cooler_sits_on_cpu_plate() {
    let parts = fixture();
    let cooler = cooler();
    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
        .with(Category::Cpu, by_category(&parts, Category::Cpu))
        .with(Category::CpuCooler, &cooler);

    let placements = compose(&selection, &PlacementConfig::default());
    let placed = placements[&PlacementKey::single(Category::CpuCooler)];
    // Plate at (0, 0.05, 0) on the upright CPU, base 0.02 below the cooler origin.
    assert_near(placed.position, DVec3::new(0.2, 0.5, -0.07));
    assert_eq!(placed.rotation, MOTHERBOARD_UPRIGHT);
}

#[test]
fn test_gpu_in_pcie_slot() {
    let mut parts = fixture();
    let gpu = gpu();

    let placements = compose(
        &BuildSelection::new()
            .with(Category::Case, by_category(&parts, Category::Case))
            .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
            .with(Category::Gpu, &gpu),
        &PlacementConfig::default(),
    );
    let placed = placements[&PlacementKey::single(Category::Gpu)];
    assert_near(placed.position, DVec3::new(0.0, 0.5, 0.45));
    assert_eq!(placed.rotation, MOTHERBOARD_UPRIGHT);

    let board = by_category_mut(&mut parts, Category::Motherboard);
    let slot = board.anchors.iter_mut().find(|a| a.kind == AnchorType::PcieX16).unwrap();
    slot.rotation = Vector3::new(0.0, 0.0, FRAC_PI_2);

    let placements = compose(
        &BuildSelection::new()
            .with(Category::Case, by_category(&parts, Category::Case))
            .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
            .with(Category::Gpu, &gpu),
        &PlacementConfig::default(),
    );
    let placed = placements[&PlacementKey::single(Category::Gpu)];
    let expected_rotation = DVec3::new(-FRAC_PI_2, 0.0, FRAC_PI_2);
    assert_eq!(placed.rotation, expected_rotation);
    let edge = rotate(DVec3::new(0.0, 0.05, 0.0), expected_rotation);
    assert_near(placed.position, DVec3::new(0.0, 0.5, 0.4) - edge);
}

#[test]
fn test_storage_prefers_m2_slot() {
    let mut parts = fixture();
    by_category_mut(&mut parts, Category::Motherboard)
        .anchors
        .push(Anchor::new(AnchorType::M2Slot, "M.2 Slot").at(3.0, -2.0, 0.0));
    by_category_mut(&mut parts, Category::Storage)
        .anchors
        .push(Anchor::new(AnchorType::M2Edge, "M.2 Edge"));

    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
        .with(Category::Storage, by_category(&parts, Category::Storage));

    let placements = compose(&selection, &PlacementConfig::default());
    let drive = placements[&PlacementKey::single(Category::Storage)];
    assert_near(drive.position, DVec3::new(0.3, 0.5, 0.2));
    assert_eq!(drive.rotation, MOTHERBOARD_UPRIGHT);
}

#[test]
fn test_cpu_fallback_without_socket() {
    let mut parts = fixture();
    by_category_mut(&mut parts, Category::Motherboard)
        .anchors
        .retain(|a| a.kind != AnchorType::CpuSocket);

    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
        .with(Category::Cpu, by_category(&parts, Category::Cpu));

    let placements = compose(&selection, &PlacementConfig::default());
    let board = placements[&PlacementKey::single(Category::Motherboard)];
    let cpu = placements[&PlacementKey::single(Category::Cpu)];
    assert_near(cpu.position, board.transform_point(DVec3::new(0.0, 0.1, 0.0)));
    assert_near(cpu.position, DVec3::new(0.0, 0.5, -0.1));
    assert_eq!(cpu.rotation, MOTHERBOARD_UPRIGHT);
}

#[test]
fn test_cooler_fallback_without_plate() {
    let mut parts = fixture();
    by_category_mut(&mut parts, Category::Cpu)
        .anchors
        .retain(|a| a.kind != AnchorType::CoolerPlate);
    let cooler = cooler();

    let selection = BuildSelection::new()
        .with(Category::Case, by_category(&parts, Category::Case))
        .with(Category::Motherboard, by_category(&parts, Category::Motherboard))
        .with(Category::Cpu, by_category(&parts, Category::Cpu))
        .with(Category::CpuCooler, &cooler);

    let placements = compose(&selection, &PlacementConfig::default());
    let cpu = placements[&PlacementKey::single(Category::Cpu)];
    let placed = placements[&PlacementKey::single(Category::CpuCooler)];
    assert_near(placed.position, cpu.transform_point(DVec3::new(0.0, 0.1, 0.0)));
    assert_near(placed.position, DVec3::new(0.2, 0.5, -0.1));
    assert_eq!(placed.rotation, MOTHERBOARD_UPRIGHT);
}
