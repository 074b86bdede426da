use crate::shared::*;

fn item(item_id: &str, weight: u32, quantity: (u32, u32)) -> ItemSpawnEntry {
    ItemSpawnEntry {
        item_id: item_id.into(),
        weight,
        quantity,
    }
}

fn species(id: &str, weight: u32) -> SpeciesSpawnEntry {
    SpeciesSpawnEntry {
        species: id.into(),
        weight,
    }
}

/// The homestead has no wildlife; every zone keeps a small herd.
const NO_WILDLIFE: PopulationRule = PopulationRule {
    first_count: (0, 0),
    repeat_count: (0, 0),
};

const ZONE_WILDLIFE: PopulationRule = PopulationRule {
    first_count: (5, 7),
    repeat_count: (3, 6),
};

/// Populate SpawnTables: ground loot and wildlife per scene.
///
/// No soils or fertilizers lie on the ground; those are crafted.
pub fn populate_spawn_tables(tables: &mut SpawnTables) {
    // Scene 1: homestead, generic agriculture
    tables.scenes.insert(
        1,
        SceneSpawnTable {
            items_rule: PopulationRule {
                first_count: (35, 50),
                repeat_count: (8, 16),
            },
            items: vec![
                item("leaves", 30, (1, 3)),
                item("wood_branch", 24, (1, 2)),
                item("rock", 18, (1, 2)),
                item("seed_corn", 12, (1, 2)),
                item("seed_spring_wheat", 12, (1, 2)),
                item("seed_carrot", 10, (1, 2)),
                item("seed_cabbage", 10, (1, 2)),
                item("log_small", 6, (1, 1)),
                item("rope_fiber", 4, (1, 2)),
                item("log", 3, (1, 1)),
                item("clay", 3, (1, 2)),
                item("honeycomb_fragment", 1, (1, 1)),
            ],
            wildlife_rule: NO_WILDLIFE,
            wildlife: Vec::new(),
        },
    );

    // Scene 2: Matanuska-Susitna Valley
    tables.scenes.insert(
        2,
        SceneSpawnTable {
            items_rule: PopulationRule {
                first_count: (40, 60),
                repeat_count: (10, 18),
            },
            items: vec![
                item("leaves", 26, (1, 3)),
                item("wood_branch", 20, (1, 2)),
                item("rock", 18, (1, 2)),
                item("seed_potato", 12, (1, 2)),
                item("seed_kale", 10, (1, 2)),
                item("seed_raspberry_ht", 7, (1, 1)),
                item("seed_spring_barley", 7, (1, 2)),
                item("seed_spring_wheat", 7, (1, 2)),
                item("log_small", 5, (1, 1)),
                item("ore_copper", 3, (1, 2)),
                item("ore_iron", 2, (1, 2)),
                item("ore_coal", 1, (1, 2)),
                item("log", 1, (1, 1)),
                item("honeycomb_fragment", 1, (1, 1)),
            ],
            wildlife_rule: ZONE_WILDLIFE,
            wildlife: vec![species("wolf", 3), species("duck", 3), species("cow", 1), species("pig", 1)],
        },
    );

    // Scene 3: Prairie Pothole Region
    tables.scenes.insert(
        3,
        SceneSpawnTable {
            items_rule: PopulationRule {
                first_count: (38, 56),
                repeat_count: (9, 17),
            },
            items: vec![
                item("leaves", 22, (1, 3)),
                item("rock", 18, (1, 2)),
                item("seed_canola", 12, (1, 2)),
                item("seed_field_pea", 12, (1, 2)),
                item("seed_spring_wheat", 10, (1, 2)),
                item("seed_sunflower", 10, (1, 2)),
                item("seed_malting_barley", 8, (1, 2)),
                item("seed_soy", 8, (1, 2)),
                item("wood_branch", 6, (1, 2)),
                item("log_small", 3, (1, 1)),
                item("clay", 2, (1, 2)),
                item("ore_iron", 2, (1, 2)),
                item("honeycomb_fragment", 1, (1, 1)),
            ],
            wildlife_rule: ZONE_WILDLIFE,
            wildlife: vec![species("cow", 3), species("pig", 2), species("duck", 3), species("wolf", 2)],
        },
    );

    // Scene 4: Leelanau Peninsula
    tables.scenes.insert(
        4,
        SceneSpawnTable {
            items_rule: PopulationRule {
                first_count: (40, 60),
                repeat_count: (10, 18),
            },
            items: vec![
                item("leaves", 24, (1, 3)),
                item("wood_branch", 18, (1, 2)),
                item("rock", 14, (1, 2)),
                item("seed_blueberry", 10, (1, 2)),
                item("seed_apple", 9, (1, 2)),
                item("seed_cold_hybrid_grape", 9, (1, 2)),
                item("seed_asparagus", 9, (1, 2)),
                item("seed_pickling_cucumber", 9, (1, 2)),
                item("seed_tart_cherry", 6, (1, 2)),
                item("log_small", 4, (1, 1)),
                item("clay", 3, (1, 2)),
                item("ore_iron", 2, (1, 2)),
                item("ore_copper", 1, (1, 2)),
                item("log", 1, (1, 1)),
                item("honeycomb_fragment", 1, (1, 1)),
            ],
            wildlife_rule: ZONE_WILDLIFE,
            wildlife: vec![species("duck", 3), species("pig", 2), species("cow", 2), species("wolf", 1)],
        },
    );
}

/// Removes table entries that name unknown items or carry zero weight,
/// returning one message per dropped entry.
pub fn validate_spawn_tables(
    tables: &mut SpawnTables,
    catalog: &ItemCatalog,
    species: &SpeciesBook,
) -> Vec<String> {
    let mut problems = Vec::new();
    for (scene_id, table) in tables.scenes.iter_mut() {
        table.items.retain(|entry| {
            let ok = catalog.contains(&entry.item_id) && entry.weight > 0 && entry.quantity.1 > 0;
            if !ok {
                problems.push(format!(
                    "scene {scene_id}: dropping ground item '{}' (unknown or zero weight/quantity)",
                    entry.item_id
                ));
            }
            ok
        });
        table.wildlife.retain(|entry| {
            let ok = species.species.contains_key(&entry.species) && entry.weight > 0;
            if !ok {
                problems.push(format!(
                    "scene {scene_id}: dropping species '{}' (unknown or zero weight)",
                    entry.species
                ));
            }
            ok
        });
    }
    problems
}
