//! Mission journal contents: the main story chapters, then side missions.

use super::journal::{Mission, Objective, ObjectiveKind};

fn mission(
    id: &str,
    title: &str,
    lore: &str,
    objectives: Vec<Objective>,
    rewards: &[(&str, u32)],
) -> Mission {
    Mission {
        id: id.to_string(),
        title: title.to_string(),
        lore: lore.to_string(),
        objectives,
        rewards: rewards
            .iter()
            .map(|(item_id, qty)| (item_id.to_string(), *qty))
            .collect(),
        completed: false,
        claimed: false,
    }
}

fn collect(item_id: &str, quantity: u32, label: &str) -> Objective {
    Objective {
        kind: ObjectiveKind::Collect {
            item_id: item_id.to_string(),
            quantity,
        },
        label: label.to_string(),
    }
}

fn travel(scene_ids: &[u32], visits: u32, label: &str) -> Objective {
    Objective {
        kind: ObjectiveKind::Travel {
            scene_ids: scene_ids.to_vec(),
            visits,
        },
        label: label.to_string(),
    }
}

fn seed_variety(kinds: u32, label: &str) -> Objective {
    Objective {
        kind: ObjectiveKind::SeedVariety { kinds },
        label: label.to_string(),
    }
}

/// Single-objective side mission.
fn side(id: &str, title: &str, lore: &str, objective: Objective, rewards: &[(&str, u32)]) -> Mission {
    mission(id, title, lore, vec![objective], rewards)
}

pub fn build_campaign() -> Vec<Mission> {
    vec![
        // ── Main story ──
        mission(
            "prologue_return",
            "Prologue: Re-entry",
            "You were chosen to return to Earth. Get your bearings, check the mission journal and report signs of survival.",
            vec![
                Objective {
                    kind: ObjectiveKind::OpenJournal,
                    label: "Open the mission journal".to_string(),
                },
                travel(&[1], 1, "Touch down at the Homestead"),
            ],
            &[("bucket_water", 1), ("seed_spring_wheat", 4)],
        ),
        mission(
            "first_steps",
            "Ch. 1: First steps",
            "Gather nearby resources for improvised tools. A rope opens up more recipes.",
            vec![
                collect("wood_branch", 6, "Gather 6 wood branches"),
                collect("leaves", 12, "Gather 12 leaves"),
                collect("rope", 1, "Craft 1 rope at the workbench"),
            ],
            &[("hoe_wood_improv", 1), ("rope_fiber", 2)],
        ),
        mission(
            "base_camp",
            "Ch. 2: Base camp",
            "To survive you need a safe spot. Build a bed and rest under a roof.",
            vec![
                collect("bed", 1, "Craft 1 bed"),
                Objective {
                    kind: ObjectiveKind::Sleep { count: 1 },
                    label: "Sleep in a cabin to save".to_string(),
                },
            ],
            &[("planks", 6), ("seed_corn", 6), ("bucket_water", 1)],
        ),
        mission(
            "survey_regions",
            "Ch. 3: Survey",
            "Assess habitability across ecoregions. Visit at least two regions beyond the Homestead.",
            vec![travel(&[2, 3, 4], 2, "Visit 2 different regions")],
            &[("glass", 2), ("jar_small", 1)],
        ),
        mission(
            "basic_production",
            "Ch. 4: Basic production",
            "Study material processing. Glass lets you store and analyse samples.",
            vec![
                collect("glass", 2, "Smelt 2 glass in the furnace"),
                collect("jar_small", 1, "Craft 1 small jar"),
            ],
            &[("bucket_water", 1), ("seed_spring_wheat", 6)],
        ),
        mission(
            "first_report",
            "Ch. 5: First report",
            "Show agricultural potential with a small seed bank.",
            vec![seed_variety(6, "Hold 6 different kinds of seed")],
            &[("fert_1", 8), ("basket", 1)],
        ),
        // ── Gathering ──
        side(
            "mini_leaves",
            "Useful leaves",
            "Leaves go into rope, beds and fuel.",
            collect("leaves", 20, "Gather 20 leaves"),
            &[("rope_fiber", 2), ("bucket_water", 1)],
        ),
        side(
            "mini_branches",
            "Branches for tools",
            "A basic kit starts with good branches.",
            collect("wood_branch", 12, "Gather 12 wood branches"),
            &[("planks", 2)],
        ),
        side(
            "mini_rocks",
            "Rocks and minerals",
            "Stone tool prototypes need rocks.",
            collect("rock", 8, "Gather 8 rocks"),
            &[("knife_stone", 1)],
        ),
        side(
            "mini_logs",
            "Spare logs",
            "More planks, more structures.",
            collect("log", 2, "Get 2 logs"),
            &[("planks", 6)],
        ),
        side(
            "mini_rope",
            "Handmade rope",
            "Twist leaves into rope to unlock recipes.",
            collect("rope", 2, "Craft 2 ropes"),
            &[("stake_wood", 4)],
        ),
        // ── Tools ──
        side(
            "mini_hoe",
            "Improvised hoe",
            "A simple hoe gets the soil ready.",
            collect("hoe_wood_improv", 1, "Craft 1 improvised hoe"),
            &[("fert_1", 4)],
        ),
        side(
            "mini_pick",
            "Improvised pick",
            "A pick gets you into minerals.",
            collect("pick_wood_improv", 1, "Craft 1 improvised pick"),
            &[("ore_copper", 2)],
        ),
        side(
            "mini_shovel",
            "Basic shovel",
            "A shovel rounds out the starter toolset.",
            collect("shovel_wood", 1, "Craft 1 wooden shovel"),
            &[("clay", 3)],
        ),
        side(
            "mini_knife",
            "Craft knife",
            "Cut and process with a simple blade.",
            collect("knife_wood", 1, "Craft 1 wooden knife"),
            &[("rope", 1)],
        ),
        // ── Furnace ──
        side(
            "mini_glass",
            "First glass",
            "Try smelting clay into glass.",
            collect("glass", 1, "Smelt 1 glass"),
            &[("glass", 1), ("jar_small", 1)],
        ),
        side(
            "mini_copper",
            "Refined copper",
            "Refine copper for better tools.",
            collect("copper_ingot", 1, "Smelt 1 copper ingot"),
            &[("ore_copper", 2)],
        ),
        side(
            "mini_iron",
            "Refined iron",
            "Refine iron for sturdy structures.",
            collect("iron_ingot", 1, "Smelt 1 iron ingot"),
            &[("ore_iron", 2)],
        ),
        // ── Stations ──
        side(
            "mini_workbench",
            "Workbench",
            "A workbench speeds everything up.",
            collect("workbench", 1, "Craft 1 workbench"),
            &[("rope", 1), ("planks", 4)],
        ),
        side(
            "mini_chest",
            "Wooden chest",
            "Store supplies for long expeditions.",
            collect("chest_wood", 1, "Craft 1 wooden chest"),
            &[("planks", 4)],
        ),
        side(
            "mini_candles",
            "Lighting",
            "Nights are less hostile with light.",
            collect("candle", 2, "Craft 2 candles"),
            &[("bucket_water", 1)],
        ),
        side(
            "mini_fert",
            "Better soil",
            "Prepare the ground with basic amendments.",
            collect("bone_meal", 2, "Craft 2 bone meal"),
            &[("fert_1", 6)],
        ),
        // ── Exploration ──
        side(
            "mini_visit_alaska",
            "Visit: Alaska",
            "Explore the boreal zone for cold samples.",
            travel(&[2], 1, "Visit Alaska"),
            &[("seed_potato", 2)],
        ),
        side(
            "mini_visit_ppr",
            "Visit: PPR",
            "Explore the prairie for grain crops.",
            travel(&[3], 1, "Visit the Prairie Pothole Region"),
            &[("seed_canola", 2)],
        ),
        side(
            "mini_visit_mich",
            "Visit: Michigan",
            "Explore the temperate region for fruit.",
            travel(&[4], 1, "Visit Michigan"),
            &[("seed_blueberry", 2)],
        ),
        // ── Seeds ──
        side(
            "mini_jars",
            "Sample jars",
            "Containers for soil and water analysis.",
            collect("jar_small", 2, "Craft 2 small jars"),
            &[("bucket_water", 1)],
        ),
        side(
            "mini_seeds_var4",
            "Mini seed bank",
            "Start the seed bank with minimal diversity.",
            seed_variety(4, "Hold 4 different kinds of seed"),
            &[("fert_1", 4)],
        ),
        side(
            "mini_basket",
            "Hand transport",
            "A basket helps carry resources and harvests.",
            collect("basket", 1, "Craft 1 basket"),
            &[("bucket_water", 1), ("rope", 1)],
        ),
    ]
}
