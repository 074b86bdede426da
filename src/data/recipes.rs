use crate::shared::*;

fn craft(id: &str, result: &str, result_qty: u32, ingredients: &[(&str, u32)]) -> CraftingRecipe {
    CraftingRecipe {
        id: id.into(),
        result: result.into(),
        result_qty,
        ingredients: ingredients
            .iter()
            .map(|&(item, qty)| (item.to_string(), qty))
            .collect(),
    }
}

fn smelt(input: &str, output: &str, output_qty: u32, seconds: f32) -> SmeltingRecipe {
    SmeltingRecipe {
        input: input.into(),
        output: output.into(),
        output_qty,
        seconds,
    }
}

/// Populate the RecipeBook with the workbench, furnace and fuel tables.
///
/// Recipe ids equal the result id except where two recipes share a result
/// (`planks` from a full log vs `planks_from_log_small`).
pub fn populate_recipes(book: &mut RecipeBook) {
    let crafting = vec![
        // ── Processing ───────────────────────────────────────────────
        craft("planks", "planks", 4, &[("log", 1)]),
        craft("planks_from_log_small", "planks", 2, &[("log_small", 1)]),
        craft("rope", "rope", 1, &[("leaves", 10)]),
        craft("rope_fiber", "rope_fiber", 1, &[("leaves", 8)]),
        craft("stake_wood", "stake_wood", 4, &[("wood_branch", 2)]),
        craft("bone_meal", "bone_meal", 2, &[("bone", 1)]),
        craft("fert_1", "fert_1", 1, &[("bone_meal", 2), ("leaves", 5)]),
        craft("candle", "candle", 2, &[("honeycomb_fragment", 1), ("rope_fiber", 1)]),
        // ── Tools ────────────────────────────────────────────────────
        craft("hoe_wood_improv", "hoe_wood_improv", 1, &[("wood_branch", 3), ("rope", 1)]),
        craft("pick_wood_improv", "pick_wood_improv", 1, &[("wood_branch", 3), ("rope", 1)]),
        craft("shovel_wood", "shovel_wood", 1, &[("wood_branch", 2), ("planks", 1)]),
        craft("knife_wood", "knife_wood", 1, &[("wood_branch", 1), ("planks", 1)]),
        craft("rake_wood", "rake_wood", 1, &[("wood_branch", 2), ("rope", 1)]),
        craft("knife_stone", "knife_stone", 1, &[("rock", 2), ("rope", 1)]),
        craft("shovel_stone", "shovel_stone", 1, &[("rock", 2), ("wood_branch", 1)]),
        craft("basket", "basket", 1, &[("wood_branch", 6), ("rope", 2)]),
        craft("wheelbarrow", "wheelbarrow", 1, &[("planks", 4), ("iron_ingot", 2), ("rope", 1)]),
        // ── Containers ───────────────────────────────────────────────
        craft("bowl_wood", "bowl_wood", 1, &[("planks", 2)]),
        craft("bowl_stone", "bowl_stone", 1, &[("rock", 3)]),
        craft("jar_small", "jar_small", 1, &[("glass", 2)]),
        craft("jar_medium", "jar_medium", 1, &[("glass", 3)]),
        craft("jar_large", "jar_large", 1, &[("glass", 4)]),
        // ── Furniture ────────────────────────────────────────────────
        craft("chest_wood", "chest_wood", 1, &[("planks", 8)]),
        craft("workbench", "workbench", 1, &[("planks", 4), ("log", 2)]),
        craft("bed", "bed", 1, &[("planks", 6), ("leaves", 20)]),
    ];
    for recipe in crafting {
        book.crafting.insert(recipe.id.clone(), recipe);
    }

    let smelting = vec![
        smelt("ore_iron", "iron_ingot", 1, 20.0),
        smelt("ore_copper", "copper_ingot", 1, 18.0),
        smelt("ore_steel", "steel_ingot", 1, 25.0),
        smelt("clay", "glass", 1, 15.0),
        smelt("rock", "glass", 1, 30.0),
        // Cooking: same id out, the cut is simply done.
        smelt("meat_chicken_breast", "meat_chicken_breast", 1, 10.0),
        smelt("meat_beef_steak", "meat_beef_steak", 1, 12.0),
        smelt("meat_pork_chop", "meat_pork_chop", 1, 11.0),
        smelt("meat_fish_fillet", "meat_fish_fillet", 1, 8.0),
        smelt("honeycomb", "honeycomb_fragment", 4, 5.0),
    ];
    for recipe in smelting {
        book.smelting.insert(recipe.input.clone(), recipe);
    }

    for (fuel, seconds) in [
        ("leaves", 5.0),
        ("wood_branch", 8.0),
        ("planks", 12.0),
        ("log_small", 15.0),
        ("log", 25.0),
        ("ore_coal", 40.0),
        ("carbon_element", 50.0),
    ] {
        book.fuels.insert(fuel.to_string(), seconds);
    }
}
