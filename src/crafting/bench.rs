use bevy::prelude::*;
use crate::shared::*;

// ──────────────────────────────────────────────────────────────────────────────
// EVENTS
// ──────────────────────────────────────────────────────────────────────────────

/// Send to request crafting a recipe once.
#[derive(Event, Debug, Clone)]
pub struct CraftItemEvent {
    pub recipe_id: String,
}

/// Outcome of a CraftItemEvent, for whatever presents feedback.
#[derive(Event, Debug, Clone)]
pub struct CraftResultEvent {
    pub recipe_id: String,
    pub success: bool,
    pub message: String,
}

// ──────────────────────────────────────────────────────────────────────────────
// SYSTEMS
// ──────────────────────────────────────────────────────────────────────────────

pub fn handle_craft_item(
    mut events: EventReader<CraftItemEvent>,
    mut inventory: ResMut<Inventory>,
    book: Res<RecipeBook>,
    catalog: Res<ItemCatalog>,
    mut results: EventWriter<CraftResultEvent>,
    mut pickup_events: EventWriter<ItemPickupEvent>,
) {
    for event in events.read() {
        let recipe_id = &event.recipe_id;
        let Some(recipe) = book.recipe(recipe_id) else {
            warn!("[Crafting] Recipe '{}' not found", recipe_id);
            results.send(CraftResultEvent {
                recipe_id: recipe_id.clone(),
                success: false,
                message: format!("Unknown recipe: {}", recipe_id),
            });
            continue;
        };

        if !has_all_ingredients(&inventory, recipe) {
            let missing = missing_ingredients_description(&inventory, recipe);
            warn!("[Crafting] Cannot craft '{}': missing {}", recipe_id, missing);
            results.send(CraftResultEvent {
                recipe_id: recipe_id.clone(),
                success: false,
                message: format!("Missing materials: {}", missing),
            });
            continue;
        }

        if !craft_item(&book, recipe_id, &mut inventory, &catalog) {
            warn!("[Crafting] No room for the result of '{}'", recipe_id);
            results.send(CraftResultEvent {
                recipe_id: recipe_id.clone(),
                success: false,
                message: "Inventory is full!".to_string(),
            });
            continue;
        }

        pickup_events.send(ItemPickupEvent {
            item_id: recipe.result.clone(),
            quantity: recipe.result_qty,
        });

        let name = catalog.display_name(&recipe.result);
        let message = if recipe.result_qty > 1 {
            format!("Crafted {} x{}", name, recipe.result_qty)
        } else {
            format!("Crafted {}", name)
        };
        info!("[Crafting] {}", message);
        results.send(CraftResultEvent {
            recipe_id: recipe_id.clone(),
            success: true,
            message,
        });
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// HELPER FUNCTIONS
// ──────────────────────────────────────────────────────────────────────────────

/// Returns true if the inventory has every ingredient in the listed amount.
pub fn has_all_ingredients(inventory: &Inventory, recipe: &CraftingRecipe) -> bool {
    recipe
        .ingredients
        .iter()
        .all(|(item_id, qty)| inventory.has_item(item_id, *qty))
}

pub fn can_craft(book: &RecipeBook, recipe_id: &str, inventory: &Inventory) -> bool {
    book.recipe(recipe_id)
        .is_some_and(|recipe| has_all_ingredients(inventory, recipe))
}

/// Returns a human-readable list of missing ingredients.
pub fn missing_ingredients_description(inventory: &Inventory, recipe: &CraftingRecipe) -> String {
    recipe
        .ingredients
        .iter()
        .filter_map(|(item_id, qty)| {
            let have = inventory.count_item(item_id);
            (have < *qty).then(|| format!("{} (have {}/{})", item_id, have, qty))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Consumes the ingredients and adds the result, or changes nothing.
///
/// The whole transaction runs on a copy of the inventory which replaces the
/// real one only if every ingredient was removed in full and the result fit.
pub fn craft_item(
    book: &RecipeBook,
    recipe_id: &str,
    inventory: &mut Inventory,
    catalog: &ItemCatalog,
) -> bool {
    let Some(recipe) = book.recipe(recipe_id) else {
        return false;
    };

    let mut staged = inventory.clone();
    for (item_id, qty) in &recipe.ingredients {
        if staged.remove_item(item_id, *qty) < *qty {
            return false;
        }
    }
    if !staged.add_item(catalog, &recipe.result, recipe.result_qty) {
        return false;
    }

    *inventory = staged;
    true
}

/// Ids of every recipe craftable right now, sorted.
pub fn available_recipes<'a>(book: &'a RecipeBook, inventory: &Inventory) -> Vec<&'a str> {
    let mut ids: Vec<&str> = book
        .crafting
        .values()
        .filter(|recipe| has_all_ingredients(inventory, recipe))
        .map(|recipe| recipe.id.as_str())
        .collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build_registries;

    fn setup() -> (ItemCatalog, RecipeBook, Inventory) {
        let (catalog, book, ..) = build_registries();
        (catalog, book, Inventory::new(4, 10))
    }

    #[test]
    fn crafting_consumes_ingredients_and_adds_result() {
        let (catalog, book, mut inv) = setup();
        inv.add_item(&catalog, "log", 1);
        assert!(can_craft(&book, "planks", &inv));
        assert!(craft_item(&book, "planks", &mut inv, &catalog));
        assert_eq!(inv.count_item("log"), 0);
        assert_eq!(inv.count_item("planks"), 4);
    }

    #[test]
    fn missing_ingredient_changes_nothing() {
        let (catalog, book, mut inv) = setup();
        inv.add_item(&catalog, "wood_branch", 3);
        let before = inv.export_state();
        assert!(!can_craft(&book, "hoe_wood_improv", &inv));
        assert!(!craft_item(&book, "hoe_wood_improv", &mut inv, &catalog));
        assert_eq!(inv.export_state(), before);
        assert_eq!(
            missing_ingredients_description(&inv, book.recipe("hoe_wood_improv").unwrap()),
            "rope (have 0/1)"
        );
    }

    #[test]
    fn full_inventory_rolls_back_the_whole_craft() {
        let (catalog, book, _) = setup();
        let mut inv = Inventory::new(1, 2);
        inv.add_item(&catalog, "wood_branch", 3);
        inv.add_item(&catalog, "rope", 2);
        // Both slots stay occupied after consuming, so the hoe has nowhere to go.
        let before = inv.export_state();
        assert!(can_craft(&book, "hoe_wood_improv", &inv));
        assert!(!craft_item(&book, "hoe_wood_improv", &mut inv, &catalog));
        assert_eq!(inv.export_state(), before);
    }

    #[test]
    fn result_can_reuse_a_freed_slot() {
        let (catalog, book, _) = setup();
        let mut inv = Inventory::new(1, 2);
        inv.add_item(&catalog, "wood_branch", 3);
        inv.add_item(&catalog, "rope", 1);
        assert!(craft_item(&book, "hoe_wood_improv", &mut inv, &catalog));
        assert_eq!(inv.count_item("hoe_wood_improv"), 1);
        assert_eq!(inv.count_item("wood_branch"), 0);
    }

    #[test]
    fn unknown_recipe_is_rejected() {
        let (catalog, book, mut inv) = setup();
        assert!(!can_craft(&book, "time_machine", &inv));
        assert!(!craft_item(&book, "time_machine", &mut inv, &catalog));
    }

    #[test]
    fn available_recipes_tracks_inventory() {
        let (catalog, book, mut inv) = setup();
        assert!(available_recipes(&book, &inv).is_empty());
        inv.add_item(&catalog, "leaves", 10);
        assert_eq!(available_recipes(&book, &inv), vec!["rope", "rope_fiber"]);
    }
}
