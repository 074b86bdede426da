//! Data layer — populates all registries at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading). It reads the tunables,
//! fills every registry (ItemCatalog, RecipeBook, SpeciesBook, SpawnTables)
//! from the hard-coded design data in the submodules, validates
//! cross-references against the catalog, then moves to GameState::Playing.
//!
//! Invalid table entries are logged and dropped here so no domain has to
//! cope with a dangling item id at use time.

pub mod config;
mod items;
mod recipes;
mod spawn_tables;
mod species;

use bevy::prelude::*;
use crate::shared::*;

pub use items::populate_items;
pub use recipes::populate_recipes;
pub use spawn_tables::{populate_spawn_tables, validate_spawn_tables};
pub use species::populate_species;

/// What a fresh game starts with in the pack.
pub const STARTER_KIT: &[(&str, u32)] = &[
    ("seed_corn", 10),
    ("seed_potato", 6),
    ("bucket_water", 1),
    ("fert_1", 8),
    ("wood_branch", 10),
    ("leaves", 20),
    ("log", 3),
];

/// A fresh game opens at this hour of day one.
pub const WAKE_HOUR: f64 = 6.0;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Fills catalog, recipe book, species and spawn tables into fresh resources.
/// Shared with tests and tools that need the real data without an App.
pub fn build_registries() -> (ItemCatalog, RecipeBook, SpeciesBook, SpawnTables, Vec<String>) {
    let mut catalog = ItemCatalog::default();
    let mut book = RecipeBook::default();
    let mut species = SpeciesBook::default();
    let mut tables = SpawnTables::default();

    populate_items(&mut catalog);
    populate_recipes(&mut book);
    populate_species(&mut species);
    populate_spawn_tables(&mut tables);

    let mut problems = book.validate(&catalog);
    problems.extend(validate_spawn_tables(&mut tables, &catalog, &species));
    (catalog, book, species, tables, problems)
}

/// Single system that populates every registry, applies the tunables and
/// then transitions to Playing.
#[allow(clippy::too_many_arguments)]
fn load_all_data(
    mut sim_config: ResMut<SimConfig>,
    mut item_catalog: ResMut<ItemCatalog>,
    mut recipe_book: ResMut<RecipeBook>,
    mut species_book: ResMut<SpeciesBook>,
    mut spawn_tables: ResMut<SpawnTables>,
    mut rng: ResMut<SimRng>,
    mut clock: ResMut<GameClock>,
    mut inventory: ResMut<Inventory>,
    mut player: ResMut<PlayerState>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    *sim_config = config::load_config();
    if let Some(seed) = sim_config.rng_seed {
        *rng = SimRng::seeded(seed);
        info!("  RNG seeded with {}", seed);
    }
    clock.set_seconds_per_day(sim_config.seconds_per_day);
    clock.elapsed = clock.seconds_per_day() * WAKE_HOUR / 24.0;
    *inventory = Inventory::new(sim_config.inventory_rows, sim_config.inventory_cols);
    player.size = sim_config.player_size;
    player.speed = sim_config.player_speed;

    let (catalog, book, species, tables, problems) = build_registries();
    for problem in &problems {
        warn!("  Rejected table entry: {}", problem);
    }

    *item_catalog = catalog;
    info!("  Items loaded: {}", item_catalog.items.len());
    for (item_id, qty) in STARTER_KIT {
        if !inventory.add_item(&item_catalog, item_id, *qty) {
            warn!("  Starter item {} x{} did not fit", item_id, qty);
        }
    }

    *recipe_book = book;
    info!(
        "  Recipes loaded: {} crafting, {} smelting, {} fuels",
        recipe_book.crafting.len(),
        recipe_book.smelting.len(),
        recipe_book.fuels.len()
    );

    *species_book = species;
    info!("  Species loaded: {}", species_book.species.len());

    *spawn_tables = tables;
    info!("  Spawn tables loaded: {} scenes", spawn_tables.scenes.len());

    info!("DataPlugin: all registries populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}
