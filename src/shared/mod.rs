//! Shared components, resources, events, and states for Aeterna.
//!
//! This is the type contract. Every domain plugin imports from here.
//! Domains reach into each other only for the world geometry (`world::Scene`).

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod inventory;

pub use inventory::{HeldStack, Inventory, ItemStack, SlotRecord};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn from_index(index: u32) -> Self {
        match index % SEASONS_PER_YEAR {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

/// Continuous in-game time. One day lasts `seconds_per_day` real seconds.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameClock {
    pub elapsed: f64,
    seconds_per_day: f64,
    pub paused: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDS_PER_DAY)
    }
}

impl GameClock {
    pub fn new(seconds_per_day: f64) -> Self {
        Self {
            elapsed: 0.0,
            seconds_per_day: seconds_per_day.max(1.0),
            paused: false,
        }
    }

    pub fn seconds_per_day(&self) -> f64 {
        self.seconds_per_day
    }

    pub fn set_seconds_per_day(&mut self, seconds: f64) {
        self.seconds_per_day = seconds.max(1.0);
    }

    pub fn advance(&mut self, dt: f64) {
        if !self.paused && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// Fraction of the current day in `[0, 1)`.
    pub fn day_fraction(&self) -> f64 {
        (self.elapsed % self.seconds_per_day) / self.seconds_per_day
    }

    /// 1-based day counter.
    pub fn day(&self) -> u32 {
        (self.elapsed / self.seconds_per_day).floor() as u32 + 1
    }

    pub fn time_hhmm(&self) -> String {
        let total_minutes = (self.day_fraction() * 24.0 * 60.0) as u32;
        format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
    }

    pub fn season(&self) -> Season {
        Self::season_of_day(self.day())
    }

    pub fn season_of_day(day: u32) -> Season {
        Season::from_index(day.saturating_sub(1) / DAYS_PER_SEASON)
    }

    /// Skips ahead a night's sleep.
    pub fn sleep(&mut self) {
        self.elapsed += self.seconds_per_day * SLEEP_HOURS / 24.0;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct PlayerState {
    /// Top-left corner of the player's collision box in scene coordinates.
    pub position: Vec2,
    pub size: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: 28.0,
            speed: 160.0,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            stamina: MAX_STAMINA,
            max_stamina: MAX_STAMINA,
        }
    }
}

impl PlayerState {
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size * 0.5)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Per-frame intent written by whatever drives the player (keyboard layer,
/// scripted test, replay). The simulation never polls devices itself.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub sprint: bool,
    /// One-shot: cleared at the end of every frame.
    pub attack: bool,
    /// One-shot: cleared at the end of every frame.
    pub interact: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS
// ═══════════════════════════════════════════════════════════════════════

/// String key into the item catalog.
pub type ItemId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub tint: [u8; 3],
    pub stackable: bool,
    pub max_stack: u32,
}

impl ItemDef {
    /// Units one slot can hold. Non-stackable items always occupy one per slot.
    pub fn slot_capacity(&self) -> u32 {
        if self.stackable {
            self.max_stack.max(1)
        } else {
            1
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemCatalog {
    pub items: HashMap<ItemId, ItemDef>,
}

impl ItemCatalog {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn insert(&mut self, def: ItemDef) {
        self.items.insert(def.id.clone(), def);
    }

    pub fn max_stack(&self, id: &str) -> Option<u32> {
        self.get(id).map(ItemDef::slot_capacity)
    }

    pub fn is_stackable(&self, id: &str) -> bool {
        self.get(id).is_some_and(|def| def.stackable && def.max_stack > 1)
    }

    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|def| def.name.as_str()).unwrap_or(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RECIPES — crafting, smelting, fuel
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingRecipe {
    pub id: String,
    pub result: ItemId,
    pub result_qty: u32,
    pub ingredients: Vec<(ItemId, u32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmeltingRecipe {
    pub input: ItemId,
    pub output: ItemId,
    pub output_qty: u32,
    /// Seconds of burning needed to turn one input unit into output.
    pub seconds: f32,
}

/// Static production tables, validated against the catalog at load time.
#[derive(Resource, Debug, Clone, Default)]
pub struct RecipeBook {
    pub crafting: HashMap<String, CraftingRecipe>,
    pub smelting: HashMap<ItemId, SmeltingRecipe>,
    /// Burn seconds supplied by one unit of each fuel.
    pub fuels: HashMap<ItemId, f32>,
}

impl RecipeBook {
    pub fn recipe(&self, id: &str) -> Option<&CraftingRecipe> {
        self.crafting.get(id)
    }

    pub fn smelting_for(&self, input: &str) -> Option<&SmeltingRecipe> {
        self.smelting.get(input)
    }

    pub fn fuel_seconds(&self, fuel: &str) -> Option<f32> {
        self.fuels.get(fuel).copied()
    }

    /// Drops every entry that references an item missing from the catalog
    /// (or has a non-positive quantity/duration) and returns one message per
    /// rejected entry.
    pub fn validate(&mut self, catalog: &ItemCatalog) -> Vec<String> {
        let mut problems = Vec::new();

        self.crafting.retain(|id, recipe| {
            if !catalog.contains(&recipe.result) {
                problems.push(format!("recipe '{id}': unknown result '{}'", recipe.result));
                return false;
            }
            if recipe.result_qty == 0 || recipe.ingredients.is_empty() {
                problems.push(format!("recipe '{id}': empty result or ingredient list"));
                return false;
            }
            for (item, qty) in &recipe.ingredients {
                if !catalog.contains(item) || *qty == 0 {
                    problems.push(format!("recipe '{id}': bad ingredient '{item}' x{qty}"));
                    return false;
                }
            }
            true
        });

        self.smelting.retain(|input, recipe| {
            let ok = catalog.contains(input)
                && catalog.contains(&recipe.output)
                && recipe.output_qty > 0
                && recipe.seconds > 0.0;
            if !ok {
                problems.push(format!(
                    "smelting '{input}' -> '{}': unknown item or bad amounts",
                    recipe.output
                ));
            }
            ok
        });

        self.fuels.retain(|fuel, seconds| {
            let ok = catalog.contains(fuel) && *seconds > 0.0;
            if !ok {
                problems.push(format!("fuel '{fuel}': unknown item or non-positive burn time"));
            }
            ok
        });

        problems
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN ECONOMY — population policy shared by ground items and wildlife
// ═══════════════════════════════════════════════════════════════════════

/// Population targets for one scene: a generous first visit, small
/// replenishment afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRule {
    pub first_count: (u32, u32),
    pub repeat_count: (u32, u32),
}

impl PopulationRule {
    /// How many members to add on entering a scene that has been visited
    /// `visited_count` times and currently holds `existing` members.
    pub fn top_up(&self, visited_count: u32, existing: u32, rng: &mut impl Rng) -> u32 {
        if visited_count == 0 {
            return uniform_count(self.first_count, rng);
        }
        let (repeat_min, repeat_max) = ordered(self.repeat_count);
        if existing >= repeat_min {
            return 0;
        }
        uniform_count(
            (repeat_min - existing, repeat_max.saturating_sub(existing)),
            rng,
        )
    }
}

fn ordered((a, b): (u32, u32)) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Uniform integer in the inclusive range, tolerating reversed bounds.
pub fn uniform_count(range: (u32, u32), rng: &mut impl Rng) -> u32 {
    let (lo, hi) = ordered(range);
    rng.gen_range(lo..=hi)
}

/// Weighted draw: probability of each entry is `weight / total_weight`.
/// Returns `None` when the table is empty or every weight is zero.
pub fn weighted_pick<'a, T>(
    entries: &'a [T],
    weight: impl Fn(&T) -> u32,
    rng: &mut impl Rng,
) -> Option<&'a T> {
    let total: u64 = entries.iter().map(|e| weight(e) as u64).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for entry in entries {
        let w = weight(entry) as u64;
        if roll < w {
            return Some(entry);
        }
        roll -= w;
    }
    None
}

/// Per-scene persistent population with its visit counter.
#[derive(Debug, Clone)]
pub struct ScenePopulation<T> {
    pub visited_count: u32,
    pub members: Vec<T>,
}

impl<T> Default for ScenePopulation<T> {
    fn default() -> Self {
        Self {
            visited_count: 0,
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpawnEntry {
    pub item_id: ItemId,
    pub weight: u32,
    pub quantity: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesSpawnEntry {
    pub species: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSpawnTable {
    pub items_rule: PopulationRule,
    pub items: Vec<ItemSpawnEntry>,
    pub wildlife_rule: PopulationRule,
    pub wildlife: Vec<SpeciesSpawnEntry>,
}

impl SceneSpawnTable {
    /// Seed ids that may be planted in this scene: every `seed_*` item the
    /// scene can drop on the ground.
    pub fn allowed_seeds(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .map(|entry| entry.item_id.as_str())
            .filter(|id| id.starts_with("seed_"))
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnTables {
    pub scenes: HashMap<SceneId, SceneSpawnTable>,
}

impl SpawnTables {
    pub fn get(&self, scene: SceneId) -> Option<&SceneSpawnTable> {
        self.scenes.get(&scene)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WILDLIFE SPECIES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSpec {
    pub id: String,
    pub speed: f32,
    pub wander_speed: f32,
    pub max_hp: f32,
    pub damage: f32,
    pub detect_range: f32,
    pub attack_range: f32,
    pub hit_cooldown: f32,
    /// Body diameter; widens hit tests beyond the centre point.
    pub size: f32,
}

impl SpeciesSpec {
    /// Minimal passive animal used when a species id is unknown.
    pub fn fallback(id: &str) -> Self {
        Self {
            id: id.to_string(),
            speed: 60.0,
            wander_speed: 30.0,
            max_hp: 60.0,
            damage: 0.0,
            detect_range: 0.0,
            attack_range: 0.0,
            hit_cooldown: 0.6,
            size: 32.0,
        }
    }

    pub fn is_hostile(&self) -> bool {
        self.damage > 0.0 && self.detect_range > 0.0
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SpeciesBook {
    pub species: HashMap<String, SpeciesSpec>,
}

impl SpeciesBook {
    pub fn get_or_fallback(&self, id: &str) -> SpeciesSpec {
        self.species
            .get(id)
            .cloned()
            .unwrap_or_else(|| SpeciesSpec::fallback(id))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RANDOMNESS & CONFIG
// ═══════════════════════════════════════════════════════════════════════

/// Single RNG stream for spawning and AI so seeded runs replay exactly.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub StdRng);

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Tunables read from `assets/config.ron` (or `AETERNA_CONFIG`).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub scene_width: f32,
    pub scene_height: f32,
    pub cell_size: f32,
    pub pickup_radius: f32,
    pub harvest_radius: f32,
    pub player_size: f32,
    pub player_speed: f32,
    pub attack_radius: f32,
    pub attack_damage: f32,
    pub attack_stamina_cost: f32,
    pub seconds_per_day: f64,
    pub inventory_rows: usize,
    pub inventory_cols: usize,
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scene_width: 1920.0,
            scene_height: 1088.0,
            cell_size: 48.0,
            pickup_radius: PICKUP_RADIUS,
            harvest_radius: HARVEST_RADIUS,
            player_size: 28.0,
            player_speed: 160.0,
            attack_radius: 40.0,
            attack_damage: 22.0,
            attack_stamina_cost: 16.0,
            seconds_per_day: DEFAULT_SECONDS_PER_DAY,
            inventory_rows: INVENTORY_ROWS,
            inventory_cols: INVENTORY_COLS,
            rng_seed: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Scenes are numbered from 1 in the order the world lists them.
pub type SceneId = u32;

/// Request to move the player into another scene.
#[derive(Event, Debug, Clone)]
pub struct SceneTransitionEvent {
    pub to_scene: SceneId,
}

/// Fired after the active scene changed; spawn domains top up on it.
#[derive(Event, Debug, Clone)]
pub struct SceneEnteredEvent {
    pub scene_id: SceneId,
}

#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Event, Debug, Clone)]
pub struct PlayerAttackEvent {
    pub center: Vec2,
    pub radius: f32,
    pub damage: f32,
}

#[derive(Event, Debug, Clone)]
pub struct PlayerDamageEvent {
    pub amount: f32,
    pub source: String,
}

#[derive(Event, Debug, Clone)]
pub struct AnimalKilledEvent {
    pub scene_id: SceneId,
    pub species: String,
    pub position: Vec2,
}

/// Drag gestures on the inventory grid.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryDragEvent {
    PickUp { slot: usize },
    Drop { slot: usize },
    Cancel,
}

#[derive(Event, Debug, Clone)]
pub struct SleepEvent;

// ═══════════════════════════════════════════════════════════════════════
// FRAME ORDER — every domain that touches the inventory runs in one of these
// ═══════════════════════════════════════════════════════════════════════

/// Inventory mutations within a frame happen in this order, so e.g. a
/// pickup never races a craft that was requested in the same frame.
/// Drag gestures settle first, before anything else reads the grid.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryPhase {
    Arrange,
    Collect,
    Craft,
    Gather,
    Plant,
}

/// Called once by the app builder.
pub fn configure_inventory_phases(app: &mut App) {
    app.configure_sets(
        Update,
        (
            InventoryPhase::Arrange,
            InventoryPhase::Collect,
            InventoryPhase::Craft,
            InventoryPhase::Gather,
            InventoryPhase::Plant,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    );
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const INVENTORY_ROWS: usize = 4;
pub const INVENTORY_COLS: usize = 10;

pub const PICKUP_RADIUS: f32 = 42.0;
pub const HARVEST_RADIUS: f32 = 34.0;

pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_STAMINA: f32 = 100.0;

pub const DEFAULT_SECONDS_PER_DAY: f64 = 300.0;
pub const SLEEP_HOURS: f64 = 8.0;
pub const DAYS_PER_SEASON: u32 = 30;
pub const SEASONS_PER_YEAR: u32 = 4;

/// Rejection-sampling budget when placing spawns inside a silhouette.
pub const SPAWN_PLACEMENT_ATTEMPTS: usize = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_reports_day_time_and_season() {
        let mut clock = GameClock::new(300.0);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.time_hhmm(), "00:00");
        clock.advance(150.0);
        assert_eq!(clock.time_hhmm(), "12:00");
        clock.advance(150.0);
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.season(), Season::Spring);

        clock.elapsed = 300.0 * 30.0;
        assert_eq!(clock.day(), 31);
        assert_eq!(clock.season(), Season::Summer);
        clock.elapsed = 300.0 * 120.0;
        assert_eq!(clock.season(), Season::Spring, "seasons wrap after a year");
    }

    #[test]
    fn sleeping_skips_eight_hours() {
        let mut clock = GameClock::new(240.0);
        clock.advance(60.0);
        assert_eq!(clock.time_hhmm(), "06:00");
        clock.sleep();
        assert_eq!(clock.elapsed, 140.0);
    }

    #[test]
    fn paused_clock_stands_still() {
        let mut clock = GameClock::default();
        clock.paused = true;
        clock.advance(10.0);
        assert_eq!(clock.elapsed, 0.0);
        assert_eq!(GameClock::new(0.0).seconds_per_day(), 1.0);
    }

    #[test]
    fn top_up_follows_first_and_repeat_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let rule = PopulationRule {
            first_count: (35, 50),
            repeat_count: (8, 16),
        };
        for _ in 0..50 {
            assert!((35..=50).contains(&rule.top_up(0, 0, &mut rng)));
            assert_eq!(rule.top_up(1, 8, &mut rng), 0);
            assert_eq!(rule.top_up(3, 40, &mut rng), 0);
            let n = rule.top_up(2, 5, &mut rng);
            assert!((3..=11).contains(&n), "{n}");
        }
    }

    #[test]
    fn weighted_pick_respects_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        let table = [("never", 0u32), ("rare", 1), ("common", 9)];
        let mut counts = HashMap::new();
        for _ in 0..10_000 {
            let (name, _) = weighted_pick(&table, |e| e.1, &mut rng).unwrap();
            *counts.entry(*name).or_insert(0u32) += 1;
        }
        assert!(!counts.contains_key("never"));
        assert!(counts["common"] > counts["rare"] * 6);

        let empty: [(&str, u32); 1] = [("zero", 0)];
        assert!(weighted_pick(&empty, |e| e.1, &mut rng).is_none());
    }

    #[test]
    fn unknown_species_gets_a_passive_fallback() {
        let book = SpeciesBook::default();
        let spec = book.get_or_fallback("yeti");
        assert_eq!(spec.id, "yeti");
        assert!(!spec.is_hostile());
        assert_eq!(spec.size, 32.0);
    }
}
