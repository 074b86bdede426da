use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::shared::*;

// ──────────────────────────────────────────────────────────────────────────────
// FURNACE STATE MACHINE
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FurnacePhase {
    Idle,
    Processing,
}

/// A single smelting station.
///
/// Loads one input id and one fuel id at a time. Finished goods collect in
/// an internal output buffer until taken with `collect_output`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Furnace {
    pub input_item: Option<ItemId>,
    pub input_qty: u32,
    pub fuel_item: Option<ItemId>,
    pub fuel_qty: u32,
    pub output_item: Option<ItemId>,
    pub output_qty: u32,
    pub fuel_time_remaining: f32,
    /// Full burn time of the fuel unit currently alight.
    pub fuel_unit_seconds: f32,
    pub process_time_elapsed: f32,
    pub process_time_needed: f32,
    pub is_processing: bool,
}

impl Furnace {
    pub fn phase(&self) -> FurnacePhase {
        if self.is_processing {
            FurnacePhase::Processing
        } else {
            FurnacePhase::Idle
        }
    }

    /// Moves one unit of a smeltable item from the inventory into the input.
    pub fn add_input(&mut self, book: &RecipeBook, inventory: &mut Inventory, item_id: &str) -> bool {
        if book.smelting_for(item_id).is_none() {
            return false;
        }
        if self.input_item.as_deref().is_some_and(|loaded| loaded != item_id) {
            return false;
        }
        if inventory.remove_item(item_id, 1) == 0 {
            return false;
        }
        self.input_item = Some(item_id.to_string());
        self.input_qty += 1;
        true
    }

    /// Moves one unit of fuel from the inventory into the fuel slot.
    pub fn add_fuel(&mut self, book: &RecipeBook, inventory: &mut Inventory, item_id: &str) -> bool {
        if book.fuel_seconds(item_id).is_none() {
            return false;
        }
        if self.fuel_item.as_deref().is_some_and(|loaded| loaded != item_id) {
            return false;
        }
        if inventory.remove_item(item_id, 1) == 0 {
            return false;
        }
        self.fuel_item = Some(item_id.to_string());
        self.fuel_qty += 1;
        true
    }

    /// Moves the whole output buffer into the inventory, or nothing if it
    /// would not fit.
    pub fn collect_output(&mut self, inventory: &mut Inventory, catalog: &ItemCatalog) -> bool {
        let Some(output) = self.output_item.as_deref() else {
            return false;
        };
        if self.output_qty == 0 || !inventory.can_fit(catalog, output, self.output_qty) {
            return false;
        }
        if !inventory.add_item(catalog, output, self.output_qty) {
            return false;
        }
        self.output_item = None;
        self.output_qty = 0;
        true
    }

    /// Advances the furnace by `dt` seconds. Returns the (item, qty) produced
    /// during this tick, if any.
    ///
    /// Fuel burns and progress accrues only while processing, and progress
    /// survives running out of fuel.
    pub fn tick(&mut self, dt: f32, book: &RecipeBook) -> Option<(ItemId, u32)> {
        if dt <= 0.0 {
            return None;
        }
        let recipe = match self.input_item.as_deref() {
            Some(input) if self.input_qty > 0 => book.smelting_for(input),
            _ => None,
        };
        let Some(recipe) = recipe else {
            self.is_processing = false;
            return None;
        };
        // A different finished good is waiting; hold until it is collected.
        if self
            .output_item
            .as_deref()
            .is_some_and(|waiting| waiting != recipe.output)
        {
            self.is_processing = false;
            return None;
        }

        if self.fuel_time_remaining <= 0.0 && !self.ignite_next_fuel(book) {
            self.is_processing = false;
            return None;
        }

        if !self.is_processing {
            self.process_time_needed = recipe.seconds;
            self.is_processing = true;
        }

        let step = dt.min(self.fuel_time_remaining);
        self.fuel_time_remaining -= step;
        self.process_time_elapsed += step;

        if self.process_time_elapsed < self.process_time_needed {
            return None;
        }

        let produced = (recipe.output.clone(), recipe.output_qty);
        self.output_item = Some(recipe.output.clone());
        self.output_qty += recipe.output_qty;
        self.input_qty -= 1;
        if self.input_qty == 0 {
            self.input_item = None;
        }
        self.process_time_elapsed = 0.0;
        self.process_time_needed = 0.0;
        self.is_processing = false;
        Some(produced)
    }

    fn ignite_next_fuel(&mut self, book: &RecipeBook) -> bool {
        let Some(seconds) = self
            .fuel_item
            .as_deref()
            .filter(|_| self.fuel_qty > 0)
            .and_then(|fuel| book.fuel_seconds(fuel))
        else {
            return false;
        };
        self.fuel_time_remaining = seconds;
        self.fuel_unit_seconds = seconds;
        self.fuel_qty -= 1;
        if self.fuel_qty == 0 {
            self.fuel_item = None;
        }
        true
    }

    /// Smelting progress of the current unit in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.process_time_needed <= 0.0 {
            return 0.0;
        }
        (self.process_time_elapsed / self.process_time_needed).min(1.0)
    }

    /// Fraction of the burning fuel unit left, in `[0, 1]`.
    pub fn fuel_progress(&self) -> f32 {
        if self.fuel_unit_seconds <= 0.0 {
            return 0.0;
        }
        (self.fuel_time_remaining / self.fuel_unit_seconds).clamp(0.0, 1.0)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// FURNACE REGISTRY (placed stations)
// ──────────────────────────────────────────────────────────────────────────────

pub type FurnaceId = u32;

#[derive(Resource, Debug, Clone, Default)]
pub struct Furnaces {
    pub stations: BTreeMap<FurnaceId, PlacedFurnace>,
    next_id: FurnaceId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacedFurnace {
    pub scene_id: SceneId,
    pub position: Vec2,
    pub furnace: Furnace,
}

impl Furnaces {
    /// Consumes one `furnace` item and registers a new station.
    pub fn place(
        &mut self,
        inventory: &mut Inventory,
        scene_id: SceneId,
        position: Vec2,
    ) -> Option<FurnaceId> {
        if inventory.remove_item(FURNACE_ITEM, 1) == 0 {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.stations.insert(
            id,
            PlacedFurnace {
                scene_id,
                position,
                furnace: Furnace::default(),
            },
        );
        Some(id)
    }

    pub fn get(&self, id: FurnaceId) -> Option<&Furnace> {
        self.stations.get(&id).map(|placed| &placed.furnace)
    }

    pub fn get_mut(&mut self, id: FurnaceId) -> Option<&mut Furnace> {
        self.stations.get_mut(&id).map(|placed| &mut placed.furnace)
    }

    /// Removes every station. Ids keep counting up so stale ones never alias.
    pub fn clear(&mut self) {
        self.stations.clear();
    }
}

pub const FURNACE_ITEM: &str = "furnace";

// ──────────────────────────────────────────────────────────────────────────────
// EVENTS
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub struct PlaceFurnaceEvent {
    pub position: Vec2,
}

#[derive(Event, Debug, Clone)]
pub struct FurnaceInputEvent {
    pub furnace: FurnaceId,
    pub item_id: ItemId,
}

#[derive(Event, Debug, Clone)]
pub struct FurnaceFuelEvent {
    pub furnace: FurnaceId,
    pub item_id: ItemId,
}

#[derive(Event, Debug, Clone)]
pub struct FurnaceCollectEvent {
    pub furnace: FurnaceId,
}

// ──────────────────────────────────────────────────────────────────────────────
// SYSTEMS
// ──────────────────────────────────────────────────────────────────────────────

/// Every placed furnace keeps smelting, whichever scene the player is in.
pub fn tick_furnaces(time: Res<Time>, book: Res<RecipeBook>, mut furnaces: ResMut<Furnaces>) {
    let dt = time.delta_secs();
    for (id, placed) in furnaces.stations.iter_mut() {
        if let Some((item, qty)) = placed.furnace.tick(dt, &book) {
            info!("[Furnace] Station {} produced {} x{}", id, item, qty);
        }
    }
}

pub fn handle_place_furnace(
    mut events: EventReader<PlaceFurnaceEvent>,
    mut inventory: ResMut<Inventory>,
    mut furnaces: ResMut<Furnaces>,
    scenes: Res<crate::world::Scenes>,
) {
    for event in events.read() {
        let Some(scene_id) = scenes.active_id() else {
            warn!("[Furnace] No active scene to place a furnace in");
            continue;
        };
        match furnaces.place(&mut inventory, scene_id, event.position) {
            Some(id) => info!(
                "[Furnace] Placed station {} in scene {} at {:?}",
                id, scene_id, event.position
            ),
            None => warn!("[Furnace] No furnace in inventory to place"),
        }
    }
}

pub fn handle_furnace_input(
    mut events: EventReader<FurnaceInputEvent>,
    mut inventory: ResMut<Inventory>,
    mut furnaces: ResMut<Furnaces>,
    book: Res<RecipeBook>,
) {
    for event in events.read() {
        let Some(furnace) = furnaces.get_mut(event.furnace) else {
            warn!("[Furnace] Unknown station {}", event.furnace);
            continue;
        };
        if !furnace.add_input(&book, &mut inventory, &event.item_id) {
            warn!(
                "[Furnace] Station {} rejected input '{}'",
                event.furnace, event.item_id
            );
        }
    }
}

pub fn handle_furnace_fuel(
    mut events: EventReader<FurnaceFuelEvent>,
    mut inventory: ResMut<Inventory>,
    mut furnaces: ResMut<Furnaces>,
    book: Res<RecipeBook>,
) {
    for event in events.read() {
        let Some(furnace) = furnaces.get_mut(event.furnace) else {
            warn!("[Furnace] Unknown station {}", event.furnace);
            continue;
        };
        if !furnace.add_fuel(&book, &mut inventory, &event.item_id) {
            warn!(
                "[Furnace] Station {} rejected fuel '{}'",
                event.furnace, event.item_id
            );
        }
    }
}

pub fn handle_furnace_collect(
    mut events: EventReader<FurnaceCollectEvent>,
    mut inventory: ResMut<Inventory>,
    mut furnaces: ResMut<Furnaces>,
    catalog: Res<ItemCatalog>,
    mut pickup_events: EventWriter<ItemPickupEvent>,
) {
    for event in events.read() {
        let Some(furnace) = furnaces.get_mut(event.furnace) else {
            warn!("[Furnace] Unknown station {}", event.furnace);
            continue;
        };
        let pending = furnace.output_item.clone().map(|id| (id, furnace.output_qty));
        if furnace.collect_output(&mut inventory, &catalog) {
            if let Some((item_id, quantity)) = pending {
                info!("[Furnace] Collected {} x{}", item_id, quantity);
                pickup_events.send(ItemPickupEvent { item_id, quantity });
            }
        } else {
            warn!(
                "[Furnace] Nothing to collect from station {}, or no room for it",
                event.furnace
            );
        }
    }
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
    fn one_ore_one_log_twenty_seconds() {
        let (catalog, book, mut inv) = setup();
        inv.add_item(&catalog, "ore_iron", 1);
        inv.add_item(&catalog, "log", 1);
        let mut furnace = Furnace::default();
        assert!(furnace.add_input(&book, &mut inv, "ore_iron"));
        assert!(furnace.add_fuel(&book, &mut inv, "log"));
        assert_eq!(inv.count_item("ore_iron"), 0);
        assert_eq!(inv.count_item("log"), 0);

        for _ in 0..20 {
            furnace.tick(1.0, &book);
        }
        assert_eq!(furnace.output_item.as_deref(), Some("iron_ingot"));
        assert_eq!(furnace.output_qty, 1);
        assert_eq!(furnace.input_qty, 0);
        assert_eq!(furnace.fuel_time_remaining, 5.0);
        assert_eq!(furnace.phase(), FurnacePhase::Idle);

        assert!(furnace.collect_output(&mut inv, &catalog));
        assert_eq!(inv.count_item("iron_ingot"), 1);
        assert!(furnace.output_item.is_none());
    }

    #[test]
    fn mismatched_input_or_fuel_is_rejected() {
        let (catalog, book, mut inv) = setup();
        for id in ["ore_iron", "ore_copper", "log", "leaves", "planks"] {
            inv.add_item(&catalog, id, 2);
        }
        let mut furnace = Furnace::default();
        assert!(furnace.add_input(&book, &mut inv, "ore_iron"));
        assert!(!furnace.add_input(&book, &mut inv, "ore_copper"));
        assert!(furnace.add_input(&book, &mut inv, "ore_iron"));
        assert_eq!(furnace.input_qty, 2);
        assert!(!furnace.add_input(&book, &mut inv, "leaves"), "leaves do not smelt");

        assert!(furnace.add_fuel(&book, &mut inv, "log"));
        assert!(!furnace.add_fuel(&book, &mut inv, "leaves"));
        assert_eq!(furnace.fuel_item.as_deref(), Some("log"));
        assert_eq!(inv.count_item("ore_copper"), 2);
        assert_eq!(inv.count_item("leaves"), 2);
    }

    #[test]
    fn adding_without_stock_fails() {
        let (_, book, mut inv) = setup();
        let mut furnace = Furnace::default();
        assert!(!furnace.add_input(&book, &mut inv, "ore_iron"));
        assert!(!furnace.add_fuel(&book, &mut inv, "log"));
        assert_eq!(furnace, Furnace::default());
    }

    #[test]
    fn no_fuel_means_no_processing() {
        let (catalog, book, mut inv) = setup();
        inv.add_item(&catalog, "clay", 1);
        let mut furnace = Furnace::default();
        furnace.add_input(&book, &mut inv, "clay");
        for _ in 0..30 {
            furnace.tick(1.0, &book);
        }
        assert!(!furnace.is_processing);
        assert_eq!(furnace.process_time_elapsed, 0.0);
        assert!(furnace.output_item.is_none());
    }

    #[test]
    fn progress_survives_running_out_of_fuel() {
        let (catalog, book, mut inv) = setup();
        inv.add_item(&catalog, "ore_iron", 1);
        inv.add_item(&catalog, "leaves", 4);
        let mut furnace = Furnace::default();
        furnace.add_input(&book, &mut inv, "ore_iron");
        furnace.add_fuel(&book, &mut inv, "leaves");

        // One leaf burns 5 s of the 20 s needed.
        for _ in 0..8 {
            furnace.tick(1.0, &book);
        }
        assert!(!furnace.is_processing);
        assert_eq!(furnace.process_time_elapsed, 5.0);
        assert_eq!(furnace.fuel_time_remaining, 0.0);

        // Refuel: resumes where it stopped.
        for _ in 0..3 {
            furnace.add_fuel(&book, &mut inv, "leaves");
        }
        for _ in 0..15 {
            furnace.tick(1.0, &book);
        }
        assert_eq!(furnace.output_qty, 1);
        assert_eq!(furnace.output_item.as_deref(), Some("iron_ingot"));
    }

    #[test]
    fn burned_fuel_equals_processing_time() {
        let (catalog, book, mut inv) = setup();
        inv.add_item(&catalog, "ore_copper", 3);
        inv.add_item(&catalog, "ore_coal", 2);
        let mut furnace = Furnace::default();
        for _ in 0..3 {
            furnace.add_input(&book, &mut inv, "ore_copper");
        }
        furnace.add_fuel(&book, &mut inv, "ore_coal");
        furnace.add_fuel(&book, &mut inv, "ore_coal");

        let mut produced = 0;
        let mut last_elapsed = 0.0;
        for _ in 0..200 {
            match furnace.tick(0.5, &book) {
                Some(_) => produced += 1,
                None => assert!(furnace.process_time_elapsed >= last_elapsed),
            }
            last_elapsed = furnace.process_time_elapsed;
        }
        // 3 x 18 s of copper out of 2 x 40 s of coal.
        assert_eq!(produced, 3);
        assert_eq!(furnace.output_qty, 3);
        assert!(!furnace.is_processing);
        assert_eq!(furnace.fuel_qty, 0);
        assert_eq!(furnace.fuel_time_remaining, 26.0);
        furnace.tick(5.0, &book);
        assert_eq!(furnace.fuel_time_remaining, 26.0, "idle furnace must not burn fuel");
    }

    #[test]
    fn waiting_output_of_another_kind_blocks_completion() {
        let (catalog, book, mut inv) = setup();
        inv.add_item(&catalog, "honeycomb", 1);
        inv.add_item(&catalog, "clay", 1);
        inv.add_item(&catalog, "ore_coal", 1);
        let mut furnace = Furnace::default();
        furnace.add_input(&book, &mut inv, "honeycomb");
        furnace.add_fuel(&book, &mut inv, "ore_coal");
        for _ in 0..5 {
            furnace.tick(1.0, &book);
        }
        assert_eq!(furnace.output_item.as_deref(), Some("honeycomb_fragment"));
        assert_eq!(furnace.output_qty, 4);

        furnace.add_input(&book, &mut inv, "clay");
        for _ in 0..20 {
            furnace.tick(1.0, &book);
        }
        assert_eq!(furnace.input_qty, 1, "clay waits until fragments are collected");
        assert!(furnace.collect_output(&mut inv, &catalog));
        for _ in 0..15 {
            furnace.tick(1.0, &book);
        }
        assert_eq!(furnace.output_item.as_deref(), Some("glass"));
    }

    #[test]
    fn collect_is_all_or_nothing() {
        let (catalog, ..) = setup();
        let mut inv = Inventory::new(1, 1);
        inv.add_item(&catalog, "rock", 99);
        let mut furnace = Furnace {
            output_item: Some("glass".into()),
            output_qty: 3,
            ..Default::default()
        };
        assert!(!furnace.collect_output(&mut inv, &catalog));
        assert_eq!(furnace.output_qty, 3);
    }

    #[test]
    fn placing_needs_a_furnace_item() {
        let (catalog, _, mut inv) = setup();
        let mut furnaces = Furnaces::default();
        assert!(furnaces.place(&mut inv, 1, Vec2::ZERO).is_none());
        inv.add_item(&catalog, FURNACE_ITEM, 1);
        let id = furnaces.place(&mut inv, 1, Vec2::new(10.0, 10.0)).unwrap();
        assert_eq!(furnaces.get(id), Some(&Furnace::default()));
        assert_eq!(inv.count_item(FURNACE_ITEM), 0);
    }

    #[test]
    fn ids_are_not_reused_after_clearing() {
        let (catalog, _, mut inv) = setup();
        let mut furnaces = Furnaces::default();
        inv.add_item(&catalog, FURNACE_ITEM, 2);
        let first = furnaces.place(&mut inv, 1, Vec2::ZERO).unwrap();
        furnaces.clear();
        assert!(furnaces.get(first).is_none());
        let second = furnaces.place(&mut inv, 1, Vec2::ZERO).unwrap();
        assert_ne!(first, second);
        assert_eq!(furnaces.stations.len(), 1);
    }
}
