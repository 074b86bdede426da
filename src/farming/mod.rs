//! Farming domain: plant seeds found in a region, let them ripen, harvest.

use bevy::prelude::*;
use crate::shared::*;
use crate::world::Scenes;

mod plots;

pub use plots::{grow_seconds, product_from_seed, CropPlot, Crops};

/// Plant one seed from the inventory where the player stands.
#[derive(Event, Debug, Clone)]
pub struct PlantSeedEvent {
    pub seed_id: ItemId,
}

/// Harvest the nearest ripe plot around the player.
#[derive(Event, Debug, Clone)]
pub struct HarvestRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub scene_id: SceneId,
    pub item_id: ItemId,
}

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Crops>()
            .add_event::<PlantSeedEvent>()
            .add_event::<HarvestRequestEvent>()
            .add_event::<CropHarvestedEvent>()
            .add_event::<ItemPickupEvent>()
            .add_systems(Update, grow_crops.run_if(in_state(GameState::Playing)))
            .add_systems(
                Update,
                (detect_harvest_input, handle_harvest)
                    .chain()
                    .in_set(InventoryPhase::Gather),
            )
            .add_systems(Update, handle_plant_seed.in_set(InventoryPhase::Plant));
    }
}

/// Only the scene the player is in grows.
pub fn grow_crops(time: Res<Time>, scenes: Res<Scenes>, mut crops: ResMut<Crops>) {
    if let Some(scene_id) = scenes.active_id() {
        crops.update(time.delta_secs(), scene_id);
    }
}

/// The interact press doubles as the harvest action.
pub fn detect_harvest_input(input: Res<PlayerInput>, mut requests: EventWriter<HarvestRequestEvent>) {
    if input.interact {
        requests.send(HarvestRequestEvent);
    }
}

pub fn handle_plant_seed(
    mut events: EventReader<PlantSeedEvent>,
    scenes: Res<Scenes>,
    tables: Res<SpawnTables>,
    player: Res<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut crops: ResMut<Crops>,
) {
    for event in events.read() {
        let Some(scene_id) = scenes.active_id() else {
            continue;
        };
        if crops.try_plant(
            scene_id,
            player.center(),
            &event.seed_id,
            tables.get(scene_id),
            &mut inventory,
        ) {
            info!("[Farming] Planted {} in scene {}", event.seed_id, scene_id);
        } else {
            warn!(
                "[Farming] Cannot plant '{}' in scene {} (not native here or none in inventory)",
                event.seed_id, scene_id
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_harvest(
    mut events: EventReader<HarvestRequestEvent>,
    scenes: Res<Scenes>,
    config: Res<SimConfig>,
    catalog: Res<ItemCatalog>,
    player: Res<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut crops: ResMut<Crops>,
    mut harvested: EventWriter<CropHarvestedEvent>,
    mut pickup_events: EventWriter<ItemPickupEvent>,
) {
    for _ in events.read() {
        let Some(scene_id) = scenes.active_id() else {
            continue;
        };
        let Some(item_id) = crops.try_harvest_near(
            scene_id,
            player.center(),
            &mut inventory,
            &catalog,
            config.harvest_radius,
        ) else {
            debug!("[Farming] Nothing ripe in reach, or no room");
            continue;
        };
        info!("[Farming] Harvested {}", item_id);
        pickup_events.send(ItemPickupEvent {
            item_id: item_id.clone(),
            quantity: 1,
        });
        harvested.send(CropHarvestedEvent { scene_id, item_id });
    }
}
