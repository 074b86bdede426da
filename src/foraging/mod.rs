//! Ground loot: seeded on scene entry, picked up by walking over it.

use bevy::prelude::*;
use crate::shared::*;
use crate::world::Scenes;

mod ground;

pub use ground::{GroundItem, GroundItems};

pub struct ForagingPlugin;

impl Plugin for ForagingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GroundItems>()
            .add_event::<ItemPickupEvent>()
            .add_systems(
                Update,
                populate_ground_items.run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                auto_pickup
                    .after(populate_ground_items)
                    .in_set(InventoryPhase::Gather),
            );
    }
}

pub fn populate_ground_items(
    mut events: EventReader<SceneEnteredEvent>,
    scenes: Res<Scenes>,
    tables: Res<SpawnTables>,
    mut ground: ResMut<GroundItems>,
    mut rng: ResMut<SimRng>,
) {
    for event in events.read() {
        let Some(scene) = scenes.get(event.scene_id) else {
            continue;
        };
        let added = ground.on_enter_scene(scene, tables.get(scene.id), &mut rng.0);
        info!(
            "[Foraging] Scene {} visit #{}: +{} piles ({} on the ground)",
            scene.id,
            ground.visited_count(scene.id),
            added,
            ground.items(scene.id).len()
        );
    }
}

/// Collects the nearest pile in reach, one per frame.
pub fn auto_pickup(
    scenes: Res<Scenes>,
    player: Res<PlayerState>,
    config: Res<SimConfig>,
    catalog: Res<ItemCatalog>,
    mut ground: ResMut<GroundItems>,
    mut inventory: ResMut<Inventory>,
    mut pickup_events: EventWriter<ItemPickupEvent>,
) {
    let Some(scene_id) = scenes.active_id() else {
        return;
    };
    let Some(index) = ground.nearest_within(scene_id, player.center(), config.pickup_radius)
    else {
        return;
    };
    match ground.try_pickup(scene_id, index, &mut inventory, &catalog) {
        Some(item) => {
            debug!("[Foraging] Picked up {} x{}", item.item_id, item.quantity);
            pickup_events.send(ItemPickupEvent {
                item_id: item.item_id,
                quantity: item.quantity,
            });
        }
        None => debug!("[Foraging] Inventory full, leaving pile on the ground"),
    }
}
