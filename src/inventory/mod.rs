//! Inventory domain: drag gestures on the slot grid.
//!
//! The `Inventory` type itself lives in `shared` since every domain reads it.

use bevy::prelude::*;
use crate::shared::*;

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<InventoryDragEvent>()
            .add_event::<ItemPickupEvent>()
            .add_systems(
                Update,
                handle_inventory_drag.in_set(InventoryPhase::Arrange),
            )
            .add_systems(OnExit(GameState::Playing), return_held_stack);
    }
}

pub fn handle_inventory_drag(
    mut events: EventReader<InventoryDragEvent>,
    catalog: Res<ItemCatalog>,
    mut inventory: ResMut<Inventory>,
) {
    for event in events.read() {
        let ok = match *event {
            InventoryDragEvent::PickUp { slot } if slot < inventory.len() => inventory.pick_up(slot),
            InventoryDragEvent::Drop { slot } if slot < inventory.len() => {
                inventory.drop_on(&catalog, slot)
            }
            InventoryDragEvent::Cancel => inventory.cancel_drag(&catalog),
            InventoryDragEvent::PickUp { slot } | InventoryDragEvent::Drop { slot } => {
                warn!("[Inventory] Slot {} is outside the grid", slot);
                continue;
            }
        };
        if !ok {
            debug!("[Inventory] Ignored drag gesture {:?}", event);
        }
    }
}

/// A stack still in hand when play stops goes back into the grid.
fn return_held_stack(catalog: Res<ItemCatalog>, mut inventory: ResMut<Inventory>) {
    if inventory.is_dragging() && !inventory.cancel_drag(&catalog) {
        warn!("[Inventory] No room to return the held stack; it stays in hand");
    }
}
