//! Workbench crafting and furnace smelting.
//!
//! Crafting is instantaneous and atomic. Furnaces are placed stations that
//! keep smelting in real time while their inputs and fuel last.

use bevy::prelude::*;
use crate::shared::*;

mod bench;
mod furnace;

pub use bench::{
    available_recipes, can_craft, craft_item, has_all_ingredients,
    missing_ingredients_description, CraftItemEvent, CraftResultEvent,
};
pub use furnace::{
    Furnace, FurnaceCollectEvent, FurnaceFuelEvent, FurnaceId, FurnaceInputEvent, FurnacePhase,
    Furnaces, PlaceFurnaceEvent, PlacedFurnace, FURNACE_ITEM,
};

pub struct CraftingPlugin;

impl Plugin for CraftingPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Furnaces>()
            .add_event::<CraftItemEvent>()
            .add_event::<CraftResultEvent>()
            .add_event::<PlaceFurnaceEvent>()
            .add_event::<FurnaceInputEvent>()
            .add_event::<FurnaceFuelEvent>()
            .add_event::<FurnaceCollectEvent>()
            // Station output first, so a full furnace frees up before new
            // input is loaded in the same frame.
            .add_systems(
                Update,
                (
                    furnace::tick_furnaces,
                    furnace::handle_furnace_collect,
                )
                    .chain()
                    .in_set(InventoryPhase::Collect),
            )
            .add_systems(
                Update,
                (
                    bench::handle_craft_item,
                    furnace::handle_place_furnace,
                    furnace::handle_furnace_input,
                    furnace::handle_furnace_fuel,
                )
                    .chain()
                    .in_set(InventoryPhase::Craft),
            );
    }
}
