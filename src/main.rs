use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use aeterna::shared::*;
use aeterna::{
    calendar, crafting, data, farming, foraging, inventory, missions, player, save, wildlife,
    world,
};

/// Simulation frames per second.
const TICK_RATE: f64 = 60.0;

fn main() {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / TICK_RATE,
        ))),
        StatesPlugin,
        LogPlugin::default(),
    ))
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<SimConfig>()
        .init_resource::<SimRng>()
        .init_resource::<ItemCatalog>()
        .init_resource::<RecipeBook>()
        .init_resource::<SpeciesBook>()
        .init_resource::<SpawnTables>()
        .init_resource::<GameClock>()
        .init_resource::<Inventory>()
        .init_resource::<PlayerState>()
        .init_resource::<PlayerInput>()
        // Events
        .add_event::<SceneTransitionEvent>()
        .add_event::<SceneEnteredEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<PlayerAttackEvent>()
        .add_event::<PlayerDamageEvent>()
        .add_event::<AnimalKilledEvent>()
        .add_event::<InventoryDragEvent>()
        .add_event::<SleepEvent>();

    // Frame order shared by every domain that touches the inventory
    configure_inventory_phases(&mut app);

    // Domain plugins
    app.add_plugins(calendar::CalendarPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(inventory::InventoryPlugin)
        .add_plugins(crafting::CraftingPlugin)
        .add_plugins(foraging::ForagingPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(wildlife::WildlifePlugin)
        .add_plugins(missions::MissionsPlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin);

    app.run();
}
