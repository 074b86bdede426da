//! Player domain: turns `PlayerInput` into movement and swings, and takes
//! the hits wildlife deals.

mod combat;
mod movement;

use bevy::prelude::*;
use crate::shared::*;

pub use combat::{take_damage, try_attack, PlayerDiedEvent};
pub use movement::step_player;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerAttackEvent>()
            .add_event::<PlayerDamageEvent>()
            .add_event::<PlayerDiedEvent>()
            .add_systems(
                Update,
                (
                    movement::player_movement,
                    combat::player_attack,
                    combat::apply_player_damage,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // Attack and interact are presses, not holds.
            .add_systems(Last, clear_one_shot_input);
    }
}

fn clear_one_shot_input(mut input: ResMut<PlayerInput>) {
    input.attack = false;
    input.interact = false;
}
