use bevy::prelude::*;
use crate::shared::*;
use crate::world::{Scene, Scenes};

pub const SPRINT_MULTIPLIER: f32 = 2.0;
pub const SPRINT_DRAIN_PER_SEC: f32 = 30.0;
pub const STAMINA_REGEN_PER_SEC: f32 = 15.0;
/// Sprinting needs at least this much stamina left.
pub const MIN_SPRINT_STAMINA: f32 = 5.0;

/// Moves the player one frame along `input.move_axis`, sliding along walls.
/// Sprinting doubles speed and drains stamina; otherwise stamina recovers.
pub fn step_player(player: &mut PlayerState, input: &PlayerInput, scene: &Scene, dt: f32) {
    let axis = input.move_axis.clamp_length_max(1.0);
    let moving = axis != Vec2::ZERO;
    let sprinting = input.sprint && moving && player.stamina >= MIN_SPRINT_STAMINA;

    let speed = if sprinting {
        player.stamina = (player.stamina - SPRINT_DRAIN_PER_SEC * dt).max(0.0);
        player.speed * SPRINT_MULTIPLIER
    } else {
        player.stamina = (player.stamina + STAMINA_REGEN_PER_SEC * dt).min(player.max_stamina);
        player.speed
    };

    if !moving {
        return;
    }
    let extent = Vec2::splat(player.size);
    let wanted = player.position + axis * speed * dt;
    player.position = scene.resolve_movement(player.position, wanted, extent);
}

/// Reads `PlayerInput` and moves the player inside the active scene.
pub fn player_movement(
    time: Res<Time>,
    input: Res<PlayerInput>,
    scenes: Res<Scenes>,
    mut player: ResMut<PlayerState>,
) {
    if !player.is_alive() {
        return;
    }
    let Some(scene) = scenes.active() else {
        return;
    };
    step_player(&mut player, &input, scene, time.delta_secs());
}
