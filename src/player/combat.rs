use bevy::prelude::*;
use crate::shared::*;

/// Spends stamina on a swing and returns the attack it produces, or `None`
/// if the player is too tired (or dead).
pub fn try_attack(player: &mut PlayerState, config: &SimConfig) -> Option<PlayerAttackEvent> {
    if !player.is_alive() || player.stamina < config.attack_stamina_cost {
        return None;
    }
    player.stamina = (player.stamina - config.attack_stamina_cost).max(0.0);
    Some(PlayerAttackEvent {
        center: player.center(),
        radius: config.attack_radius,
        damage: config.attack_damage,
    })
}

/// Health never drops below zero.
pub fn take_damage(player: &mut PlayerState, amount: f32) {
    if amount <= 0.0 {
        return;
    }
    player.health = (player.health - amount).max(0.0);
}

pub fn player_attack(
    input: Res<PlayerInput>,
    config: Res<SimConfig>,
    mut player: ResMut<PlayerState>,
    mut attacks: EventWriter<PlayerAttackEvent>,
) {
    if !input.attack {
        return;
    }
    if let Some(attack) = try_attack(&mut player, &config) {
        attacks.send(attack);
    } else {
        debug!("[Player] Too tired to attack ({:.0} stamina)", player.stamina);
    }
}

pub fn apply_player_damage(
    mut events: EventReader<PlayerDamageEvent>,
    mut player: ResMut<PlayerState>,
    mut died: EventWriter<PlayerDiedEvent>,
) {
    for event in events.read() {
        if !player.is_alive() {
            continue;
        }
        take_damage(&mut player, event.amount);
        debug!(
            "[Player] Took {:.0} damage from {} ({:.0} hp left)",
            event.amount, event.source, player.health
        );
        if !player.is_alive() {
            warn!("[Player] Killed by {}", event.source);
            died.send(PlayerDiedEvent {
                cause: event.source.clone(),
            });
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct PlayerDiedEvent {
    pub cause: String,
}
