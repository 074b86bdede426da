//! Missions domain: the mission journal.
//!
//! Objectives are measured against the pack, the scenes visited and the
//! number of nights slept. Finished missions are claimed for item rewards.

use bevy::prelude::*;

use crate::calendar;
use crate::shared::*;

mod campaign;
mod journal;

pub use campaign::build_campaign;
pub use journal::{
    seed_variety, Mission, MissionLog, MissionProgress, MissionRecord, Objective, ObjectiveKind,
};

/// The player opened the mission journal.
#[derive(Event, Debug, Clone)]
pub struct OpenJournalEvent;

/// Request to collect a finished mission's rewards.
#[derive(Event, Debug, Clone)]
pub struct ClaimMissionEvent {
    pub mission_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct MissionClaimResultEvent {
    pub mission_id: String,
    pub success: bool,
    pub message: String,
}

/// A mission's objectives all became satisfied.
#[derive(Event, Debug, Clone)]
pub struct MissionCompletedEvent {
    pub mission_id: String,
}

pub struct MissionsPlugin;

impl Plugin for MissionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MissionLog>()
            .add_event::<OpenJournalEvent>()
            .add_event::<ClaimMissionEvent>()
            .add_event::<MissionClaimResultEvent>()
            .add_event::<MissionCompletedEvent>()
            .add_event::<ItemPickupEvent>()
            .add_systems(
                Update,
                track_mission_events
                    .after(calendar::handle_sleep)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, handle_claim_mission.in_set(InventoryPhase::Gather))
            .add_systems(
                Update,
                refresh_missions
                    .after(InventoryPhase::Plant)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

pub fn track_mission_events(
    mut entered: EventReader<SceneEnteredEvent>,
    mut sleeps: EventReader<SleepEvent>,
    mut journal: EventReader<OpenJournalEvent>,
    mut log: ResMut<MissionLog>,
) {
    for event in entered.read() {
        log.visited_scenes.insert(event.scene_id);
    }
    for _ in sleeps.read() {
        log.slept_count += 1;
    }
    if journal.read().count() > 0 {
        log.journal_opened = true;
    }
}

pub fn refresh_missions(
    inventory: Res<Inventory>,
    mut log: ResMut<MissionLog>,
    mut completed: EventWriter<MissionCompletedEvent>,
) {
    for mission_id in log.refresh(&inventory) {
        if let Some(mission) = log.mission(&mission_id) {
            info!("[Missions] Completed '{}'", mission.title);
        }
        completed.send(MissionCompletedEvent { mission_id });
    }
}

pub fn handle_claim_mission(
    mut events: EventReader<ClaimMissionEvent>,
    catalog: Res<ItemCatalog>,
    mut log: ResMut<MissionLog>,
    mut inventory: ResMut<Inventory>,
    mut results: EventWriter<MissionClaimResultEvent>,
    mut pickup_events: EventWriter<ItemPickupEvent>,
) {
    for event in events.read() {
        let mission_id = &event.mission_id;
        match log.claim(mission_id, &mut inventory, &catalog) {
            Ok(rewards) => {
                let summary = rewards
                    .iter()
                    .map(|(item_id, qty)| format!("{} x{}", catalog.display_name(item_id), qty))
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("[Missions] Claimed '{}': {}", mission_id, summary);
                for (item_id, quantity) in rewards {
                    pickup_events.send(ItemPickupEvent { item_id, quantity });
                }
                results.send(MissionClaimResultEvent {
                    mission_id: mission_id.clone(),
                    success: true,
                    message: format!("Received {}", summary),
                });
            }
            Err(message) => {
                warn!("[Missions] Cannot claim '{}': {}", mission_id, message);
                results.send(MissionClaimResultEvent {
                    mission_id: mission_id.clone(),
                    success: false,
                    message,
                });
            }
        }
    }
}
