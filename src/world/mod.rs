//! World domain plugin for Aeterna.
//!
//! Responsible for:
//! - Building every scene (bounds, silhouette, solidity grid) from the zone catalog
//! - Tracking the active scene
//! - Scene transitions, which re-centre the player and notify the spawn domains

use bevy::prelude::*;

use crate::shared::*;

pub mod collision;
pub mod scene;
pub mod zones;

pub use collision::{point_in_polygon, CollisionGrid};
pub use scene::Scene;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Scenes>()
            .add_event::<SceneTransitionEvent>()
            .add_event::<SceneEnteredEvent>()
            .add_systems(OnExit(GameState::Loading), build_world)
            .add_systems(
                Update,
                handle_scene_transition.run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// All scenes in travel order plus the one the player is standing in.
#[derive(Resource, Debug, Clone, Default)]
pub struct Scenes {
    scenes: Vec<Scene>,
    active: Option<SceneId>,
}

impl Scenes {
    /// Full teardown and rebuild from the zone catalog. Nothing carries over
    /// from the previous geometry; the active scene is kept if it still exists.
    pub fn rebuild(&mut self, config: &SimConfig) {
        let size = Vec2::new(config.scene_width, config.scene_height);
        self.scenes = zones::ZONES
            .iter()
            .map(|zone| {
                let outline = zone.outline_points();
                Scene::new(zone.id, zone.name, size, config.cell_size, outline.as_deref())
            })
            .collect();
        if self.active.is_some_and(|id| self.get(id).is_none()) {
            self.active = None;
        }
    }

    pub fn from_scenes(scenes: Vec<Scene>) -> Self {
        Self {
            scenes,
            active: None,
        }
    }

    pub fn get(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn active_id(&self) -> Option<SceneId> {
        self.active
    }

    pub fn active(&self) -> Option<&Scene> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: SceneId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// 1-based position of the active scene in travel order.
    pub fn active_index(&self) -> Option<usize> {
        let id = self.active?;
        self.scenes.iter().position(|scene| scene.id == id).map(|i| i + 1)
    }

    pub fn id_at_index(&self, index: usize) -> Option<SceneId> {
        index
            .checked_sub(1)
            .and_then(|i| self.scenes.get(i))
            .map(|scene| scene.id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Builds geometry once data is loaded and drops the player into the first scene.
fn build_world(
    config: Res<SimConfig>,
    mut scenes: ResMut<Scenes>,
    mut player: ResMut<PlayerState>,
    mut entered: EventWriter<SceneEnteredEvent>,
) {
    scenes.rebuild(&config);
    let solid: usize = scenes.iter().map(|s| s.grid().solid_cells().len()).sum();
    info!(
        "[World] Built {} scenes ({} solid cells total)",
        scenes.len(),
        solid
    );

    let Some(first) = scenes.iter().next().map(|scene| scene.id) else {
        warn!("[World] Zone catalog is empty; nothing to enter");
        return;
    };
    scenes.set_active(first);
    if let Some(scene) = scenes.active() {
        player.position = scene.spawn_point(Vec2::splat(player.size));
    }
    entered.send(SceneEnteredEvent { scene_id: first });
}

pub fn handle_scene_transition(
    mut events: EventReader<SceneTransitionEvent>,
    mut scenes: ResMut<Scenes>,
    mut player: ResMut<PlayerState>,
    mut entered: EventWriter<SceneEnteredEvent>,
) {
    for event in events.read() {
        if scenes.active_id() == Some(event.to_scene) {
            debug!("[World] Already in scene {}", event.to_scene);
            continue;
        }
        if !scenes.set_active(event.to_scene) {
            warn!("[World] Unknown scene {}", event.to_scene);
            continue;
        }
        let Some(scene) = scenes.active() else {
            continue;
        };
        player.position = scene.spawn_point(Vec2::splat(player.size));
        info!("[World] Entered scene {} ({})", scene.id, scene.name);
        entered.send(SceneEnteredEvent {
            scene_id: event.to_scene,
        });
    }
}
