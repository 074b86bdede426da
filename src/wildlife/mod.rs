//! Wildlife domain: per-scene herds that wander, hunt the player and can be
//! hunted in turn.
//!
//! Populations persist per scene and follow the same first-visit/repeat-visit
//! top-up policy as ground loot. Only the active scene's animals think.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;

use crate::shared::*;
use crate::world::{Scene, Scenes};

mod brain;

pub use brain::{BehaviorState, Brain, BrainContext, BrainOutput};

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WildlifePlugin;

impl Plugin for WildlifePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Wildlife>()
            .add_event::<PlayerAttackEvent>()
            .add_event::<PlayerDamageEvent>()
            .add_event::<AnimalKilledEvent>()
            .add_systems(
                Update,
                (populate_wildlife, handle_player_attack, tick_wildlife)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ENTITIES
// ═══════════════════════════════════════════════════════════════════════

/// One animal. `position` is the body centre.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalEntity {
    pub spec: SpeciesSpec,
    pub position: Vec2,
    pub velocity: Vec2,
    pub hp: f32,
    pub alive: bool,
    pub brain: Brain,
}

impl AnimalEntity {
    pub fn new(spec: SpeciesSpec, position: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            hp: spec.max_hp,
            spec,
            position,
            velocity: Vec2::ZERO,
            alive: true,
            brain: Brain::new(position, rng),
        }
    }

    pub fn species(&self) -> &str {
        &self.spec.id
    }

    /// Keeps hp within `[0, max_hp]`; the animal dies at zero.
    pub fn apply_damage(&mut self, damage: f32) {
        if damage <= 0.0 || !self.alive {
            return;
        }
        self.hp = (self.hp - damage).clamp(0.0, self.spec.max_hp);
        if self.hp <= 0.0 {
            self.alive = false;
        }
    }

    /// Collision box that moves with the animal: half the body, centred.
    fn footprint(&self) -> Vec2 {
        Vec2::splat((self.spec.size * 0.5).max(1.0))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct Wildlife {
    scenes: HashMap<SceneId, ScenePopulation<AnimalEntity>>,
    kills: Vec<AnimalKilledEvent>,
}

impl Wildlife {
    pub fn animals(&self, scene_id: SceneId) -> &[AnimalEntity] {
        self.scenes
            .get(&scene_id)
            .map(|pop| pop.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn visited_count(&self, scene_id: SceneId) -> u32 {
        self.scenes.get(&scene_id).map_or(0, |pop| pop.visited_count)
    }

    pub fn alive_count(&self, scene_id: SceneId) -> usize {
        self.animals(scene_id).iter().filter(|a| a.alive).count()
    }

    /// Tops up the scene's herd according to its table and counts the visit.
    /// Returns how many animals were added.
    pub fn on_enter_scene(
        &mut self,
        scene: &Scene,
        table: Option<&SceneSpawnTable>,
        book: &SpeciesBook,
        rng: &mut impl Rng,
    ) -> usize {
        let population = self.scenes.entry(scene.id).or_default();
        let mut added = 0;
        if let Some(table) = table {
            let alive = population.members.iter().filter(|a| a.alive).count() as u32;
            let target = table.wildlife_rule.top_up(population.visited_count, alive, rng);
            for _ in 0..target {
                let Some(entry) = weighted_pick(&table.wildlife, |e| e.weight, rng) else {
                    break;
                };
                let spec = book.get_or_fallback(&entry.species);
                let position = open_ground(scene, Vec2::splat((spec.size * 0.5).max(1.0)), rng);
                population.members.push(AnimalEntity::new(spec, position, rng));
                added += 1;
            }
        }
        population.visited_count += 1;
        added
    }

    /// Runs one AI step for every living animal in `scene` and returns the
    /// damage dealt to the player, one entry per strike. Dead animals are
    /// removed afterwards.
    pub fn update(
        &mut self,
        scene: &Scene,
        dt: f32,
        player: Vec2,
        rng: &mut impl Rng,
    ) -> Vec<f32> {
        let mut strikes = Vec::new();
        let Some(population) = self.scenes.get_mut(&scene.id) else {
            return strikes;
        };

        for animal in population.members.iter_mut().filter(|a| a.alive) {
            let ctx = BrainContext {
                spec: &animal.spec,
                position: animal.position,
                player,
            };
            let output = animal.brain.advance(dt, ctx, rng);
            animal.velocity = output.velocity;
            if output.damage_to_player > 0.0 {
                strikes.push(output.damage_to_player);
            }

            let extent = animal.footprint();
            let half = extent * 0.5;
            let (lo, hi) = (half, (scene.size() - half).max(half));
            let from = animal.position.clamp(lo, hi);
            let wanted = (from + animal.velocity * dt).clamp(lo, hi);
            animal.position = scene.resolve_movement(from - half, wanted - half, extent) + half;
        }

        population.members.retain(|a| a.alive);
        strikes
    }

    /// Damages every living animal whose body overlaps the circle. Returns
    /// how many were hit.
    pub fn damage_in_radius(
        &mut self,
        scene_id: SceneId,
        center: Vec2,
        radius: f32,
        damage: f32,
    ) -> usize {
        let Some(population) = self.scenes.get_mut(&scene_id) else {
            return 0;
        };
        let mut hits = 0;
        for animal in population.members.iter_mut().filter(|a| a.alive) {
            let reach = radius + animal.spec.size * 0.5;
            if animal.position.distance_squared(center) > reach * reach {
                continue;
            }
            animal.apply_damage(damage);
            hits += 1;
            if !animal.alive {
                self.kills.push(AnimalKilledEvent {
                    scene_id,
                    species: animal.spec.id.clone(),
                    position: animal.position,
                });
            }
        }
        hits
    }

    /// Kills recorded since the last call.
    pub fn drain_kills(&mut self) -> Vec<AnimalKilledEvent> {
        std::mem::take(&mut self.kills)
    }

    pub fn clear(&mut self) {
        self.scenes.clear();
        self.kills.clear();
    }
}

/// Random point whose footprint is walkable, or any random point if the
/// scene offers none within the attempt budget.
fn open_ground(scene: &Scene, extent: Vec2, rng: &mut impl Rng) -> Vec2 {
    for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
        let candidate = scene.random_point(rng);
        if !scene.box_collides(candidate - extent * 0.5, extent) {
            return candidate;
        }
    }
    scene.random_point(rng)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn populate_wildlife(
    mut events: EventReader<SceneEnteredEvent>,
    scenes: Res<Scenes>,
    tables: Res<SpawnTables>,
    book: Res<SpeciesBook>,
    mut wildlife: ResMut<Wildlife>,
    mut rng: ResMut<SimRng>,
) {
    for event in events.read() {
        let Some(scene) = scenes.get(event.scene_id) else {
            continue;
        };
        let added = wildlife.on_enter_scene(scene, tables.get(scene.id), &book, &mut rng.0);
        if added > 0 {
            info!(
                "[Wildlife] Scene {}: +{} animals ({} alive)",
                scene.id,
                added,
                wildlife.alive_count(scene.id)
            );
        }
    }
}

pub fn handle_player_attack(
    mut events: EventReader<PlayerAttackEvent>,
    scenes: Res<Scenes>,
    mut wildlife: ResMut<Wildlife>,
    mut killed: EventWriter<AnimalKilledEvent>,
) {
    let Some(scene_id) = scenes.active_id() else {
        events.clear();
        return;
    };
    for event in events.read() {
        let hits = wildlife.damage_in_radius(scene_id, event.center, event.radius, event.damage);
        if hits > 0 {
            debug!("[Wildlife] Attack hit {} animals", hits);
        }
    }
    for kill in wildlife.drain_kills() {
        info!("[Wildlife] {} killed in scene {}", kill.species, kill.scene_id);
        killed.send(kill);
    }
}

pub fn tick_wildlife(
    time: Res<Time>,
    scenes: Res<Scenes>,
    player: Res<PlayerState>,
    mut wildlife: ResMut<Wildlife>,
    mut rng: ResMut<SimRng>,
    mut damage_events: EventWriter<PlayerDamageEvent>,
) {
    let Some(scene) = scenes.active() else {
        return;
    };
    let strikes = wildlife.update(scene, time.delta_secs(), player.center(), &mut rng.0);
    for amount in strikes {
        damage_events.send(PlayerDamageEvent {
            amount,
            source: "wildlife".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build_registries;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_scene(id: SceneId) -> Scene {
        Scene::new(id, "Test", Vec2::new(960.0, 960.0), 48.0, None)
    }

    fn place(wildlife: &mut Wildlife, scene_id: SceneId, species: SpeciesSpec, at: Vec2) {
        let mut rng = StdRng::seed_from_u64(0);
        wildlife
            .scenes
            .entry(scene_id)
            .or_default()
            .members
            .push(AnimalEntity::new(species, at, &mut rng));
    }

    #[test]
    fn zone_herds_follow_the_population_rule() {
        let (_, _, book, tables, _) = build_registries();
        let scene = open_scene(2);
        let mut rng = StdRng::seed_from_u64(9);
        let mut wildlife = Wildlife::default();

        let first = wildlife.on_enter_scene(&scene, tables.get(2), &book, &mut rng);
        assert!((5..=7).contains(&first));
        assert_eq!(wildlife.on_enter_scene(&scene, tables.get(2), &book, &mut rng), 0);
        assert_eq!(wildlife.visited_count(2), 2);
        for animal in wildlife.animals(2) {
            assert!(["wolf", "duck", "cow", "pig"].contains(&animal.species()));
        }
    }

    #[test]
    fn homestead_stays_empty() {
        let (_, _, book, tables, _) = build_registries();
        let scene = open_scene(1);
        let mut rng = StdRng::seed_from_u64(1);
        let mut wildlife = Wildlife::default();
        for _ in 0..3 {
            assert_eq!(wildlife.on_enter_scene(&scene, tables.get(1), &book, &mut rng), 0);
        }
        assert_eq!(wildlife.alive_count(1), 0);
    }

    #[test]
    fn unknown_species_falls_back() {
        let book = SpeciesBook::default();
        let table = SceneSpawnTable {
            items_rule: PopulationRule { first_count: (0, 0), repeat_count: (0, 0) },
            items: Vec::new(),
            wildlife_rule: PopulationRule { first_count: (2, 2), repeat_count: (0, 0) },
            wildlife: vec![SpeciesSpawnEntry { species: "yeti".into(), weight: 1 }],
        };
        let mut rng = StdRng::seed_from_u64(2);
        let mut wildlife = Wildlife::default();
        assert_eq!(wildlife.on_enter_scene(&open_scene(5), Some(&table), &book, &mut rng), 2);
        assert_eq!(wildlife.animals(5)[0].spec, SpeciesSpec::fallback("yeti"));
    }

    #[test]
    fn damage_reaches_the_body_not_just_the_centre() {
        let (_, _, book, _, _) = build_registries();
        let mut wildlife = Wildlife::default();
        // Cow body is 42 wide: reach from a 40 radius swing is 61.
        place(&mut wildlife, 2, book.get_or_fallback("cow"), Vec2::new(60.0, 0.0));
        place(&mut wildlife, 2, book.get_or_fallback("cow"), Vec2::new(62.0, 0.0));
        assert_eq!(wildlife.damage_in_radius(2, Vec2::ZERO, 40.0, 22.0), 1);
        assert_eq!(wildlife.animals(2)[0].hp, 98.0);
        assert_eq!(wildlife.animals(2)[1].hp, 120.0);
    }

    #[test]
    fn killed_animals_are_reported_once_and_compacted() {
        let (_, _, book, _, _) = build_registries();
        let scene = open_scene(3);
        let mut rng = StdRng::seed_from_u64(4);
        let mut wildlife = Wildlife::default();
        place(&mut wildlife, 3, book.get_or_fallback("duck"), Vec2::new(400.0, 400.0));

        assert_eq!(wildlife.damage_in_radius(3, Vec2::new(400.0, 400.0), 10.0, 500.0), 1);
        let duck = &wildlife.animals(3)[0];
        assert!(!duck.alive);
        assert_eq!(duck.hp, 0.0);
        assert_eq!(wildlife.alive_count(3), 0);
        assert_eq!(wildlife.drain_kills().len(), 1);
        assert!(wildlife.drain_kills().is_empty());

        // Dead animals take no more hits and vanish on the next update.
        assert_eq!(wildlife.damage_in_radius(3, Vec2::new(400.0, 400.0), 10.0, 5.0), 0);
        wildlife.update(&scene, 0.1, Vec2::ZERO, &mut rng);
        assert!(wildlife.animals(3).is_empty());
    }

    #[test]
    fn wolf_bites_a_nearby_player() {
        let (_, _, book, _, _) = build_registries();
        let scene = open_scene(2);
        let mut rng = StdRng::seed_from_u64(5);
        let mut wildlife = Wildlife::default();
        let player = Vec2::new(480.0, 480.0);
        place(&mut wildlife, 2, book.get_or_fallback("wolf"), player + Vec2::new(5.0, 0.0));

        let strikes = wildlife.update(&scene, 1.0 / 60.0, player, &mut rng);
        assert_eq!(strikes, vec![10.0]);
        assert_eq!(wildlife.animals(2)[0].brain.state, BehaviorState::Pursue);
    }

    #[test]
    fn animals_stay_inside_the_scene() {
        let (_, _, book, _, _) = build_registries();
        let scene = open_scene(4);
        let mut rng = StdRng::seed_from_u64(6);
        let mut wildlife = Wildlife::default();
        for corner in [Vec2::ZERO, Vec2::new(960.0, 0.0), Vec2::splat(960.0)] {
            place(&mut wildlife, 4, book.get_or_fallback("duck"), corner);
        }
        for _ in 0..600 {
            wildlife.update(&scene, 1.0 / 30.0, Vec2::splat(-5000.0), &mut rng);
        }
        for animal in wildlife.animals(4) {
            let p = animal.position;
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.x <= 960.0 && p.y <= 960.0, "{p:?}");
        }
    }
}
