use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;

use crate::shared::*;
use crate::world::Scene;

/// A lootable pile lying in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundItem {
    pub item_id: ItemId,
    pub quantity: u32,
    pub position: Vec2,
}

/// Persistent ground loot for every scene the player has entered.
#[derive(Resource, Debug, Clone, Default)]
pub struct GroundItems {
    scenes: HashMap<SceneId, ScenePopulation<GroundItem>>,
}

impl GroundItems {
    pub fn items(&self, scene_id: SceneId) -> &[GroundItem] {
        self.scenes
            .get(&scene_id)
            .map(|pop| pop.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn visited_count(&self, scene_id: SceneId) -> u32 {
        self.scenes.get(&scene_id).map_or(0, |pop| pop.visited_count)
    }

    /// Tops up the scene's loot according to its table and counts the visit.
    /// Returns how many piles were added.
    pub fn on_enter_scene(
        &mut self,
        scene: &Scene,
        table: Option<&SceneSpawnTable>,
        rng: &mut impl Rng,
    ) -> usize {
        let population = self.scenes.entry(scene.id).or_default();
        let added = match table {
            Some(table) => {
                let existing = population.members.len() as u32;
                let target = table.items_rule.top_up(population.visited_count, existing, rng);
                let mut added = 0;
                for _ in 0..target {
                    let Some(entry) = weighted_pick(&table.items, |e| e.weight, rng) else {
                        break;
                    };
                    let quantity = uniform_count(entry.quantity, rng).max(1);
                    population.members.push(GroundItem {
                        item_id: entry.item_id.clone(),
                        quantity,
                        position: scene.random_point(rng),
                    });
                    added += 1;
                }
                added
            }
            None => 0,
        };
        population.visited_count += 1;
        added
    }

    /// Index of the single nearest pile within `radius` of `pos`.
    pub fn nearest_within(&self, scene_id: SceneId, pos: Vec2, radius: f32) -> Option<usize> {
        let limit = radius * radius;
        self.items(scene_id)
            .iter()
            .enumerate()
            .map(|(i, item)| (i, item.position.distance_squared(pos)))
            .filter(|&(_, d2)| d2 <= limit)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Moves the whole pile into the inventory. A pile that does not fit in
    /// full stays on the ground untouched.
    pub fn try_pickup(
        &mut self,
        scene_id: SceneId,
        index: usize,
        inventory: &mut Inventory,
        catalog: &ItemCatalog,
    ) -> Option<GroundItem> {
        let population = self.scenes.get_mut(&scene_id)?;
        let item = population.members.get(index)?;
        if !inventory.can_fit(catalog, &item.item_id, item.quantity) {
            return None;
        }
        let item = population.members.swap_remove(index);
        inventory.add_item(catalog, &item.item_id, item.quantity);
        Some(item)
    }

    /// Drops every scene's loot and visit history.
    pub fn clear(&mut self) {
        self.scenes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build_registries;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_scene() -> Scene {
        Scene::new(1, "Test", Vec2::new(480.0, 480.0), 48.0, None)
    }

    fn table(first: (u32, u32), repeat: (u32, u32)) -> SceneSpawnTable {
        SceneSpawnTable {
            items_rule: PopulationRule {
                first_count: first,
                repeat_count: repeat,
            },
            items: vec![
                ItemSpawnEntry {
                    item_id: "rock".into(),
                    weight: 3,
                    quantity: (1, 2),
                },
                ItemSpawnEntry {
                    item_id: "leaves".into(),
                    weight: 1,
                    quantity: (2, 2),
                },
            ],
            wildlife_rule: PopulationRule {
                first_count: (0, 0),
                repeat_count: (0, 0),
            },
            wildlife: Vec::new(),
        }
    }

    #[test]
    fn first_visit_rolls_within_first_range() {
        let scene = open_scene();
        let table = table((35, 50), (8, 16));
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ground = GroundItems::default();
            let added = ground.on_enter_scene(&scene, Some(&table), &mut rng);
            assert!((35..=50).contains(&added), "seed {seed}: {added}");
            assert_eq!(ground.visited_count(1), 1);
            for item in ground.items(1) {
                assert!(scene.contains_point(item.position));
                assert!(item.quantity >= 1 && item.quantity <= 2);
            }
        }
    }

    #[test]
    fn repeat_visit_tops_up_only_below_minimum() {
        let scene = open_scene();
        let table = table((10, 10), (4, 6));
        let mut rng = StdRng::seed_from_u64(3);
        let mut ground = GroundItems::default();
        ground.on_enter_scene(&scene, Some(&table), &mut rng);
        assert_eq!(ground.items(1).len(), 10);

        // Well stocked: no top-up, but the visit still counts.
        assert_eq!(ground.on_enter_scene(&scene, Some(&table), &mut rng), 0);
        assert_eq!(ground.visited_count(1), 2);

        ground.scenes.get_mut(&1).unwrap().members.truncate(1);
        let added = ground.on_enter_scene(&scene, Some(&table), &mut rng);
        assert!((3..=5).contains(&added));
        assert!(ground.items(1).len() <= 6);
    }

    #[test]
    fn repeated_entries_never_exceed_repeat_max() {
        let scene = open_scene();
        let table = table((0, 0), (4, 6));
        let mut rng = StdRng::seed_from_u64(11);
        let mut ground = GroundItems::default();
        for _ in 0..30 {
            ground.on_enter_scene(&scene, Some(&table), &mut rng);
            assert!(ground.items(1).len() <= 6);
        }
    }

    #[test]
    fn scene_without_table_is_still_counted() {
        let scene = open_scene();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ground = GroundItems::default();
        assert_eq!(ground.on_enter_scene(&scene, None, &mut rng), 0);
        assert_eq!(ground.visited_count(1), 1);
    }

    #[test]
    fn nearest_pile_wins() {
        let mut ground = GroundItems::default();
        let pop = ground.scenes.entry(1).or_default();
        for (x, id) in [(30.0, "rock"), (10.0, "leaves"), (200.0, "log")] {
            pop.members.push(GroundItem {
                item_id: id.into(),
                quantity: 1,
                position: Vec2::new(x, 0.0),
            });
        }
        assert_eq!(ground.nearest_within(1, Vec2::ZERO, 42.0), Some(1));
        assert_eq!(ground.nearest_within(1, Vec2::new(120.0, 0.0), 42.0), None);
        assert_eq!(ground.nearest_within(2, Vec2::ZERO, 42.0), None);
    }

    #[test]
    fn pickup_is_all_or_nothing() {
        let (catalog, ..) = build_registries();
        let mut ground = GroundItems::default();
        ground.scenes.entry(1).or_default().members.push(GroundItem {
            item_id: "rock".into(),
            quantity: 2,
            position: Vec2::ZERO,
        });

        let mut full = Inventory::new(1, 1);
        full.add_item(&catalog, "rock", 98);
        assert!(ground.try_pickup(1, 0, &mut full, &catalog).is_none());
        assert_eq!(full.count_item("rock"), 98);
        assert_eq!(ground.items(1).len(), 1);

        let mut roomy = Inventory::new(4, 10);
        let taken = ground.try_pickup(1, 0, &mut roomy, &catalog).unwrap();
        assert_eq!(taken.quantity, 2);
        assert_eq!(roomy.count_item("rock"), 2);
        assert!(ground.items(1).is_empty());
    }
}
