use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::*;

/// Seconds to maturity for a seed planted in the ground.
pub fn grow_seconds(seed_id: &str) -> f32 {
    match seed_id {
        "seed_kale" => 50.0,
        "seed_carrot" => 55.0,
        "seed_spring_wheat" | "seed_field_pea" => 60.0,
        "seed_spring_barley" | "seed_canola" => 65.0,
        "seed_soy" | "seed_malting_barley" => 70.0,
        "seed_sunflower" => 75.0,
        "seed_potato" => 80.0,
        "seed_corn" | "seed_blueberry" => 85.0,
        "seed_raspberry_ht" => 90.0,
        "seed_cold_hybrid_grape" => 95.0,
        "seed_apple" => 110.0,
        _ => DEFAULT_GROW_SECONDS,
    }
}

const DEFAULT_GROW_SECONDS: f32 = 60.0;

/// Item a seed grows into: the id without its `seed_` prefix.
pub fn product_from_seed(seed_id: &str) -> &str {
    match seed_id.strip_prefix("seed_") {
        Some(product) if !product.is_empty() => product,
        _ => seed_id,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropPlot {
    pub scene_id: SceneId,
    pub position: Vec2,
    pub seed_id: ItemId,
    pub grow_time: f32,
    pub progress: f32,
    pub ready: bool,
}

impl CropPlot {
    pub fn new(scene_id: SceneId, position: Vec2, seed_id: &str) -> Self {
        Self {
            scene_id,
            position,
            seed_id: seed_id.to_string(),
            grow_time: grow_seconds(seed_id),
            progress: 0.0,
            ready: false,
        }
    }

    pub fn grow(&mut self, dt: f32) {
        if self.ready {
            return;
        }
        self.progress = (self.progress + dt).min(self.grow_time);
        if self.progress >= self.grow_time {
            self.ready = true;
        }
    }

    /// Growth in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.grow_time <= 0.0 {
            return 1.0;
        }
        (self.progress / self.grow_time).clamp(0.0, 1.0)
    }

    pub fn product(&self) -> &str {
        product_from_seed(&self.seed_id)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Crops {
    plots: HashMap<SceneId, Vec<CropPlot>>,
}

impl Crops {
    pub fn plots(&self, scene_id: SceneId) -> &[CropPlot] {
        self.plots.get(&scene_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Plants one seed from the inventory. Only seeds the scene's spawn
    /// table drops may be planted there.
    pub fn try_plant(
        &mut self,
        scene_id: SceneId,
        position: Vec2,
        seed_id: &str,
        table: Option<&SceneSpawnTable>,
        inventory: &mut Inventory,
    ) -> bool {
        let allowed = table.is_some_and(|t| t.allowed_seeds().any(|s| s == seed_id));
        if !allowed || inventory.remove_item(seed_id, 1) == 0 {
            return false;
        }
        self.plots
            .entry(scene_id)
            .or_default()
            .push(CropPlot::new(scene_id, position, seed_id));
        true
    }

    /// Grows the plots of one scene.
    pub fn update(&mut self, dt: f32, scene_id: SceneId) {
        if let Some(plots) = self.plots.get_mut(&scene_id) {
            for plot in plots.iter_mut() {
                plot.grow(dt);
            }
        }
    }

    /// Harvests the nearest ready plot strictly within `radius`, yielding one
    /// unit of produce. The plot stays if the inventory has no room.
    pub fn try_harvest_near(
        &mut self,
        scene_id: SceneId,
        position: Vec2,
        inventory: &mut Inventory,
        catalog: &ItemCatalog,
        radius: f32,
    ) -> Option<ItemId> {
        let plots = self.plots.get_mut(&scene_id)?;
        let limit = radius * radius;
        let index = plots
            .iter()
            .enumerate()
            .filter(|(_, plot)| plot.ready)
            .map(|(i, plot)| (i, plot.position.distance_squared(position)))
            .filter(|&(_, d2)| d2 < limit)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)?;

        let product = plots[index].product().to_string();
        if !inventory.can_fit(catalog, &product, 1) || !inventory.add_item(catalog, &product, 1) {
            return None;
        }
        plots.remove(index);
        Some(product)
    }

    pub fn clear(&mut self) {
        self.plots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::build_registries;

    fn setup() -> (ItemCatalog, SpawnTables, Inventory) {
        let (catalog, _, _, tables, _) = build_registries();
        let mut inv = Inventory::new(4, 10);
        inv.add_item(&catalog, "seed_corn", 3);
        (catalog, tables, inv)
    }

    #[test]
    fn products_strip_the_seed_prefix() {
        assert_eq!(product_from_seed("seed_corn"), "corn");
        assert_eq!(product_from_seed("seed_raspberry_ht"), "raspberry_ht");
        assert_eq!(product_from_seed("seed_"), "seed_");
        assert_eq!(product_from_seed("rock"), "rock");
    }

    #[test]
    fn planting_consumes_one_allowed_seed() {
        let (catalog, tables, mut inv) = setup();
        let mut crops = Crops::default();
        assert!(crops.try_plant(1, Vec2::new(50.0, 50.0), "seed_corn", tables.get(1), &mut inv));
        assert_eq!(inv.count_item("seed_corn"), 2);
        assert_eq!(crops.plots(1).len(), 1);
        assert_eq!(crops.plots(1)[0].grow_time, 85.0);

        // Not in the scene's table, or not in the inventory.
        inv.add_item(&catalog, "seed_apple", 1);
        assert!(!crops.try_plant(1, Vec2::ZERO, "seed_apple", tables.get(1), &mut inv));
        assert!(!crops.try_plant(1, Vec2::ZERO, "seed_carrot", tables.get(1), &mut inv));
        assert!(!crops.try_plant(9, Vec2::ZERO, "seed_corn", tables.get(9), &mut inv));
        assert_eq!(inv.count_item("seed_apple"), 1);
    }

    #[test]
    fn crops_ripen_and_harvest_once() {
        let (catalog, tables, mut inv) = setup();
        let mut crops = Crops::default();
        let spot = Vec2::new(100.0, 100.0);
        crops.try_plant(1, spot, "seed_corn", tables.get(1), &mut inv);

        crops.update(80.0, 1);
        assert!(crops.try_harvest_near(1, spot, &mut inv, &catalog, 34.0).is_none());
        crops.update(2.0, 2);
        assert!(!crops.plots(1)[0].ready, "other scenes do not grow this plot");
        crops.update(10.0, 1);
        assert!(crops.plots(1)[0].ready);
        assert_eq!(crops.plots(1)[0].fraction(), 1.0);

        assert!(crops
            .try_harvest_near(1, spot + Vec2::new(34.0, 0.0), &mut inv, &catalog, 34.0)
            .is_none());
        assert_eq!(
            crops.try_harvest_near(1, spot + Vec2::new(20.0, 0.0), &mut inv, &catalog, 34.0),
            Some("corn".to_string())
        );
        assert_eq!(inv.count_item("corn"), 1);
        assert!(crops.plots(1).is_empty());
    }

    #[test]
    fn full_inventory_keeps_the_plot() {
        let (catalog, tables, _) = setup();
        let mut inv = Inventory::new(1, 1);
        inv.add_item(&catalog, "seed_corn", 1);
        let mut crops = Crops::default();
        crops.try_plant(1, Vec2::ZERO, "seed_corn", tables.get(1), &mut inv);
        inv.add_item(&catalog, "rock", 99);
        crops.update(100.0, 1);
        assert!(crops.try_harvest_near(1, Vec2::ZERO, &mut inv, &catalog, 34.0).is_none());
        assert_eq!(crops.plots(1).len(), 1);
    }
}
