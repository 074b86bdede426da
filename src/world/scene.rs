use bevy::prelude::*;
use rand::Rng;

use super::collision::{point_in_polygon, CollisionGrid};
use crate::shared::{SceneId, SPAWN_PLACEMENT_ATTEMPTS};

/// One traversable area: bounds, solidity grid and optional land silhouette.
#[derive(Debug, Clone)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    size: Vec2,
    cell_size: f32,
    grid: CollisionGrid,
    /// Silhouette scaled to scene coordinates.
    polygon: Option<Vec<Vec2>>,
}

impl Scene {
    /// Builds the scene and its grid. `outline` is in normalized (0..1)
    /// coordinates; a missing or degenerate outline gives an open rectangle.
    pub fn new(
        id: SceneId,
        name: impl Into<String>,
        size: Vec2,
        cell_size: f32,
        outline: Option<&[Vec2]>,
    ) -> Self {
        let cell_size = cell_size.max(1.0);
        let cell = Vec2::splat(cell_size);
        let (cols, rows) = CollisionGrid::dimensions(size, cell);

        let polygon: Option<Vec<Vec2>> = outline
            .filter(|points| points.len() >= 3)
            .map(|points| points.iter().map(|p| *p * size).collect());

        let grid = match &polygon {
            Some(poly) => CollisionGrid::from_polygon(cols, rows, cell, size, poly),
            None => CollisionGrid::open(cols, rows, cell, size),
        };

        Self {
            id,
            name: name.into(),
            size,
            cell_size,
            grid,
            polygon,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    pub fn polygon(&self) -> Option<&[Vec2]> {
        self.polygon.as_deref()
    }

    pub fn rect_collides(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.grid.rect_collides(x, y, w, h)
    }

    /// Collision test for a box with top-left `pos`.
    pub fn box_collides(&self, pos: Vec2, extent: Vec2) -> bool {
        self.rect_collides(pos.x, pos.y, extent.x, extent.y)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        match &self.polygon {
            Some(poly) => point_in_polygon(p, poly),
            None => p.x >= 0.0 && p.y >= 0.0 && p.x <= self.size.x && p.y <= self.size.y,
        }
    }

    pub fn clamp_to_bounds(&self, p: Vec2) -> Vec2 {
        p.clamp(Vec2::ZERO, self.size)
    }

    /// Centre of the silhouette's bounding box, or of the scene.
    pub fn center(&self) -> Vec2 {
        match self.polygon_bounds() {
            Some((min, max)) => (min + max) * 0.5,
            None => self.size * 0.5,
        }
    }

    fn polygon_bounds(&self) -> Option<(Vec2, Vec2)> {
        let poly = self.polygon.as_ref()?;
        let min = poly.iter().copied().fold(Vec2::splat(f32::MAX), Vec2::min);
        let max = poly.iter().copied().fold(Vec2::splat(f32::MIN), Vec2::max);
        Some((min, max))
    }

    /// Slide-along-wall resolution for a box of `extent` moving from `old`
    /// to `new` (top-left corners). The X step is tried first, then the Y
    /// step from wherever X ended, so a blocked axis is dropped while the
    /// free one still advances. If `old` is free the result is free.
    pub fn resolve_movement(&self, old: Vec2, new: Vec2, extent: Vec2) -> Vec2 {
        if !self.box_collides(new, extent) {
            return new;
        }
        let mut pos = old;
        if !self.box_collides(Vec2::new(new.x, pos.y), extent) {
            pos.x = new.x;
        }
        if !self.box_collides(Vec2::new(pos.x, new.y), extent) {
            pos.y = new.y;
        }
        pos
    }

    /// Uniform point inside the scene. Silhouette scenes use rejection
    /// sampling in the bounding box and fall back to its centre.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        let Some((min, max)) = self.polygon_bounds() else {
            return Vec2::new(
                rng.gen_range(0.0..=self.size.x),
                rng.gen_range(0.0..=self.size.y),
            );
        };
        for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
            let candidate = Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
            if self.contains_point(candidate) {
                return candidate;
            }
        }
        (min + max) * 0.5
    }

    /// Free top-left position for a box of `extent`, as close to the centre
    /// as the grid allows.
    pub fn spawn_point(&self, extent: Vec2) -> Vec2 {
        let preferred = self.center() - extent * 0.5;
        if !self.box_collides(preferred, extent) {
            return preferred;
        }
        let cell = self.grid.cell_size();
        let mut candidates: Vec<Vec2> = (0..self.grid.rows())
            .flat_map(|row| (0..self.grid.cols()).map(move |col| (col, row)))
            .filter(|&(col, row)| !self.grid.is_solid(col, row))
            .map(|(col, row)| {
                Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y) - extent * 0.5
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.distance_squared(preferred)
                .total_cmp(&b.distance_squared(preferred))
        });
        candidates
            .into_iter()
            .find(|pos| !self.box_collides(*pos, extent))
            .unwrap_or(preferred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bordered_scene() -> Scene {
        let outline = [
            Vec2::new(0.1, 0.1),
            Vec2::new(0.9, 0.1),
            Vec2::new(0.9, 0.9),
            Vec2::new(0.1, 0.9),
        ];
        Scene::new(9, "test", Vec2::splat(100.0), 10.0, Some(&outline))
    }

    #[test]
    fn scene_without_outline_is_open() {
        let scene = Scene::new(1, "open", Vec2::new(200.0, 100.0), 20.0, None);
        assert!(scene.grid().solid_cells().is_empty());
        assert!(!scene.rect_collides(0.0, 0.0, 200.0, 100.0));
        assert!(scene.rect_collides(190.0, 10.0, 20.0, 10.0));
    }

    #[test]
    fn rect_inside_silhouette_never_collides_and_outside_always_does() {
        let scene = bordered_scene();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let inside = Vec2::new(rng.gen_range(11.0..80.0), rng.gen_range(11.0..80.0));
            assert!(!scene.box_collides(inside, Vec2::splat(8.0)), "{inside:?}");
            let outside = Vec2::new(rng.gen_range(101.0..300.0), rng.gen_range(-50.0..50.0));
            assert!(scene.box_collides(outside, Vec2::splat(8.0)), "{outside:?}");
        }
        assert!(scene.box_collides(Vec2::new(1.0, 1.0), Vec2::splat(5.0)));
    }

    #[test]
    fn movement_slides_along_wall() {
        let scene = bordered_scene();
        let extent = Vec2::splat(8.0);
        // Hugging the right wall, moving diagonally into it.
        let old = Vec2::new(80.0, 50.0);
        let resolved = scene.resolve_movement(old, Vec2::new(86.0, 55.0), extent);
        assert_eq!(resolved, Vec2::new(80.0, 55.0));
    }

    #[test]
    fn repeated_small_steps_never_end_inside_a_wall() {
        let scene = bordered_scene();
        let extent = Vec2::splat(8.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut pos = Vec2::new(45.0, 45.0);
        for _ in 0..2_000 {
            let step = Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
            pos = scene.resolve_movement(pos, pos + step, extent);
            assert!(!scene.box_collides(pos, extent), "ended in wall at {pos:?}");
        }
    }

    #[test]
    fn random_points_stay_inside_silhouette() {
        let scene = bordered_scene();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let p = scene.random_point(&mut rng);
            assert!(scene.contains_point(p), "{p:?} outside silhouette");
        }
    }

    #[test]
    fn spawn_point_is_walkable() {
        let scene = bordered_scene();
        let spot = scene.spawn_point(Vec2::splat(8.0));
        assert!(!scene.box_collides(spot, Vec2::splat(8.0)));
    }
}
