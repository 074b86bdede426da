//! Solidity grid derived from a scene silhouette.
//!
//! A cell is solid iff its centre lies outside the polygon. Without a polygon
//! every cell is open and only leaving the scene bounds blocks movement.

use bevy::prelude::*;
use std::ops::RangeInclusive;

/// Even-odd ray cast: counts crossings of a horizontal ray from `p` towards
/// +x. Polygons with fewer than three points contain nothing.
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionGrid {
    cols: usize,
    rows: usize,
    cell: Vec2,
    /// Extent that counts as in-bounds; may exceed `cols * cell` by a partial cell.
    bounds: Vec2,
    /// Row-major.
    solid: Vec<bool>,
}

impl CollisionGrid {
    /// Grid dimensions for a scene: `floor(size / cell)` per axis, at least 1×1.
    pub fn dimensions(bounds: Vec2, cell: Vec2) -> (usize, usize) {
        let axis = |extent: f32, step: f32| {
            if step > 0.0 {
                ((extent / step).floor() as usize).max(1)
            } else {
                1
            }
        };
        (axis(bounds.x, cell.x), axis(bounds.y, cell.y))
    }

    /// Fully open grid; only leaving `bounds` collides.
    pub fn open(cols: usize, rows: usize, cell: Vec2, bounds: Vec2) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cell,
            bounds,
            solid: vec![false; cols * rows],
        }
    }

    /// Marks every cell whose centre falls outside `polygon` (world
    /// coordinates) as solid. A degenerate polygon yields an open grid.
    pub fn from_polygon(
        cols: usize,
        rows: usize,
        cell: Vec2,
        bounds: Vec2,
        polygon: &[Vec2],
    ) -> Self {
        let mut grid = Self::open(cols, rows, cell, bounds);
        if polygon.len() < 3 {
            return grid;
        }
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let centre = Vec2::new(
                    (col as f32 + 0.5) * cell.x,
                    (row as f32 + 0.5) * cell.y,
                );
                grid.solid[row * grid.cols + col] = !point_in_polygon(centre, polygon);
            }
        }
        grid
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Cells outside the grid count as solid.
    pub fn is_solid(&self, col: usize, row: usize) -> bool {
        if col >= self.cols || row >= self.rows {
            return true;
        }
        self.solid[row * self.cols + col]
    }

    pub fn solid_cells(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (col, row)))
            .filter(|&(col, row)| self.solid[row * self.cols + col])
            .collect()
    }

    /// Columns and rows touched by the rectangle, clamped to the grid.
    ///
    /// Edges lying exactly on a cell boundary include the cells on both
    /// sides of it.
    pub fn cell_range(
        &self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
        let span = |start: f32, len: f32, step: f32, count: usize| {
            let last = count as i64 - 1;
            let lo = ((start / step).ceil() as i64 - 1).clamp(0, last) as usize;
            let hi = (((start + len.max(0.0)) / step).floor() as i64).clamp(0, last) as usize;
            lo..=hi.max(lo)
        };
        (
            span(x, w, self.cell.x, self.cols),
            span(y, h, self.cell.y, self.rows),
        )
    }

    /// True if the rectangle leaves the bounds or touches any solid cell.
    pub fn rect_collides(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        if x < 0.0 || y < 0.0 || x + w > self.bounds.x || y + h > self.bounds.y {
            return true;
        }
        let (cols, rows) = self.cell_range(x, y, w, h);
        rows.into_iter()
            .any(|row| cols.clone().any(|col| self.is_solid(col, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lo: f32, hi: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(lo, lo),
            Vec2::new(hi, lo),
            Vec2::new(hi, hi),
            Vec2::new(lo, hi),
        ]
    }

    /// 10×10 cells of 10 units, open except for a one-cell border.
    fn bordered_grid() -> CollisionGrid {
        CollisionGrid::from_polygon(
            10,
            10,
            Vec2::splat(10.0),
            Vec2::splat(100.0),
            &square(10.0, 90.0),
        )
    }

    #[test]
    fn point_in_convex_polygon() {
        let poly = square(0.0, 1.0);
        for p in [Vec2::new(0.5, 0.5), Vec2::new(0.01, 0.99), Vec2::new(0.7, 0.2)] {
            assert!(point_in_polygon(p, &poly), "{p:?} should be inside");
        }
        for p in [Vec2::new(-0.1, 0.5), Vec2::new(1.5, 0.5), Vec2::new(0.5, 1.01)] {
            assert!(!point_in_polygon(p, &poly), "{p:?} should be outside");
        }
    }

    #[test]
    fn boundary_points_are_stable() {
        let poly = square(0.0, 1.0);
        let edge = Vec2::new(0.0, 0.5);
        let first = point_in_polygon(edge, &poly);
        for _ in 0..10 {
            assert_eq!(point_in_polygon(edge, &poly), first);
        }
    }

    #[test]
    fn degenerate_polygon_contains_nothing_and_grid_stays_open() {
        let line = vec![Vec2::ZERO, Vec2::splat(100.0)];
        assert!(!point_in_polygon(Vec2::splat(50.0), &line));
        let grid = CollisionGrid::from_polygon(4, 4, Vec2::splat(25.0), Vec2::splat(100.0), &line);
        assert!(grid.solid_cells().is_empty());
        assert!(!grid.rect_collides(10.0, 10.0, 80.0, 80.0));
    }

    #[test]
    fn bordered_square_center_is_free_and_corner_is_blocked() {
        let grid = bordered_grid();
        assert!(!grid.rect_collides(45.0, 45.0, 10.0, 10.0));
        assert!(!grid.rect_collides(50.0, 50.0, 0.0, 0.0));
        assert!(grid.rect_collides(0.0, 0.0, 8.0, 8.0));
        assert_eq!(grid.solid_cells().len(), 36);
    }

    #[test]
    fn open_grid_only_blocks_out_of_bounds() {
        let grid = CollisionGrid::open(4, 4, Vec2::splat(25.0), Vec2::splat(100.0));
        assert!(!grid.rect_collides(0.0, 0.0, 100.0, 100.0));
        assert!(grid.rect_collides(-1.0, 10.0, 5.0, 5.0));
        assert!(grid.rect_collides(96.0, 10.0, 5.0, 5.0));
        assert!(grid.rect_collides(500.0, 500.0, 5.0, 5.0));
    }

    #[test]
    fn exact_cell_boundary_includes_both_neighbours() {
        let grid = bordered_grid();
        let (cols, rows) = grid.cell_range(20.0, 30.0, 20.0, 10.0);
        assert_eq!(cols, 1..=4);
        assert_eq!(rows, 2..=4);

        // Right edge exactly on the border cell: blocked.
        assert!(grid.rect_collides(85.0, 50.0, 5.0, 5.0));
        // Just short of it: free.
        assert!(!grid.rect_collides(84.0, 50.0, 5.0, 5.0));
    }

    #[test]
    fn dimensions_floor_with_minimum_one() {
        assert_eq!(
            CollisionGrid::dimensions(Vec2::new(1920.0, 1088.0), Vec2::splat(48.0)),
            (40, 22)
        );
        assert_eq!(
            CollisionGrid::dimensions(Vec2::new(10.0, 10.0), Vec2::splat(48.0)),
            (1, 1)
        );
    }
}
