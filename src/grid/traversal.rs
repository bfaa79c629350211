//! Ordered cell walk along a ray (3D-DDA).
//!
//! Starting from the cell that holds the ray origin, or the cell where the
//! ray enters the grid when it starts outside, the walk steps one face at a
//! time along whichever axis reaches its next cell boundary first. Cells
//! come out in increasing distance along the ray and the walk stops as soon
//! as it leaves the grid.

use glam::{IVec3, Vec3};

use super::UniformGrid;
use crate::geometry::{intersect_ray_aabb, sign, Ray, SlabInterval};

/// Distance added past the grid entry point so the restarted origin falls
/// inside the first cell rather than on its face.
pub const BOUNDARY_EPSILON: f32 = 1e-3;

/// Per-query state of a cell walk. Iterating yields cell coordinates.
#[derive(Debug, Clone)]
pub struct GridTraversal<'a> {
    grid: &'a UniformGrid,
    /// Current cell coordinates.
    cell: IVec3,
    /// Per-axis step direction (-1, 0 or +1).
    step: IVec3,
    /// Ray distance at which the next boundary on each axis is crossed.
    t_max: Vec3,
    /// Ray distance between two boundaries on each axis.
    t_delta: Vec3,
    /// Upper bound on the remaining cells; each step advances one axis
    /// monotonically, so a walk never exceeds `dims.x + dims.y + dims.z`.
    remaining: usize,
}

impl<'a> GridTraversal<'a> {
    /// Start a walk for a grid-local `ray` whose entry into the grid bounds
    /// is `entry` (from [`intersect_ray_aabb`]).
    ///
    /// Returns `None` when the ray cannot be traced, misses the grid, points
    /// away from it, or only grazes it.
    #[must_use]
    pub fn new(
        grid: &'a UniformGrid,
        ray: &Ray,
        entry: &SlabInterval,
    ) -> Option<Self> {
        if !ray.is_traceable() || !entry.is_hit() || entry.t1 < 0.0 {
            return None;
        }

        let mut origin = ray.origin;
        let mut cell = grid.cell_index_3d(origin);
        if !grid.in_bounds(cell) {
            origin = ray.at(entry.t0 + BOUNDARY_EPSILON);
            cell = grid.cell_index_3d(origin);
            if !grid.in_bounds(cell) {
                return None;
            }
        }

        let direction = ray.direction;
        let step = IVec3::new(
            sign(direction.x),
            sign(direction.y),
            sign(direction.z),
        );
        let t_delta = (Vec3::splat(grid.cell_size()) / direction).abs();

        let bounds = grid.cell_bounds(cell);
        let mut t_max = Vec3::INFINITY;
        for axis in 0..3 {
            // Axes with a zero step keep an infinite t_max and never win.
            match step[axis] {
                1 => {
                    t_max[axis] =
                        (bounds.max[axis] - origin[axis]) / direction[axis];
                }
                -1 => {
                    t_max[axis] =
                        (bounds.min[axis] - origin[axis]) / direction[axis];
                }
                _ => {}
            }
        }

        let dims = grid.dims();
        Some(Self {
            grid,
            cell,
            step,
            t_max,
            t_delta,
            remaining: (dims.x + dims.y + dims.z) as usize,
        })
    }

    /// Intersect the ray with the grid bounds and start a walk.
    #[must_use]
    pub fn from_ray(grid: &'a UniformGrid, ray: &Ray) -> Option<Self> {
        let entry = intersect_ray_aabb(ray, &grid.bounds());
        Self::new(grid, ray, &entry)
    }

    /// Current cell.
    #[must_use]
    pub fn cell(&self) -> IVec3 {
        self.cell
    }

    /// Step along the axis whose boundary is nearest.
    ///
    /// Ties go X over Y, and the winner of that over Z on `<` only, so an
    /// equal Z always wins.
    fn advance(&mut self) {
        let t = self.t_max;
        let axis = if t.x < t.y {
            if t.x < t.z {
                0
            } else {
                2
            }
        } else if t.y < t.z {
            1
        } else {
            2
        };
        self.cell[axis] += self.step[axis];
        self.t_max[axis] += self.t_delta[axis];
    }
}

impl Iterator for GridTraversal<'_> {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if self.remaining == 0 || !self.grid.in_bounds(self.cell) {
            return None;
        }
        self.remaining -= 1;
        let current = self.cell;
        self.advance();
        Some(current)
    }
}

/// Visit every cell `ray` passes through inside `grid`, nearest first.
/// Returns the number of cells visited.
pub fn traverse(
    grid: &UniformGrid,
    ray: &Ray,
    mut visit: impl FnMut(IVec3),
) -> usize {
    GridTraversal::from_ray(grid, ray).map_or(0, |walk| {
        let mut visited = 0;
        for cell in walk {
            visit(cell);
            visited += 1;
        }
        visited
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn cells(grid: &UniformGrid, ray: &Ray) -> Vec<IVec3> {
        GridTraversal::from_ray(grid, ray)
            .map(Iterator::collect)
            .unwrap_or_default()
    }

    #[test]
    fn walks_known_staircase() {
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0), 1.0)
            .unwrap();
        let ray = Ray::new(Vec3::new(0.5, 0.2, 0.5), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(
            cells(&grid, &ray),
            vec![
                IVec3::new(0, 0, 0),
                IVec3::new(1, 0, 0),
                IVec3::new(1, 1, 0),
            ]
        );
    }

    #[test]
    fn corner_diagonal_ties_step_z_then_y_then_x() {
        // All three t_max values start equal. X < Y fails, so Y is compared
        // against Z, which also fails, and Z steps first.
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::splat(3.0), 1.0).unwrap();
        let ray = Ray::new(Vec3::splat(0.5), Vec3::ONE);
        assert_eq!(
            cells(&grid, &ray),
            vec![
                IVec3::new(0, 0, 0),
                IVec3::new(0, 0, 1),
                IVec3::new(0, 1, 1),
                IVec3::new(1, 1, 1),
                IVec3::new(1, 1, 2),
                IVec3::new(1, 2, 2),
                IVec3::new(2, 2, 2),
            ]
        );
    }

    #[test]
    fn ray_from_outside_enters_at_boundary() {
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::splat(4.0), 1.0).unwrap();
        let ray = Ray::new(Vec3::new(-3.0, 1.5, 2.5), Vec3::X);
        assert_eq!(
            cells(&grid, &ray),
            (0..4).map(|x| IVec3::new(x, 1, 2)).collect::<Vec<_>>()
        );

        let reverse = Ray::new(Vec3::new(9.0, 0.5, 0.5), -Vec3::X);
        assert_eq!(
            cells(&grid, &reverse),
            (0..4).rev().map(|x| IVec3::new(x, 0, 0)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn axis_parallel_rays_never_step_other_axes() {
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::splat(3.0), 1.0).unwrap();
        for (axis, dir) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().enumerate() {
            let origin = Vec3::splat(0.5) - dir * 2.0;
            let visited = cells(&grid, &Ray::new(origin, dir));
            assert_eq!(visited.len(), 3);
            for (i, cell) in visited.iter().enumerate() {
                let mut expected = IVec3::ZERO;
                expected[axis] = i as i32;
                assert_eq!(*cell, expected);
            }
        }
    }

    #[test]
    fn misses_and_degenerate_rays_visit_nothing() {
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::splat(2.0), 1.0).unwrap();
        let beside = Ray::new(Vec3::new(-1.0, 5.0, 0.5), Vec3::X);
        assert_eq!(traverse(&grid, &beside, |_| {}), 0);

        let away = Ray::new(Vec3::new(-1.0, 0.5, 0.5), -Vec3::X);
        assert_eq!(traverse(&grid, &away, |_| {}), 0);

        let still = Ray::new(Vec3::splat(0.5), Vec3::ZERO);
        assert_eq!(traverse(&grid, &still, |_| {}), 0);

        let broken = Ray::new(Vec3::splat(0.5), Vec3::new(f32::NAN, 1.0, 0.0));
        assert_eq!(traverse(&grid, &broken, |_| {}), 0);
    }

    #[test]
    fn origin_on_cell_face_starts_in_upper_cell() {
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::splat(3.0), 1.0).unwrap();
        let ray = Ray::new(Vec3::new(1.0, 0.5, 0.5), Vec3::X);
        assert_eq!(
            cells(&grid, &ray),
            vec![IVec3::new(1, 0, 0), IVec3::new(2, 0, 0)]
        );
    }

    #[test]
    fn walk_is_bounded_and_contiguous() {
        const N: i32 = 8;
        let grid =
            UniformGrid::new(Vec3::ZERO, Vec3::splat(N as f32), 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.random_range(-20.0..28.0),
                rng.random_range(-20.0..28.0),
                rng.random_range(-20.0..28.0),
            );
            let direction = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let visited = cells(&grid, &Ray::new(origin, direction));
            assert!(visited.len() <= 3 * N as usize);
            for pair in visited.windows(2) {
                // Face neighbours: exactly one axis changes by one.
                let diff = (pair[1] - pair[0]).abs();
                assert_eq!(diff.element_sum(), 1, "{pair:?}");
            }
            assert!(visited.iter().all(|&c| grid.in_bounds(c)));
        }
    }

    #[test]
    fn visited_cells_are_ordered_by_distance() {
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::splat(6.0), 1.0).unwrap();
        let ray = Ray::new(
            Vec3::new(-1.0, 0.3, 0.2),
            Vec3::new(1.0, 0.7, 0.45).normalize(),
        );
        let mut last_entry = f32::NEG_INFINITY;
        let count = traverse(&grid, &ray, |cell| {
            let entry = intersect_ray_aabb(&ray, &grid.cell_bounds(cell));
            assert!(entry.is_hit());
            assert!(entry.t0 >= last_entry - 1e-4);
            last_entry = entry.t0;
        });
        assert!(count >= 6);
    }
}
