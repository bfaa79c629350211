//! Debug grid overlay.
//!
//! Produces one wireframe-cube instance per cell: the cells crossed by the
//! current pick ray first, in traversal order and highlighted, then every
//! cell of the grid in grey. Instances are `Pod` so a renderer can upload
//! them directly and draw [`CUBE_LINE_INDICES`] over [`CUBE_VERTICES`]
//! scaled by `cell_size` and offset by `origin`.

use glam::IVec3;

use crate::geometry::Ray;
use crate::grid::{traverse, UniformGrid};

/// Colour of cells crossed by the ray.
pub const TRAVERSED_COLOR: [f32; 3] = [0.0, 0.0, 1.0];
/// Colour of every other cell.
pub const CELL_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Unit cube corners: front face (z = 1) then back face (z = 0).
pub const CUBE_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
];

/// Line-list indices for the 12 cube edges.
pub const CUBE_LINE_INDICES: [u16; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0, // front
    4, 5, 5, 6, 6, 7, 7, 4, // back
    0, 4, 1, 7, 2, 6, 3, 5, // front to back
];

/// Per-instance data for one overlay cell.
///
/// Layout (32 bytes):
///   origin:    [f32; 3]  (offset 0)
///   cell_size: f32       (offset 12)
///   color:     [f32; 3]  (offset 16)
///   _pad:      f32       (offset 28)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridCellInstance {
    /// Minimum corner of the cell in grid-local space.
    pub origin: [f32; 3],
    /// Cell edge length.
    pub cell_size: f32,
    /// Line colour.
    pub color: [f32; 3],
    /// Padding for GPU alignment.
    pub _pad: f32,
}

impl GridCellInstance {
    fn new(grid: &UniformGrid, cell: IVec3, color: [f32; 3]) -> Self {
        Self {
            origin: grid.cell_bounds(cell).min.to_array(),
            cell_size: grid.cell_size(),
            color,
            _pad: 0.0,
        }
    }
}

/// Build overlay instances for `grid`. `ray` must already be in grid-local
/// space; when given, the cells it crosses come first in traversal order.
#[must_use]
pub fn grid_overlay(
    grid: &UniformGrid,
    ray: Option<&Ray>,
) -> Vec<GridCellInstance> {
    let mut instances = Vec::with_capacity(grid.cell_count());

    if let Some(ray) = ray {
        let _ = traverse(grid, ray, |cell| {
            instances.push(GridCellInstance::new(grid, cell, TRAVERSED_COLOR));
        });
    }

    let dims = grid.dims();
    for x in 0..dims.x {
        for y in 0..dims.y {
            for z in 0..dims.z {
                instances.push(GridCellInstance::new(
                    grid,
                    IVec3::new(x, y, z),
                    CELL_COLOR,
                ));
            }
        }
    }
    instances
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn instance_layout_is_32_bytes() {
        assert_eq!(size_of::<GridCellInstance>(), 32);
        let instances = [GridCellInstance {
            origin: [1.0, 2.0, 3.0],
            cell_size: 4.0,
            color: CELL_COLOR,
            _pad: 0.0,
        }];
        let floats: &[f32] = bytemuck::cast_slice(&instances);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 0.5, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn every_cell_is_drawn_once_without_a_ray() {
        let grid =
            UniformGrid::new(Vec3::splat(-1.0), Vec3::new(1.0, 3.0, 1.0), 1.0)
                .unwrap();
        let instances = grid_overlay(&grid, None);
        assert_eq!(instances.len(), grid.cell_count());
        assert!(instances.iter().all(|i| i.color == CELL_COLOR));
        assert_eq!(instances[0].origin, [-1.0, -1.0, -1.0]);
        // z varies fastest
        assert_eq!(instances[1].origin, [-1.0, -1.0, 0.0]);
    }

    #[test]
    fn traversed_cells_lead_in_ray_order() {
        let grid = UniformGrid::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0), 1.0)
            .unwrap();
        let ray = Ray::new(Vec3::new(0.5, 0.2, 0.5), Vec3::new(1.0, 1.0, 0.0));
        let instances = grid_overlay(&grid, Some(&ray));

        assert_eq!(instances.len(), 3 + 4);
        let highlighted: Vec<[f32; 3]> = instances
            .iter()
            .take_while(|i| i.color == TRAVERSED_COLOR)
            .map(|i| i.origin)
            .collect();
        assert_eq!(
            highlighted,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]
        );
        assert!(instances[3..].iter().all(|i| i.color == CELL_COLOR));
    }

    #[test]
    fn cube_edges_reference_valid_corners() {
        assert!(CUBE_LINE_INDICES
            .iter()
            .all(|&i| (i as usize) < CUBE_VERTICES.len()));
        for edge in CUBE_LINE_INDICES.chunks(2) {
            let a = Vec3::from(CUBE_VERTICES[edge[0] as usize]);
            let b = Vec3::from(CUBE_VERTICES[edge[1] as usize]);
            assert!((a.distance(b) - 1.0).abs() < f32::EPSILON);
        }
    }
}
