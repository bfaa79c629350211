//! Uniform spatial grid over an atom set.
//!
//! The grid partitions an axis-aligned region into equal cubic cells and
//! records which atom ids touch each cell. Two variants are built per
//! structure (see [`InsertionMode`]): a centre-only grid for proximity
//! queries and the debug overlay, and a sphere-overlap grid for picking.
//!
//! Cells are stored sparsely, keyed by linear index
//! `z * dims.x * dims.y + y * dims.x + x`; an absent cell is empty.

pub mod traversal;

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;

use crate::error::GridError;
use crate::geometry::{intersect_sphere_aabb, Aabb};
use crate::molecule::{Atom, AtomId};

pub use traversal::{traverse, GridTraversal, BOUNDARY_EPSILON};

/// How an atom is registered in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionMode {
    /// Only the cell containing the atom centre.
    CenterOnly,
    /// Every cell of the 3x3x3 neighbourhood around the centre cell whose
    /// bounds the atom sphere touches. An id may appear in several cells.
    SphereOverlap,
}

/// Uniform grid of cubic cells holding atom ids.
///
/// `dims.x * dims.y * dims.z` always fits in `usize`, so linear indices
/// never overflow.
#[derive(Debug, Clone)]
pub struct UniformGrid {
    min: Vec3,
    cell_size: f32,
    dims: IVec3,
    cells: FxHashMap<usize, Vec<AtomId>>,
}

impl UniformGrid {
    /// Create an empty grid covering `min..max`.
    ///
    /// Each axis gets `ceil(extent / cell_size)` cells, at least one even
    /// when the extent is zero. Fails when the cell size is not positive or
    /// the total cell count does not fit in `usize`.
    pub fn new(
        min: Vec3,
        max: Vec3,
        cell_size: f32,
    ) -> Result<Self, GridError> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(GridError::InvalidParameter(format!(
                "cell size must be positive and finite, got {cell_size}"
            )));
        }
        let cells_per_axis = ((max - min) / cell_size).ceil();
        let dims = IVec3::new(
            axis_cells(cells_per_axis.x),
            axis_cells(cells_per_axis.y),
            axis_cells(cells_per_axis.z),
        );
        let total = (dims.x as usize)
            .checked_mul(dims.y as usize)
            .and_then(|n| n.checked_mul(dims.z as usize));
        if total.is_none() {
            return Err(GridError::InvalidParameter(format!(
                "{}x{}x{} cells of size {cell_size} overflow the cell index",
                dims.x, dims.y, dims.z
            )));
        }
        Ok(Self {
            min,
            cell_size,
            dims,
            cells: FxHashMap::default(),
        })
    }

    /// Create a grid over `bounds` and insert every atom with `mode`.
    pub fn build(
        bounds: &Aabb,
        cell_size: f32,
        mode: InsertionMode,
        atoms: &[Atom],
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(bounds.min, bounds.max, cell_size)?;
        let mut outside = 0usize;
        for atom in atoms {
            if grid.insert(atom, mode) == 0 {
                outside += 1;
            }
        }
        if outside > 0 {
            log::warn!(
                "{outside} of {} atoms lie outside the {mode:?} grid",
                atoms.len()
            );
        }
        log::debug!(
            "{mode:?} grid: {}x{}x{} cells of size {:.3}, {} occupied",
            grid.dims.x,
            grid.dims.y,
            grid.dims.z,
            grid.cell_size,
            grid.cells.len()
        );
        Ok(grid)
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Edge length of one cell.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell count per axis.
    #[must_use]
    pub fn dims(&self) -> IVec3 {
        self.dims
    }

    /// Total number of cells, occupied or not.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.dims.x as usize * self.dims.y as usize * self.dims.z as usize
    }

    /// Number of cells holding at least one atom id.
    #[must_use]
    pub fn occupied_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The region actually covered by cells: `min .. min + dims * cell_size`.
    /// May extend past the `max` passed to [`UniformGrid::new`].
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.min,
            self.min + self.dims.as_vec3() * self.cell_size,
        )
    }

    /// Cell containing `point`, using half-open `[min, max)` cells.
    ///
    /// The result may be outside the grid; check [`UniformGrid::in_bounds`].
    #[must_use]
    pub fn cell_index_3d(&self, point: Vec3) -> IVec3 {
        ((point - self.min) / self.cell_size).floor().as_ivec3()
    }

    /// Whether `0 <= cell < dims` on every axis.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, cell: IVec3) -> bool {
        cell.cmpge(IVec3::ZERO).all() && cell.cmplt(self.dims).all()
    }

    /// Linear storage index of an in-bounds cell.
    pub fn linear_index(&self, cell: IVec3) -> Result<usize, GridError> {
        if !self.in_bounds(cell) {
            return Err(GridError::OutOfBounds {
                x: cell.x,
                y: cell.y,
                z: cell.z,
            });
        }
        let (nx, ny) = (self.dims.x as usize, self.dims.y as usize);
        Ok(cell.z as usize * nx * ny + cell.y as usize * nx + cell.x as usize)
    }

    /// Axis-aligned bounds of a cell. Defined for any coordinate, in or out
    /// of the grid.
    #[must_use]
    pub fn cell_bounds(&self, cell: IVec3) -> Aabb {
        let min = self.min + cell.as_vec3() * self.cell_size;
        Aabb::new(min, min + Vec3::splat(self.cell_size))
    }

    /// Atom ids stored in a cell; empty for unoccupied or out-of-bounds
    /// cells.
    #[must_use]
    pub fn cell_ids(&self, cell: IVec3) -> &[AtomId] {
        self.linear_index(cell)
            .ok()
            .and_then(|index| self.cells.get(&index))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// In-bounds cells of the 3x3x3 block centred on `center`.
    pub fn neighborhood(
        &self,
        center: IVec3,
    ) -> impl Iterator<Item = IVec3> + '_ {
        (-1..=1)
            .flat_map(|x| {
                (-1..=1).flat_map(move |y| {
                    (-1..=1).map(move |z| IVec3::new(x, y, z))
                })
            })
            .map(move |offset| center + offset)
            .filter(move |&cell| self.in_bounds(cell))
    }

    /// Insert an atom according to `mode`. Returns how many cells received
    /// its id.
    pub fn insert(&mut self, atom: &Atom, mode: InsertionMode) -> usize {
        match mode {
            InsertionMode::CenterOnly => usize::from(self.insert_center(atom)),
            InsertionMode::SphereOverlap => self.insert_overlapping(atom),
        }
    }

    /// Store the atom id in the cell holding its centre. Returns `false`
    /// when the centre lies outside the grid.
    pub fn insert_center(&mut self, atom: &Atom) -> bool {
        let cell = self.cell_index_3d(atom.position);
        self.push_id(cell, atom.id)
    }

    /// Store the atom id in every neighbourhood cell its sphere touches.
    ///
    /// Only the 3x3x3 block around the centre cell is checked, so every
    /// cell the sphere covers is reached only when `radius <= cell_size`.
    pub fn insert_overlapping(&mut self, atom: &Atom) -> usize {
        let center = self.cell_index_3d(atom.position);
        let touched: Vec<IVec3> = self
            .neighborhood(center)
            .filter(|&cell| {
                intersect_sphere_aabb(
                    atom.position,
                    atom.radius,
                    &self.cell_bounds(cell),
                )
            })
            .collect();
        let mut inserted = 0;
        for cell in touched {
            if self.push_id(cell, atom.id) {
                inserted += 1;
            }
        }
        inserted
    }

    fn push_id(&mut self, cell: IVec3, id: AtomId) -> bool {
        match self.linear_index(cell) {
            Ok(index) => {
                self.cells.entry(index).or_default().push(id);
                true
            }
            Err(_) => false,
        }
    }
}

fn axis_cells(cells: f32) -> i32 {
    // `as` saturates and maps NaN to 0.
    (cells as i32).max(1)
}
