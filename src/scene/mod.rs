//! Loaded-molecule context: atoms, both spatial grids, occluders and the
//! interactive view state, owned together and passed by reference.
//!
//! [`MoleculeScene::load`] runs the whole per-structure setup once; picking,
//! hover, click and overlay queries then run against the stored state.

use glam::{Vec2, Vec3};

use crate::camera::OrbitController;
use crate::error::GridError;
use crate::geometry::Aabb;
use crate::grid::{InsertionMode, UniformGrid};
use crate::molecule::{AtomId, Molecule};
use crate::occlusion::{compute_occluders, OccluderBuffer};
use crate::options::Options;
use crate::overlay::{grid_overlay, GridCellInstance};
use crate::picking::{Picker, Selection};

// ---------------------------------------------------------------------------
// MoleculeScene
// ---------------------------------------------------------------------------

/// A molecule prepared for viewing.
#[derive(Debug, Clone)]
pub struct MoleculeScene {
    molecule: Molecule,
    /// Mid point subtracted from the input coordinates.
    center_offset: Vec3,
    bounds: Aabb,
    max_radius: f32,
    /// Centre-only grid: occluder source and debug overlay.
    center_grid: UniformGrid,
    /// Sphere-overlap grid used for picking.
    picking_grid: UniformGrid,
    occluders: OccluderBuffer,
    picker: Picker,
    /// Hover and click selection.
    pub selection: Selection,
    /// Model rotation, zoom and camera.
    pub controller: OrbitController,
    options: Options,
    viewport: Vec2,
}

impl MoleculeScene {
    /// Centre `molecule` on its mid point, build both grids with
    /// `cell size = max radius * cell_size_factor`, compute the occluder
    /// buffer and fit the camera.
    ///
    /// `cell_size_factor` must be at least 1 so every sphere fits in the
    /// 3x3x3 block the picking grid registers it in.
    pub fn load(
        mut molecule: Molecule,
        options: &Options,
        viewport: Vec2,
    ) -> Result<Self, GridError> {
        let factor = options.grid.cell_size_factor;
        if factor.is_nan() || factor < 1.0 {
            return Err(GridError::InvalidParameter(format!(
                "cell size factor must be at least 1, got {factor}"
            )));
        }
        let center_offset = molecule.mid_point().ok_or_else(|| {
            GridError::InvalidParameter("molecule has no atoms".to_owned())
        })?;
        molecule.center_on(center_offset);

        let bounds = molecule.bounding_box()?;
        let max_radius = molecule.max_radius()?;
        let cell_size = max_radius * factor;

        let center_grid = UniformGrid::build(
            &bounds,
            cell_size,
            InsertionMode::CenterOnly,
            molecule.atoms(),
        )?;
        let picking_grid = UniformGrid::build(
            &bounds,
            cell_size,
            InsertionMode::SphereOverlap,
            molecule.atoms(),
        )?;
        let occluders = compute_occluders(
            molecule.atoms(),
            &center_grid,
            options.grid.occluder_capacity.max_occluders(),
        )?;

        let aspect = if viewport.y > 0.0 {
            viewport.x / viewport.y
        } else {
            1.0
        };
        let mut controller = OrbitController::new(&options.camera, aspect);
        controller.fit(molecule.furthest_distance_to(Vec3::ZERO), max_radius);

        log::info!(
            "loaded {} atoms: grid {}x{}x{} cells of {:.2}, zoom {:.1}",
            molecule.len(),
            center_grid.dims().x,
            center_grid.dims().y,
            center_grid.dims().z,
            cell_size,
            controller.zoom()
        );

        Ok(Self {
            picker: Picker::new(molecule.len()),
            molecule,
            center_offset,
            bounds,
            max_radius,
            center_grid,
            picking_grid,
            occluders,
            selection: Selection::new(),
            controller,
            options: options.clone(),
            viewport,
        })
    }

    /// The centred molecule.
    #[must_use]
    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    /// Offset subtracted from the input coordinates while centring.
    #[must_use]
    pub fn center_offset(&self) -> Vec3 {
        self.center_offset
    }

    /// Bounding box of the centred atom spheres.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Largest atom radius.
    #[must_use]
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Centre-only grid.
    #[must_use]
    pub fn center_grid(&self) -> &UniformGrid {
        &self.center_grid
    }

    /// Sphere-overlap picking grid.
    #[must_use]
    pub fn picking_grid(&self) -> &UniformGrid {
        &self.picking_grid
    }

    /// Occluder table for the lighting stage.
    #[must_use]
    pub fn occluders(&self) -> &OccluderBuffer {
        &self.occluders
    }

    /// Options the scene was loaded with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current light position for the fitted zoom.
    #[must_use]
    pub fn light_position(&self) -> Vec3 {
        self.options.lighting.light_position(self.controller.zoom())
    }

    /// Track a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = Vec2::new(width as f32, height as f32);
            self.controller.resize(width, height);
        }
    }

    /// Atom under the screen position `screen` (pixels, top-left origin).
    pub fn pick(&mut self, screen: Vec2) -> Option<AtomId> {
        self.picker.pick(
            screen,
            self.viewport,
            &self.controller.camera,
            &self.controller.model(),
            &self.picking_grid,
            self.molecule.atoms(),
        )
    }

    /// Update the hovered atom from the cursor. Returns whether it changed.
    pub fn hover(&mut self, screen: Vec2) -> bool {
        let hit = self.pick(screen);
        self.selection.update_hover(hit)
    }

    /// Apply a click at `screen`. Returns whether the selection changed.
    pub fn click(&mut self, screen: Vec2, shift_held: bool) -> bool {
        let hit = self.pick(screen);
        self.selection.handle_click(hit, shift_held)
    }

    /// Debug grid overlay for the cursor at `cursor`, or nothing when the
    /// overlay is disabled.
    #[must_use]
    pub fn overlay(&self, cursor: Option<Vec2>) -> Vec<GridCellInstance> {
        if !self.options.debug.show_grid {
            return Vec::new();
        }
        let ray = cursor.and_then(|screen| {
            self.controller.local_ray(screen, self.viewport)
        });
        grid_overlay(&self.center_grid, ray.as_ref())
    }
}
