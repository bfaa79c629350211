//! Grid-accelerated ray picking.
//!
//! A [`Picker`] walks the sphere-overlap grid along a ray and keeps the
//! nearest sphere hit. It owns a stamp array sized by the atom count passed
//! to [`Picker::new`]; that count is only a capacity hint, since the array
//! grows to fit whatever atom slice a query is given.

use glam::{Mat4, Vec2};

use crate::camera::Camera;
use crate::geometry::{intersect_ray_sphere, Ray};
use crate::grid::{GridTraversal, UniformGrid};
use crate::molecule::{Atom, AtomId};

/// Nearest atom hit along a pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Hit atom.
    pub atom_id: AtomId,
    /// Distance along the local ray, in direction units.
    pub distance: f32,
}

/// Grid-accelerated atom picker.
///
/// Atoms spanning several cells are stored in each of them, so every query
/// marks tested atoms with a per-query generation stamp to sphere-test each
/// atom at most once. Queries on one picker are sequential; the `&mut self`
/// receiver makes concurrent use impossible.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    stamps: Vec<u32>,
    generation: u32,
}

impl Picker {
    /// Picker with scratch space for `atom_count` atoms. The scratch grows
    /// on demand, so the count is only a hint.
    #[must_use]
    pub fn new(atom_count: usize) -> Self {
        Self {
            stamps: vec![0; atom_count],
            generation: 0,
        }
    }

    /// Reset the tested set: bump the generation, clearing all stamps only
    /// when the counter wraps.
    fn begin_query(&mut self, atom_count: usize) {
        if self.stamps.len() < atom_count {
            self.stamps.resize(atom_count, 0);
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.fill(0);
            self.generation = 1;
        }
    }

    /// Mark `id` as tested in this query. Returns `false` if it already was.
    fn mark(&mut self, id: AtomId) -> bool {
        match self.stamps.get_mut(id as usize) {
            Some(stamp) if *stamp != self.generation => {
                *stamp = self.generation;
                true
            }
            _ => false,
        }
    }

    /// Nearest atom hit by a ray already in the grid's local frame.
    ///
    /// Cells are walked in ray order and every atom in them is tested once;
    /// the minimum distance over the whole walk wins. Distances are measured
    /// from `ray.origin`, even when the walk starts at the grid boundary.
    pub fn pick_ray(
        &mut self,
        ray: &Ray,
        grid: &UniformGrid,
        atoms: &[Atom],
    ) -> Option<PickHit> {
        let walk = GridTraversal::from_ray(grid, ray)?;
        self.begin_query(atoms.len());

        let mut nearest: Option<PickHit> = None;
        let mut tested = 0usize;
        for cell in walk {
            for &id in grid.cell_ids(cell) {
                if !self.mark(id) {
                    continue;
                }
                let Some(atom) = atoms.get(id as usize) else {
                    continue;
                };
                tested += 1;
                let Some(distance) =
                    intersect_ray_sphere(ray, atom.position, atom.radius)
                else {
                    continue;
                };
                if nearest.is_none_or(|hit| distance < hit.distance) {
                    nearest = Some(PickHit {
                        atom_id: id,
                        distance,
                    });
                }
            }
        }

        log::trace!("pick: {tested} atoms tested, hit {nearest:?}");
        nearest
    }

    /// Atom under the screen pixel `screen`, for a molecule drawn with
    /// `model` by `camera` into a `viewport`-sized surface.
    pub fn pick(
        &mut self,
        screen: Vec2,
        viewport: Vec2,
        camera: &Camera,
        model: &Mat4,
        grid: &UniformGrid,
        atoms: &[Atom],
    ) -> Option<AtomId> {
        let world = camera.screen_ray(screen, viewport)?;
        let local = world.to_local(model);
        self.pick_ray(&local, grid, atoms).map(|hit| hit.atom_id)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::grid::InsertionMode;
    use crate::molecule::Molecule;
    use crate::options::CameraOptions;

    fn picking_grid(mol: &Molecule) -> UniformGrid {
        let cell = mol.max_radius().unwrap() * 2.0;
        UniformGrid::build(
            &mol.bounding_box().unwrap(),
            cell,
            InsertionMode::SphereOverlap,
            mol.atoms(),
        )
        .unwrap()
    }

    #[test]
    fn nearest_of_two_spheres_wins() {
        let mol = Molecule::new([
            (Vec3::new(1.0, 0.0, 0.0), 1.0),
            (Vec3::new(5.0, 0.0, 0.0), 1.0),
        ]);
        let grid = picking_grid(&mol);
        let mut picker = Picker::new(mol.len());
        let ray = Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::X);

        let hit = picker.pick_ray(&ray, &grid, mol.atoms()).unwrap();
        assert_eq!(hit.atom_id, 0);
        assert!((hit.distance - 3.0).abs() < 1e-5);

        // Same answer with the ids swapped.
        let swapped = Molecule::new([
            (Vec3::new(5.0, 0.0, 0.0), 1.0),
            (Vec3::new(1.0, 0.0, 0.0), 1.0),
        ]);
        let grid = picking_grid(&swapped);
        let hit = picker.pick_ray(&ray, &grid, swapped.atoms()).unwrap();
        assert_eq!(hit.atom_id, 1);
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn straddling_atom_needs_overlap_insertion() {
        let atom = Atom {
            id: 0,
            position: Vec3::new(1.9, 0.5, 0.5),
            radius: 0.5,
        };
        let ray = Ray::new(Vec3::new(2.2, -2.0, 0.5), Vec3::Y);
        let mut picker = Picker::new(1);

        let mut centre = UniformGrid::new(Vec3::ZERO, Vec3::splat(4.0), 1.0)
            .unwrap();
        assert!(centre.insert_center(&atom));
        assert_eq!(picker.pick_ray(&ray, &centre, &[atom]), None);

        let mut overlap = UniformGrid::new(Vec3::ZERO, Vec3::splat(4.0), 1.0)
            .unwrap();
        assert!(overlap.insert_overlapping(&atom) > 1);
        let hit = picker.pick_ray(&ray, &overlap, &[atom]).unwrap();
        assert_eq!(hit.atom_id, 0);
        // Measured from the ray origin, not the grid entry point.
        assert!(hit.distance > 2.0);
    }

    #[test]
    fn misses_and_degenerate_rays_return_none() {
        let mol = Molecule::new([(Vec3::ZERO, 1.0), (Vec3::X * 3.0, 1.0)]);
        let grid = picking_grid(&mol);
        let mut picker = Picker::new(mol.len());

        let above = Ray::new(Vec3::new(-5.0, 5.0, 0.0), Vec3::X);
        assert_eq!(picker.pick_ray(&above, &grid, mol.atoms()), None);

        let still = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(picker.pick_ray(&still, &grid, mol.atoms()), None);

        let away = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::NEG_X);
        assert_eq!(picker.pick_ray(&away, &grid, mol.atoms()), None);
    }

    #[test]
    fn repeated_queries_see_fresh_tested_set() {
        let mol = Molecule::new([(Vec3::ZERO, 1.0), (Vec3::X * 3.0, 1.0)]);
        let grid = picking_grid(&mol);
        let mut picker = Picker::new(0);
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let back = Ray::new(Vec3::new(8.0, 0.0, 0.0), Vec3::NEG_X);

        for _ in 0..3 {
            let hit = picker.pick_ray(&ray, &grid, mol.atoms()).unwrap();
            assert_eq!(hit.atom_id, 0);
            let hit = picker.pick_ray(&back, &grid, mol.atoms()).unwrap();
            assert_eq!(hit.atom_id, 1);
        }

        // Force the generation counter to wrap.
        picker.generation = u32::MAX;
        let hit = picker.pick_ray(&ray, &grid, mol.atoms()).unwrap();
        assert_eq!(hit.atom_id, 0);
        assert_eq!(picker.generation, 1);
    }

    #[test]
    fn grid_pick_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let mol = Molecule::new((0..300).map(|_| {
            (
                Vec3::new(
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-10.0..10.0),
                ),
                rng.random_range(0.8..1.8),
            )
        }));
        let grid = picking_grid(&mol);
        let mut picker = Picker::new(mol.len());

        for _ in 0..200 {
            let origin = Vec3::new(
                rng.random_range(-30.0..30.0),
                rng.random_range(-30.0..30.0),
                30.0,
            );
            let target = Vec3::new(
                rng.random_range(-8.0..8.0),
                rng.random_range(-8.0..8.0),
                rng.random_range(-8.0..8.0),
            );
            let ray = Ray::new(origin, (target - origin).normalize());

            let brute = mol
                .atoms()
                .iter()
                .filter_map(|a| {
                    intersect_ray_sphere(&ray, a.position, a.radius)
                        .map(|t| (a.id, t))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let fast = picker.pick_ray(&ray, &grid, mol.atoms());

            assert_eq!(brute.is_some(), fast.is_some(), "{ray:?}");
            if let (Some((_, t)), Some(hit)) = (brute, fast) {
                assert!((hit.distance - t).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn screen_pick_through_camera() {
        let mol = Molecule::new([
            (Vec3::ZERO, 1.0),
            (Vec3::new(4.0, 0.0, 0.0), 1.0),
        ]);
        let grid = picking_grid(&mol);
        let mut picker = Picker::new(mol.len());
        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 20.0),
            1.0,
            &CameraOptions::default(),
        );
        let viewport = Vec2::new(400.0, 400.0);
        let centre = Vec2::new(200.0, 200.0);

        let identity = Mat4::IDENTITY;
        let atoms = mol.atoms();
        assert_eq!(
            picker.pick(centre, viewport, &camera, &identity, &grid, atoms),
            Some(0)
        );

        // Shift the molecule left by 4 so atom 1 sits under the centre.
        let model = Mat4::from_translation(Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(
            picker.pick(centre, viewport, &camera, &model, &grid, atoms),
            Some(1)
        );

        assert_eq!(
            picker.pick(
                Vec2::ZERO,
                viewport,
                &camera,
                &identity,
                &grid,
                atoms
            ),
            None
        );
    }
}
