//! Atom collection consumed by the grid, picker and occluder selector.
//!
//! Atoms are positioned spheres with a stable id equal to their index in
//! the owning [`Molecule`]. The grid only stores ids; all geometry lives
//! here.

use std::io::BufRead;
use std::path::Path;

use glam::Vec3;

use crate::error::GridError;
use crate::geometry::Aabb;

/// Stable index of an atom inside its [`Molecule`].
pub type AtomId = u32;

/// A spherical atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// Index into the owning collection.
    pub id: AtomId,
    /// Centre of the sphere.
    pub position: Vec3,
    /// Van der Waals radius.
    pub radius: f32,
}

/// Immutable-after-load collection of atoms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
}

impl Molecule {
    /// Build a molecule from `(position, radius)` pairs. Ids are assigned in
    /// iteration order.
    pub fn new(spheres: impl IntoIterator<Item = (Vec3, f32)>) -> Self {
        let atoms = spheres
            .into_iter()
            .enumerate()
            .map(|(i, (position, radius))| Atom {
                id: i as AtomId,
                position,
                radius,
            })
            .collect();
        Self { atoms }
    }

    /// All atoms, indexable by [`AtomId`].
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Look up an atom by id.
    #[must_use]
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id as usize)
    }

    /// Number of atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the collection holds no atoms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Box enclosing every atom sphere (centre ± radius).
    pub fn bounding_box(&self) -> Result<Aabb, GridError> {
        let (first, rest) = self.atoms.split_first().ok_or_else(|| {
            GridError::InvalidParameter(
                "bounding box of an empty atom collection".to_owned(),
            )
        })?;
        let seed = Aabb::new(first.position, first.position)
            .union_sphere(first.position, first.radius);
        Ok(rest.iter().fold(seed, |acc, atom| {
            acc.union_sphere(atom.position, atom.radius)
        }))
    }

    /// Largest atom radius.
    pub fn max_radius(&self) -> Result<f32, GridError> {
        self.atoms
            .iter()
            .map(|atom| atom.radius)
            .reduce(f32::max)
            .ok_or_else(|| {
                GridError::InvalidParameter(
                    "max radius of an empty atom collection".to_owned(),
                )
            })
    }

    /// Mean of all atom centres, or `None` when empty.
    #[must_use]
    pub fn mid_point(&self) -> Option<Vec3> {
        if self.atoms.is_empty() {
            return None;
        }
        let sum: Vec3 = self.atoms.iter().map(|atom| atom.position).sum();
        Some(sum / self.atoms.len() as f32)
    }

    /// Distance from `point` to the farthest atom centre.
    #[must_use]
    pub fn furthest_distance_to(&self, point: Vec3) -> f32 {
        self.atoms
            .iter()
            .map(|atom| atom.position.distance(point))
            .fold(0.0, f32::max)
    }

    /// Translate every atom so that `point` becomes the origin.
    pub fn center_on(&mut self, point: Vec3) {
        for atom in &mut self.atoms {
            atom.position -= point;
        }
    }

    /// Read a whitespace-separated `x y z radius` file.
    pub fn load_xyzr(path: &Path) -> Result<Self, GridError> {
        let file = std::fs::File::open(path)?;
        Self::from_xyzr_reader(std::io::BufReader::new(file))
    }

    /// Parse `x y z radius` lines. Blank lines and `#` comments are skipped;
    /// extra trailing columns are ignored.
    pub fn from_xyzr_reader<R: BufRead>(reader: R) -> Result<Self, GridError> {
        let mut spheres = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let content = line
                .split_once('#')
                .map_or(line.as_str(), |(before, _)| before)
                .trim();
            if content.is_empty() {
                continue;
            }
            let values: Vec<f32> = content
                .split_whitespace()
                .take(4)
                .map(str::parse::<f32>)
                .collect::<Result<_, _>>()
                .map_err(|e| {
                    GridError::StructureLoad(format!(
                        "line {}: {e}",
                        line_no + 1
                    ))
                })?;
            let &[x, y, z, r] = values.as_slice() else {
                return Err(GridError::StructureLoad(format!(
                    "line {}: expected 4 columns (x y z radius)",
                    line_no + 1
                )));
            };
            spheres.push((Vec3::new(x, y, z), r));
        }
        Ok(Self::new(spheres))
    }
}
