//! Per-atom ambient occlusion occluder lists.
//!
//! For every atom the nearest atoms found in its 3x3x3 cell neighbourhood
//! of a centre-only grid are ranked by squared distance and packed into a
//! fixed-size buffer of `(x, y, z, radius)` records that the lighting stage
//! samples. Candidates are restricted to that neighbourhood, so a row holds
//! the nearest *local* atoms rather than a true k-nearest set over the whole
//! molecule.

use glam::Vec3;

use crate::error::GridError;
use crate::grid::UniformGrid;
use crate::molecule::{Atom, AtomId};

/// Default texture width used by the lighting stage.
pub const OCCLUDER_TEXTURE_WIDTH: usize = 2048;

/// A candidate occluder during one atom's selection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccluderEntry {
    /// Occluding atom.
    pub atom_id: AtomId,
    /// Its centre.
    pub position: Vec3,
    /// Its radius.
    pub radius: f32,
    /// Squared distance to the occluded atom.
    pub squared_distance: f32,
}

/// One packed occluder slot.
///
/// Layout (16 bytes):
///   position: [f32; 3]  (offset 0)
///   radius:   f32       (offset 12)
#[repr(C)]
#[derive(
    Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct OccluderRecord {
    /// Occluder centre.
    pub position: [f32; 3],
    /// Occluder radius; zero marks an unused slot.
    pub radius: f32,
}

impl From<&OccluderEntry> for OccluderRecord {
    fn from(entry: &OccluderEntry) -> Self {
        Self {
            position: entry.position.to_array(),
            radius: entry.radius,
        }
    }
}

/// Fixed-shape occluder table: `max_per_atom` records per atom, unused
/// slots zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct OccluderBuffer {
    max_per_atom: usize,
    records: Vec<OccluderRecord>,
    counts: Vec<usize>,
}

/// Occluder records laid out as an RGBA32F texture.
#[derive(Debug, Clone, PartialEq)]
pub struct OccluderTexture {
    /// Texels per row.
    pub width: usize,
    /// Rows: one band of `max_per_atom` rows per `width` atoms.
    pub height: usize,
    /// `width * height * 4` floats, row-major.
    pub data: Vec<f32>,
}

impl OccluderBuffer {
    /// Zero-filled buffer for `atom_count` atoms.
    fn zeroed(atom_count: usize, max_per_atom: usize) -> Self {
        Self {
            max_per_atom,
            records: vec![OccluderRecord::default(); atom_count * max_per_atom],
            counts: vec![0; atom_count],
        }
    }

    /// Slots per atom.
    #[must_use]
    pub fn max_per_atom(&self) -> usize {
        self.max_per_atom
    }

    /// Number of atoms covered.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.counts.len()
    }

    /// Occupied slots for `atom`.
    #[must_use]
    pub fn occluder_count(&self, atom: AtomId) -> usize {
        self.counts.get(atom as usize).copied().unwrap_or(0)
    }

    /// All `max_per_atom` slots of one atom, nearest occluder first.
    /// Empty for an unknown atom.
    #[must_use]
    pub fn row(&self, atom: AtomId) -> &[OccluderRecord] {
        let start = atom as usize * self.max_per_atom;
        self.records
            .get(start..start + self.max_per_atom)
            .unwrap_or_default()
    }

    /// Record at `(atom, slot)`.
    #[must_use]
    pub fn get(&self, atom: AtomId, slot: usize) -> Option<&OccluderRecord> {
        if slot >= self.max_per_atom {
            return None;
        }
        self.records.get(atom as usize * self.max_per_atom + slot)
    }

    /// All records, atom-major.
    #[must_use]
    pub fn records(&self) -> &[OccluderRecord] {
        &self.records
    }

    /// Flat float view addressable as
    /// `(atom * max_per_atom + slot) * 4 + channel`.
    #[must_use]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.records)
    }

    /// Pack into the texture layout the lighting stage reads: atom `id`
    /// lives in column `id % width` of band `id / width`, and slot `k` in
    /// row `band * max_per_atom + k`.
    pub fn to_texture(
        &self,
        width: usize,
    ) -> Result<OccluderTexture, GridError> {
        if width == 0 {
            return Err(GridError::InvalidParameter(
                "occluder texture width must be positive".to_owned(),
            ));
        }
        let bands = self.atom_count().div_ceil(width);
        let height = bands * self.max_per_atom;
        let mut data = vec![0.0; width * height * 4];

        for atom in 0..self.atom_count() {
            let (band, column) = (atom / width, atom % width);
            let row = &self.records
                [atom * self.max_per_atom..(atom + 1) * self.max_per_atom];
            for (slot, record) in row.iter().enumerate() {
                let texel = (band * self.max_per_atom + slot) * width + column;
                data[texel * 4..texel * 4 + 4]
                    .copy_from_slice(bytemuck::cast_slice(
                        std::slice::from_ref(record),
                    ));
            }
        }

        Ok(OccluderTexture {
            width,
            height,
            data,
        })
    }
}

/// Select up to `max_per_atom` occluders for every atom using a centre-only
/// grid built over the same atoms.
pub fn compute_occluders(
    atoms: &[Atom],
    grid: &UniformGrid,
    max_per_atom: usize,
) -> Result<OccluderBuffer, GridError> {
    if max_per_atom == 0 {
        return Err(GridError::InvalidParameter(
            "max occluders per atom must be positive".to_owned(),
        ));
    }

    let mut buffer = OccluderBuffer::zeroed(atoms.len(), max_per_atom);
    let mut candidates: Vec<OccluderEntry> = Vec::new();
    let mut saturated = 0usize;

    for (index, atom) in atoms.iter().enumerate() {
        candidates.clear();
        let center = grid.cell_index_3d(atom.position);
        for cell in grid.neighborhood(center) {
            for &id in grid.cell_ids(cell) {
                if id == atom.id {
                    continue;
                }
                let Some(other) = atoms.get(id as usize) else {
                    continue;
                };
                candidates.push(OccluderEntry {
                    atom_id: id,
                    position: other.position,
                    radius: other.radius,
                    squared_distance: atom
                        .position
                        .distance_squared(other.position),
                });
            }
        }

        candidates.sort_unstable_by(|a, b| {
            a.squared_distance.total_cmp(&b.squared_distance)
        });
        candidates.truncate(max_per_atom);

        let start = index * max_per_atom;
        for (slot, entry) in candidates.iter().enumerate() {
            buffer.records[start + slot] = entry.into();
        }
        buffer.counts[index] = candidates.len();
        if candidates.len() == max_per_atom {
            saturated += 1;
        }
    }

    log::debug!(
        "occluders: {} atoms, {} slots each, {} rows full, {} records",
        atoms.len(),
        max_per_atom,
        saturated,
        buffer.counts.iter().sum::<usize>()
    );
    Ok(buffer)
}
