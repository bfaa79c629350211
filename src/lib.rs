// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Uniform-grid spatial index and ray traversal for interactive molecular
//! viewing.
//!
//! Atoms are spheres. A regular grid over their bounding box supports two
//! queries: an ordered cell-by-cell ray walk (3D-DDA) used for atom picking
//! and a debug overlay, and a 27-cell proximity gather used to precompute
//! per-atom ambient-occlusion occluder lists.
//!
//! # Key entry points
//!
//! - [`scene::MoleculeScene`] - a loaded molecule with both grids, occluders
//!   and view state
//! - [`grid::UniformGrid`] and [`grid::traverse`] - the spatial index and
//!   its ray walk
//! - [`picking::Picker`] - nearest-atom picking against the overlap grid
//! - [`occlusion::compute_occluders`] - the occluder buffer for lighting
//! - [`options::Options`] - runtime configuration (grid, lighting, camera,
//!   debug)
//!
//! # Grids
//!
//! Two grids are built per molecule with the same geometry. The centre-only
//! grid stores each atom once and feeds the occluder pass and the overlay.
//! The sphere-overlap grid stores an atom in every neighbouring cell its
//! sphere touches, so a ray crossing only the edge of an atom still finds
//! it during picking.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod molecule;
pub mod occlusion;
pub mod options;
pub mod overlay;
pub mod picking;
pub mod scene;
