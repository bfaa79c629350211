//! Camera system for viewing a single molecule.
//!
//! The camera sits on the +Z axis looking at the origin; user rotation is
//! folded into the molecule's model matrix rather than the view.

/// Turntable controller owning the model rotation, zoom and fit.
pub mod controller;
/// Core camera struct and screen ray reconstruction.
pub mod core;

pub use controller::OrbitController;
pub use self::core::Camera;
