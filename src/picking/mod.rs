//! Atom picking and selection management.
//!
//! A screen position is turned into a camera ray, moved into the molecule's
//! local frame, and walked through the sphere-overlap grid; the nearest
//! intersected atom becomes the hover or click target.

mod picker;
mod selection;

pub use picker::{PickHit, Picker};
pub use selection::Selection;
