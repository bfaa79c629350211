//! Crate-level error types.

use std::fmt;

/// Errors produced by the molgrid crate.
///
/// Ray misses are not errors; they surface as `None`.
#[derive(Debug)]
pub enum GridError {
    /// A parameter outside its valid domain (non-positive cell size, empty
    /// atom collection, zero occluder capacity).
    InvalidParameter(String),
    /// A cell coordinate outside `[0, dims)` was addressed.
    OutOfBounds {
        /// Cell x coordinate.
        x: i32,
        /// Cell y coordinate.
        y: i32,
        /// Cell z coordinate.
        z: i32,
    },
    /// Malformed structure input.
    StructureLoad(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(msg) => {
                write!(f, "invalid parameter: {msg}")
            }
            Self::OutOfBounds { x, y, z } => {
                write!(f, "cell ({x}, {y}, {z}) is outside the grid")
            }
            Self::StructureLoad(msg) => {
                write!(f, "structure load error: {msg}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GridError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
