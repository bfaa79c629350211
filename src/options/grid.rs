use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How many occluders are kept per atom.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OccluderCapacity {
    /// 16 occluders per atom.
    #[default]
    Standard,
    /// 64 occluders per atom.
    Extended,
}

impl OccluderCapacity {
    /// Slots reserved per atom in the occluder buffer.
    #[must_use]
    pub const fn max_occluders(self) -> usize {
        match self {
            Self::Standard => 16,
            Self::Extended => 64,
        }
    }
}

/// Spatial grid sizing and occluder selection parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Grid", inline)]
#[serde(default)]
pub struct GridOptions {
    /// Cell edge length as a multiple of the largest atom radius.
    #[schemars(
        title = "Cell Size Factor",
        range(min = 1.0, max = 8.0),
        extend("step" = 0.5)
    )]
    pub cell_size_factor: f32,
    /// Occluder slots per atom.
    #[schemars(title = "Occluders")]
    pub occluder_capacity: OccluderCapacity,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            cell_size_factor: 2.0,
            occluder_capacity: OccluderCapacity::Standard,
        }
    }
}
