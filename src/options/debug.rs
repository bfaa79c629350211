use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Debug visualization toggles.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Debug", inline)]
#[serde(default)]
pub struct DebugOptions {
    /// Draw the spatial grid, highlighting cells crossed by the pick ray.
    #[schemars(title = "Show Grid")]
    pub show_grid: bool,
}
