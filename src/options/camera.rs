use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(
        title = "Field of View",
        range(min = 20.0, max = 90.0),
        extend("step" = 1.0)
    )]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Degrees of model rotation per pixel dragged.
    #[schemars(
        title = "Rotate Speed",
        range(min = 0.01, max = 1.0),
        extend("step" = 0.01)
    )]
    pub rotate_speed: f32,
    /// Eye travel per wheel unit.
    #[schemars(
        title = "Zoom Speed",
        range(min = 0.05, max = 2.0),
        extend("step" = 0.05)
    )]
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 1.0,
            zfar: 1000.0,
            rotate_speed: 0.1,
            zoom_speed: 0.5,
        }
    }
}
