use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ambient occlusion strength and key light placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
pub struct LightingOptions {
    /// How strongly occluders darken an atom. Not read here; it is carried
    /// through to the lighting stage alongside the occluder buffer.
    #[schemars(
        title = "AO Intensity",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.01)
    )]
    pub ao_intensity: f32,
    /// Polar angle of the light from the +Y axis, in degrees.
    #[schemars(
        title = "Altitude",
        range(min = 0.0, max = 180.0),
        extend("step" = 1.0)
    )]
    pub altitude: f32,
    /// Azimuth of the light around the Y axis, in degrees.
    #[schemars(
        title = "Azimuth",
        range(min = 0.0, max = 360.0),
        extend("step" = 1.0)
    )]
    pub azimuth: f32,
    /// Light distance as a multiple of the camera zoom.
    #[schemars(skip)]
    pub light_distance: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ao_intensity: 0.25,
            altitude: 60.0,
            azimuth: 60.0,
            light_distance: 1.2,
        }
    }
}

impl LightingOptions {
    /// Light position on a sphere of radius `zoom * light_distance` around
    /// the origin.
    #[must_use]
    pub fn light_position(&self, zoom: f32) -> Vec3 {
        let r = zoom * self.light_distance;
        let (sin_alt, cos_alt) = self.altitude.to_radians().sin_cos();
        let (sin_az, cos_az) = self.azimuth.to_radians().sin_cos();
        Vec3::new(r * sin_alt * cos_az, r * cos_alt, r * sin_alt * sin_az)
    }
}
