//! Viewer options with TOML preset support.
//!
//! Grid sizing, occluder capacity, lighting, camera and debug toggles are
//! consolidated here. Options serialize to/from TOML so a session can be
//! started from a preset file.

mod camera;
mod debug;
mod grid;
mod lighting;

use std::path::Path;

pub use camera::CameraOptions;
pub use debug::DebugOptions;
pub use grid::{GridOptions, OccluderCapacity};
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Grid sizing and occluder selection.
    pub grid: GridOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Debug visualization options.
    pub debug: DebugOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, GridError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, GridError> {
        toml::from_str(content)
            .map_err(|e| GridError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), GridError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GridError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[grid]
occluder_capacity = "extended"

[lighting]
ao_intensity = 0.5
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.grid.occluder_capacity, OccluderCapacity::Extended);
        assert_eq!(opts.grid.occluder_capacity.max_occluders(), 64);
        assert_eq!(opts.lighting.ao_intensity, 0.5);
        // Everything else should be default
        assert_eq!(opts.grid.cell_size_factor, 2.0);
        assert_eq!(opts.lighting.altitude, 60.0);
        assert_eq!(opts.camera.fovy, 45.0);
        assert!(!opts.debug.show_grid);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[grid]\ncell_size_factor = \"big\"\n");
        assert!(matches!(err, Err(GridError::OptionsParse(_))));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("molgrid-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.debug.show_grid = true;
        opts.camera.zoom_speed = 1.5;
        opts.save(&dir.join("debug.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a preset").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["debug", "default"]);
        assert_eq!(Options::load(&dir.join("debug.toml")).unwrap(), opts);
        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(GridError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn light_orbits_at_scaled_zoom() {
        let lighting = LightingOptions::default();
        let pos = lighting.light_position(10.0);
        assert!((pos.length() - 12.0).abs() < 1e-4);
        // altitude 60 deg from +Y
        assert!((pos.y - 6.0).abs() < 1e-4);
        let overhead = LightingOptions {
            altitude: 0.0,
            ..LightingOptions::default()
        };
        assert!(overhead
            .light_position(1.0)
            .abs_diff_eq(glam::Vec3::new(0.0, 1.2, 0.0), 1e-6));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in ["grid", "lighting", "camera", "debug"] {
            assert!(props.contains_key(section), "missing {section}");
        }

        // Lighting should have exposed fields but not skipped ones
        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("ao_intensity").is_some());
        assert!(lighting.get("light_distance").is_none());

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
    }
}
