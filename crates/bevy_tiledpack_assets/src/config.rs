//! Configuration for compiling and loading packed tilesets.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::import::ImportError;

/// Settings for the build-time importer and compiler.
///
/// Can be stored as JSON next to the assets and passed to the `tiledpack`
/// command line tool. Missing keys fall back to their defaults.
///
/// ```json
/// {
///     "asset_root": "assets",
///     "normal_property": "normal",
///     "height_property": "heightmap",
///     "output_extension": "tspack"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileSettings {
    /// Directory the runtime asset server loads from. Image references are
    /// stored relative to it.
    pub asset_root: PathBuf,

    /// Property naming the normal map of a tileset or of a single collection
    /// tile (default: `"normal"`)
    pub normal_property: String,

    /// Property naming the height map of a single collection tile
    /// (default: `"heightmap"`)
    pub height_property: String,

    /// Extension given to compiled files (default: `"tspack"`)
    pub output_extension: String,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            normal_property: "normal".to_string(),
            height_property: "heightmap".to_string(),
            output_extension: "tspack".to_string(),
        }
    }
}

impl CompileSettings {
    /// Reads settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Same settings with a different asset root.
    pub fn with_asset_root(mut self, asset_root: impl Into<PathBuf>) -> Self {
        self.asset_root = asset_root.into();
        self
    }
}

/// Runtime configuration for [`TiledpackAssetsPlugin`](crate::TiledpackAssetsPlugin),
/// handed to the [`PackedTilesetLoader`](crate::loaders::tileset::PackedTilesetLoader)
/// it registers.
#[derive(Clone, Debug, Default)]
pub struct TiledpackAssetsConfig {
    /// Fail loading a tileset whose animation frames point past its tile
    /// count, instead of only logging a warning (default: false)
    pub reject_dangling_frames: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: CompileSettings =
            serde_json::from_str(r#"{ "asset_root": "game/assets" }"#).unwrap();
        assert_eq!(settings.asset_root, PathBuf::from("game/assets"));
        assert_eq!(settings.normal_property, "normal");
        assert_eq!(settings.height_property, "heightmap");
        assert_eq!(settings.output_extension, "tspack");
    }

    #[test]
    fn test_settings_round_trip_through_json() {
        let settings = CompileSettings {
            normal_property: "normal_map".to_string(),
            ..CompileSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: CompileSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiledpack.json");
        fs::write(&path, r#"{ "output_extension": "bin" }"#).unwrap();

        let settings = CompileSettings::from_json_file(&path).unwrap();
        assert_eq!(settings.output_extension, "bin");
        assert_eq!(settings.asset_root, PathBuf::from("assets"));
    }
}
