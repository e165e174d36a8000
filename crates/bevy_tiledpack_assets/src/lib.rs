//! # bevy_tiledpack_assets
//!
//! Build-time import of Tiled tilesets and runtime loading of the packed
//! result.
//!
//! - [`import`]: `.tsx` → [`Tileset<PathBuf>`](bevy_tiledpack_format::Tileset),
//!   registering image dependencies on the way
//! - [`compile`]: import + encode to `.tspack` files
//! - [`loaders`]: Bevy `AssetLoader` for `.tspack` files
//!
//! ```no_run
//! use bevy_tiledpack_assets::prelude::*;
//!
//! let settings = CompileSettings::default();
//! let dependencies =
//!     compile_tileset("assets/tiles/terrain.tsx", &settings, "assets/tiles/terrain.tspack")
//!         .unwrap();
//! assert!(!dependencies.is_empty());
//! ```

pub mod assets;
pub mod compile;
pub mod config;
pub mod import;
pub mod loaders;
pub mod plugin;

// Re-export the plugin for convenience
pub use plugin::TiledpackAssetsPlugin;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assets::tileset::PackedTilesetAsset;
    pub use crate::compile::{compile_directory, compile_tileset, dump_tileset};
    pub use crate::config::{CompileSettings, TiledpackAssetsConfig};
    pub use crate::import::{ImportError, import_tileset};
    pub use crate::loaders::tileset::{PackedTilesetLoader, PackedTilesetLoaderError};
    pub use crate::plugin::TiledpackAssetsPlugin;
}
