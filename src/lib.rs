//! # bevy_tiledpack
//!
//! Compile Tiled tilesets into a compact binary format ahead of time and load
//! them as Bevy assets.
//!
//! This is a meta-crate that combines the `bevy_tiledpack_*` sub-crates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tiledpack::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BevyTiledpackPlugin::default())
//!         .add_systems(Startup, load_tileset)
//!         .run();
//! }
//!
//! fn load_tileset(asset_server: Res<AssetServer>) {
//!     let _terrain: Handle<PackedTilesetAsset> = asset_server.load("tiles/terrain.tspack");
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`format`]: the object model and the symmetric binary writer/reader.
//!   Engine-independent apart from math types and logging.
//! - [`assets`]: `.tsx` import, the compiler and the `tiledpack` command line
//!   tool (feature `cli`), and the `AssetLoader` for compiled files.

pub mod plugin;

// Re-export sub-crates for advanced usage
pub use bevy_tiledpack_assets as assets;
pub use bevy_tiledpack_format as format;

/// Unified prelude for bevy_tiledpack
pub mod prelude {
    pub use crate::assets::prelude::*;
    pub use crate::format::prelude::*;

    // Unified plugin
    pub use crate::plugin::BevyTiledpackPlugin;
}
