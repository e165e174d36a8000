//! Unified plugin for bevy_tiledpack.

use bevy::prelude::*;

use bevy_tiledpack_assets::TiledpackAssetsPlugin;
use bevy_tiledpack_assets::config::TiledpackAssetsConfig;

/// Unified plugin that adds all bevy_tiledpack functionality.
///
/// # With Custom Configuration
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tiledpack::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         BevyTiledpackPlugin::default().with_assets(TiledpackAssetsConfig {
///             reject_dangling_frames: true,
///         }),
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct BevyTiledpackPlugin {
    /// Asset loading configuration
    pub assets: TiledpackAssetsConfig,
}

impl BevyTiledpackPlugin {
    /// Create with custom asset loading configuration
    pub fn with_assets(mut self, config: TiledpackAssetsConfig) -> Self {
        self.assets = config;
        self
    }
}

impl Plugin for BevyTiledpackPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TiledpackAssetsPlugin::new(self.assets.clone()));

        info!("BevyTiledpackPlugin initialized");
    }
}
