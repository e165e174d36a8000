use bevy::prelude::*;

use crate::assets::tileset::PackedTilesetAsset;
use crate::config::TiledpackAssetsConfig;
use crate::loaders::tileset::PackedTilesetLoader;

/// Plugin that registers the packed tileset asset type and its loader
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_tiledpack_assets::TiledpackAssetsPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TiledpackAssetsPlugin::default())
///     .run();
/// ```
///
/// Compiling `.tsx` files into `.tspack` files happens ahead of time, see
/// [`compile_tileset`](crate::compile::compile_tileset) and the `tiledpack`
/// command line tool.
#[derive(Default)]
pub struct TiledpackAssetsPlugin {
    pub config: TiledpackAssetsConfig,
}

impl TiledpackAssetsPlugin {
    pub fn new(config: TiledpackAssetsConfig) -> Self {
        Self { config }
    }
}

impl Plugin for TiledpackAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<PackedTilesetAsset>()
            .register_asset_loader(PackedTilesetLoader {
                config: self.config.clone(),
            });
    }
}
