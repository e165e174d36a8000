use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
    tasks::ConditionalSendFuture,
};
use bevy_tiledpack_format::{
    CodecError, ExternalReference, TextureMaterializer, Tileset, decode_tileset,
};
use thiserror::Error;

use crate::assets::tileset::PackedTilesetAsset;
use crate::config::TiledpackAssetsConfig;

/// Asset loader for packed tilesets (.tspack files)
///
/// Every image reference in the file is an asset-root-relative path and is
/// requested from the asset server as a dependency of the tileset.
#[derive(Default)]
pub struct PackedTilesetLoader {
    pub config: TiledpackAssetsConfig,
}

#[derive(Debug, Error)]
pub enum PackedTilesetLoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode tileset: {0}")]
    Codec(#[from] CodecError),

    #[error("Tile {tile_id} animates to tile {frame_tile_id} of only {tile_count} tiles")]
    DanglingFrame {
        tile_id: u32,
        frame_tile_id: u32,
        tile_count: u32,
    },
}

/// Hands reference tokens to the asset server through the current load context.
struct LoadContextMaterializer<'a, 'ctx> {
    load_context: &'a mut LoadContext<'ctx>,
}

impl TextureMaterializer for LoadContextMaterializer<'_, '_> {
    type Texture = Handle<Image>;

    fn materialize(&mut self, reference: &ExternalReference) -> Result<Self::Texture, CodecError> {
        Ok(self.load_context.load(reference.as_str().to_owned()))
    }
}

impl AssetLoader for PackedTilesetLoader {
    type Asset = PackedTilesetAsset;
    type Settings = ();
    type Error = PackedTilesetLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        async move {
            // 1. Read the whole file; the format has no framing to stream on
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;

            // 2. Decode, requesting every referenced image
            let mut materializer = LoadContextMaterializer {
                load_context: &mut *load_context,
            };
            let tileset = decode_tileset(&bytes, &mut materializer)?;

            // 3. Optional strictness on animation frames
            if self.config.reject_dangling_frames {
                check_frames(&tileset)?;
            }

            debug!(
                "Loaded packed tileset {:?} ({} tile records)",
                load_context.asset_path(),
                tileset.tiles.len()
            );

            Ok(PackedTilesetAsset::new(tileset))
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tspack"]
    }
}

fn check_frames<T>(tileset: &Tileset<T>) -> Result<(), PackedTilesetLoaderError> {
    let tile_count = tileset.geometry.tile_count;
    for tile in &tileset.tiles {
        if let Some(frame) = tile.frames().iter().find(|f| f.tile_id >= tile_count) {
            return Err(PackedTilesetLoaderError::DanglingFrame {
                tile_id: tile.local_id,
                frame_tile_id: frame.tile_id,
                tile_count,
            });
        }
    }
    Ok(())
}
