use bevy::prelude::*;
use bevy_tiledpack_format::{Tileset, TilesetTile};

/// Bevy asset wrapper for packed tilesets (.tspack files)
///
/// Supports both texture atlas tilesets (single spritesheet) and image collection
/// tilesets (individual images per tile).
#[derive(TypePath, Asset, Debug)]
pub struct PackedTilesetAsset {
    /// Decoded tileset with every image reference already handed to the asset
    /// server.
    pub tileset: Tileset<Handle<Image>>,

    // ===== PROCESSED DATA FOR CONVENIENCE =====
    /// Tile size in pixels (width, height)
    pub tile_size: UVec2,

    /// Tileset grid dimensions in tiles (columns, rows)
    ///
    /// For image collection tilesets, this is `UVec2::ZERO`.
    pub grid_size: UVec2,
}

impl PackedTilesetAsset {
    pub fn new(tileset: Tileset<Handle<Image>>) -> Self {
        let geometry = tileset.geometry;
        let grid_size = if tileset.is_image_collection() {
            UVec2::ZERO
        } else {
            UVec2::new(geometry.columns, geometry.rows())
        };
        Self {
            tile_size: UVec2::new(geometry.tile_width, geometry.tile_height),
            grid_size,
            tileset,
        }
    }

    /// Check if this is an image collection tileset (vs. texture atlas)
    #[inline]
    pub fn is_image_collection(&self) -> bool {
        self.tileset.is_image_collection()
    }

    /// Get the image handle for a specific tile
    ///
    /// For texture atlas tilesets, this returns the atlas image (same for all tiles).
    /// For image collection tilesets, this returns the specific tile's image.
    ///
    /// # Arguments
    /// * `local_tile_id` - The local tile ID (0-based, NOT a GID)
    ///
    /// # Returns
    /// * `Some(&Handle<Image>)` - The image handle for this tile
    /// * `None` - If the tile doesn't exist or has no image
    pub fn get_tile_image(&self, local_tile_id: u32) -> Option<&Handle<Image>> {
        self.tileset.tile_texture(local_tile_id)
    }

    /// Pixel rectangle of a tile inside the atlas. `None` for image collections.
    pub fn get_tile_rect(&self, local_tile_id: u32) -> Option<URect> {
        self.tileset.tile_region(local_tile_id)
    }

    /// Explicit metadata record of a tile, if it has one.
    pub fn get_tile(&self, local_tile_id: u32) -> Option<&TilesetTile> {
        self.tileset.get_tile(local_tile_id)
    }

    /// Normal map of a texture atlas tileset.
    pub fn normal_image(&self) -> Option<&Handle<Image>> {
        self.tileset.normal_texture()
    }
}
