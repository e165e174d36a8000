use bevy::math::{URect, UVec2};

use super::{Properties, TilesetTile};

/// Grid layout of a tileset, shared by both image representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TilesetGeometry {
    /// Tile width in pixels (>0)
    pub tile_width: u32,
    /// Tile height in pixels (>0)
    pub tile_height: u32,
    /// Declared number of tiles, including tiles without an explicit record
    pub tile_count: u32,
    /// Spacing between tiles in the atlas (pixels)
    pub spacing: u32,
    /// Margin around the atlas (pixels)
    pub margin: u32,
    /// Atlas columns. Only meaningful for shared-texture tilesets, image
    /// collections usually store 0.
    pub columns: u32,
}

impl TilesetGeometry {
    /// `ceil(tile_count / columns)`, or 0 without columns.
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            0
        } else {
            self.tile_count.div_ceil(self.columns)
        }
    }

    /// `tile_width * columns`, or `None` if it does not fit in `u32`.
    pub fn actual_width(&self) -> Option<u32> {
        self.tile_width.checked_mul(self.columns)
    }

    /// `tile_height * rows`, or `None` if it does not fit in `u32`.
    pub fn actual_height(&self) -> Option<u32> {
        self.tile_height.checked_mul(self.rows())
    }

    /// Far corner of the last atlas cell, margin and spacing included.
    ///
    /// `None` when the layout cannot be addressed with `u32` pixel
    /// coordinates. Every [`TilesetGeometry::tile_region`] of a layout with an
    /// extent lies inside it.
    pub fn atlas_extent(&self) -> Option<UVec2> {
        let width = span(self.columns, self.tile_width, self.spacing, self.margin)?;
        let height = span(self.rows(), self.tile_height, self.spacing, self.margin)?;
        Some(UVec2::new(width, height))
    }

    /// Pixel rectangle of a tile inside the shared atlas.
    ///
    /// Returns `None` for ids past `tile_count`, when the layout has no
    /// columns, or when the rectangle does not fit in `u32` coordinates.
    pub fn tile_region(&self, local_id: u32) -> Option<URect> {
        if self.columns == 0 || local_id >= self.tile_count {
            return None;
        }
        let column = local_id % self.columns;
        let row = local_id / self.columns;
        let x = cell_origin(column, self.tile_width, self.spacing, self.margin)?;
        let y = cell_origin(row, self.tile_height, self.spacing, self.margin)?;
        Some(URect::new(
            x,
            y,
            x.checked_add(self.tile_width)?,
            y.checked_add(self.tile_height)?,
        ))
    }
}

/// `margin + index * (tile + spacing)`
fn cell_origin(index: u32, tile: u32, spacing: u32, margin: u32) -> Option<u32> {
    tile.checked_add(spacing)?.checked_mul(index)?.checked_add(margin)
}

/// End of the last of `cells` cells along one axis; just the margin for none.
fn span(cells: u32, tile: u32, spacing: u32, margin: u32) -> Option<u32> {
    match cells.checked_sub(1) {
        Some(last) => cell_origin(last, tile, spacing, margin)?.checked_add(tile),
        None => Some(margin),
    }
}

/// The single atlas of a shared-texture tileset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedTexture<T> {
    pub texture: T,
    pub normal: Option<T>,
}

/// Images of one tile in an image-collection tileset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage<T> {
    pub texture: T,
    /// Encoded but not reconstructed; always `None` after decoding.
    pub normal: Option<T>,
    /// Encoded but not reconstructed; always `None` after decoding.
    pub height: Option<T>,
}

impl<T> TileImage<T> {
    pub fn new(texture: T) -> Self {
        Self {
            texture,
            normal: None,
            height: None,
        }
    }
}

/// Image representation of a tileset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TilesetImage<T> {
    /// One spritesheet, tiles addressed by row/column arithmetic.
    Shared(SharedTexture<T>),
    /// One image per explicit tile record, in record order.
    Collection(Vec<TileImage<T>>),
}

/// A tileset, generic over how textures are represented.
///
/// Before encoding `T` is a logical image path; after decoding it is whatever
/// the [`TextureMaterializer`](crate::TextureMaterializer) produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset<T> {
    pub geometry: TilesetGeometry,
    pub image: TilesetImage<T>,
    /// Explicit tile records, in file order. May be fewer than `tile_count`.
    pub tiles: Vec<TilesetTile>,
    pub properties: Properties,
}

impl<T> Tileset<T> {
    /// Shared-texture tileset with no tile records.
    pub fn shared(geometry: TilesetGeometry, texture: T) -> Self {
        Self {
            geometry,
            image: TilesetImage::Shared(SharedTexture {
                texture,
                normal: None,
            }),
            tiles: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Image-collection tileset built from `(tile, image)` pairs.
    pub fn collection(
        geometry: TilesetGeometry,
        tiles: impl IntoIterator<Item = (TilesetTile, TileImage<T>)>,
    ) -> Self {
        let (tiles, images) = tiles.into_iter().unzip();
        Self {
            geometry,
            image: TilesetImage::Collection(images),
            tiles,
            properties: Properties::new(),
        }
    }

    #[inline]
    pub fn has_shared_texture(&self) -> bool {
        matches!(self.image, TilesetImage::Shared(_))
    }

    #[inline]
    pub fn is_image_collection(&self) -> bool {
        !self.has_shared_texture()
    }

    /// The atlas of a shared-texture tileset.
    pub fn texture(&self) -> Option<&T> {
        match &self.image {
            TilesetImage::Shared(shared) => Some(&shared.texture),
            TilesetImage::Collection(_) => None,
        }
    }

    /// The normal map of a shared-texture tileset, if any.
    pub fn normal_texture(&self) -> Option<&T> {
        match &self.image {
            TilesetImage::Shared(shared) => shared.normal.as_ref(),
            TilesetImage::Collection(_) => None,
        }
    }

    /// Get the texture to draw a tile with.
    ///
    /// For shared-texture tilesets this is the atlas (combine with
    /// [`Tileset::tile_region`]); for image collections it is the image of the
    /// record with that local id.
    pub fn tile_texture(&self, local_id: u32) -> Option<&T> {
        match &self.image {
            TilesetImage::Shared(shared) => Some(&shared.texture),
            TilesetImage::Collection(images) => {
                let index = self.tiles.iter().position(|t| t.local_id == local_id)?;
                images.get(index).map(|image| &image.texture)
            }
        }
    }

    /// Pixel rectangle of a tile inside the atlas. `None` for image collections.
    pub fn tile_region(&self, local_id: u32) -> Option<URect> {
        if self.is_image_collection() {
            return None;
        }
        self.geometry.tile_region(local_id)
    }

    pub fn get_tile(&self, local_id: u32) -> Option<&TilesetTile> {
        self.tiles.iter().find(|tile| tile.local_id == local_id)
    }

    pub fn rows(&self) -> u32 {
        self.geometry.rows()
    }

    pub fn actual_width(&self) -> Option<u32> {
        self.geometry.actual_width()
    }

    pub fn actual_height(&self) -> Option<u32> {
        self.geometry.actual_height()
    }

    /// Converts every texture with `f`, keeping everything else.
    pub fn map_textures<U>(self, mut f: impl FnMut(T) -> U) -> Tileset<U> {
        let image = match self.image {
            TilesetImage::Shared(shared) => TilesetImage::Shared(SharedTexture {
                texture: f(shared.texture),
                normal: shared.normal.map(&mut f),
            }),
            TilesetImage::Collection(images) => TilesetImage::Collection(
                images
                    .into_iter()
                    .map(|image| TileImage {
                        texture: f(image.texture),
                        normal: image.normal.map(&mut f),
                        height: image.height.map(&mut f),
                    })
                    .collect(),
            ),
        };
        Tileset {
            geometry: self.geometry,
            image,
            tiles: self.tiles,
            properties: self.properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(tile_count: u32, columns: u32) -> TilesetGeometry {
        TilesetGeometry {
            tile_width: 16,
            tile_height: 24,
            tile_count,
            spacing: 2,
            margin: 1,
            columns,
        }
    }

    #[test]
    fn test_rows_round_up() {
        let geometry = geometry(10, 4);
        assert_eq!(geometry.rows(), 3);
        assert_eq!(geometry.actual_width(), Some(64));
        assert_eq!(geometry.actual_height(), Some(72));
    }

    #[test]
    fn test_rows_without_columns() {
        assert_eq!(geometry(10, 0).rows(), 0);
    }

    #[test]
    fn test_tile_region_uses_margin_and_spacing() {
        let geometry = geometry(10, 4);
        // id 5 -> column 1, row 1
        let region = geometry.tile_region(5).unwrap();
        assert_eq!(region.min.x, 1 + 18);
        assert_eq!(region.min.y, 1 + 26);
        assert_eq!(region.width(), 16);
        assert_eq!(region.height(), 24);
        assert!(geometry.tile_region(10).is_none());
        // last column is 3, last row is 2
        assert_eq!(
            geometry.atlas_extent(),
            Some(UVec2::new(1 + 3 * 18 + 16, 1 + 2 * 26 + 24))
        );
    }

    #[test]
    fn test_oversized_layout_has_no_regions() {
        let wide = TilesetGeometry {
            tile_width: 100_000,
            tile_height: 16,
            tile_count: 100,
            spacing: 0,
            margin: 0,
            columns: 100_000,
        };
        assert_eq!(wide.actual_width(), None);
        assert_eq!(wide.atlas_extent(), None);
        assert!(wide.tile_region(0).is_some());

        let spaced = TilesetGeometry {
            tile_width: i32::MAX as u32,
            tile_height: 16,
            tile_count: 8,
            spacing: i32::MAX as u32,
            margin: 0,
            columns: 4,
        };
        assert!(spaced.tile_region(0).is_some());
        assert_eq!(spaced.tile_region(1), None);
        assert_eq!(spaced.tile_region(5), None);
    }

    #[test]
    fn test_collection_tile_texture_follows_record_order() {
        let tileset = Tileset::collection(
            geometry(3, 0),
            [
                (TilesetTile::new(7), TileImage::new("seven.png")),
                (TilesetTile::new(2), TileImage::new("two.png")),
            ],
        );
        assert_eq!(tileset.tile_texture(2), Some(&"two.png"));
        assert_eq!(tileset.tile_texture(7), Some(&"seven.png"));
        assert_eq!(tileset.tile_texture(0), None);
        assert!(tileset.texture().is_none());
        assert!(tileset.tile_region(2).is_none());
    }

    #[test]
    fn test_map_textures_keeps_layout() {
        let mut tileset = Tileset::shared(geometry(4, 2), "atlas.png");
        if let TilesetImage::Shared(shared) = &mut tileset.image {
            shared.normal = Some("atlas_n.png");
        }
        let mapped = tileset.map_textures(str::len);
        assert_eq!(mapped.texture(), Some(&9));
        assert_eq!(mapped.normal_texture(), Some(&11));
        assert_eq!(mapped.geometry.columns, 2);
    }
}
