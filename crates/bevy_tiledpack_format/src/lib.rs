//! # bevy_tiledpack_format
//!
//! Compact binary encoding of Tiled tilesets.
//!
//! A [`Tileset`] is generic over its texture type. The build side works with
//! logical image paths and encodes them through a [`ReferenceResolver`]; the
//! runtime side decodes through a [`TextureMaterializer`] that turns each
//! reference token into whatever handle the engine uses.
//!
//! ```
//! use bevy_tiledpack_format::prelude::*;
//!
//! let mut registry = DependencyRegistry::new("assets");
//! registry.register("assets/tiles.png").unwrap();
//!
//! let geometry = TilesetGeometry {
//!     tile_width: 16,
//!     tile_height: 16,
//!     tile_count: 10,
//!     spacing: 0,
//!     margin: 0,
//!     columns: 4,
//! };
//! let tileset = Tileset::shared(geometry, "assets/tiles.png");
//! let bytes = encode_tileset(&tileset, &registry).unwrap();
//!
//! let decoded = decode_tileset(&bytes, &mut KeepReferences).unwrap();
//! assert_eq!(decoded.texture().unwrap().as_str(), "tiles.png");
//! assert_eq!(decoded.rows(), 3);
//! ```

pub mod codec;
pub mod error;
pub mod model;
pub mod reference;

pub use codec::{decode_tileset, encode_tileset, read_tileset, write_tileset};
pub use error::CodecError;
pub use model::*;
pub use reference::{
    DependencyRegistry, ExternalReference, KeepReferences, ReferenceResolver, TextureMaterializer,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::codec::{decode_tileset, encode_tileset};
    pub use crate::error::CodecError;
    pub use crate::model::{
        AnimationFrame, FlipFlags, MapObject, ObjectShape, Properties, TileGid, TileImage,
        TileKind, Tileset, TilesetGeometry, TilesetImage, TilesetTile,
    };
    pub use crate::reference::{
        DependencyRegistry, ExternalReference, KeepReferences, ReferenceResolver,
        TextureMaterializer,
    };
}
