//! In-memory object model of a packed tileset.
//!
//! Everything here is plain data. Decoding always builds a fresh graph owned by
//! the returned [`Tileset`].

mod object;
mod properties;
mod tile;
mod tileset;

pub use object::{FlipFlags, MapObject, ObjectShape, TileGid};
pub use properties::Properties;
pub use tile::{AnimationFrame, TileKind, TilesetTile};
pub use tileset::{SharedTexture, TileImage, Tileset, TilesetGeometry, TilesetImage};
