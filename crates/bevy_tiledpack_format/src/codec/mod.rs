//! Symmetric writer/reader pairs for every record of a packed tileset.
//!
//! Records are written in a fixed order with no framing or lengths between
//! them, so each `read_*` must consume exactly what its `write_*` produced.

mod binary;
mod geometry;
mod object;
mod properties;
mod tile;
mod tileset;

pub use binary::{BinaryReader, BinaryWriter};
pub use geometry::{read_points, write_points};
pub use object::{ObjectContext, ObjectTag, read_object, write_object};
pub use properties::{read_properties, write_properties};
pub use tile::{read_tile, write_tile};
pub use tileset::{decode_tileset, encode_tileset, read_tileset, write_tileset};
