//! Map-object records.
//!
//! Every object starts with a one-byte tag followed by the fields common to all
//! shapes; the tag then selects a shape-specific payload.

use std::io::{Read, Write};

use bevy::log::trace;

use super::binary::{BinaryReader, BinaryWriter};
use super::geometry::{read_points, write_points};
use super::properties::{read_properties, write_properties};
use crate::error::CodecError;
use crate::model::{MapObject, ObjectShape, TileGid};

/// Wire discriminant of a map object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectTag {
    Rectangle = 0,
    Tile = 1,
    Ellipse = 2,
    Polygon = 3,
    Polyline = 4,
}

impl ObjectTag {
    pub fn of(shape: &ObjectShape) -> Self {
        match shape {
            ObjectShape::Rectangle => ObjectTag::Rectangle,
            ObjectShape::Tile(_) => ObjectTag::Tile,
            ObjectShape::Ellipse => ObjectTag::Ellipse,
            ObjectShape::Polygon(_) => ObjectTag::Polygon,
            ObjectShape::Polyline(_) => ObjectTag::Polyline,
        }
    }
}

impl TryFrom<u8> for ObjectTag {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ObjectTag::Rectangle),
            1 => Ok(ObjectTag::Tile),
            2 => Ok(ObjectTag::Ellipse),
            3 => Ok(ObjectTag::Polygon),
            4 => Ok(ObjectTag::Polyline),
            other => Err(CodecError::InvalidVariant(other)),
        }
    }
}

/// Where an object record is being decoded.
///
/// The same tag decodes differently depending on nesting: a tile object on a
/// map layer keeps its gid, while a tile object inside a tileset tile's
/// collision list has its gid read and dropped and comes back as a rectangle.
/// The packed format has always behaved this way for collision shapes, so the
/// quirk is preserved rather than fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectContext {
    Map,
    TilesetTile,
}

pub fn write_object<W: Write>(
    writer: &mut BinaryWriter<W>,
    object: &MapObject,
) -> Result<(), CodecError> {
    let tag = ObjectTag::of(&object.shape);
    trace!("Writing {:?} object {}", tag, object.id);

    writer.write_u8(tag as u8)?;
    writer.write_u32_as_i32("object id", object.id)?;
    writer.write_str(&object.name)?;
    writer.write_str(&object.class)?;
    writer.write_f32(object.position.x)?;
    writer.write_f32(object.position.y)?;
    writer.write_f32(object.size.x)?;
    writer.write_f32(object.size.y)?;
    writer.write_f32(object.rotation)?;
    writer.write_bool(object.visible)?;
    write_properties(writer, &object.properties)?;

    match &object.shape {
        ObjectShape::Rectangle | ObjectShape::Ellipse => Ok(()),
        ObjectShape::Tile(gid) => writer.write_u32(gid.0),
        ObjectShape::Polygon(points) | ObjectShape::Polyline(points) => {
            write_points(writer, points)
        }
    }
}

pub fn read_object<R: Read>(
    reader: &mut BinaryReader<R>,
    context: ObjectContext,
) -> Result<MapObject, CodecError> {
    let tag = ObjectTag::try_from(reader.read_u8("object tag")?)?;
    let id = reader.read_non_negative("object id")?;
    let name = reader.read_string("object name")?;
    let class = reader.read_string("object class")?;
    let position = reader.read_vec2("object position")?;
    let size = reader.read_vec2("object size")?;
    let rotation = reader.read_f32("object rotation")?;
    let visible = reader.read_bool("object visibility")?;
    let properties = read_properties(reader)?;

    let shape = match tag {
        ObjectTag::Rectangle => ObjectShape::Rectangle,
        ObjectTag::Ellipse => ObjectShape::Ellipse,
        ObjectTag::Tile => {
            let gid = TileGid(reader.read_u32("object gid")?);
            match context {
                ObjectContext::Map => ObjectShape::Tile(gid),
                ObjectContext::TilesetTile => {
                    trace!("Tile object {} inside a tileset tile decodes as a rectangle", id);
                    ObjectShape::Rectangle
                }
            }
        }
        ObjectTag::Polygon => ObjectShape::Polygon(read_points(reader)?),
        ObjectTag::Polyline => ObjectShape::Polyline(read_points(reader)?),
    };

    Ok(MapObject {
        id,
        name,
        class,
        position,
        size,
        rotation,
        visible,
        opacity: 1.0,
        properties,
        shape,
    })
}
