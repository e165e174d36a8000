use std::io::{Read, Write};

use bevy::log::warn;

use super::binary::{BinaryReader, BinaryWriter, MAX_PREALLOCATION};
use super::object::{ObjectContext, read_object, write_object};
use super::properties::{read_properties, write_properties};
use crate::error::CodecError;
use crate::model::{AnimationFrame, TileKind, TilesetGeometry, TilesetTile};

/// Writes one explicit tile record.
///
/// Field order: local id, type, frame count, object count, objects, frames
/// (only when there are any), properties.
///
/// An animated tile without frames is [`CodecError::UnsupportedGeometry`]; a
/// frame count of zero always decodes as a static tile.
pub fn write_tile<W: Write>(
    writer: &mut BinaryWriter<W>,
    tile: &TilesetTile,
) -> Result<(), CodecError> {
    if matches!(&tile.kind, TileKind::Animated(frames) if frames.is_empty()) {
        return Err(CodecError::UnsupportedGeometry(format!(
            "tile {} is animated but has no frames",
            tile.local_id
        )));
    }
    let frames = tile.frames();

    writer.write_u32_as_i32("tile id", tile.local_id)?;
    writer.write_str(&tile.class)?;
    writer.write_count("frame count", frames.len())?;
    writer.write_count("object count", tile.objects.len())?;

    for object in &tile.objects {
        write_object(writer, object)?;
    }

    for frame in frames {
        writer.write_u32_as_i32("frame tile id", frame.tile_id)?;
        writer.write_u32_as_i32("frame duration", frame.duration_ms)?;
    }

    write_properties(writer, &tile.properties)
}

/// Reads one explicit tile record belonging to the tileset described by
/// `owner`.
///
/// A frame count of zero yields a static tile, anything else an animated tile
/// with exactly that many frames.
pub fn read_tile<R: Read>(
    reader: &mut BinaryReader<R>,
    owner: &TilesetGeometry,
) -> Result<TilesetTile, CodecError> {
    let local_id = reader.read_non_negative("tile id")?;
    let class = reader.read_string("tile type")?;
    let frame_count = reader.read_count("frame count")?;
    let object_count = reader.read_count("object count")?;

    let mut objects = Vec::with_capacity(object_count.min(MAX_PREALLOCATION));
    for _ in 0..object_count {
        objects.push(read_object(reader, ObjectContext::TilesetTile)?);
    }

    let kind = if frame_count == 0 {
        TileKind::Static
    } else {
        let mut frames = Vec::with_capacity(frame_count.min(MAX_PREALLOCATION));
        for _ in 0..frame_count {
            let tile_id = reader.read_non_negative("frame tile id")?;
            let duration_ms = reader.read_non_negative("frame duration")?;
            if tile_id >= owner.tile_count {
                warn!(
                    "Tile {} animates to tile {} but the tileset only has {} tiles",
                    local_id, tile_id, owner.tile_count
                );
            }
            frames.push(AnimationFrame {
                tile_id,
                duration_ms,
            });
        }
        TileKind::Animated(frames)
    };

    let properties = read_properties(reader)?;

    Ok(TilesetTile {
        local_id,
        class,
        objects,
        properties,
        kind,
    })
}
