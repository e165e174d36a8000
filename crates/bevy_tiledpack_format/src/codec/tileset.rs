//! Top-level tileset records.
//!
//! A leading flag selects between a shared atlas and an image collection. The
//! whole image block is written before any tile's structural data so a loader
//! can start requesting textures before it has parsed the tiles.

use std::io::{Read, Write};
use std::path::Path;

use bevy::log::{debug, trace};

use super::binary::{BinaryReader, BinaryWriter, MAX_PREALLOCATION};
use super::properties::{read_properties, write_properties};
use super::tile::{read_tile, write_tile};
use crate::error::CodecError;
use crate::model::{SharedTexture, TileImage, Tileset, TilesetGeometry, TilesetImage};
use crate::reference::{ExternalReference, ReferenceResolver, TextureMaterializer};

/// Encodes `tileset`, resolving every image through `resolver`.
///
/// # Arguments
///
/// * `writer` - Destination stream
/// * `tileset` - Tileset whose textures are logical image paths
/// * `resolver` - Turns each image path into a reference token
///
/// # Errors
///
/// [`CodecError::UnsupportedGeometry`] if the layout cannot be described by the
/// format, [`CodecError::UnresolvedReference`] if an image was never registered.
pub fn write_tileset<T, W>(
    writer: &mut BinaryWriter<W>,
    tileset: &Tileset<T>,
    resolver: &impl ReferenceResolver,
) -> Result<(), CodecError>
where
    T: AsRef<Path>,
    W: Write,
{
    validate_for_encode(tileset)?;

    let geometry = &tileset.geometry;
    writer.write_bool(tileset.has_shared_texture())?;
    writer.write_u32_as_i32("tile width", geometry.tile_width)?;
    writer.write_u32_as_i32("tile height", geometry.tile_height)?;
    writer.write_u32_as_i32("tile count", geometry.tile_count)?;
    writer.write_u32_as_i32("spacing", geometry.spacing)?;
    writer.write_u32_as_i32("margin", geometry.margin)?;
    writer.write_u32_as_i32("columns", geometry.columns)?;
    writer.write_count("explicit tile count", tileset.tiles.len())?;

    match &tileset.image {
        TilesetImage::Shared(shared) => {
            write_resolved(writer, resolver, &shared.texture)?;
            write_optional(writer, resolver, shared.normal.as_ref())?;
        }
        TilesetImage::Collection(images) => {
            for image in images {
                write_resolved(writer, resolver, &image.texture)?;
                write_optional(writer, resolver, image.normal.as_ref())?;
                write_optional(writer, resolver, image.height.as_ref())?;
            }
        }
    }

    for tile in &tileset.tiles {
        write_tile(writer, tile)?;
    }

    write_properties(writer, &tileset.properties)?;

    debug!(
        "Encoded {} tileset with {} tile records",
        if tileset.has_shared_texture() {
            "shared-texture"
        } else {
            "image-collection"
        },
        tileset.tiles.len()
    );
    Ok(())
}

/// Decodes a tileset, handing every reference token to `materializer`.
///
/// Per-tile normal and height references of an image collection are consumed
/// but not materialized; they are `None` on the result.
pub fn read_tileset<R, M>(
    reader: &mut BinaryReader<R>,
    materializer: &mut M,
) -> Result<Tileset<M::Texture>, CodecError>
where
    R: Read,
    M: TextureMaterializer,
{
    let has_shared_texture = reader.read_bool("has shared image")?;
    let geometry = TilesetGeometry {
        tile_width: reader.read_non_negative("tile width")?,
        tile_height: reader.read_non_negative("tile height")?,
        tile_count: reader.read_non_negative("tile count")?,
        spacing: reader.read_non_negative("spacing")?,
        margin: reader.read_non_negative("margin")?,
        columns: reader.read_non_negative("columns")?,
    };
    let explicit_tiles = reader.read_count("explicit tile count")?;
    validate_decoded(&geometry, has_shared_texture)?;

    let image = if has_shared_texture {
        let texture = read_materialized(reader, materializer, "shared image")?;
        let normal = if reader.read_bool("has normal image")? {
            Some(read_materialized(reader, materializer, "normal image")?)
        } else {
            None
        };
        TilesetImage::Shared(SharedTexture { texture, normal })
    } else {
        let mut images = Vec::with_capacity(explicit_tiles.min(MAX_PREALLOCATION));
        for _ in 0..explicit_tiles {
            let texture = read_materialized(reader, materializer, "tile image")?;
            skip_optional(reader, "tile normal image")?;
            skip_optional(reader, "tile height image")?;
            images.push(TileImage::new(texture));
        }
        TilesetImage::Collection(images)
    };

    let mut tiles = Vec::with_capacity(explicit_tiles.min(MAX_PREALLOCATION));
    for _ in 0..explicit_tiles {
        tiles.push(read_tile(reader, &geometry)?);
    }

    let properties = read_properties(reader)?;

    Ok(Tileset {
        geometry,
        image,
        tiles,
        properties,
    })
}

/// Encodes a tileset into a fresh byte buffer.
pub fn encode_tileset<T: AsRef<Path>>(
    tileset: &Tileset<T>,
    resolver: &impl ReferenceResolver,
) -> Result<Vec<u8>, CodecError> {
    let mut writer = BinaryWriter::new(Vec::new());
    write_tileset(&mut writer, tileset, resolver)?;
    Ok(writer.into_inner())
}

/// Decodes a tileset from a complete byte buffer.
///
/// Trailing bytes after the tileset property table are rejected.
pub fn decode_tileset<M: TextureMaterializer>(
    bytes: &[u8],
    materializer: &mut M,
) -> Result<Tileset<M::Texture>, CodecError> {
    let mut reader = BinaryReader::new(bytes);
    let tileset = read_tileset(&mut reader, materializer)?;
    let rest = reader.into_inner();
    if !rest.is_empty() {
        return Err(CodecError::malformed(
            "tileset",
            format!("{} trailing bytes after the tileset", rest.len()),
        ));
    }
    Ok(tileset)
}

fn validate_for_encode<T>(tileset: &Tileset<T>) -> Result<(), CodecError> {
    let geometry = &tileset.geometry;
    if geometry.tile_width == 0 || geometry.tile_height == 0 {
        return Err(CodecError::UnsupportedGeometry(format!(
            "tile size must be positive, got {}x{}",
            geometry.tile_width, geometry.tile_height
        )));
    }
    match &tileset.image {
        TilesetImage::Shared(_) if geometry.columns == 0 => Err(
            CodecError::UnsupportedGeometry("shared-texture tileset has no columns".to_string()),
        ),
        TilesetImage::Shared(_) if geometry.atlas_extent().is_none() => {
            Err(CodecError::UnsupportedGeometry(format!(
                "atlas of {} columns of {}px tiles does not fit in u32 pixels",
                geometry.columns, geometry.tile_width
            )))
        }
        TilesetImage::Collection(images) if images.len() != tileset.tiles.len() => {
            Err(CodecError::UnsupportedGeometry(format!(
                "image collection has {} images for {} tile records",
                images.len(),
                tileset.tiles.len()
            )))
        }
        _ => Ok(()),
    }
}

fn validate_decoded(
    geometry: &TilesetGeometry,
    has_shared_texture: bool,
) -> Result<(), CodecError> {
    if geometry.tile_width == 0 || geometry.tile_height == 0 {
        return Err(CodecError::malformed("tile size", "tile size must be positive"));
    }
    if has_shared_texture {
        if geometry.columns == 0 {
            return Err(CodecError::malformed(
                "columns",
                "shared-texture tileset has no columns",
            ));
        }
        if geometry.atlas_extent().is_none() {
            return Err(CodecError::malformed(
                "atlas size",
                "atlas does not fit in u32 pixel coordinates",
            ));
        }
    }
    Ok(())
}

fn write_resolved<T: AsRef<Path>, W: Write>(
    writer: &mut BinaryWriter<W>,
    resolver: &impl ReferenceResolver,
    path: &T,
) -> Result<(), CodecError> {
    let reference = resolver.resolve(path.as_ref())?;
    trace!("Writing reference {}", reference);
    writer.write_reference(&reference)
}

fn write_optional<T: AsRef<Path>, W: Write>(
    writer: &mut BinaryWriter<W>,
    resolver: &impl ReferenceResolver,
    path: Option<&T>,
) -> Result<(), CodecError> {
    match path {
        Some(path) => {
            writer.write_bool(true)?;
            write_resolved(writer, resolver, path)
        }
        None => writer.write_bool(false),
    }
}

fn read_materialized<R: Read, M: TextureMaterializer>(
    reader: &mut BinaryReader<R>,
    materializer: &mut M,
    field: &'static str,
) -> Result<M::Texture, CodecError> {
    let reference = reader.read_reference(field)?;
    materializer.materialize(&reference)
}

fn skip_optional<R: Read>(
    reader: &mut BinaryReader<R>,
    field: &'static str,
) -> Result<Option<ExternalReference>, CodecError> {
    if reader.read_bool(field)? {
        let reference = reader.read_reference(field)?;
        trace!("Skipping {} {}", field, reference);
        Ok(Some(reference))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;
    use crate::model::TilesetTile;
    use crate::reference::KeepReferences;

    /// Resolves a fixed set of paths to their file names.
    struct Names(HashMap<PathBuf, ExternalReference>);

    impl Names {
        fn of(paths: &[&str]) -> Self {
            Self(
                paths
                    .iter()
                    .map(|p| (PathBuf::from(p), ExternalReference::new(*p)))
                    .collect(),
            )
        }
    }

    impl ReferenceResolver for Names {
        fn resolve(&self, logical_path: &Path) -> Result<ExternalReference, CodecError> {
            self.0
                .get(logical_path)
                .cloned()
                .ok_or_else(|| CodecError::UnresolvedReference(logical_path.to_path_buf()))
        }
    }

    fn geometry() -> TilesetGeometry {
        TilesetGeometry {
            tile_width: 32,
            tile_height: 32,
            tile_count: 10,
            spacing: 1,
            margin: 2,
            columns: 4,
        }
    }

    #[test]
    fn test_shared_header_layout() {
        let tileset = Tileset::shared(geometry(), "atlas.png");
        let bytes = encode_tileset(&tileset, &Names::of(&["atlas.png"])).unwrap();

        assert_eq!(bytes[0], 1);
        let ints: Vec<i32> = bytes[1..29]
            .chunks(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(ints, vec![32, 32, 10, 1, 2, 4, 0]);
        assert_eq!(bytes[29], 9);
        assert_eq!(&bytes[30..39], b"atlas.png");
        // no normal map, empty tileset properties
        assert_eq!(&bytes[39..], &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_shared_normal_map_round_trips() {
        let mut tileset = Tileset::shared(geometry(), "atlas.png");
        if let TilesetImage::Shared(shared) = &mut tileset.image {
            shared.normal = Some("atlas_n.png");
        }
        tileset.properties.insert("normal", "atlas_n.png");
        let bytes = encode_tileset(&tileset, &Names::of(&["atlas.png", "atlas_n.png"])).unwrap();

        let decoded = decode_tileset(&bytes, &mut KeepReferences).unwrap();
        assert_eq!(decoded.texture().map(|r| r.as_str()), Some("atlas.png"));
        assert_eq!(decoded.normal_texture().map(|r| r.as_str()), Some("atlas_n.png"));
        assert_eq!(decoded.properties.get("normal"), Some("atlas_n.png"));
        assert_eq!(decoded.rows(), 3);
    }

    #[test]
    fn test_collection_images_precede_tile_records() {
        let tileset = Tileset::collection(
            TilesetGeometry {
                columns: 0,
                tile_count: 2,
                ..geometry()
            },
            [
                (TilesetTile::new(0), TileImage::new("a.png")),
                (TilesetTile::new(1), TileImage::new("b.png")),
            ],
        );
        let bytes = encode_tileset(&tileset, &Names::of(&["a.png", "b.png"])).unwrap();

        assert_eq!(bytes[0], 0);
        // header ends at 29; first image block is "a.png" + two absent flags
        assert_eq!(&bytes[29..37], &[5, b'a', b'.', b'p', b'n', b'g', 0, 0]);
        assert_eq!(&bytes[37..45], &[5, b'b', b'.', b'p', b'n', b'g', 0, 0]);
    }

    #[test]
    fn test_unregistered_image_fails() {
        let tileset = Tileset::shared(geometry(), "missing.png");
        assert!(matches!(
            encode_tileset(&tileset, &Names::of(&[])),
            Err(CodecError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn test_zero_tile_size_is_unsupported() {
        let tileset = Tileset::shared(
            TilesetGeometry {
                tile_width: 0,
                ..geometry()
            },
            "atlas.png",
        );
        assert!(matches!(
            encode_tileset(&tileset, &Names::of(&["atlas.png"])),
            Err(CodecError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn test_shared_without_columns_is_unsupported() {
        let tileset = Tileset::shared(
            TilesetGeometry {
                columns: 0,
                ..geometry()
            },
            "atlas.png",
        );
        assert!(matches!(
            encode_tileset(&tileset, &Names::of(&["atlas.png"])),
            Err(CodecError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn test_collection_image_count_must_match_tiles() {
        let mut tileset = Tileset::collection(
            geometry(),
            [(TilesetTile::new(0), TileImage::new("a.png"))],
        );
        tileset.tiles.push(TilesetTile::new(1));
        assert!(matches!(
            encode_tileset(&tileset, &Names::of(&["a.png"])),
            Err(CodecError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let tileset = Tileset::shared(geometry(), "atlas.png");
        let mut bytes = encode_tileset(&tileset, &Names::of(&["atlas.png"])).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode_tileset(&bytes, &mut KeepReferences),
            Err(CodecError::MalformedInput {
                field: "tileset",
                ..
            })
        ));
    }

    #[test]
    fn test_oversized_atlas_is_unsupported() {
        let tileset = Tileset::shared(
            TilesetGeometry {
                tile_width: 100_000,
                columns: 100_000,
                ..geometry()
            },
            "atlas.png",
        );
        assert!(matches!(
            encode_tileset(&tileset, &Names::of(&["atlas.png"])),
            Err(CodecError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn test_decoded_oversized_atlas_is_malformed() {
        let mut writer = BinaryWriter::new(Vec::new());
        writer.write_bool(true).unwrap();
        // width, height, count, spacing, margin, columns, explicit tiles
        for value in [100_000, 16, 100, 0, 0, 100_000, 0] {
            writer.write_i32(value).unwrap();
        }
        writer.write_reference(&ExternalReference::new("a.png")).unwrap();
        writer.write_bool(false).unwrap();
        writer.write_i32(0).unwrap();
        let bytes = writer.into_inner();

        assert!(matches!(
            decode_tileset(&bytes, &mut KeepReferences),
            Err(CodecError::MalformedInput {
                field: "atlas size",
                ..
            })
        ));
    }

    #[test]
    fn test_decoded_zero_columns_on_shared_is_malformed() {
        let tileset = Tileset::shared(geometry(), "atlas.png");
        let mut bytes = encode_tileset(&tileset, &Names::of(&["atlas.png"])).unwrap();
        // columns is the sixth header integer
        bytes[21..25].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(
            decode_tileset(&bytes, &mut KeepReferences),
            Err(CodecError::MalformedInput {
                field: "columns",
                ..
            })
        ));
    }
}
