//! Import of Tiled `.tsx` tilesets into the packed object model.
//!
//! The importer is the only place that knows about the `tiled` crate. It
//! produces a [`Tileset<PathBuf>`] whose textures are filesystem paths, and
//! registers each of those paths with a [`DependencyRegistry`] so the encoder
//! can later turn them into asset references.

use std::path::{Path, PathBuf};

use bevy::log::{debug, info, warn};
use bevy::math::Vec2;
use bevy_tiledpack_format::{
    AnimationFrame, CodecError, DependencyRegistry, FlipFlags, MapObject, ObjectShape, Properties,
    SharedTexture, TileGid, TileImage, TileKind, Tileset, TilesetGeometry, TilesetImage,
    TilesetTile,
};
use thiserror::Error;
use tiled::PropertyValue;

use crate::config::CompileSettings;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to load tileset: {0}")]
    TiledError(#[from] tiled::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Failed to encode tileset: {0}")]
    Codec(#[from] CodecError),

    #[error("Tile {tile_id} of image collection {path:?} has no image")]
    MissingTileImage { path: PathBuf, tile_id: u32 },

    #[error("Property '{name}' must name an image file, found {found}")]
    InvalidImageProperty { name: String, found: String },
}

/// Import a `.tsx` tileset.
///
/// Image paths in the result are resolved against the tileset's directory and
/// every one of them has been registered in `registry`.
///
/// # Arguments
/// * `path` - Path of the `.tsx` file
/// * `settings` - Reserved property names used to find normal and height maps
/// * `registry` - Receives every image the tileset depends on
///
/// # Returns
/// * `Ok(Tileset<PathBuf>)` - The imported tileset
/// * `Err(ImportError)` - If parsing fails, a collection tile has no image or
///   an image lies outside the registry's asset root
pub fn import_tileset(
    path: impl AsRef<Path>,
    settings: &CompileSettings,
    registry: &mut DependencyRegistry,
) -> Result<Tileset<PathBuf>, ImportError> {
    let path = path.as_ref();
    info!("Importing {:?}", path);

    // 1. Parse the TSX. Image sources come back already joined with the
    // tileset's directory; property values do not.
    let mut loader = tiled::Loader::new();
    let source = loader.load_tsx_tileset(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let geometry = TilesetGeometry {
        tile_width: source.tile_width,
        tile_height: source.tile_height,
        tile_count: source.tilecount,
        spacing: source.spacing,
        margin: source.margin,
        columns: source.columns,
    };

    // 2. Explicit tile records, in id order
    let mut records: Vec<(u32, tiled::Tile)> = source.tiles().collect();
    records.sort_by_key(|(tile_id, _)| *tile_id);

    // 3. Images, registered as dependencies
    let image = if let Some(atlas) = &source.image {
        let texture = register_image(registry, atlas.source.clone())?;
        let normal =
            property_image(registry, base_dir, &source.properties, &settings.normal_property)?;
        TilesetImage::Shared(SharedTexture { texture, normal })
    } else {
        let mut images = Vec::with_capacity(records.len());
        for (tile_id, tile) in &records {
            let Some(tile_image) = &tile.image else {
                return Err(ImportError::MissingTileImage {
                    path: path.to_path_buf(),
                    tile_id: *tile_id,
                });
            };
            let mut image = TileImage::new(register_image(registry, tile_image.source.clone())?);
            image.normal =
                property_image(registry, base_dir, &tile.properties, &settings.normal_property)?;
            image.height =
                property_image(registry, base_dir, &tile.properties, &settings.height_property)?;
            images.push(image);
        }
        TilesetImage::Collection(images)
    };

    // 4. Tile metadata and tileset properties
    let tiles = records
        .iter()
        .map(|(tile_id, tile)| convert_tile(*tile_id, tile))
        .collect();

    info!("Imported {:?} ({} dependencies)", path, registry.len());

    Ok(Tileset {
        geometry,
        image,
        tiles,
        properties: convert_properties(&source.properties),
    })
}

fn register_image(
    registry: &mut DependencyRegistry,
    path: PathBuf,
) -> Result<PathBuf, ImportError> {
    registry.register(&path)?;
    Ok(path)
}

/// Image named by a reserved property, if the property is set.
fn property_image(
    registry: &mut DependencyRegistry,
    base_dir: &Path,
    properties: &tiled::Properties,
    name: &str,
) -> Result<Option<PathBuf>, ImportError> {
    let relative = match properties.get(name) {
        None => return Ok(None),
        Some(PropertyValue::FileValue(value) | PropertyValue::StringValue(value))
            if !value.is_empty() =>
        {
            value
        }
        Some(other) => {
            return Err(ImportError::InvalidImageProperty {
                name: name.to_string(),
                found: format!("{other:?}"),
            });
        }
    };
    let path = register_image(registry, base_dir.join(relative))?;
    debug!("Property '{}' names image {:?}", name, path);
    Ok(Some(path))
}

fn convert_tile(tile_id: u32, tile: &tiled::Tile) -> TilesetTile {
    let objects = tile
        .collision
        .as_ref()
        .map(|group| group.object_data().iter().map(convert_object).collect())
        .unwrap_or_default();

    let frames: Vec<AnimationFrame> = tile
        .animation
        .as_ref()
        .map(|frames| {
            frames
                .iter()
                .map(|frame| AnimationFrame {
                    tile_id: frame.tile_id,
                    duration_ms: frame.duration,
                })
                .collect()
        })
        .unwrap_or_default();

    TilesetTile {
        local_id: tile_id,
        class: tile.user_type.clone().unwrap_or_default(),
        objects,
        properties: convert_properties(&tile.properties),
        kind: TileKind::from_frames(frames),
    }
}

/// Convert a collision object. Points and text have no packed shape and are
/// kept as rectangles of their bounds.
fn convert_object(object: &tiled::ObjectData) -> MapObject {
    let (shape, size) = match &object.shape {
        tiled::ObjectShape::Rect { width, height } => {
            let shape = match object.tile_data() {
                Some(tile) => ObjectShape::Tile(tile_gid(&tile)),
                None => ObjectShape::Rectangle,
            };
            (shape, Vec2::new(*width, *height))
        }
        tiled::ObjectShape::Ellipse { width, height } => {
            (ObjectShape::Ellipse, Vec2::new(*width, *height))
        }
        tiled::ObjectShape::Polygon { points } => {
            (ObjectShape::Polygon(to_vertices(points)), Vec2::ZERO)
        }
        tiled::ObjectShape::Polyline { points } => {
            (ObjectShape::Polyline(to_vertices(points)), Vec2::ZERO)
        }
        tiled::ObjectShape::Point(_, _) => (ObjectShape::Rectangle, Vec2::ZERO),
        tiled::ObjectShape::Text { width, height, .. } => {
            (ObjectShape::Rectangle, Vec2::new(*width, *height))
        }
    };

    MapObject {
        id: object.id(),
        name: object.name.clone(),
        class: object.user_type.clone(),
        position: Vec2::new(object.x, object.y),
        size,
        rotation: object.rotation,
        visible: object.visible,
        opacity: 1.0,
        properties: convert_properties(&object.properties),
        shape,
    }
}

/// A standalone tileset has no first gid, so tile objects are numbered as if
/// the tileset started at gid 1.
fn tile_gid(tile: &tiled::ObjectTileData) -> TileGid {
    let mut flags = FlipFlags::empty();
    if tile.flip_h {
        flags |= FlipFlags::HORIZONTAL;
    }
    if tile.flip_v {
        flags |= FlipFlags::VERTICAL;
    }
    if tile.flip_d {
        flags |= FlipFlags::DIAGONAL;
    }
    TileGid::new(tile.id() + 1, flags)
}

fn to_vertices(points: &[(f32, f32)]) -> Vec<Vec2> {
    points.iter().map(|(x, y)| Vec2::new(*x, *y)).collect()
}

/// Flatten typed Tiled properties into the packed string table.
///
/// `tiled` keeps properties in a hash map, so keys are sorted to make the
/// packed output deterministic.
pub fn convert_properties(properties: &tiled::Properties) -> Properties {
    let mut entries: Vec<(&String, &PropertyValue)> = properties.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .filter_map(|(key, value)| property_to_string(key, value).map(|value| (key.clone(), value)))
        .collect()
}

/// String form of a single property value, or `None` for values the packed
/// table cannot represent.
pub fn property_to_string(key: &str, value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::BoolValue(b) => Some(b.to_string()),
        PropertyValue::FloatValue(f) => Some(f.to_string()),
        PropertyValue::IntValue(i) => Some(i.to_string()),
        PropertyValue::ColorValue(color) => Some(format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            color.alpha, color.red, color.green, color.blue
        )),
        PropertyValue::StringValue(s) | PropertyValue::FileValue(s) => Some(s.clone()),
        PropertyValue::ObjectValue(id) => Some(id.to_string()),
        PropertyValue::ClassValue { property_type, .. } => {
            warn!(
                "Skipping class property '{}' of type '{}': class values cannot be packed",
                key, property_type
            );
            None
        }
    }
}
