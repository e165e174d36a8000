use bevy::math::Vec2;
use bitflags::bitflags;

use super::Properties;

bitflags! {
    /// Flip flags packed into the high bits of a global tile id.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FlipFlags: u32 {
        const HORIZONTAL = 0x8000_0000;
        const VERTICAL = 0x4000_0000;
        const DIAGONAL = 0x2000_0000;
    }
}

/// Global tile identifier with its flip flags, exactly as stored on disk.
///
/// The global id addresses a tile across every tileset of a map, unlike the
/// local ids used inside a single tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileGid(pub u32);

impl TileGid {
    pub fn new(global_id: u32, flags: FlipFlags) -> Self {
        Self((global_id & !FlipFlags::all().bits()) | flags.bits())
    }

    /// The global id with the flip bits masked out.
    pub fn global_id(self) -> u32 {
        self.0 & !FlipFlags::all().bits()
    }

    pub fn flags(self) -> FlipFlags {
        FlipFlags::from_bits_truncate(self.0)
    }

    pub fn is_flipped_horizontally(self) -> bool {
        self.flags().contains(FlipFlags::HORIZONTAL)
    }

    pub fn is_flipped_vertically(self) -> bool {
        self.flags().contains(FlipFlags::VERTICAL)
    }

    pub fn is_flipped_diagonally(self) -> bool {
        self.flags().contains(FlipFlags::DIAGONAL)
    }

    /// A blank gid refers to no tile at all.
    pub fn is_blank(self) -> bool {
        self.global_id() == 0
    }
}

/// Shape of a map object. The wire discriminant is derived from this.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    Rectangle,
    Ellipse,
    Tile(TileGid),
    /// Closed outline; the closing segment is implicit and not stored.
    Polygon(Vec<Vec2>),
    Polyline(Vec<Vec2>),
}

/// A map object: collision shape inside a tileset tile, or a free object on a
/// map's object layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: u32,
    /// Possibly empty.
    pub name: String,
    /// Combined class/type label; empty when the object has neither.
    pub class: String,
    pub position: Vec2,
    pub size: Vec2,
    /// Rotation in degrees, clockwise.
    pub rotation: f32,
    pub visible: bool,
    /// Not persisted by the packed format; decoded objects always get `1.0`.
    pub opacity: f32,
    pub properties: Properties,
    pub shape: ObjectShape,
}

impl MapObject {
    /// Creates a visible, unrotated, fully opaque object.
    pub fn new(id: u32, shape: ObjectShape) -> Self {
        Self {
            id,
            name: String::new(),
            class: String::new(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            rotation: 0.0,
            visible: true,
            opacity: 1.0,
            properties: Properties::new(),
            shape,
        }
    }

    /// Points of a polygon or polyline, empty for every other shape.
    pub fn points(&self) -> &[Vec2] {
        match &self.shape {
            ObjectShape::Polygon(points) | ObjectShape::Polyline(points) => points,
            _ => &[],
        }
    }
}
