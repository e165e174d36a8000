use super::{MapObject, Properties};

/// A single frame in a tile animation.
///
/// Frames are owned by the animated tile and refer to other tiles of the same
/// tileset by local id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Local id of the tile to display for this frame.
    pub tile_id: u32,
    /// How long to display this frame (milliseconds).
    pub duration_ms: u32,
}

/// Whether a tile is animated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TileKind {
    #[default]
    Static,
    /// Non-empty frame sequence, in playback order. Build it with
    /// [`TileKind::from_frames`]; an empty sequence is rejected on encode.
    Animated(Vec<AnimationFrame>),
}

impl TileKind {
    /// Builds the kind from a frame list; an empty list means a static tile.
    pub fn from_frames(frames: Vec<AnimationFrame>) -> Self {
        if frames.is_empty() {
            TileKind::Static
        } else {
            TileKind::Animated(frames)
        }
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        match self {
            TileKind::Static => &[],
            TileKind::Animated(frames) => frames,
        }
    }
}

/// Explicit record for one tile of a tileset.
///
/// Tiles without any metadata are implicit and have no record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TilesetTile {
    /// Index of the tile inside its own tileset (not a global id).
    pub local_id: u32,
    /// Free-form type tag; empty when unset.
    pub class: String,
    /// Collision shapes.
    pub objects: Vec<MapObject>,
    pub properties: Properties,
    pub kind: TileKind,
}

impl TilesetTile {
    pub fn new(local_id: u32) -> Self {
        Self {
            local_id,
            ..Default::default()
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.kind, TileKind::Animated(_))
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        self.kind.frames()
    }

    /// Total playback time of one animation loop in milliseconds.
    pub fn animation_duration_ms(&self) -> u64 {
        self.frames()
            .iter()
            .map(|frame| u64::from(frame.duration_ms))
            .sum()
    }
}
