//! Shapes and assets held by a drawing surface

use std::fmt;

use uuid::Uuid;

/// Identifier of a placed shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape:{}", self.0)
    }
}

/// Identifier of an image asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset:{}", self.0)
    }
}

/// Point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// What a shape draws
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Freehand stroke; points are relative to the shape origin
    Draw {
        points: Vec<Point>,
        width: f32,
        color: Rgba,
    },
    /// Rectangle, outlined or filled
    Rect {
        w: f32,
        h: f32,
        color: Rgba,
        filled: bool,
    },
    /// Image referencing an asset
    Image { asset_id: AssetId, w: f32, h: f32 },
    /// Link card for a URL whose preview is fetched remotely
    Bookmark { url: String, w: f32, h: f32 },
}

/// Shape before it has been given an id
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    pub x: f32,
    pub y: f32,
    pub kind: ShapeKind,
}

/// Shape placed on a surface
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub x: f32,
    pub y: f32,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn from_draft(id: ShapeId, draft: ShapeDraft) -> Self {
        Self {
            id,
            x: draft.x,
            y: draft.y,
            kind: draft.kind,
        }
    }

    /// Page-space bounds, including stroke width
    pub fn bounds(&self) -> Bounds {
        let (min_x, min_y, max_x, max_y) = match &self.kind {
            ShapeKind::Draw { points, width, .. } => {
                let half = width / 2.0;
                let mut min = (f32::MAX, f32::MAX);
                let mut max = (f32::MIN, f32::MIN);
                for p in points {
                    min = (min.0.min(p.x), min.1.min(p.y));
                    max = (max.0.max(p.x), max.1.max(p.y));
                }
                if points.is_empty() {
                    (0.0, 0.0, 0.0, 0.0)
                } else {
                    (min.0 - half, min.1 - half, max.0 + half, max.1 + half)
                }
            }
            ShapeKind::Rect { w, h, .. }
            | ShapeKind::Image { w, h, .. }
            | ShapeKind::Bookmark { w, h, .. } => (0.0, 0.0, *w, *h),
        };
        Bounds {
            min_x: self.x + min_x,
            min_y: self.y + min_y,
            max_x: self.x + max_x,
            max_y: self.y + max_y,
        }
    }
}

/// Image asset referenced by image shapes
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// Source of the image; a `data:` URL for embedded images
    pub src: String,
    pub w: f32,
    pub h: f32,
    pub mime_type: String,
}
