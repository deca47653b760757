//! Drawing surface contract and the in-memory sketch surface

use std::collections::HashMap;

use crate::error::CanvasError;
use crate::raster::{render_png, ExportOptions};
use crate::shape::{Asset, AssetId, Point, Rgba, Shape, ShapeDraft, ShapeId, ShapeKind};

/// Default footprint of a bookmark card
const BOOKMARK_SIZE: (f32, f32) = (300.0, 320.0);

/// Asset and shape to create for intercepted content
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub asset: Asset,
    pub shape: ShapeDraft,
}

/// Hook consulted before a surface applies its default handling to a dropped URL
pub trait UrlContentHandler: Send + Sync {
    /// Return `None` to fall through to the surface's default handling
    fn intercept(&self, url: &str, point: Point) -> Option<Result<Placement, CanvasError>>;
}

/// What Blueprint needs from a drawing library.
///
/// Implementations must consult the registered [`UrlContentHandler`] before
/// their default URL handling, which typically fetches the URL over the network.
pub trait DrawingSurface: Send {
    /// Ids of all shapes on the current page, in paint order
    fn shape_ids(&self) -> Vec<ShapeId>;

    fn shape(&self, id: ShapeId) -> Option<&Shape>;

    fn asset(&self, id: AssetId) -> Option<&Asset>;

    fn create_asset(&mut self, asset: Asset);

    fn create_shape(&mut self, draft: ShapeDraft) -> ShapeId;

    /// Delete shapes; unknown ids are ignored
    fn delete_shapes(&mut self, ids: &[ShapeId]);

    /// Rasterize the given shapes to PNG bytes
    fn to_png(&self, ids: &[ShapeId], options: &ExportOptions) -> Result<Vec<u8>, CanvasError>;

    /// Install the URL content hook, replacing any previous one
    fn register_url_handler(&mut self, handler: Box<dyn UrlContentHandler>);

    /// Handle a URL dropped at `point`, returning the created shape
    fn drop_url(&mut self, url: &str, point: Point) -> Result<ShapeId, CanvasError>;
}

/// In-memory drawing surface
///
/// Holds shapes in paint order and image assets by id. Without a registered
/// handler, dropped URLs become bookmark cards that would be unfurled remotely.
#[derive(Default)]
pub struct SketchSurface {
    shapes: Vec<Shape>,
    assets: HashMap<AssetId, Asset>,
    url_handler: Option<Box<dyn UrlContentHandler>>,
}

impl SketchSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freehand stroke with page-space points
    pub fn draw_stroke(&mut self, points: &[Point], width: f32, color: Rgba) -> ShapeId {
        let origin = points.first().copied().unwrap_or_default();
        let relative = points
            .iter()
            .map(|p| Point::new(p.x - origin.x, p.y - origin.y))
            .collect();
        self.create_shape(ShapeDraft {
            x: origin.x,
            y: origin.y,
            kind: ShapeKind::Draw {
                points: relative,
                width,
                color,
            },
        })
    }

    /// Add an outlined rectangle
    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) -> ShapeId {
        self.create_shape(ShapeDraft {
            x,
            y,
            kind: ShapeKind::Rect {
                w,
                h,
                color,
                filled: false,
            },
        })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn default_url_handling(&mut self, url: &str, point: Point) -> ShapeId {
        log::debug!("No handler claimed {}, creating bookmark", abbreviate(url));
        let (w, h) = BOOKMARK_SIZE;
        self.create_shape(ShapeDraft {
            x: point.x - w / 2.0,
            y: point.y - h / 2.0,
            kind: ShapeKind::Bookmark {
                url: url.to_string(),
                w,
                h,
            },
        })
    }
}

impl DrawingSurface for SketchSurface {
    fn shape_ids(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(|s| s.id).collect()
    }

    fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    fn create_asset(&mut self, asset: Asset) {
        self.assets.insert(asset.id, asset);
    }

    fn create_shape(&mut self, draft: ShapeDraft) -> ShapeId {
        let id = ShapeId::new();
        self.shapes.push(Shape::from_draft(id, draft));
        id
    }

    fn delete_shapes(&mut self, ids: &[ShapeId]) {
        self.shapes.retain(|s| !ids.contains(&s.id));
    }

    fn to_png(&self, ids: &[ShapeId], options: &ExportOptions) -> Result<Vec<u8>, CanvasError> {
        let selected: Vec<&Shape> = self.shapes.iter().filter(|s| ids.contains(&s.id)).collect();
        render_png(&selected, &self.assets, options)
    }

    fn register_url_handler(&mut self, handler: Box<dyn UrlContentHandler>) {
        self.url_handler = Some(handler);
    }

    fn drop_url(&mut self, url: &str, point: Point) -> Result<ShapeId, CanvasError> {
        let intercepted = self
            .url_handler
            .as_ref()
            .and_then(|handler| handler.intercept(url, point));

        match intercepted {
            Some(placement) => {
                let Placement { asset, shape } = placement?;
                self.create_asset(asset);
                Ok(self.create_shape(shape))
            }
            None => Ok(self.default_url_handling(url, point)),
        }
    }
}

/// Shorten long URLs (data URLs in particular) for log lines
fn abbreviate(url: &str) -> &str {
    match url.char_indices().nth(64) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}
