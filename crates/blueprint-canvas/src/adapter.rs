//! Canvas export adapter
//!
//! Wraps a [`DrawingSurface`] with the three operations the generate workflow
//! needs: export the sketch, place a generated image, clear the drawing.

use blueprint_core::constants::canvas;
use blueprint_core::Mode;

use crate::data_url::{is_image_data_url, parse_data_url, to_data_url};
use crate::error::CanvasError;
use crate::raster::ExportOptions;
use crate::shape::{Asset, AssetId, Point, ShapeDraft, ShapeId, ShapeKind};
use crate::surface::{DrawingSurface, Placement, UrlContentHandler};

/// Turns dropped `data:image/` URLs into an image asset plus an image shape
///
/// The shape gets a fixed footprint centred on the drop point. Any other URL is
/// left to the surface's default handling.
pub struct DataUrlImageHandler {
    mode: Mode,
    width: f32,
    height: f32,
}

impl DataUrlImageHandler {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            width: canvas::IMPORT_WIDTH,
            height: canvas::IMPORT_HEIGHT,
        }
    }
}

impl UrlContentHandler for DataUrlImageHandler {
    fn intercept(&self, url: &str, point: Point) -> Option<Result<Placement, CanvasError>> {
        if !is_image_data_url(url) {
            return None;
        }

        let placement = parse_data_url(url).map(|data| {
            let asset_id = AssetId::new();
            Placement {
                asset: Asset {
                    id: asset_id,
                    name: format!(
                        "generated-{}-{}.png",
                        self.mode,
                        chrono::Utc::now().timestamp_millis()
                    ),
                    src: url.to_string(),
                    w: self.width,
                    h: self.height,
                    mime_type: data.mime_type,
                },
                shape: ShapeDraft {
                    x: point.x - self.width / 2.0,
                    y: point.y - self.height / 2.0,
                    kind: ShapeKind::Image {
                        asset_id,
                        w: self.width,
                        h: self.height,
                    },
                },
            }
        });

        if placement.is_ok() {
            log::info!("Placed embedded image at ({}, {})", point.x, point.y);
        }
        Some(placement)
    }
}

/// Export/import adapter over a drawing surface
pub struct CanvasAdapter<S: DrawingSurface> {
    surface: S,
    export_options: ExportOptions,
}

impl<S: DrawingSurface> CanvasAdapter<S> {
    /// Wrap `surface` and install the embedded-image handler for `mode`
    pub fn new(mut surface: S, mode: Mode) -> Self {
        surface.register_url_handler(Box::new(DataUrlImageHandler::new(mode)));
        Self {
            surface,
            export_options: ExportOptions::default(),
        }
    }

    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export_options = options;
        self
    }

    /// Re-install the image handler so new assets are named after `mode`
    pub fn set_mode(&mut self, mode: Mode) {
        self.surface
            .register_url_handler(Box::new(DataUrlImageHandler::new(mode)));
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }

    pub fn shape_count(&self) -> usize {
        self.surface.shape_ids().len()
    }

    /// Rasterize every shape on the page to PNG.
    ///
    /// Fails with [`CanvasError::EmptyCanvas`] when nothing has been drawn.
    pub fn export_current_drawing(&self) -> Result<Vec<u8>, CanvasError> {
        let ids = self.surface.shape_ids();
        if ids.is_empty() {
            return Err(CanvasError::EmptyCanvas);
        }
        self.surface.to_png(&ids, &self.export_options)
    }

    /// Drop an embedded image (`data:image/...;base64,...`) at `drop_point`
    pub fn import_image_as_drawable(
        &mut self,
        data_url: &str,
        drop_point: Point,
    ) -> Result<ShapeId, CanvasError> {
        if !is_image_data_url(data_url) {
            return Err(CanvasError::InvalidDataUrl(
                "expected a data:image/ URL".to_string(),
            ));
        }
        self.surface.drop_url(data_url, drop_point)
    }

    /// Drop raw PNG bytes at `drop_point`
    pub fn import_png(&mut self, png: &[u8], drop_point: Point) -> Result<ShapeId, CanvasError> {
        self.import_image_as_drawable(&to_data_url("image/png", png), drop_point)
    }

    /// Delete every shape on the page
    pub fn clear_drawing(&mut self) {
        let ids = self.surface.shape_ids();
        if !ids.is_empty() {
            self.surface.delete_shapes(&ids);
        }
    }
}
