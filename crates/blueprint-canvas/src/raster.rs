//! PNG rasterization of surface shapes with tiny-skia

use std::collections::HashMap;

use blueprint_core::constants::canvas;
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};

use crate::data_url::parse_data_url;
use crate::error::CanvasError;
use crate::shape::{Asset, AssetId, Bounds, Rgba, Shape, ShapeKind};

/// Options for exporting shapes to an image
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Pixels per surface unit
    pub scale: f32,
    /// Paint a white background instead of leaving it transparent
    pub background: bool,
    /// Margin around the drawing, in surface units
    pub padding: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: true,
            padding: canvas::EXPORT_PADDING,
        }
    }
}

const BOOKMARK_FILL: Rgba = Rgba::rgb(240, 240, 240);
const BOOKMARK_BORDER: Rgba = Rgba::rgb(200, 200, 200);

/// Render `shapes` (in paint order) to PNG bytes.
///
/// The output covers the union of the shapes' bounds plus padding.
pub fn render_png(
    shapes: &[&Shape],
    assets: &HashMap<AssetId, Asset>,
    options: &ExportOptions,
) -> Result<Vec<u8>, CanvasError> {
    let bounds = shapes
        .iter()
        .map(|s| s.bounds())
        .reduce(|a, b| a.union(&b))
        .ok_or(CanvasError::EmptyCanvas)?;

    let (width, height) = pixel_size(&bounds, options);
    if width > canvas::MAX_EXPORT_EDGE || height > canvas::MAX_EXPORT_EDGE {
        return Err(CanvasError::TooLarge { width, height });
    }

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| CanvasError::Encode(format!("invalid pixmap size {}x{}", width, height)))?;
    if options.background {
        pixmap.fill(tiny_skia::Color::WHITE);
    }

    for shape in shapes {
        let transform = Transform::from_translate(
            options.padding - bounds.min_x + shape.x,
            options.padding - bounds.min_y + shape.y,
        )
        .post_scale(options.scale, options.scale);
        draw_shape(&mut pixmap, shape, assets, transform)?;
    }

    pixmap
        .encode_png()
        .map_err(|e| CanvasError::Encode(e.to_string()))
}

fn pixel_size(bounds: &Bounds, options: &ExportOptions) -> (u32, u32) {
    let edge = |len: f32| ((len + options.padding * 2.0) * options.scale).ceil().max(1.0) as u32;
    (edge(bounds.width()), edge(bounds.height()))
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn draw_shape(
    pixmap: &mut Pixmap,
    shape: &Shape,
    assets: &HashMap<AssetId, Asset>,
    transform: Transform,
) -> Result<(), CanvasError> {
    match &shape.kind {
        ShapeKind::Draw {
            points,
            width,
            color,
        } => {
            let paint = paint_for(*color);
            match points.as_slice() {
                [] => {}
                [dot] => {
                    // A single click leaves a round dot
                    if let Some(path) = PathBuilder::from_circle(dot.x, dot.y, width / 2.0) {
                        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
                    }
                }
                [first, rest @ ..] => {
                    let mut builder = PathBuilder::new();
                    builder.move_to(first.x, first.y);
                    for p in rest {
                        builder.line_to(p.x, p.y);
                    }
                    if let Some(path) = builder.finish() {
                        let stroke = Stroke {
                            width: *width,
                            line_cap: LineCap::Round,
                            line_join: LineJoin::Round,
                            ..Default::default()
                        };
                        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
                    }
                }
            }
        }
        ShapeKind::Rect {
            w,
            h,
            color,
            filled,
        } => {
            if let Some(rect) = Rect::from_xywh(0.0, 0.0, *w, *h) {
                let paint = paint_for(*color);
                if *filled {
                    pixmap.fill_rect(rect, &paint, transform, None);
                } else {
                    let path = PathBuilder::from_rect(rect);
                    let stroke = Stroke {
                        width: 2.0,
                        ..Default::default()
                    };
                    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
                }
            }
        }
        ShapeKind::Image { asset_id, w, h } => {
            let asset = assets
                .get(asset_id)
                .ok_or(CanvasError::UnknownAsset(*asset_id))?;
            let data = parse_data_url(&asset.src)?;
            let image = Pixmap::decode_png(&data.bytes)
                .map_err(|e| CanvasError::ImageDecode(e.to_string()))?;

            let sx = w / image.width() as f32;
            let sy = h / image.height() as f32;
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..Default::default()
            };
            pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform.pre_scale(sx, sy), None);
        }
        ShapeKind::Bookmark { w, h, .. } => {
            if let Some(rect) = Rect::from_xywh(0.0, 0.0, *w, *h) {
                pixmap.fill_rect(rect, &paint_for(BOOKMARK_FILL), transform, None);
                let stroke = Stroke {
                    width: 1.0,
                    ..Default::default()
                };
                pixmap.stroke_path(
                    &PathBuilder::from_rect(rect),
                    &paint_for(BOOKMARK_BORDER),
                    &stroke,
                    transform,
                    None,
                );
            }
        }
    }
    Ok(())
}
