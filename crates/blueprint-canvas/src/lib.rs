//! Drawing surface contract and canvas export adapter
//!
//! The drawing library itself is an external collaborator. This crate pins
//! down the parts of it Blueprint relies on:
//! - **DrawingSurface**: shape enumeration, rasterization, asset/shape creation
//! - **SketchSurface**: an in-memory surface rendered with tiny-skia
//! - **CanvasAdapter**: exports the sketch as PNG and places generated images
//!   back onto the surface
//!
//! Surfaces resolve dropped URLs by fetching them by default. The adapter
//! installs a [`DataUrlImageHandler`] so embedded `data:image/` payloads are
//! turned into image shapes directly instead.

pub mod adapter;
pub mod data_url;
pub mod error;
pub mod raster;
pub mod shape;
pub mod surface;

// Re-exports for convenience
pub use adapter::{CanvasAdapter, DataUrlImageHandler};
pub use data_url::{is_image_data_url, parse_data_url, to_data_url, DataUrl};
pub use error::CanvasError;
pub use raster::ExportOptions;
pub use shape::{Asset, AssetId, Bounds, Point, Rgba, Shape, ShapeDraft, ShapeId, ShapeKind};
pub use surface::{DrawingSurface, Placement, SketchSurface, UrlContentHandler};
