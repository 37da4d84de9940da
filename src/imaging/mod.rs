//! Image processing for layers, the flattened mosaic, and thumbnails.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Placeholder raster** | `usvg` + `resvg` |
//! | **Format layer** | Lanczos3 `resize` + transparent pad + `unsharpen` |
//! | **Flatten** | integer source-over + `unsharpen` → PNG |
//! | **Thumbnail** | `resize_exact` at fixed width → PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining the catalog + backend

pub mod backend;
pub mod calculations;
pub mod composite;
pub mod operations;
mod params;
pub mod rust_backend;
mod svg;

pub use backend::{BackendError, EncodedImage, ImageBackend};
pub use operations::{
    Layer, THUMBNAIL_WIDTH, ThumbnailConfig, create_thumbnail, format_asset, plan_thumbnail,
};
pub use params::{DownscaleParams, LayerParams, Sharpening};
pub use rust_backend::RustBackend;
