//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: format_layer, flatten, and downscale.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust and built on
//! the `image` crate plus `resvg` for vector placeholders.

use super::params::{DownscaleParams, LayerParams, Sharpening};
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// An encoded PNG together with its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Every operation takes encoded bytes or decoded pixels in memory; nothing
/// touches the filesystem, so concurrent invocations never share scratch space.
pub trait ImageBackend: Sync {
    /// Decode, resize to the slot, pad to the canvas, optionally sharpen.
    fn format_layer(&self, data: &[u8], params: &LayerParams) -> Result<RgbaImage, BackendError>;

    /// Overlay `layers` on `base`, optionally sharpen, encode as PNG.
    fn flatten(
        &self,
        base: RgbaImage,
        layers: &[&RgbaImage],
        sharpening: Option<Sharpening>,
    ) -> Result<EncodedImage, BackendError>;

    /// Resize to a fixed width keeping the aspect ratio, encode as PNG.
    fn downscale(
        &self,
        data: &[u8],
        params: &DownscaleParams,
    ) -> Result<EncodedImage, BackendError>;
}
