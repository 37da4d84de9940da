//! High-level image operations.
//!
//! These functions combine the size catalog with backend execution.
//! They take a size key or configuration, compute parameters, and call the backend.

use super::backend::{BackendError, EncodedImage, ImageBackend};
use super::params::{DownscaleParams, LayerParams, Sharpening};
use crate::catalog::SizeKey;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Width of the preview thumbnail.
pub const THUMBNAIL_WIDTH: u32 = 640;

/// One size's content on a transparent, canvas-sized raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub key: SizeKey,
    pub image: RgbaImage,
}

impl Layer {
    /// Lossless PNG encoding of the layer.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(self.image.clone())
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
        Ok(png)
    }
}

/// Turn raw image bytes (an upload or a placeholder) into the layer for `key`.
///
/// Resizes to the slot without keeping the aspect ratio, pads to the canvas,
/// then sharpens. Undecodable input surfaces as
/// [`BackendError::UnsupportedImageFormat`].
pub fn format_asset(
    backend: &impl ImageBackend,
    data: &[u8],
    key: SizeKey,
    sharpening: Option<Sharpening>,
) -> Result<Layer> {
    let params = LayerParams::for_slot(key.spec(), sharpening);
    let image = backend.format_layer(data, &params)?;
    Ok(Layer { key, image })
}

/// Configuration for the preview thumbnail.
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    pub width: u32,
    pub sharpening: Option<Sharpening>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: THUMBNAIL_WIDTH,
            sharpening: None,
        }
    }
}

/// Plan a downscale operation without executing it.
pub fn plan_thumbnail(config: &ThumbnailConfig) -> DownscaleParams {
    DownscaleParams {
        width: config.width,
        sharpening: config.sharpening,
    }
}

/// Downscale a finished mosaic, or a lone image, to the preview width.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    data: &[u8],
    config: &ThumbnailConfig,
) -> Result<EncodedImage> {
    backend.downscale(data, &plan_thumbnail(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn format_asset_uses_slot_geometry() {
        let backend = MockBackend::new();
        let layer = format_asset(&backend, b"img", SizeKey::FullBanner, None).unwrap();

        assert_eq!(layer.key, SizeKey::FullBanner);
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::FormatLayer {
                source: b"img".to_vec(),
                width: 470,
                height: 60,
                left: 490,
                top: 428,
            }]
        );
    }

    #[test]
    fn format_asset_propagates_decode_failure() {
        let backend = MockBackend::rejecting(b"BAD");
        let err = format_asset(&backend, b"BAD", SizeKey::HalfPage, None).unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedImageFormat(_)));
    }

    #[test]
    fn thumbnail_defaults_to_preview_width() {
        let params = plan_thumbnail(&ThumbnailConfig::default());
        assert_eq!(params.width, 640);
        assert_eq!(params.sharpening, None);
    }

    #[test]
    fn create_thumbnail_calls_backend() {
        let backend = MockBackend::new();
        let out = create_thumbnail(&backend, b"mosaic", &ThumbnailConfig::default()).unwrap();
        assert_eq!(out.width, 640);
        assert!(matches!(
            backend.get_operations()[..],
            [RecordedOp::Downscale { width: 640, .. }]
        ));
    }

    #[test]
    fn layer_png_roundtrips() {
        let mut pixels = RgbaImage::new(8, 4);
        pixels.put_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
        let layer = Layer {
            key: SizeKey::HalfPage,
            image: pixels.clone(),
        };

        let decoded = image::load_from_memory(&layer.to_png().unwrap())
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded, pixels);
    }
}
