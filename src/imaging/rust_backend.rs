//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image` crate (pure Rust decoders) |
//! | Decode (SVG) | `usvg` parse + `resvg` rasterize |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Pad to canvas | `image::imageops::replace` onto a transparent buffer |
//! | Composite | integer source-over ([`composite`](super::composite)) |
//! | Sharpening | `image::imageops::unsharpen` |
//! | Encode → PNG | `image::DynamicImage::write_to` |

use super::backend::{BackendError, EncodedImage, ImageBackend};
use super::calculations::{scaled_height, slot_rect};
use super::composite::overlay_all;
use super::params::{DownscaleParams, LayerParams, Sharpening};
use super::svg;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Input is always in memory, so an IO error while decoding means truncated data.
fn decode_error(e: ImageError) -> BackendError {
    match e {
        ImageError::Limits(l) => BackendError::ProcessingFailed(l.to_string()),
        other => BackendError::UnsupportedImageFormat(other.to_string()),
    }
}

/// Decode raster or SVG bytes.
fn load_image(data: &[u8]) -> Result<DynamicImage, BackendError> {
    if svg::looks_like_svg(data) {
        return svg::rasterize(data).map(DynamicImage::ImageRgba8);
    }
    let format = image::guess_format(data).map_err(decode_error)?;
    image::load_from_memory_with_format(data, format).map_err(decode_error)
}

fn sharpen_rgba(img: RgbaImage, sharpening: Option<Sharpening>) -> RgbaImage {
    match sharpening {
        Some(s) => imageops::unsharpen(&img, s.sigma, s.threshold),
        None => img,
    }
}

/// Zero every pixel outside the half-open rectangle `(x0, y0, x1, y1)`.
fn clear_outside(img: &mut RgbaImage, (x0, y0, x1, y1): (u32, u32, u32, u32)) {
    for (x, y, px) in img.enumerate_pixels_mut() {
        if x < x0 || x >= x1 || y < y0 || y >= y1 {
            *px = image::Rgba([0, 0, 0, 0]);
        }
    }
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
    Ok(png)
}

impl ImageBackend for RustBackend {
    fn format_layer(&self, data: &[u8], params: &LayerParams) -> Result<RgbaImage, BackendError> {
        let img = load_image(data)?.into_rgba8();

        // Exact slot size, aspect ratio deliberately dropped
        let resized = imageops::resize(&img, params.width, params.height, FilterType::Lanczos3);

        let (canvas_w, canvas_h) = params.canvas();
        let mut canvas = RgbaImage::new(canvas_w, canvas_h);
        imageops::replace(
            &mut canvas,
            &resized,
            i64::from(params.insets.left),
            i64::from(params.insets.top),
        );

        let mut layer = sharpen_rgba(canvas, params.sharpening);
        // Sharpening must not bleed outside the slot
        clear_outside(
            &mut layer,
            slot_rect(
                (params.insets.left, params.insets.top),
                (params.width, params.height),
            ),
        );
        Ok(layer)
    }

    fn flatten(
        &self,
        mut base: RgbaImage,
        layers: &[&RgbaImage],
        sharpening: Option<Sharpening>,
    ) -> Result<EncodedImage, BackendError> {
        overlay_all(&mut base, layers)?;
        let flat = sharpen_rgba(base, sharpening);
        let (width, height) = flat.dimensions();
        Ok(EncodedImage {
            png: encode_png(&DynamicImage::ImageRgba8(flat))?,
            width,
            height,
        })
    }

    fn downscale(
        &self,
        data: &[u8],
        params: &DownscaleParams,
    ) -> Result<EncodedImage, BackendError> {
        let img = load_image(data)?;
        let height = scaled_height((img.width(), img.height()), params.width);
        let resized = img.resize_exact(params.width, height, FilterType::Lanczos3);

        let final_img = if let Some(sharpening) = params.sharpening {
            resized.unsharpen(sharpening.sigma, sharpening.threshold)
        } else {
            resized
        };

        Ok(EncodedImage {
            png: encode_png(&final_img)?,
            width: final_img.width(),
            height: final_img.height(),
        })
    }
}
