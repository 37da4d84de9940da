//! Integer source-over compositing of straight-alpha RGBA layers.
//!
//! A fully transparent source pixel leaves the destination bit-for-bit
//! unchanged. Canvas layers are transparent outside their own slot, so
//! overlaying disjoint layers gives the same bytes in any order.

use super::backend::BackendError;
use image::{Rgba, RgbaImage};

/// Straight-alpha `src` over `dst`.
pub fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src.0[3]);
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst.0[3]);
    if sa == 255 || da == 0 {
        return src;
    }

    // Alphas scaled by 255 to stay in integers.
    let dst_weight = da * (255 - sa);
    let out_a255 = sa * 255 + dst_weight;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src.0[i]) * sa * 255 + u32::from(dst.0[i]) * dst_weight;
        out[i] = ((num + out_a255 / 2) / out_a255).min(255) as u8;
    }
    out[3] = ((out_a255 + 127) / 255).min(255) as u8;
    Rgba(out)
}

/// Overlay every layer onto `base` in place.
pub fn overlay_all(base: &mut RgbaImage, layers: &[&RgbaImage]) -> Result<(), BackendError> {
    for layer in layers {
        if layer.dimensions() != base.dimensions() {
            return Err(BackendError::ProcessingFailed(format!(
                "layer is {}x{}, canvas is {}x{}",
                layer.width(),
                layer.height(),
                base.width(),
                base.height()
            )));
        }
        for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
            *dst = over(*dst, *src);
        }
    }
    Ok(())
}
