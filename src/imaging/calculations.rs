//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Height that keeps `source` proportions at the given output width.
///
/// Never returns zero, so very wide sources still produce a one-pixel row.
///
/// # Examples
/// ```
/// # use banner_mosaic::imaging::calculations::scaled_height;
/// // The 960×884 mosaic at 640 wide
/// assert_eq!(scaled_height((960, 884), 640), 589);
/// ```
pub fn scaled_height(source: (u32, u32), width: u32) -> u32 {
    let (src_w, src_h) = source;
    if src_w == 0 {
        return 1;
    }
    let h = (src_h as f64 * width as f64 / src_w as f64).round() as u32;
    h.max(1)
}

/// Pixel size to rasterize a vector document at, from its intrinsic size.
///
/// Fractional sizes round up so the whole document fits.
pub fn raster_size(intrinsic: (f32, f32)) -> Option<(u32, u32)> {
    fn to_px(v: f32) -> Option<u32> {
        if !v.is_finite() || v <= 0.0 {
            return None;
        }
        Some((v.ceil() as u32).max(1))
    }
    Some((to_px(intrinsic.0)?, to_px(intrinsic.1)?))
}

/// Half-open pixel rectangle `(x0, y0, x1, y1)` of a slot on the canvas.
pub fn slot_rect(position: (u32, u32), size: (u32, u32)) -> (u32, u32, u32, u32) {
    let (x, y) = position;
    (x, y, x + size.0, y + size.1)
}
