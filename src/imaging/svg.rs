//! SVG rasterization for vector placeholders.

use super::backend::BackendError;
use super::calculations::raster_size;
use image::RgbaImage;

/// Avoid pathological allocations from hostile documents.
const MAX_DIM: u32 = 16_384;

/// Cheap content sniff: an XML prolog or an `<svg` root element.
pub fn looks_like_svg(data: &[u8]) -> bool {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let head = &data[start..];
    head.starts_with(b"<svg") || head.starts_with(b"<?xml")
}

/// Rasterize an SVG document at its intrinsic size.
///
/// The document size is rounded up to whole pixels and the viewBox is
/// stretched onto the full pixmap, so a shape covering the viewBox covers
/// every pixel. Output is straight (non-premultiplied) RGBA.
pub fn rasterize(data: &[u8]) -> Result<RgbaImage, BackendError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| BackendError::UnsupportedImageFormat(format!("invalid SVG: {e}")))?;

    let size = tree.size();
    let (width, height) = raster_size((size.width(), size.height())).ok_or_else(|| {
        BackendError::UnsupportedImageFormat("SVG has invalid width/height".to_string())
    })?;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(BackendError::ProcessingFailed(format!(
            "SVG raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BackendError::ProcessingFailed("failed to allocate SVG pixmap".into()))?;
    let sx = width as f32 / size.width();
    let sy = height as f32 / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        BackendError::ProcessingFailed("SVG pixmap size does not match its buffer".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SizeKey;
    use crate::placeholder::placeholder;

    #[test]
    fn sniffs_svg_documents() {
        assert!(looks_like_svg(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"));
        assert!(looks_like_svg(b"\n  <?xml version=\"1.0\"?><svg/>"));
        assert!(looks_like_svg(b"\xEF\xBB\xBF<svg/>"));
        assert!(!looks_like_svg(b"\x89PNG\r\n\x1a\n"));
        assert!(!looks_like_svg(b""));
    }

    #[test]
    fn placeholder_rasterizes_at_intrinsic_size() {
        let img = rasterize(placeholder(SizeKey::HalfBanner)).unwrap();
        // viewBox 157.4 x 40.3
        assert_eq!(img.dimensions(), (158, 41));
    }

    #[test]
    fn placeholder_fill_covers_every_pixel() {
        let img = rasterize(placeholder(SizeKey::FullBanner)).unwrap();
        for px in img.pixels() {
            // rgba(0,0,0,0.2)
            assert_eq!(px.0[..3], [0, 0, 0]);
            assert!((50..=52).contains(&px.0[3]), "alpha was {}", px.0[3]);
        }
    }

    #[test]
    fn malformed_svg_is_unsupported() {
        let err = rasterize(b"<svg><unclosed").unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedImageFormat(_)));
    }
}
