//! Shared test utilities for the banner-mosaic test suite.
//!
//! Provides fixture generators (encoded PNG/JPEG bytes built in memory),
//! pixel-region assertions for canvas layers, and a store wrapper that
//! records every read.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let store = RecordingStore::default();
//! store.seed("bucket", "set-halfPage", solid_png(300, 600, RED));
//!
//! let layer = backend.format_layer(&solid_png(10, 10, BLUE), &params)?;
//! assert_slot_only(&layer, SizeKey::WideSkyscraper);
//! assert_eq!(store.reads(), vec!["bucket/set-halfPage"]);
//! ```

use image::{ImageEncoder, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Mutex;

use crate::catalog::SizeKey;
use crate::imaging::calculations::slot_rect;
use crate::metadata::RawMetadata;
use crate::store::{MemoryStore, ObjectStore, StoreError, StoredObject};

pub const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

// =========================================================================
// Fixture images
// =========================================================================

/// PNG bytes of a single-color image.
pub fn solid_png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, color);
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

/// JPEG bytes of a deterministic color gradient.
pub fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    jpeg
}

// =========================================================================
// Layer assertions
// =========================================================================

/// Bounding box `(x0, y0, x1, y1)` of all pixels with non-zero alpha.
pub fn visible_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
        });
    }
    bounds
}

/// Assert that a layer is visible at every pixel of `key`'s slot and
/// fully transparent everywhere else.
pub fn assert_slot_only(layer: &RgbaImage, key: SizeKey) {
    let spec = key.spec();
    let (x0, y0, x1, y1) = slot_rect(spec.position(), (spec.target_width, spec.target_height));
    for (x, y, px) in layer.enumerate_pixels() {
        let inside = x >= x0 && x < x1 && y >= y0 && y < y1;
        if inside {
            assert!(px.0[3] > 0, "{key}: ({x},{y}) inside slot is transparent");
        } else {
            assert_eq!(px.0[3], 0, "{key}: ({x},{y}) outside slot is visible");
        }
    }
}

// =========================================================================
// Recording store
// =========================================================================

/// [`MemoryStore`] that logs every `get` as `"container/key"`.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    reads: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn seed(&self, container: &str, key: &str, body: Vec<u8>) {
        self.inner
            .put(container, key, StoredObject::new(body, RawMetadata::new()))
            .unwrap();
    }

    /// Reads in call order. Parallel fetches make the order nondeterministic,
    /// so callers usually sort first.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl ObjectStore for RecordingStore {
    fn get(&self, container: &str, key: &str) -> Result<StoredObject, StoreError> {
        self.reads.lock().unwrap().push(format!("{container}/{key}"));
        self.inner.get(container, key)
    }

    fn put(&self, container: &str, key: &str, object: StoredObject) -> Result<(), StoreError> {
        self.inner.put(container, key, object)
    }

    fn delete(&self, container: &str, key: &str) -> Result<(), StoreError> {
        self.inner.delete(container, key)
    }
}
