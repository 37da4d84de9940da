//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what images to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Sharpening`]: Unsharp-mask parameters (sigma + threshold) applied after resizing.
//! - [`LayerParams`]: Slot size plus transparent padding that turns one banner into a canvas layer.
//! - [`DownscaleParams`]: Fixed output width for the preview thumbnail.

use crate::catalog::{Insets, SizeSpec};

/// Sharpening parameters for unsharp mask.
///
/// - `sigma`: Standard deviation of the Gaussian blur (higher = more sharpening)
/// - `threshold`: Minimum brightness difference to sharpen (0 = sharpen all pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub sigma: f32,
    pub threshold: i32,
}

impl Sharpening {
    /// Light sharpening that offsets resampling softness.
    pub fn light() -> Self {
        Self {
            sigma: 0.5,
            threshold: 0,
        }
    }
}

/// Parameters for turning one banner into a full-canvas layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerParams {
    /// Exact resize target; the source aspect ratio is ignored.
    pub width: u32,
    pub height: u32,
    pub insets: Insets,
    pub sharpening: Option<Sharpening>,
}

impl LayerParams {
    pub fn for_slot(spec: SizeSpec, sharpening: Option<Sharpening>) -> Self {
        Self {
            width: spec.target_width,
            height: spec.target_height,
            insets: spec.insets,
            sharpening,
        }
    }

    pub fn canvas(&self) -> (u32, u32) {
        (
            self.width + self.insets.left + self.insets.right,
            self.height + self.insets.top + self.insets.bottom,
        )
    }
}

/// Parameters for the final preview downscale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownscaleParams {
    /// Output width; height follows the source aspect ratio.
    pub width: u32,
    pub sharpening: Option<Sharpening>,
}
