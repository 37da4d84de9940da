//! CLI output formatting.
//!
//! Output is **information-centric**: every result leads with what was
//! produced, then lists per-size provenance as indented context lines.
//!
//! # Output Format
//!
//! ## Compose
//!
//! ```text
//! spring-thumbnail (640x589, mosaic)
//!     halfPage: upload
//!     wideSkyscraper: sibling
//!     largeRectangle: placeholder
//!     fullBanner: placeholder
//!     leaderboard: placeholder
//!     halfBanner: placeholder
//!     Stored as: spring-halfPage
//! ```
//!
//! A standalone image prints only the header with `standalone` in place of
//! `mosaic`. The `Stored as:` line appears when a `-bannerset` upload was
//! moved to its member key.
//!
//! ## Sizes
//!
//! ```text
//! halfPage          300x600  at (0, 0)        canvas 960x884
//! wideSkyscraper    130x488  at (330, 0)      canvas 960x884
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::catalog::SizeKey;
use crate::compose::{LayerSource, Published, Thumbnail};

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn source_label(source: LayerSource) -> &'static str {
    match source {
        LayerSource::Upload => "upload",
        LayerSource::Sibling => "sibling",
        LayerSource::Placeholder => "placeholder",
    }
}

// ============================================================================
// Compose output
// ============================================================================

/// Format the result of processing and publishing one upload.
pub fn format_thumbnail_output(published: &Published, thumbnail: &Thumbnail) -> Vec<String> {
    let kind = if thumbnail.is_mosaic() {
        "mosaic"
    } else {
        "standalone"
    };
    let mut lines = vec![format!(
        "{} ({}x{}, {})",
        published.thumbnail_key, thumbnail.width, thumbnail.height, kind
    )];
    for (key, source) in &thumbnail.layers {
        lines.push(format!("{}{}: {}", indent(1), key, source_label(*source)));
    }
    if let Some(member) = &published.member_key {
        lines.push(format!("{}Stored as: {}", indent(1), member));
    }
    lines
}

pub fn print_thumbnail_output(published: &Published, thumbnail: &Thumbnail) {
    for line in format_thumbnail_output(published, thumbnail) {
        println!("{}", line);
    }
}

// ============================================================================
// Sizes output
// ============================================================================

/// Format the size catalog with each slot's position on the canvas.
pub fn format_sizes_output() -> Vec<String> {
    SizeKey::ALL
        .iter()
        .map(|key| {
            let spec = key.spec();
            let (x, y) = spec.position();
            let (cw, ch) = spec.canvas();
            format!(
                "{:<17} {:<8} {:<15} canvas {}x{}",
                key.as_str(),
                format!("{}x{}", spec.target_width, spec.target_height),
                format!("at ({}, {})", x, y),
                cw,
                ch
            )
        })
        .collect()
}

pub fn print_sizes_output() {
    for line in format_sizes_output() {
        println!("{}", line);
    }
}
