//! # Banner Mosaic
//!
//! Composes an advertising banner set into a single preview image.
//!
//! A banner set is the same creative uploaded once per canonical size. When
//! one member arrives, this crate arranges every size of the set on a fixed
//! 960×884 canvas, filling sizes that have not been uploaded yet with
//! translucent placeholder artwork, and downscales the result to a 640-pixel
//! wide thumbnail.
//!
//! # Pipeline
//!
//! ```text
//! upload + metadata
//!   │
//!   ├─ not a set member ──────────────────────────────┐
//!   │                                                 │
//!   └─ set member                                     │
//!        ├─ format upload into its slot               │
//!        ├─ fetch + format siblings    (parallel)     │
//!        ├─ format placeholders        (parallel)     │
//!        └─ flatten in catalog order → 960×884 PNG ───┤
//!                                                     ▼
//!                                       downscale to 640 wide → thumbnail
//!                                                     │
//!                       publish: write thumbnail, move upload to member key
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | The six canonical sizes and where each sits on the canvas |
//! | [`placeholder`] | Embedded SVG artwork for sizes without an upload |
//! | [`metadata`] | Set membership parsed from an upload's string metadata; object key naming |
//! | [`store`] | Object store abstraction with filesystem and in-memory stores |
//! | [`imaging`] | Decoding, slot formatting, compositing, and downscaling |
//! | [`compose`] | [`compose::MosaicComposer`] and the full [`compose::process_image`] pipeline |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Layers Never Overlap
//!
//! Every size owns a disjoint rectangle of the canvas and its layer is fully
//! transparent outside that rectangle. Flattening is therefore independent of
//! layer order and of which worker finished first.
//!
//! ## All-or-Nothing
//!
//! A missing sibling or an undecodable input aborts the whole mosaic. Nothing
//! is written to the store until the thumbnail exists, and intermediate
//! rasters live only in memory.
//!
//! ## Pure-Rust Imaging
//!
//! Raster formats decode through `image`, placeholders rasterize through
//! `resvg`. No system libraries are needed at runtime.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod placeholder;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
