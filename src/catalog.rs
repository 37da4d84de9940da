//! The six canonical banner sizes and where each one sits on the mosaic.
//!
//! Every size is resized into a fixed slot and then padded with transparent
//! pixels out to the shared 960×884 canvas:
//!
//! ```text
//! (0,0)        (330,0)  (490,0)
//! ┌──────────┐ ┌──────┐ ┌──────────────────────┐
//! │ halfPage │ │ wide │ │    largeRectangle    │
//! │ 300×600  │ │ sky- │ │       470×391        │
//! │          │ │scra- │ └──────────────────────┘
//! │          │ │ per  │ ┌─fullBanner 470×60────┐ (490,428)
//! │          │ │130×  │ └──────────────────────┘
//! │          │ │ 488  │
//! │          │ └──────┘
//! │          │ ┌─leaderboard 630×77───────────┐ (330,523)
//! └──────────┘ └──────────────────────────────┘
//! ┌─halfBanner 960×246─────────────────────────┐ (0,638)
//! └────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width of the shared mosaic canvas.
pub const CANVAS_WIDTH: u32 = 960;
/// Height of the shared mosaic canvas.
pub const CANVAS_HEIGHT: u32 = 884;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown banner size key: {0}")]
pub struct UnknownSizeKey(pub String);

/// One of the six banner sizes a set can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeKey {
    HalfPage,
    WideSkyscraper,
    LargeRectangle,
    FullBanner,
    Leaderboard,
    HalfBanner,
}

impl SizeKey {
    /// All keys in catalog order. Compositing and reporting follow this order.
    pub const ALL: [SizeKey; 6] = [
        SizeKey::HalfPage,
        SizeKey::WideSkyscraper,
        SizeKey::LargeRectangle,
        SizeKey::FullBanner,
        SizeKey::Leaderboard,
        SizeKey::HalfBanner,
    ];

    /// Name as it appears in object keys and upload metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            SizeKey::HalfPage => "halfPage",
            SizeKey::WideSkyscraper => "wideSkyscraper",
            SizeKey::LargeRectangle => "largeRectangle",
            SizeKey::FullBanner => "fullBanner",
            SizeKey::Leaderboard => "leaderboard",
            SizeKey::HalfBanner => "halfBanner",
        }
    }

    pub fn spec(self) -> SizeSpec {
        match self {
            SizeKey::HalfPage => SizeSpec::new(300, 600, Insets::new(0, 660, 0, 284)),
            SizeKey::WideSkyscraper => SizeSpec::new(130, 488, Insets::new(330, 500, 0, 396)),
            SizeKey::LargeRectangle => SizeSpec::new(470, 391, Insets::new(490, 0, 0, 493)),
            SizeKey::FullBanner => SizeSpec::new(470, 60, Insets::new(490, 0, 428, 396)),
            SizeKey::Leaderboard => SizeSpec::new(630, 77, Insets::new(330, 0, 523, 284)),
            SizeKey::HalfBanner => SizeSpec::new(960, 246, Insets::new(0, 0, 638, 0)),
        }
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeKey {
    type Err = UnknownSizeKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSizeKey(s.to_string()))
    }
}

/// Transparent padding added on each side of a resized banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Slot geometry for one size key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    /// Dimensions the banner is resized to (aspect ratio is not preserved).
    pub target_width: u32,
    pub target_height: u32,
    pub insets: Insets,
}

impl SizeSpec {
    const fn new(target_width: u32, target_height: u32, insets: Insets) -> Self {
        Self {
            target_width,
            target_height,
            insets,
        }
    }

    /// Top-left corner of the slot on the canvas.
    pub fn position(&self) -> (u32, u32) {
        (self.insets.left, self.insets.top)
    }

    /// Full canvas size this spec pads out to.
    pub fn canvas(&self) -> (u32, u32) {
        (
            self.target_width + self.insets.left + self.insets.right,
            self.target_height + self.insets.top + self.insets.bottom,
        )
    }
}

/// Look up the slot for a key given by name.
pub fn lookup(key: &str) -> Result<SizeSpec, UnknownSizeKey> {
    key.parse::<SizeKey>().map(SizeKey::spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spec_fills_the_canvas() {
        for key in SizeKey::ALL {
            assert_eq!(
                key.spec().canvas(),
                (CANVAS_WIDTH, CANVAS_HEIGHT),
                "{key} does not pad to the canvas"
            );
        }
    }

    #[test]
    fn positions_match_layout_table() {
        let expected = [
            (SizeKey::HalfPage, (300, 600), (0, 0)),
            (SizeKey::WideSkyscraper, (130, 488), (330, 0)),
            (SizeKey::LargeRectangle, (470, 391), (490, 0)),
            (SizeKey::FullBanner, (470, 60), (490, 428)),
            (SizeKey::Leaderboard, (630, 77), (330, 523)),
            (SizeKey::HalfBanner, (960, 246), (0, 638)),
        ];
        for (key, target, position) in expected {
            let spec = key.spec();
            assert_eq!((spec.target_width, spec.target_height), target, "{key}");
            assert_eq!(spec.position(), position, "{key}");
        }
    }

    #[test]
    fn slots_do_not_overlap() {
        let rects: Vec<(u32, u32, u32, u32)> = SizeKey::ALL
            .iter()
            .map(|k| {
                let s = k.spec();
                let (x, y) = s.position();
                (x, y, x + s.target_width, y + s.target_height)
            })
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let disjoint = a.2 <= b.0 || b.2 <= a.0 || a.3 <= b.1 || b.3 <= a.1;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn lookup_by_name() {
        let spec = lookup("leaderboard").unwrap();
        assert_eq!(spec, SizeKey::Leaderboard.spec());
    }

    #[test]
    fn lookup_unknown_key_fails() {
        assert_eq!(
            lookup("skyscraper"),
            Err(UnknownSizeKey("skyscraper".to_string()))
        );
        // Names are case-sensitive, as in object keys.
        assert!(lookup("HalfPage").is_err());
    }

    #[test]
    fn names_roundtrip_through_from_str() {
        for key in SizeKey::ALL {
            assert_eq!(key.as_str().parse::<SizeKey>(), Ok(key));
            assert_eq!(key.to_string(), key.as_str());
        }
    }
}
