//! Stand-in artwork for sizes that have not been uploaded yet.
//!
//! Each placeholder is a small SVG: one semi-transparent rectangle whose
//! viewBox carries the native aspect ratio of the IAB format it replaces.
//! The bytes go through the same formatting path as a real upload.

use crate::catalog::SizeKey;

// 300x600
const HALF_PAGE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 48.9 97.9">
  <path fill="rgba(0,0,0,0.2)" d="M0 0h48.9v97.9H0z" />
</svg>"#;

// 160x600
const WIDE_SKYSCRAPER: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 21.1 80.6">
  <path fill="rgba(0,0,0,0.2)" d="M0 0h21.1v80.6H0z" />
</svg>"#;

// 336x280
const LARGE_RECTANGLE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 76.8 63.3">
  <path fill="rgba(0,0,0,0.2)" d="M0 0h76.8v63.3H0z" />
</svg>"#;

// 468x60
const FULL_BANNER: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 76.8 11.5">
  <path fill="rgba(0,0,0,0.2)" d="M0 0h76.8v11.5H0z" />
</svg>"#;

// 728x90
const LEADERBOARD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 102.7 12.5">
  <path fill="rgba(0,0,0,0.2)" d="M0 0h102.7v12.5H0z" />
</svg>"#;

// 234x60
const HALF_BANNER: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 157.4 40.3">
  <path fill="rgba(0,0,0,0.2)" d="M0 0h157.4v40.3H0z" />
</svg>"#;

/// Raw SVG bytes of the placeholder for `key`.
pub fn placeholder(key: SizeKey) -> &'static [u8] {
    let svg = match key {
        SizeKey::HalfPage => HALF_PAGE,
        SizeKey::WideSkyscraper => WIDE_SKYSCRAPER,
        SizeKey::LargeRectangle => LARGE_RECTANGLE,
        SizeKey::FullBanner => FULL_BANNER,
        SizeKey::Leaderboard => LEADERBOARD,
        SizeKey::HalfBanner => HALF_BANNER,
    };
    svg.as_bytes()
}
