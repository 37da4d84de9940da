//! Banner set membership carried in object metadata.
//!
//! An uploaded set member arrives with two metadata fields next to whatever
//! the uploader attached:
//!
//! | Field | Meaning |
//! |---|---|
//! | `sizes` | comma-joined size keys present in the set (order irrelevant) |
//! | `validsize` | the size key of the object being processed |
//!
//! Both are validated once here, so the composer only ever sees well-formed
//! keys. An object without `sizes` is a standalone image, not a set member.

use crate::catalog::SizeKey;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub const SIZES_FIELD: &str = "sizes";
pub const VALID_SIZE_FIELD: &str = "validsize";

const BANNERSET_SUFFIX: &str = "-bannerset";

/// Raw object metadata, as the store returns it.
pub type RawMetadata = BTreeMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Invalid banner set metadata: {0}")]
    Invalid(String),
}

/// Set membership of one uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerSetMetadata {
    /// Sizes present in the set; `None` for a standalone image.
    pub sizes: Option<BTreeSet<SizeKey>>,
    /// Size of the bytes being processed. Always present when `sizes` is.
    pub valid_size: Option<SizeKey>,
    /// Every other field, passed through to the thumbnail untouched.
    pub passthrough: RawMetadata,
}

impl BannerSetMetadata {
    /// Metadata for an image that is not part of a set.
    pub fn standalone() -> Self {
        Self {
            sizes: None,
            valid_size: None,
            passthrough: RawMetadata::new(),
        }
    }

    /// Metadata for a set member, already typed.
    pub fn set_member(sizes: impl IntoIterator<Item = SizeKey>, valid_size: SizeKey) -> Self {
        Self {
            sizes: Some(sizes.into_iter().collect()),
            valid_size: Some(valid_size),
            passthrough: RawMetadata::new(),
        }
    }

    /// Parse and validate raw object metadata.
    ///
    /// An absent or blank `sizes` field means standalone. Otherwise every
    /// entry must be a canonical size key and `validsize` must be one of them.
    pub fn from_raw(raw: &RawMetadata) -> Result<Self, MetadataError> {
        let passthrough = strip_membership(raw);

        let sizes_field = raw
            .get(SIZES_FIELD)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());
        let Some(sizes_field) = sizes_field else {
            return Ok(Self {
                sizes: None,
                valid_size: None,
                passthrough,
            });
        };

        let mut sizes = BTreeSet::new();
        for name in sizes_field.split(',').map(str::trim) {
            if name.is_empty() {
                return Err(MetadataError::Invalid(format!(
                    "empty entry in sizes \"{sizes_field}\""
                )));
            }
            let key = name
                .parse::<SizeKey>()
                .map_err(|e| MetadataError::Invalid(e.to_string()))?;
            sizes.insert(key);
        }

        let valid_name = raw
            .get(VALID_SIZE_FIELD)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MetadataError::Invalid("sizes given without validsize".into()))?;
        let valid_size = valid_name
            .parse::<SizeKey>()
            .map_err(|e| MetadataError::Invalid(e.to_string()))?;
        if !sizes.contains(&valid_size) {
            return Err(MetadataError::Invalid(format!(
                "validsize {valid_size} is not listed in sizes \"{sizes_field}\""
            )));
        }

        Ok(Self {
            sizes: Some(sizes),
            valid_size: Some(valid_size),
            passthrough,
        })
    }

    /// True when this object belongs to a banner set with at least one size.
    pub fn is_set_member(&self) -> bool {
        self.sizes.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Copy of `raw` without the set membership fields.
pub fn strip_membership(raw: &RawMetadata) -> RawMetadata {
    raw.iter()
        .filter(|(k, _)| k.as_str() != SIZES_FIELD && k.as_str() != VALID_SIZE_FIELD)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Prefix shared by all members of the set an upload belongs to.
///
/// Set members are uploaded as `{prefix}-{size}-bannerset`; the size segment
/// and suffix are dropped. Any other key is its own prefix.
///
/// ```
/// use banner_mosaic::metadata::bannerset_prefix;
/// assert_eq!(bannerset_prefix("spring/campaign-halfPage-bannerset"), "spring/campaign");
/// assert_eq!(bannerset_prefix("logo.png"), "logo.png");
/// ```
pub fn bannerset_prefix(upload_key: &str) -> &str {
    let Some(stem) = upload_key.strip_suffix(BANNERSET_SUFFIX) else {
        return upload_key;
    };
    match stem.rfind('-') {
        Some(idx) if idx + 1 < stem.len() => &stem[..idx],
        _ => upload_key,
    }
}

/// Key a `{prefix}-{size}-bannerset` upload is stored under once processed,
/// which is the key its siblings fetch it by. `None` for other keys.
///
/// ```
/// use banner_mosaic::metadata::member_key;
/// assert_eq!(member_key("spring-halfPage-bannerset"), Some("spring-halfPage"));
/// assert_eq!(member_key("logo.png"), None);
/// ```
pub fn member_key(upload_key: &str) -> Option<&str> {
    upload_key
        .strip_suffix(BANNERSET_SUFFIX)
        .filter(|stem| !stem.is_empty())
}

/// Object key of a sibling set member.
pub fn sibling_key(prefix: &str, key: SizeKey) -> String {
    format!("{prefix}-{key}")
}

/// Object key the finished thumbnail is written to.
pub fn thumbnail_key(prefix: &str) -> String {
    format!("{prefix}-thumbnail")
}
