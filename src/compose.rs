//! Mosaic composition for banner sets.
//!
//! Given the bytes of one uploaded set member, the composer builds a single
//! 960×884 preview showing every canonical size:
//!
//! 1. **Classify** the six sizes into the uploaded one (`valid`), the other
//!    uploaded members (`remaining`, fetched from the store) and the ones
//!    not uploaded yet (`missing`, drawn from placeholders).
//! 2. **Format** each into a canvas-sized transparent layer. The uploaded
//!    layer becomes the base raster.
//! 3. **Flatten** every other layer onto the base, sharpen, encode as PNG.
//!
//! Step 2 fans out over rayon: layers are independent, and since each one is
//! transparent outside its own slot the overlay order cannot change the
//! result. Any failure aborts the whole composition; a partial mosaic is
//! never returned.
//!
//! [`process_image`] wraps the composer with metadata parsing and the final
//! downscale to the preview width. [`publish`] writes the result back and
//! moves a `-bannerset` upload to the key later set members fetch it by.

use crate::catalog::SizeKey;
use crate::imaging::{
    BackendError, ImageBackend, Layer, Sharpening, ThumbnailConfig, create_thumbnail,
    format_asset,
};
use crate::metadata::{
    BannerSetMetadata, MetadataError, RawMetadata, member_key, thumbnail_key,
};
use crate::placeholder::placeholder;
use crate::store::{ObjectStore, StoreError, StoredObject, fetch_sibling, promote};
use image::RgbaImage;
use rayon::prelude::*;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),
    #[error("Sibling asset not found: {container}/{key}")]
    AssetNotFound { container: String, key: String },
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("Object store error: {0}")]
    Store(#[source] StoreError),
    #[error("Image processing failed: {0}")]
    Imaging(#[source] BackendError),
}

impl From<BackendError> for ComposeError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::UnsupportedImageFormat(reason) => Self::UnsupportedImageFormat(reason),
            other => Self::Imaging(other),
        }
    }
}

impl From<StoreError> for ComposeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { container, key } => Self::AssetNotFound { container, key },
            other => Self::Store(other),
        }
    }
}

impl From<MetadataError> for ComposeError {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::Invalid(reason) => Self::InvalidMetadata(reason),
        }
    }
}

/// Where a layer's pixels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSource {
    /// The bytes that triggered this composition.
    Upload,
    /// Another member of the same set, read from the store.
    Sibling,
    /// Stand-in for a size that has not been uploaded.
    Placeholder,
}

/// How the six sizes split for one composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionPlan {
    pub valid: SizeKey,
    /// Uploaded siblings, in catalog order.
    pub remaining: Vec<SizeKey>,
    /// Sizes without an upload, in catalog order.
    pub missing: Vec<SizeKey>,
}

impl CompositionPlan {
    /// Classify sizes for a set member; `None` for a standalone image.
    pub fn from_metadata(metadata: &BannerSetMetadata) -> Result<Option<Self>, ComposeError> {
        let Some(sizes) = metadata.sizes.as_ref().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let valid = metadata
            .valid_size
            .ok_or_else(|| ComposeError::InvalidMetadata("banner set without validsize".into()))?;
        if !sizes.contains(&valid) {
            return Err(ComposeError::InvalidMetadata(format!(
                "validsize {valid} is not a member of the set"
            )));
        }

        let remaining = SizeKey::ALL
            .into_iter()
            .filter(|k| *k != valid && sizes.contains(k))
            .collect();
        let missing = SizeKey::ALL
            .into_iter()
            .filter(|k| !sizes.contains(k))
            .collect();

        Ok(Some(Self {
            valid,
            remaining,
            missing,
        }))
    }
}

/// The composed, encoded 960×884 preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mosaic {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Every size with its provenance, in catalog order.
    pub layers: Vec<(SizeKey, LayerSource)>,
    /// Upload metadata minus set membership fields.
    pub metadata: RawMetadata,
}

#[derive(Debug, Clone, Copy)]
enum LayerJob {
    Fetch(SizeKey),
    Placeholder(SizeKey),
}

/// Builds mosaics from injected, read-only collaborators.
pub struct MosaicComposer<'a, B: ImageBackend, S: ObjectStore> {
    backend: &'a B,
    store: &'a S,
    sharpening: Option<Sharpening>,
}

impl<'a, B: ImageBackend, S: ObjectStore> MosaicComposer<'a, B, S> {
    pub fn new(backend: &'a B, store: &'a S, sharpening: Option<Sharpening>) -> Self {
        Self {
            backend,
            store,
            sharpening,
        }
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    /// Compose the mosaic for the set member whose bytes are `base`.
    ///
    /// Returns `Ok(None)` when `metadata` does not describe a set member; the
    /// caller should use the base image directly.
    #[tracing::instrument(skip(self, base, metadata), fields(base_len = base.len()))]
    pub fn compose(
        &self,
        base: &[u8],
        container: &str,
        prefix: &str,
        metadata: &BannerSetMetadata,
    ) -> Result<Option<Mosaic>, ComposeError> {
        let Some(plan) = CompositionPlan::from_metadata(metadata)? else {
            tracing::debug!("not a banner set member");
            return Ok(None);
        };
        tracing::debug!(
            valid = %plan.valid,
            remaining = plan.remaining.len(),
            missing = plan.missing.len(),
            "composition planned"
        );

        let base_layer = format_asset(self.backend, base, plan.valid, self.sharpening)?;

        let jobs: Vec<LayerJob> = plan
            .remaining
            .iter()
            .map(|&k| LayerJob::Fetch(k))
            .chain(plan.missing.iter().map(|&k| LayerJob::Placeholder(k)))
            .collect();
        let mut layers = jobs
            .par_iter()
            .map(|&job| self.build_layer(container, prefix, job))
            .collect::<Result<Vec<_>, ComposeError>>()?;
        layers.sort_by_key(|(layer, _)| layer.key);

        let images: Vec<&RgbaImage> = layers.iter().map(|(layer, _)| &layer.image).collect();
        let flat = self
            .backend
            .flatten(base_layer.image, &images, self.sharpening)?;

        let mut sources: Vec<(SizeKey, LayerSource)> = layers
            .iter()
            .map(|(layer, source)| (layer.key, *source))
            .collect();
        sources.push((plan.valid, LayerSource::Upload));
        sources.sort_by_key(|(key, _)| *key);

        tracing::info!(
            container,
            prefix,
            siblings = plan.remaining.len(),
            placeholders = plan.missing.len(),
            bytes = flat.png.len(),
            "mosaic composed"
        );

        Ok(Some(Mosaic {
            png: flat.png,
            width: flat.width,
            height: flat.height,
            layers: sources,
            metadata: metadata.passthrough.clone(),
        }))
    }

    fn build_layer(
        &self,
        container: &str,
        prefix: &str,
        job: LayerJob,
    ) -> Result<(Layer, LayerSource), ComposeError> {
        let (key, data, source): (SizeKey, Cow<'_, [u8]>, LayerSource) = match job {
            LayerJob::Fetch(key) => (
                key,
                Cow::Owned(fetch_sibling(self.store, container, prefix, key)?),
                LayerSource::Sibling,
            ),
            LayerJob::Placeholder(key) => (
                key,
                Cow::Borrowed(placeholder(key)),
                LayerSource::Placeholder,
            ),
        };
        let layer = format_asset(self.backend, &data, key, self.sharpening)?;
        tracing::debug!(%key, ?source, "layer formatted");
        Ok((layer, source))
    }
}

/// Final preview for one uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Metadata to store with the thumbnail (membership fields stripped).
    pub metadata: RawMetadata,
    /// Mosaic provenance per size; empty for a standalone image.
    pub layers: Vec<(SizeKey, LayerSource)>,
}

impl Thumbnail {
    pub fn is_mosaic(&self) -> bool {
        !self.layers.is_empty()
    }
}

/// Parse metadata, compose when the object is a set member, and downscale
/// the mosaic (or the object itself) to the preview width.
#[tracing::instrument(skip(composer, config, base, raw_metadata))]
pub fn process_image<B: ImageBackend, S: ObjectStore>(
    composer: &MosaicComposer<'_, B, S>,
    config: &ThumbnailConfig,
    base: &[u8],
    container: &str,
    prefix: &str,
    raw_metadata: &RawMetadata,
) -> Result<Thumbnail, ComposeError> {
    let metadata = BannerSetMetadata::from_raw(raw_metadata)?;

    let (source, layers) = match composer.compose(base, container, prefix, &metadata)? {
        Some(mosaic) => (Cow::Owned(mosaic.png), mosaic.layers),
        None => (Cow::Borrowed(base), Vec::new()),
    };
    let thumb = create_thumbnail(composer.backend(), &source, config)?;

    Ok(Thumbnail {
        png: thumb.png,
        width: thumb.width,
        height: thumb.height,
        metadata: metadata.passthrough,
        layers,
    })
}

/// Keys written by [`publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub thumbnail_key: String,
    /// Where a `-bannerset` upload now lives; `None` if it was left in place.
    pub member_key: Option<String>,
}

/// Store `thumbnail` as `{prefix}-thumbnail`, then promote the upload.
///
/// An upload named `{prefix}-{size}-bannerset` is rewritten, body and
/// metadata unchanged, to `{prefix}-{size}` and the original deleted. Nothing
/// is touched when writing the thumbnail fails.
#[tracing::instrument(skip(store, upload, thumbnail))]
pub fn publish(
    store: &impl ObjectStore,
    container: &str,
    upload_key: &str,
    prefix: &str,
    upload: StoredObject,
    thumbnail: &Thumbnail,
) -> Result<Published, StoreError> {
    let thumbnail_key = thumbnail_key(prefix);
    store.put(
        container,
        &thumbnail_key,
        StoredObject::new(thumbnail.png.clone(), thumbnail.metadata.clone()),
    )?;

    let promoted = match member_key(upload_key) {
        Some(member) => {
            promote(store, container, upload_key, member, upload)?;
            Some(member.to_string())
        }
        None => None,
    };

    Ok(Published {
        thumbnail_key,
        member_key: promoted,
    })
}
