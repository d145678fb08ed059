//! Caller-supplied input for a new version
//!
//! The scope is absent: it is fixed at creation and passed
//! separately to `create_product`, so an update can never move a product.

use super::SpecPair;

/// What the caller wants a slot to hold in the new version.
#[derive(Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Store these bytes under a fresh file reference.
    Upload(Vec<u8>),
    /// Reuse the file reference the latest version holds for this slot.
    Keep,
}

impl ImagePayload {
    pub fn is_upload(&self) -> bool {
        matches!(self, ImagePayload::Upload(_))
    }
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImagePayload::Upload(bytes) => write!(f, "Upload({} bytes)", bytes.len()),
            ImagePayload::Keep => write!(f, "Keep"),
        }
    }
}

/// One slot of an image manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub slot: String,
    pub payload: ImagePayload,
}

impl ManifestEntry {
    pub fn upload(slot: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            slot: slot.into(),
            payload: ImagePayload::Upload(bytes),
        }
    }

    pub fn keep(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            payload: ImagePayload::Keep,
        }
    }
}

/// Proposed content of a new version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VersionInput {
    pub name: String,
    pub description: String,
    /// Price in the smallest currency unit.
    pub price: u64,
    /// Explicit closed values. `None` on update carries the latest
    /// version's values forward, narrowed to what the scope still allows.
    pub closed_values: Option<Vec<SpecPair>>,
    pub open_values: Vec<SpecPair>,
    pub images: Vec<ManifestEntry>,
}

impl VersionInput {
    /// Creates an input with the required text fields and price.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            ..Default::default()
        }
    }

    pub fn with_closed(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.closed_values
            .get_or_insert_with(Vec::new)
            .push(SpecPair::new(name, value));
        self
    }

    pub fn with_open(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.open_values.push(SpecPair::new(name, value));
        self
    }

    pub fn with_image(mut self, entry: ManifestEntry) -> Self {
        self.images.push(entry);
        self
    }
}
