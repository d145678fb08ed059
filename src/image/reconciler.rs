//! ImageReconciler - per-slot keep / upload decisions
//!
//! Kept slots copy the previous version's reference forward unchanged.
//! Uploads are signature-checked during planning and written only at
//! commit, each under a fresh reference.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::signature::is_jpeg;
use crate::asset_store::{AssetResult, AssetStore};
use crate::catalog::{FileReference, ImagePayload, ManifestEntry};
use crate::observability::{log_event_with_fields, Event};

/// Slots a manifest could not be reconciled for.
///
/// Both lists are complete, not just the first failure found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRejection {
    /// Slots asking to keep an image the previous version does not have.
    pub missing_slots: Vec<String>,
    /// Slots whose uploaded bytes are not a JPEG.
    pub invalid_slots: Vec<String>,
}

impl ImageRejection {
    pub fn is_empty(&self) -> bool {
        self.missing_slots.is_empty() && self.invalid_slots.is_empty()
    }
}

impl fmt::Display for ImageRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing slots [{}], invalid images [{}]",
            self.missing_slots.join(", "),
            self.invalid_slots.join(", ")
        )
    }
}

/// References already written for a mutation, by slot.
///
/// Survives conflict retries so an upload is stored once per mutation,
/// not once per attempt.
pub type UploadCache = HashMap<String, FileReference>;

/// Outcome of planning: what to forward and what to write.
#[derive(Debug)]
pub struct ImagePlan<'m> {
    forwarded: BTreeMap<String, FileReference>,
    uploads: Vec<(&'m str, &'m [u8])>,
}

impl<'m> ImagePlan<'m> {
    /// Slots copied forward from the previous version.
    pub fn forwarded(&self) -> &BTreeMap<String, FileReference> {
        &self.forwarded
    }

    /// Slots that will receive freshly stored bytes.
    pub fn upload_slots(&self) -> impl Iterator<Item = &str> + '_ {
        self.uploads.iter().map(|(slot, _)| *slot)
    }

    /// Writes every upload not already in `cache` and returns the final image set.
    ///
    /// # Errors
    ///
    /// Stops at the first failed write. References written before the
    /// failure stay in `cache` and in the store; they are never deleted.
    pub fn commit<A: AssetStore + ?Sized>(
        self,
        store: &A,
        cache: &mut UploadCache,
    ) -> AssetResult<BTreeMap<String, FileReference>> {
        let mut images = self.forwarded;

        for (slot, data) in self.uploads {
            let reference = match cache.get(slot) {
                Some(reference) => reference.clone(),
                None => {
                    let reference = store.write(data)?;
                    let digest = format!("{:x}", Sha256::digest(data));
                    log_event_with_fields(
                        Event::AssetStored,
                        &[
                            ("bytes", &data.len().to_string()),
                            ("reference", reference.as_str()),
                            ("sha256", &digest),
                            ("slot", slot),
                        ],
                    );
                    cache.insert(slot.to_string(), reference.clone());
                    reference
                }
            };
            images.insert(slot.to_string(), reference);
        }

        Ok(images)
    }
}

/// Reconciles image manifests against the previous version's images.
#[derive(Debug)]
pub struct ImageReconciler<'a> {
    previous: &'a BTreeMap<String, FileReference>,
}

impl<'a> ImageReconciler<'a> {
    /// `previous` is empty when creating a product.
    pub fn new(previous: &'a BTreeMap<String, FileReference>) -> Self {
        Self { previous }
    }

    /// Plans a manifest without touching storage.
    ///
    /// # Errors
    ///
    /// Returns every unresolvable kept slot and every non-JPEG upload.
    pub fn plan<'m>(&self, manifest: &'m [ManifestEntry]) -> Result<ImagePlan<'m>, ImageRejection> {
        let mut rejection = ImageRejection::default();
        let mut forwarded = BTreeMap::new();
        let mut uploads = Vec::new();

        for entry in manifest {
            match &entry.payload {
                ImagePayload::Keep => match self.previous.get(&entry.slot) {
                    Some(reference) => {
                        forwarded.insert(entry.slot.clone(), reference.clone());
                    }
                    None => rejection.missing_slots.push(entry.slot.clone()),
                },
                ImagePayload::Upload(data) => {
                    if is_jpeg(data) {
                        uploads.push((entry.slot.as_str(), data.as_slice()));
                    } else {
                        rejection.invalid_slots.push(entry.slot.clone());
                    }
                }
            }
        }

        if rejection.is_empty() {
            Ok(ImagePlan { forwarded, uploads })
        } else {
            rejection.missing_slots.sort();
            rejection.invalid_slots.sort();
            Err(rejection)
        }
    }
}
