//! Request bodies for `create` and `update`
//!
//! ```json
//! {
//!   "scope": {"main_category": "Electronics", "category": "Phones", "subcategory": "Android"},
//!   "name": "Pixel",
//!   "description": "An Android phone",
//!   "price": 59900,
//!   "closed_values": [{"name": "Color", "value": "Black"}],
//!   "open_values": [{"name": "Warranty", "value": "2 years"}],
//!   "images": [{"slot": "front", "data": "<base64>"}, {"slot": "back", "keep": true}]
//! }
//! ```
//!
//! `scope` is only read by `create`. Omitting `closed_values` on update
//! carries the previous version's values forward.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use super::errors::{CliError, CliResult};
use crate::catalog::{ManifestEntry, Scope, SpecPair, VersionInput};

/// One manifest slot: either base64 `data` or `keep: true`
#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntryRequest {
    pub slot: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub keep: bool,
}

impl ImageEntryRequest {
    fn into_entry(self) -> CliResult<ManifestEntry> {
        match (self.data, self.keep) {
            (Some(data), false) => {
                let bytes = STANDARD.decode(data.trim()).map_err(|e| {
                    CliError::invalid_request(format!("slot '{}': invalid base64: {}", self.slot, e))
                })?;
                Ok(ManifestEntry::upload(self.slot, bytes))
            }
            (None, true) => Ok(ManifestEntry::keep(self.slot)),
            _ => Err(CliError::invalid_request(format!(
                "slot '{}': exactly one of 'data' or 'keep' is required",
                self.slot
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionRequest {
    #[serde(default)]
    pub scope: Option<Scope>,
    pub name: String,
    pub description: String,
    pub price: u64,
    #[serde(default)]
    pub closed_values: Option<Vec<SpecPair>>,
    #[serde(default)]
    pub open_values: Vec<SpecPair>,
    #[serde(default)]
    pub images: Vec<ImageEntryRequest>,
}

impl VersionRequest {
    /// Splits the request into its scope (if any) and the builder input.
    pub fn into_input(self) -> CliResult<(Option<Scope>, VersionInput)> {
        let images = self
            .images
            .into_iter()
            .map(ImageEntryRequest::into_entry)
            .collect::<CliResult<Vec<_>>>()?;

        let input = VersionInput {
            name: self.name,
            description: self.description,
            price: self.price,
            closed_values: self.closed_values,
            open_values: self.open_values,
            images,
        };

        Ok((self.scope, input))
    }
}
