//! Observable catalog events
//!
//! Events are explicit and typed. Each carries a stable name and a
//! default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in the catalog engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Scope definitions loaded
    ScopesLoaded,

    // Mutations
    /// A product was created with its first version
    ProductCreated,
    /// A version was appended to an existing product
    VersionAppended,
    /// Soft-delete flag toggled
    ProductDeletedFlagChanged,

    // Rejections
    /// Attribute values did not match the scope
    SpecRejected,
    /// Image manifest could not be reconciled
    ImageRejected,

    // Assets
    /// New image bytes persisted
    AssetStored,

    // Concurrency
    /// Lost a version-numbering race; retrying
    StorageConflict,
    /// Retry budget used up
    ConflictRetriesExhausted,

    // Carry-forward
    /// Carried-forward closed values dropped because the scope no longer has them
    ClosedValuesNarrowed,

    /// Durable store failure
    StorageFailure,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ScopesLoaded => "SCOPES_LOADED",
            Event::ProductCreated => "PRODUCT_CREATED",
            Event::VersionAppended => "VERSION_APPENDED",
            Event::ProductDeletedFlagChanged => "PRODUCT_DELETED_FLAG_CHANGED",
            Event::SpecRejected => "SPEC_REJECTED",
            Event::ImageRejected => "IMAGE_REJECTED",
            Event::AssetStored => "ASSET_STORED",
            Event::StorageConflict => "STORAGE_CONFLICT",
            Event::ConflictRetriesExhausted => "CONFLICT_RETRIES_EXHAUSTED",
            Event::ClosedValuesNarrowed => "CLOSED_VALUES_NARROWED",
            Event::StorageFailure => "STORAGE_FAILURE",
        }
    }

    /// Severity the event is logged at by default
    pub fn severity(&self) -> Severity {
        match self {
            Event::SpecRejected | Event::ImageRejected => Severity::Info,
            Event::StorageConflict | Event::ClosedValuesNarrowed => Severity::Warn,
            Event::ConflictRetriesExhausted | Event::StorageFailure => Severity::Error,
            Event::AssetStored => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
