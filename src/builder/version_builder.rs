//! VersionBuilder - creates products and appends versions

use std::collections::{BTreeMap, HashSet};

use super::errors::{CatalogError, CatalogResult};
use super::locks::ProductLocks;
use crate::asset_store::AssetStore;
use crate::catalog::{
    FileReference, ProductId, ProductVersion, Scope, SpecPair, VersionInput, VersionNumber, VersionParts,
};
use crate::config::CatalogConfig;
use crate::image::{ImageReconciler, UploadCache};
use crate::observability::{log_event_with_fields, CatalogMetrics, Event};
use crate::scope::{DeletedEntryPolicy, ScopeLookup, ScopeResolver, ScopeSnapshot};
use crate::specification::{CarryForwardPolicy, ClosedProposal, SpecificationValidator, ValidatedSpecs};
use crate::store::CatalogStore;

/// Tunables for the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Retries after a lost version-numbering race
    pub max_conflict_retries: u32,
    pub deleted_entry_policy: DeletedEntryPolicy,
    pub carry_forward: CarryForwardPolicy,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            max_conflict_retries: 5,
            deleted_entry_policy: DeletedEntryPolicy::default(),
            carry_forward: CarryForwardPolicy::default(),
        }
    }
}

impl From<&CatalogConfig> for BuilderOptions {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            max_conflict_retries: config.max_conflict_retries,
            deleted_entry_policy: config.deleted_entry_policy,
            carry_forward: config.carry_forward_policy(),
        }
    }
}

/// Result of a successful update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub version: VersionNumber,
    /// Carried-forward closed values dropped because the scope no longer has them
    pub narrowed: Vec<SpecPair>,
}

/// Entry point for every catalog mutation.
#[derive(Debug)]
pub struct VersionBuilder<L: ScopeLookup, A: AssetStore, S: CatalogStore> {
    scopes: L,
    assets: A,
    store: S,
    options: BuilderOptions,
    locks: ProductLocks,
    metrics: CatalogMetrics,
}

impl<L: ScopeLookup, A: AssetStore, S: CatalogStore> VersionBuilder<L, A, S> {
    pub fn new(scopes: L, assets: A, store: S, options: BuilderOptions) -> Self {
        Self {
            scopes,
            assets,
            store,
            options,
            locks: ProductLocks::new(),
            metrics: CatalogMetrics::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn scopes(&self) -> &L {
        &self.scopes
    }

    pub fn metrics(&self) -> &CatalogMetrics {
        &self.metrics
    }

    /// Creates a product in `scope` with `input` as version 1.
    ///
    /// # Errors
    ///
    /// - `ScopeNotFound` if the category path does not exist
    /// - `SpecRejected` with every offending value
    /// - `ImageRejected` if any slot asks to keep an image or is not a JPEG
    /// - `StorageFailure` if the scope source, asset or catalog storage fails
    pub fn create_product(&self, scope: &Scope, input: &VersionInput) -> CatalogResult<ProductId> {
        check_input(input)?;

        let snapshot = self.resolve_scope(scope)?;

        let closed = input.closed_values.as_deref().unwrap_or(&[]);
        let specs = self.validate_specs(
            SpecificationValidator::new(&snapshot, self.options.carry_forward)
                .validate(ClosedProposal::Explicit(closed), &input.open_values),
            &scope.to_string(),
        )?;

        let no_images = BTreeMap::new();
        let images = self.reconcile_images(&no_images, input, &mut UploadCache::new(), &scope.to_string())?;

        let version = assemble(VersionNumber::FIRST, input, specs, images);
        let product_id = self.store.create_product(scope, version).map_err(|e| {
            log_event_with_fields(Event::StorageFailure, &[("error", &e.to_string()), ("scope", &scope.to_string())]);
            CatalogError::from(e)
        })?;

        self.metrics.increment_products_created();
        log_event_with_fields(
            Event::ProductCreated,
            &[("product_id", &product_id.to_string()), ("scope", &scope.to_string())],
        );

        Ok(product_id)
    }

    /// Appends a new version to an existing product.
    ///
    /// The product's own scope is used; it cannot be changed. Closed values
    /// omitted from `input` are carried forward from the latest version.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if no such product exists
    /// - `SpecRejected` / `ImageRejected` as for create
    /// - `StorageConflict` if every retry lost the numbering race
    /// - `StorageFailure` if the scope source, asset or catalog storage fails
    pub fn update_product(&self, product_id: ProductId, input: &VersionInput) -> CatalogResult<UpdateOutcome> {
        check_input(input)?;

        let lock = self
            .locks
            .for_product(product_id)
            .ok_or_else(|| CatalogError::StorageFailure("Product lock table poisoned".into()))?;
        let _guard = lock
            .lock()
            .map_err(|_| CatalogError::StorageFailure("Product lock poisoned".into()))?;

        let id = product_id.to_string();
        let mut uploads = UploadCache::new();
        let attempts = self.options.max_conflict_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let latest = self.store.load_latest(product_id)?;

            let snapshot = self.resolve_scope(&latest.scope)?;

            let closed = match &input.closed_values {
                Some(pairs) => ClosedProposal::Explicit(pairs),
                None => ClosedProposal::CarriedForward(&latest.closed_values),
            };
            let specs = self.validate_specs(
                SpecificationValidator::new(&snapshot, self.options.carry_forward)
                    .validate(closed, &input.open_values),
                &id,
            )?;
            let narrowed = specs.narrowed.clone();

            let images = self.reconcile_images(&latest.images, input, &mut uploads, &id)?;

            let number = latest.number.next();
            let version = assemble(number, input, specs, images);

            match self.store.append_version(product_id, version) {
                Ok(()) => {
                    self.metrics.increment_versions_appended();
                    log_event_with_fields(
                        Event::VersionAppended,
                        &[("product_id", &id), ("version", &number.value().to_string())],
                    );

                    if !narrowed.is_empty() {
                        self.metrics.add_values_narrowed(narrowed.len() as u64);
                        let dropped: Vec<String> = narrowed.iter().map(|p| p.to_string()).collect();
                        log_event_with_fields(
                            Event::ClosedValuesNarrowed,
                            &[
                                ("dropped", &dropped.join(",")),
                                ("product_id", &id),
                                ("version", &number.value().to_string()),
                            ],
                        );
                    }

                    return Ok(UpdateOutcome {
                        version: number,
                        narrowed,
                    });
                }
                Err(e) if e.is_conflict() => {
                    if attempt >= attempts {
                        log_event_with_fields(
                            Event::ConflictRetriesExhausted,
                            &[("attempts", &attempt.to_string()), ("product_id", &id)],
                        );
                        return Err(CatalogError::StorageConflict {
                            attempts: attempt,
                            source: e,
                        });
                    }

                    self.metrics.increment_conflicts_retried();
                    log_event_with_fields(
                        Event::StorageConflict,
                        &[("attempt", &attempt.to_string()), ("product_id", &id), ("reason", &e.to_string())],
                    );
                }
                Err(e) => {
                    log_event_with_fields(Event::StorageFailure, &[("error", &e.to_string()), ("product_id", &id)]);
                    return Err(e.into());
                }
            }
        }
    }

    /// Toggles the soft-delete flag. Versions are left untouched.
    pub fn set_deleted(&self, product_id: ProductId, deleted: bool) -> CatalogResult<()> {
        self.store.set_deleted(product_id, deleted)?;
        log_event_with_fields(
            Event::ProductDeletedFlagChanged,
            &[("deleted", &deleted.to_string()), ("product_id", &product_id.to_string())],
        );
        Ok(())
    }

    fn resolve_scope(&self, scope: &Scope) -> CatalogResult<ScopeSnapshot> {
        ScopeResolver::new(&self.scopes, self.options.deleted_entry_policy)
            .resolve(scope)
            .map_err(|e| {
                log_event_with_fields(Event::StorageFailure, &[("error", &e.to_string()), ("scope", &scope.to_string())]);
                CatalogError::from(e)
            })?
            .ok_or_else(|| CatalogError::ScopeNotFound(scope.clone()))
    }

    fn validate_specs(
        &self,
        result: Result<ValidatedSpecs, crate::specification::SpecViolations>,
        subject: &str,
    ) -> CatalogResult<ValidatedSpecs> {
        result.map_err(|violations| {
            self.metrics.increment_spec_rejections();
            log_event_with_fields(
                Event::SpecRejected,
                &[("subject", subject), ("violations", &violations.to_string())],
            );
            CatalogError::SpecRejected(violations)
        })
    }

    fn reconcile_images(
        &self,
        previous: &BTreeMap<String, FileReference>,
        input: &VersionInput,
        uploads: &mut UploadCache,
        subject: &str,
    ) -> CatalogResult<BTreeMap<String, FileReference>> {
        let plan = ImageReconciler::new(previous).plan(&input.images).map_err(|rejection| {
            self.metrics.increment_image_rejections();
            log_event_with_fields(
                Event::ImageRejected,
                &[("rejection", &rejection.to_string()), ("subject", subject)],
            );
            CatalogError::ImageRejected(rejection)
        })?;

        let before = uploads.len();
        let images = plan.commit(&self.assets, uploads).map_err(|e| {
            log_event_with_fields(Event::StorageFailure, &[("error", &e.to_string()), ("subject", subject)]);
            CatalogError::from(e)
        })?;

        for _ in before..uploads.len() {
            self.metrics.increment_assets_written();
        }

        Ok(images)
    }
}

/// Rejects input no schema could make valid.
fn check_input(input: &VersionInput) -> CatalogResult<()> {
    if input.name.trim().is_empty() {
        return Err(CatalogError::invalid_input("name", "must not be empty"));
    }
    if input.description.trim().is_empty() {
        return Err(CatalogError::invalid_input("description", "must not be empty"));
    }

    let mut slots = HashSet::new();
    for entry in &input.images {
        if entry.slot.trim().is_empty() {
            return Err(CatalogError::invalid_input("images", "slot name must not be empty"));
        }
        if !slots.insert(entry.slot.as_str()) {
            return Err(CatalogError::invalid_input(
                "images",
                format!("slot '{}' listed more than once", entry.slot),
            ));
        }
    }

    Ok(())
}

fn assemble(
    number: VersionNumber,
    input: &VersionInput,
    specs: ValidatedSpecs,
    images: BTreeMap<String, FileReference>,
) -> ProductVersion {
    ProductVersion::assemble(VersionParts {
        number,
        name: input.name.clone(),
        description: input.description.clone(),
        price: input.price,
        closed_values: specs.closed,
        open_values: specs.open,
        images,
    })
}
