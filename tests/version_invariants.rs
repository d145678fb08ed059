//! Version History Invariant Tests
//!
//! - Version numbers are contiguous from 1, even under concurrent callers
//! - Appended versions never change
//! - Specification validation is batched and all-or-nothing
//! - A product's scope never changes

use std::sync::Arc;
use std::thread;

use catalogdb::asset_store::MemoryAssetStore;
use catalogdb::builder::{BuilderOptions, CatalogError, VersionBuilder};
use catalogdb::catalog::{ManifestEntry, Scope, SpecPair, VersionInput, VersionNumber};
use catalogdb::scope::{ScopeDefinition, ScopeRegistry};
use catalogdb::store::{CatalogStore, MemoryCatalogStore};

const JPEG: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

type Builder = VersionBuilder<ScopeRegistry, MemoryAssetStore, MemoryCatalogStore>;

fn phones() -> Scope {
    Scope::new("Electronics", "Phones", "Android")
}

fn builder() -> Builder {
    let scopes = ScopeRegistry::new();
    scopes
        .register(
            ScopeDefinition::new(phones())
                .with_closed("Color", &["Black", "White"])
                .with_closed("Memory", &["64GB", "128GB"])
                .with_open("Warranty"),
        )
        .unwrap();

    VersionBuilder::new(
        scopes,
        MemoryAssetStore::new(),
        MemoryCatalogStore::new(),
        BuilderOptions::default(),
    )
}

fn first_input() -> VersionInput {
    VersionInput::new("Pixel", "An Android phone", 59_900)
        .with_closed("Color", "Black")
        .with_image(ManifestEntry::upload("front", JPEG.to_vec()))
}

fn price_update(price: u64) -> VersionInput {
    VersionInput::new("Pixel", "An Android phone", price).with_image(ManifestEntry::keep("front"))
}

// =============================================================================
// Monotonicity
// =============================================================================

#[test]
fn test_sequential_updates_are_contiguous() {
    let builder = builder();
    let id = builder.create_product(&phones(), &first_input()).unwrap();

    for expected in 2..=5 {
        let outcome = builder.update_product(id, &price_update(expected * 100)).unwrap();
        assert_eq!(outcome.version.value(), expected);
    }

    let product = builder.store().load_product(id).unwrap();
    assert_eq!(product.versions().len(), 5);
    assert!(product.has_contiguous_history());
}

#[test]
fn test_concurrent_updates_have_no_gaps() {
    let builder = Arc::new(builder());
    let id = builder.create_product(&phones(), &first_input()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let builder = Arc::clone(&builder);
            thread::spawn(move || builder.update_product(id, &price_update(1_000 + i)).unwrap())
        })
        .collect();

    let mut numbers: Vec<u64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().version.value())
        .collect();
    numbers.sort_unstable();

    assert_eq!(numbers, (2..=9).collect::<Vec<_>>());
    let product = builder.store().load_product(id).unwrap();
    assert!(product.has_contiguous_history());
    assert_eq!(product.latest().unwrap().number().value(), 9);
}

// =============================================================================
// Immutability
// =============================================================================

#[test]
fn test_appended_versions_never_change() {
    let builder = builder();
    let id = builder.create_product(&phones(), &first_input()).unwrap();
    let v1_before = builder.store().load_version(id, VersionNumber::FIRST).unwrap();

    let update = VersionInput::new("Pixel 2", "Newer", 69_900)
        .with_closed("Color", "White")
        .with_image(ManifestEntry::upload("front", JPEG.to_vec()));
    builder.update_product(id, &update).unwrap();
    builder.set_deleted(id, true).unwrap();

    let v1_after = builder.store().load_version(id, VersionNumber::FIRST).unwrap();
    assert_eq!(v1_before, v1_after);
    assert_eq!(v1_after.name(), "Pixel");
    assert!(v1_after.closed_values().contains(&SpecPair::new("Color", "Black")));
}

#[test]
fn test_rejected_update_leaves_history_untouched() {
    let builder = builder();
    let id = builder.create_product(&phones(), &first_input()).unwrap();

    let bad = price_update(1).with_closed("Color", "Purple");
    assert!(builder.update_product(id, &bad).is_err());

    let product = builder.store().load_product(id).unwrap();
    assert_eq!(product.versions().len(), 1);
}

// =============================================================================
// Batched Validation
// =============================================================================

#[test]
fn test_spec_rejection_names_every_violation() {
    let builder = builder();
    let input = VersionInput::new("Pixel", "An Android phone", 1)
        .with_closed("Color", "Purple")
        .with_closed("Memory", "1TB")
        .with_closed("Color", "Black")
        .with_open("Battery", "5000mAh")
        .with_open("Warranty", "1 year");

    match builder.create_product(&phones(), &input) {
        Err(CatalogError::SpecRejected(violations)) => {
            assert_eq!(
                violations.missing_closed,
                vec![SpecPair::new("Color", "Purple"), SpecPair::new("Memory", "1TB")]
            );
            assert_eq!(violations.missing_open, vec!["Battery".to_string()]);
            assert_eq!(violations.len(), 3);
        }
        other => panic!("expected SpecRejected, got {:?}", other),
    }
    assert!(builder.store().is_empty());
}

#[test]
fn test_closed_values_match_exactly() {
    let builder = builder();
    let input = first_input().with_closed("color", "black");
    assert!(matches!(
        builder.create_product(&phones(), &input),
        Err(CatalogError::SpecRejected(_))
    ));
}

#[test]
fn test_open_values_stored_verbatim() {
    let builder = builder();
    let input = first_input().with_open("Warranty", "  24 months, extendable ");
    let id = builder.create_product(&phones(), &input).unwrap();

    let v1 = builder.store().load_version(id, VersionNumber::FIRST).unwrap();
    assert!(v1
        .open_values()
        .contains(&SpecPair::new("Warranty", "  24 months, extendable ")));
}

// =============================================================================
// Scope Immutability
// =============================================================================

#[test]
fn test_update_validates_against_creation_scope() {
    let builder = builder();
    builder
        .scopes()
        .register(ScopeDefinition::new(Scope::new("Electronics", "Phones", "iOS")).with_closed("Color", &["Gold"]))
        .unwrap();

    let id = builder.create_product(&phones(), &first_input()).unwrap();

    // Gold only exists in the iOS scope.
    let update = price_update(1).with_closed("Color", "Gold");
    assert!(matches!(
        builder.update_product(id, &update),
        Err(CatalogError::SpecRejected(_))
    ));
    assert_eq!(builder.store().load_product(id).unwrap().scope(), &phones());
}

#[test]
fn test_unknown_scope_and_product() {
    let builder = builder();

    let err = builder
        .create_product(&Scope::new("Garden", "Tools", "Shovels"), &first_input())
        .unwrap_err();
    assert_eq!(err.code(), "CATALOG_SCOPE_NOT_FOUND");
    assert!(!err.is_retryable());

    let id = builder.create_product(&phones(), &first_input()).unwrap();
    let missing = catalogdb::catalog::ProductId::new(id.value() + 100);
    let err = builder.update_product(missing, &price_update(1)).unwrap_err();
    assert_eq!(err.code(), "CATALOG_PRODUCT_NOT_FOUND");
}
