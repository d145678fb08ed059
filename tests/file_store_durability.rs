//! File Store Durability Tests
//!
//! - Histories survive reopening the store
//! - Version files are checksummed; damage is reported, never hidden
//! - Compare-and-append holds across independent store handles
//! - Independent builders sharing a directory keep histories contiguous

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use catalogdb::asset_store::LocalAssetStore;
use catalogdb::builder::{BuilderOptions, CatalogError, ErrorSeverity, VersionBuilder};
use catalogdb::catalog::{ManifestEntry, ProductId, Scope, VersionInput, VersionNumber};
use catalogdb::scope::{ScopeDefinition, ScopeRegistry};
use catalogdb::store::{CatalogStore, FileCatalogStore, StoreError};
use tempfile::TempDir;

const JPEG: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

type FileBuilder = VersionBuilder<ScopeRegistry, LocalAssetStore, FileCatalogStore>;

fn phones() -> Scope {
    Scope::new("Electronics", "Phones", "Android")
}

fn open_builder(root: &Path, retries: u32) -> FileBuilder {
    let scopes = ScopeRegistry::new();
    scopes
        .register(
            ScopeDefinition::new(phones())
                .with_closed("Color", &["Black", "White"])
                .with_open("Warranty"),
        )
        .unwrap();

    VersionBuilder::new(
        scopes,
        LocalAssetStore::new(root.join("assets")),
        FileCatalogStore::open(root.join("products")).unwrap(),
        BuilderOptions {
            max_conflict_retries: retries,
            ..BuilderOptions::default()
        },
    )
}

fn phone(price: u64) -> VersionInput {
    VersionInput::new("Pixel", "An Android phone", price)
        .with_closed("Color", "Black")
        .with_open("Warranty", "2 years")
}

fn create(builder: &FileBuilder) -> ProductId {
    let input = phone(59_900).with_image(ManifestEntry::upload("front", JPEG.to_vec()));
    builder.create_product(&phones(), &input).unwrap()
}

// =============================================================================
// Reopen
// =============================================================================

#[test]
fn test_history_survives_reopen() {
    let temp = TempDir::new().unwrap();

    let (id, front) = {
        let builder = open_builder(temp.path(), 5);
        let id = create(&builder);
        builder
            .update_product(id, &phone(49_900).with_image(ManifestEntry::keep("front")))
            .unwrap();
        builder.set_deleted(id, true).unwrap();

        let v1 = builder.store().load_version(id, VersionNumber::FIRST).unwrap();
        (id, v1.image("front").cloned().unwrap())
    };

    let store = FileCatalogStore::open(temp.path().join("products")).unwrap();
    let product = store.load_product(id).unwrap();

    assert_eq!(product.scope(), &phones());
    assert!(product.is_deleted());
    assert_eq!(product.versions().len(), 2);
    assert_eq!(product.versions()[1].price(), 49_900);
    assert_eq!(product.versions()[1].image("front"), Some(&front));
    assert!(temp.path().join("assets").join(front.as_str()).exists());
}

#[test]
fn test_ids_continue_after_reopen() {
    let temp = TempDir::new().unwrap();

    let first = create(&open_builder(temp.path(), 5));
    let second = create(&open_builder(temp.path(), 5));

    assert_eq!(second.value(), first.value() + 1);
}

// =============================================================================
// Checksums
// =============================================================================

#[test]
fn test_damaged_version_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let builder = open_builder(temp.path(), 5);
    let id = create(&builder);

    let path = temp
        .path()
        .join("products")
        .join(id.value().to_string())
        .join("v000001.json");
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 2;
    bytes[last] ^= 0x20;
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        builder.store().load_product(id),
        Err(StoreError::Corrupt { .. })
    ));

    let err = builder
        .update_product(id, &phone(1).with_image(ManifestEntry::keep("front")))
        .unwrap_err();
    assert!(matches!(err, CatalogError::StorageFailure(_)));
    assert_eq!(err.severity(), ErrorSeverity::Fatal);
}

#[test]
fn test_misplaced_version_file_fails_instead_of_retrying() {
    let temp = TempDir::new().unwrap();
    let builder = open_builder(temp.path(), 3);
    let id = create(&builder);

    let dir = temp.path().join("products").join(id.value().to_string());
    fs::copy(dir.join("v000001.json"), dir.join("v000002.json")).unwrap();

    let err = builder
        .update_product(id, &phone(1).with_image(ManifestEntry::keep("front")))
        .unwrap_err();
    assert!(matches!(err, CatalogError::StorageFailure(_)), "got {:?}", err);
    assert_eq!(builder.metrics().snapshot().conflicts_retried, 0);
}

// =============================================================================
// Compare-and-Append
// =============================================================================

#[test]
fn test_stale_handle_loses_the_race() {
    let temp = TempDir::new().unwrap();
    let builder = open_builder(temp.path(), 5);
    let id = create(&builder);

    let stale = FileCatalogStore::open(temp.path().join("products")).unwrap();
    assert_eq!(stale.load_latest(id).unwrap().number, VersionNumber::FIRST);

    let outcome = builder
        .update_product(id, &phone(2).with_image(ManifestEntry::keep("front")))
        .unwrap();
    let v2 = builder.store().load_version(id, outcome.version).unwrap();

    // The stale handle still believes version 2 is free.
    match stale.append_version(id, v2) {
        Err(StoreError::Conflict {
            attempted, expected, ..
        }) => {
            assert_eq!(attempted.value(), 2);
            assert_eq!(expected.value(), 3);
        }
        other => panic!("expected conflict, got {:?}", other),
    }

    let v1 = stale.load_version(id, VersionNumber::FIRST).unwrap();
    assert!(stale.append_version(id, v1).unwrap_err().is_conflict());

    let product = stale.load_product(id).unwrap();
    assert_eq!(product.versions().len(), 2);
    assert!(product.has_contiguous_history());
}

#[test]
fn test_independent_builders_share_a_directory() {
    let temp = TempDir::new().unwrap();
    let seed = open_builder(temp.path(), 5);
    let id = create(&seed);

    // Separate builders have separate lock tables, like separate processes.
    let builders: Vec<Arc<FileBuilder>> = (0..4).map(|_| Arc::new(open_builder(temp.path(), 50))).collect();

    let handles: Vec<_> = builders
        .iter()
        .enumerate()
        .map(|(i, builder)| {
            let builder = Arc::clone(builder);
            thread::spawn(move || {
                (0..3)
                    .map(|j| {
                        let input = phone((i * 10 + j) as u64).with_image(ManifestEntry::keep("front"));
                        builder.update_product(id, &input).map(|o| o.version.value())
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut numbers = Vec::new();
    for handle in handles {
        for result in handle.join().unwrap() {
            match result {
                Ok(n) => numbers.push(n),
                Err(e) => assert!(e.is_retryable(), "unexpected error: {}", e),
            }
        }
    }
    numbers.sort_unstable();

    let product = seed.store().load_product(id).unwrap();
    assert!(product.has_contiguous_history());
    assert_eq!(product.versions().len() as u64, 1 + numbers.len() as u64);

    // Every successful update got a distinct number.
    let mut deduped = numbers.clone();
    deduped.dedup();
    assert_eq!(deduped, numbers);
}
