//! CLI command implementations
//!
//! Every command loads the configuration first. Mutating commands then
//! load scope definitions and open the durable stores under `data_dir`.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::asset_store::LocalAssetStore;
use crate::builder::{BuilderOptions, VersionBuilder};
use crate::catalog::{ProductId, VersionNumber};
use crate::config::CatalogConfig;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::scope::ScopeRegistry;
use crate::store::{CatalogStore, FileCatalogStore};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};
use super::request::VersionRequest;

type FileBuilder = VersionBuilder<ScopeRegistry, LocalAssetStore, FileCatalogStore>;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. Failures
/// are reported as an error response before being returned.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);

    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }

    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Create { config } => create(&config),
        Command::Update { config, product } => update(&config, ProductId::new(product)),
        Command::Show {
            config,
            product,
            version,
        } => show(&config, ProductId::new(product), version),
        Command::Delete { config, product } => set_deleted(&config, ProductId::new(product), true),
        Command::Restore { config, product } => set_deleted(&config, ProductId::new(product), false),
    }
}

/// Initialize a new catalog data directory
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;

    if is_initialized(&config) {
        return Err(CliError::already_initialized());
    }

    for dir in [config.scopes_dir(), config.products_dir(), config.assets_dir()] {
        fs::create_dir_all(&dir).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {:?}: {}", dir, e))
        })?;
    }

    write_response(json!({"initialized": true}))
}

/// Create a product from a stdin request
pub fn create(config_path: &Path) -> CliResult<()> {
    let builder = open_builder(config_path)?;

    let request: VersionRequest = read_request()?;
    let (scope, input) = request.into_input()?;
    let scope = scope.ok_or_else(|| CliError::invalid_request("'scope' is required for create"))?;

    let product_id = builder.create_product(&scope, &input)?;

    write_response(json!({
        "product_id": product_id,
        "version": VersionNumber::FIRST,
    }))
}

/// Append a version from a stdin request
pub fn update(config_path: &Path, product_id: ProductId) -> CliResult<()> {
    let builder = open_builder(config_path)?;

    let request: VersionRequest = read_request()?;
    let (scope, input) = request.into_input()?;
    if scope.is_some() {
        return Err(CliError::invalid_request("a product's scope cannot be changed"));
    }

    let outcome = builder.update_product(product_id, &input)?;

    write_response(json!({
        "product_id": product_id,
        "version": outcome.version,
        "narrowed": outcome.narrowed,
    }))
}

/// Print a product's full history, or one version
pub fn show(config_path: &Path, product_id: ProductId, version: Option<u64>) -> CliResult<()> {
    let config = load_config(config_path)?;
    if !is_initialized(&config) {
        return Err(CliError::not_initialized());
    }

    let store = FileCatalogStore::open(config.products_dir())?;

    let data = match version {
        Some(n) => {
            let number = VersionNumber::new(n)
                .ok_or_else(|| CliError::invalid_request("version numbers start at 1"))?;
            serde_json::to_value(store.load_version(product_id, number)?)?
        }
        None => serde_json::to_value(store.load_product(product_id)?)?,
    };

    write_response(data)
}

/// Toggle a product's deleted flag
pub fn set_deleted(config_path: &Path, product_id: ProductId, deleted: bool) -> CliResult<()> {
    let builder = open_builder(config_path)?;
    builder.set_deleted(product_id, deleted)?;

    write_response(json!({
        "product_id": product_id,
        "deleted": deleted,
    }))
}

fn load_config(path: &Path) -> CliResult<CatalogConfig> {
    let config = CatalogConfig::load(path)?;
    Logger::set_min_severity(config.log_level);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("data_dir", &config.data_dir.display().to_string())],
    );
    Ok(config)
}

fn is_initialized(config: &CatalogConfig) -> bool {
    config.scopes_dir().is_dir() && config.products_dir().is_dir()
}

fn open_builder(config_path: &Path) -> CliResult<FileBuilder> {
    let config = load_config(config_path)?;
    if !is_initialized(&config) {
        return Err(CliError::not_initialized());
    }

    let scopes = ScopeRegistry::new();
    let loaded = scopes.load_dir(&config.scopes_dir())?;
    log_event_with_fields(Event::ScopesLoaded, &[("count", &loaded.to_string())]);

    let assets = LocalAssetStore::new(config.assets_dir());
    let store = FileCatalogStore::open(config.products_dir())?;

    Ok(VersionBuilder::new(
        scopes,
        assets,
        store,
        BuilderOptions::from(&config),
    ))
}
