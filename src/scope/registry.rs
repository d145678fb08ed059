//! In-memory scope registry
//!
//! Scope definitions are stored one file per scope under
//! `<data_dir>/metadata/scopes/*.json`. The registry is loaded at startup
//! and can be edited in place afterwards (schema administration lives
//! outside the catalog core, this is the hook it uses).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use super::errors::{ScopeError, ScopeResult};
use super::lookup::{ClosedValueEntry, OpenNameEntry, ScopeLookup};
use crate::catalog::Scope;

/// One permissible value of a closed specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedValueDef {
    pub value: String,
    #[serde(default)]
    pub deleted: bool,
}

/// A closed specification and its enumerated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedSpecDef {
    pub name: String,
    #[serde(default)]
    pub values: Vec<ClosedValueDef>,
}

/// An open (free text) specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSpecDef {
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
}

/// Schema attached to one category path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDefinition {
    #[serde(flatten)]
    pub scope: Scope,
    #[serde(default)]
    pub closed: Vec<ClosedSpecDef>,
    #[serde(default)]
    pub open: Vec<OpenSpecDef>,
}

impl ScopeDefinition {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            closed: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Adds live values to a closed specification, creating it if needed.
    pub fn with_closed(mut self, name: &str, values: &[&str]) -> Self {
        let defs = values.iter().map(|v| ClosedValueDef {
            value: (*v).to_string(),
            deleted: false,
        });

        match self.closed.iter_mut().find(|c| c.name == name) {
            Some(spec) => spec.values.extend(defs),
            None => self.closed.push(ClosedSpecDef {
                name: name.to_string(),
                values: defs.collect(),
            }),
        }
        self
    }

    pub fn with_open(mut self, name: &str) -> Self {
        self.open.push(OpenSpecDef {
            name: name.to_string(),
            deleted: false,
        });
        self
    }

    /// Checks the definition itself, not any product.
    pub fn validate_structure(&self) -> Result<(), String> {
        let scope = &self.scope;
        if scope.main_category.is_empty() || scope.category.is_empty() || scope.subcategory.is_empty() {
            return Err("scope path segments must be non-empty".into());
        }

        let mut seen = std::collections::HashSet::new();
        for spec in &self.closed {
            if !seen.insert(spec.name.as_str()) {
                return Err(format!("closed specification '{}' declared twice", spec.name));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for spec in &self.open {
            if !seen.insert(spec.name.as_str()) {
                return Err(format!("open specification '{}' declared twice", spec.name));
            }
        }

        Ok(())
    }
}

/// Scope registry backed by an in-memory map.
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: RwLock<HashMap<Scope, ScopeDefinition>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` scope file from a directory.
    ///
    /// A missing directory yields an empty registry. Returns the number of
    /// scopes loaded.
    pub fn load_dir(&self, dir: &Path) -> ScopeResult<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            ScopeError::malformed(dir.display().to_string(), format!("Failed to read directory: {}", e))
        })?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry.map_err(|e| ScopeError::IoError(e.to_string()))?.path();

            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_file(&path)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    fn load_file(&self, path: &Path) -> ScopeResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScopeError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let definition: ScopeDefinition = serde_json::from_str(&content).map_err(|e| {
            ScopeError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        definition
            .validate_structure()
            .map_err(|e| ScopeError::malformed(path.display().to_string(), e))?;

        self.register(definition)
    }

    /// Registers a new scope. An already registered scope is an error.
    pub fn register(&self, definition: ScopeDefinition) -> ScopeResult<()> {
        definition
            .validate_structure()
            .map_err(|e| ScopeError::malformed("<in-memory>", e))?;

        let mut scopes = self
            .scopes
            .write()
            .map_err(|_| ScopeError::Internal("Lock poisoned".into()))?;

        if scopes.contains_key(&definition.scope) {
            return Err(ScopeError::Duplicate(definition.scope));
        }

        scopes.insert(definition.scope.clone(), definition);
        Ok(())
    }

    /// Replaces a scope's definition wholesale, registering it if absent.
    pub fn replace(&self, definition: ScopeDefinition) -> ScopeResult<()> {
        definition
            .validate_structure()
            .map_err(|e| ScopeError::malformed("<in-memory>", e))?;

        let mut scopes = self
            .scopes
            .write()
            .map_err(|_| ScopeError::Internal("Lock poisoned".into()))?;

        scopes.insert(definition.scope.clone(), definition);
        Ok(())
    }

    /// Flags a closed value as deleted (or live again).
    ///
    /// Returns false if the scope, specification or value is unknown.
    pub fn set_closed_value_deleted(
        &self,
        scope: &Scope,
        name: &str,
        value: &str,
        deleted: bool,
    ) -> ScopeResult<bool> {
        let mut scopes = self
            .scopes
            .write()
            .map_err(|_| ScopeError::Internal("Lock poisoned".into()))?;

        let entry = scopes
            .get_mut(scope)
            .and_then(|def| def.closed.iter_mut().find(|c| c.name == name))
            .and_then(|spec| spec.values.iter_mut().find(|v| v.value == value));

        Ok(match entry {
            Some(def) => {
                def.deleted = deleted;
                true
            }
            None => false,
        })
    }

    /// Flags an open specification as deleted (or live again).
    pub fn set_open_name_deleted(&self, scope: &Scope, name: &str, deleted: bool) -> ScopeResult<bool> {
        let mut scopes = self
            .scopes
            .write()
            .map_err(|_| ScopeError::Internal("Lock poisoned".into()))?;

        let entry = scopes
            .get_mut(scope)
            .and_then(|def| def.open.iter_mut().find(|o| o.name == name));

        Ok(match entry {
            Some(def) => {
                def.deleted = deleted;
                true
            }
            None => false,
        })
    }

    /// Number of registered scopes. Reads through a poisoned lock.
    pub fn len(&self) -> usize {
        self.scopes
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScopeLookup for ScopeRegistry {
    fn exists(&self, scope: &Scope) -> ScopeResult<bool> {
        let scopes = self.scopes.read().map_err(|_| poisoned())?;
        Ok(scopes.contains_key(scope))
    }

    fn closed_values(&self, scope: &Scope) -> ScopeResult<Vec<ClosedValueEntry>> {
        let scopes = self.scopes.read().map_err(|_| poisoned())?;

        Ok(scopes
            .get(scope)
            .map(|def| {
                def.closed
                    .iter()
                    .flat_map(|spec| {
                        spec.values.iter().map(move |v| ClosedValueEntry {
                            name: spec.name.clone(),
                            value: v.value.clone(),
                            deleted: v.deleted,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn open_names(&self, scope: &Scope) -> ScopeResult<Vec<OpenNameEntry>> {
        let scopes = self.scopes.read().map_err(|_| poisoned())?;

        Ok(scopes
            .get(scope)
            .map(|def| {
                def.open
                    .iter()
                    .map(|o| OpenNameEntry {
                        name: o.name.clone(),
                        deleted: o.deleted,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl<T: ScopeLookup + ?Sized> ScopeLookup for std::sync::Arc<T> {
    fn exists(&self, scope: &Scope) -> ScopeResult<bool> {
        (**self).exists(scope)
    }

    fn closed_values(&self, scope: &Scope) -> ScopeResult<Vec<ClosedValueEntry>> {
        (**self).closed_values(scope)
    }

    fn open_names(&self, scope: &Scope) -> ScopeResult<Vec<OpenNameEntry>> {
        (**self).open_names(scope)
    }
}

fn poisoned() -> ScopeError {
    ScopeError::Internal("Lock poisoned".into())
}
