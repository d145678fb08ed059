//! ScopeResolver - confirms a scope and snapshots its schema
//!
//! The snapshot is taken once per mutation attempt. Validation runs
//! entirely against the snapshot, never against the live lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::errors::ScopeResult;
use super::lookup::ScopeLookup;
use crate::catalog::{Scope, SpecPair};

/// Whether schema entries flagged deleted still validate new versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletedEntryPolicy {
    /// Deleted entries are invisible to validation.
    #[default]
    Reject,
    /// Deleted entries keep validating until removed from the schema.
    Accept,
}

impl DeletedEntryPolicy {
    fn admits(&self, deleted: bool) -> bool {
        !deleted || *self == DeletedEntryPolicy::Accept
    }
}

/// The specification schema valid for one scope at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSnapshot {
    scope: Scope,
    closed: BTreeSet<SpecPair>,
    open: BTreeSet<String>,
}

impl ScopeSnapshot {
    /// Builds a snapshot directly from valid entries.
    pub fn new(scope: Scope, closed: BTreeSet<SpecPair>, open: BTreeSet<String>) -> Self {
        Self { scope, closed, open }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Closed (name, value) pairs usable on a new version.
    pub fn closed_values(&self) -> &BTreeSet<SpecPair> {
        &self.closed
    }

    /// Open specification names usable on a new version.
    pub fn open_names(&self) -> &BTreeSet<String> {
        &self.open
    }

    pub fn allows_closed(&self, pair: &SpecPair) -> bool {
        self.closed.contains(pair)
    }

    pub fn allows_open(&self, name: &str) -> bool {
        self.open.contains(name)
    }
}

/// Resolves scopes against a lookup under a deleted-entry policy.
#[derive(Debug)]
pub struct ScopeResolver<'a, L: ScopeLookup> {
    lookup: &'a L,
    policy: DeletedEntryPolicy,
}

impl<'a, L: ScopeLookup> ScopeResolver<'a, L> {
    pub fn new(lookup: &'a L, policy: DeletedEntryPolicy) -> Self {
        Self { lookup, policy }
    }

    /// Returns the scope's schema snapshot, or `None` if the path does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the lookup cannot be read.
    pub fn resolve(&self, scope: &Scope) -> ScopeResult<Option<ScopeSnapshot>> {
        if !self.lookup.exists(scope)? {
            return Ok(None);
        }

        let closed = self
            .lookup
            .closed_values(scope)?
            .into_iter()
            .filter(|e| self.policy.admits(e.deleted))
            .map(|e| SpecPair::new(e.name, e.value))
            .collect();

        let open = self
            .lookup
            .open_names(scope)?
            .into_iter()
            .filter(|e| self.policy.admits(e.deleted))
            .map(|e| e.name)
            .collect();

        Ok(Some(ScopeSnapshot::new(scope.clone(), closed, open)))
    }
}
