//! # Scope Lookup Trait

use super::errors::ScopeResult;
use crate::catalog::Scope;

/// A closed specification value as the schema source currently holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedValueEntry {
    pub name: String,
    pub value: String,
    /// Logically deleted by a schema administrator.
    pub deleted: bool,
}

/// An open specification name as the schema source currently holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenNameEntry {
    pub name: String,
    pub deleted: bool,
}

/// Read-only access to the category tree and its specification schema.
///
/// Entries are returned including logically deleted ones; the resolver
/// decides whether those still count. An unreadable schema source is an
/// error, never an empty answer.
pub trait ScopeLookup: Send + Sync + std::fmt::Debug {
    /// Whether the three-level category path exists.
    fn exists(&self, scope: &Scope) -> ScopeResult<bool>;

    /// Closed specification values defined for the scope.
    fn closed_values(&self, scope: &Scope) -> ScopeResult<Vec<ClosedValueEntry>>;

    /// Open specification names defined for the scope.
    fn open_names(&self, scope: &Scope) -> ScopeResult<Vec<OpenNameEntry>>;
}
