//! Scope resolution
//!
//! A scope is the (main category, category, subcategory) path that fixes
//! which specifications a product may carry. The category tree itself is
//! maintained elsewhere; this module only reads it:
//! - `ScopeLookup` is the read-only boundary to the schema source
//! - `ScopeRegistry` is an in-memory lookup, loadable from JSON files
//! - `ScopeResolver` turns a scope into a validation snapshot

mod errors;
mod lookup;
mod registry;
mod resolver;

pub use errors::{ScopeError, ScopeResult};
pub use lookup::{ClosedValueEntry, OpenNameEntry, ScopeLookup};
pub use registry::{ClosedSpecDef, ClosedValueDef, OpenSpecDef, ScopeDefinition, ScopeRegistry};
pub use resolver::{DeletedEntryPolicy, ScopeResolver, ScopeSnapshot};
