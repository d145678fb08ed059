//! Observability for the catalog engine
//!
//! - Structured one-line JSON logs
//! - Typed catalog events
//! - Counters for mutations, rejections, asset writes and conflicts
//!
//! Observability is read-only: nothing here influences a mutation's outcome.
//!
//! ```ignore
//! use catalogdb::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::VersionAppended, &[("product_id", "7"), ("version", "2")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{CatalogMetrics, MetricsSnapshot};

/// Log a catalog event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
