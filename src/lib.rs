//! catalogdb - versioned product catalog engine
//!
//! Products live in a category scope and accumulate an append-only
//! history of versions. Every version is validated against the scope's
//! specification schema, and images are shared between versions by
//! reference until replaced.

pub mod asset_store;
pub mod builder;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod image;
pub mod observability;
pub mod scope;
pub mod specification;
pub mod store;
