//! Specification validation
//!
//! Checks the attribute values proposed for a new version against the
//! schema snapshot of the product's scope.
//!
//! # Rules
//!
//! - A closed (name, value) pair must exist in the scope, matched exactly
//! - An open value's name must exist in the scope; its text is free
//! - Every violation is collected; a single violation rejects the whole version
//! - Carried-forward closed values that left the schema are narrowed away
//!   (or rejected, depending on `CarryForwardPolicy`)

mod validator;
mod violations;

pub use validator::{CarryForwardPolicy, ClosedProposal, SpecificationValidator, ValidatedSpecs};
pub use violations::SpecViolations;
