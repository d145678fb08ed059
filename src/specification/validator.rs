//! SpecificationValidator - pure validation over a scope snapshot
//!
//! Validation has no side effects and does not consult anything beyond
//! the snapshot it was built with.

use std::collections::BTreeSet;

use super::violations::SpecViolations;
use crate::catalog::SpecPair;
use crate::scope::ScopeSnapshot;

/// What happens to carried-forward closed values the schema no longer allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarryForwardPolicy {
    /// Drop them from the new version and report them as narrowed.
    #[default]
    Narrow,
    /// Treat them like any other unknown closed value.
    Reject,
}

/// Where the closed values of a new version come from.
#[derive(Debug, Clone, Copy)]
pub enum ClosedProposal<'a> {
    /// Supplied by the caller; validated strictly.
    Explicit(&'a [SpecPair]),
    /// Taken from the previous version.
    CarriedForward(&'a BTreeSet<SpecPair>),
}

/// Attribute values accepted for a new version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedSpecs {
    /// Closed values to store: the proposal intersected with the scope.
    pub closed: BTreeSet<SpecPair>,
    /// Open values to store, verbatim.
    pub open: BTreeSet<SpecPair>,
    /// Carried-forward closed values dropped because the scope no longer has them.
    pub narrowed: Vec<SpecPair>,
}

/// Validates proposed attribute values against one scope snapshot.
#[derive(Debug)]
pub struct SpecificationValidator<'a> {
    snapshot: &'a ScopeSnapshot,
    carry_forward: CarryForwardPolicy,
}

impl<'a> SpecificationValidator<'a> {
    pub fn new(snapshot: &'a ScopeSnapshot, carry_forward: CarryForwardPolicy) -> Self {
        Self {
            snapshot,
            carry_forward,
        }
    }

    /// Validates closed and open values together.
    ///
    /// # Errors
    ///
    /// Returns every offending closed pair and open name at once. Nothing
    /// is accepted partially.
    pub fn validate(
        &self,
        closed: ClosedProposal<'_>,
        open: &[SpecPair],
    ) -> Result<ValidatedSpecs, SpecViolations> {
        let mut missing_closed = BTreeSet::new();
        let mut missing_open = BTreeSet::new();
        let mut accepted = ValidatedSpecs::default();

        match closed {
            ClosedProposal::Explicit(pairs) => {
                for pair in pairs {
                    if self.snapshot.allows_closed(pair) {
                        accepted.closed.insert(pair.clone());
                    } else {
                        missing_closed.insert(pair.clone());
                    }
                }
            }
            ClosedProposal::CarriedForward(pairs) => {
                for pair in pairs {
                    if self.snapshot.allows_closed(pair) {
                        accepted.closed.insert(pair.clone());
                    } else if self.carry_forward == CarryForwardPolicy::Narrow {
                        accepted.narrowed.push(pair.clone());
                    } else {
                        missing_closed.insert(pair.clone());
                    }
                }
            }
        }

        for pair in open {
            if self.snapshot.allows_open(&pair.name) {
                accepted.open.insert(pair.clone());
            } else {
                missing_open.insert(pair.name.clone());
            }
        }

        let violations = SpecViolations {
            missing_closed: missing_closed.into_iter().collect(),
            missing_open: missing_open.into_iter().collect(),
        };

        if violations.is_empty() {
            Ok(accepted)
        } else {
            Err(violations)
        }
    }
}
