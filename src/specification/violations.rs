//! Batched specification violations

use std::fmt;

use crate::catalog::SpecPair;

/// Every closed pair and open name a proposal got wrong.
///
/// Both lists are sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecViolations {
    /// Closed pairs not defined for the scope.
    pub missing_closed: Vec<SpecPair>,
    /// Open specification names not defined for the scope.
    pub missing_open: Vec<String>,
}

impl SpecViolations {
    pub fn is_empty(&self) -> bool {
        self.missing_closed.is_empty() && self.missing_open.is_empty()
    }

    /// Total number of offending entries.
    pub fn len(&self) -> usize {
        self.missing_closed.len() + self.missing_open.len()
    }
}

impl fmt::Display for SpecViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let closed: Vec<String> = self.missing_closed.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "unknown closed values [{}], unknown open specifications [{}]",
            closed.join(", "),
            self.missing_open.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_everything() {
        let violations = SpecViolations {
            missing_closed: vec![SpecPair::new("Color", "Red"), SpecPair::new("Memory", "1TB")],
            missing_open: vec!["Engraving".into()],
        };

        let text = violations.to_string();
        assert!(text.contains("Color=Red"));
        assert!(text.contains("Memory=1TB"));
        assert!(text.contains("Engraving"));
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(SpecViolations::default().is_empty());
    }
}
