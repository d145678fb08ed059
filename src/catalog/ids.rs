//! Product and version identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque numeric product identity.
///
/// Assigned by the catalog store when a product is created and never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a product id from its raw value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a version inside its product's history.
///
/// Numbers start at 1 and grow by exactly one per appended version.
/// There is no `Default`: the first version is obtained with [`VersionNumber::FIRST`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct VersionNumber(u64);

impl VersionNumber {
    /// The number carried by the version a product is created with.
    pub const FIRST: VersionNumber = VersionNumber(1);

    /// Creates a version number, rejecting zero.
    pub fn new(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the raw value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the number the next appended version must carry.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl TryFrom<u64> for VersionNumber {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "version numbers start at 1".to_string())
    }
}

impl From<VersionNumber> for u64 {
    fn from(number: VersionNumber) -> Self {
        number.0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_number_rejects_zero() {
        assert!(VersionNumber::new(0).is_none());
        assert_eq!(VersionNumber::new(1), Some(VersionNumber::FIRST));
    }

    #[test]
    fn test_version_number_next_is_contiguous() {
        let v1 = VersionNumber::FIRST;
        let v2 = v1.next();
        assert_eq!(v2.value(), 2);
        assert_eq!(v2.next().value(), 3);
        assert!(v1 < v2);
    }

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&ProductId::new(7)).unwrap();
        assert_eq!(json, "7");
        let v: VersionNumber = serde_json::from_str("3").unwrap();
        assert_eq!(v.value(), 3);
    }

    #[test]
    fn test_version_zero_does_not_deserialize() {
        assert!(serde_json::from_str::<VersionNumber>("0").is_err());
        assert_eq!(serde_json::to_string(&VersionNumber::FIRST).unwrap(), "1");
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::new(12).to_string(), "12");
        assert_eq!(VersionNumber::FIRST.to_string(), "v1");
    }
}
