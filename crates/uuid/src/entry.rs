//! [`EntryId`] implementation.

use crate::{IdError, IdResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical entry identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed the wrapped UUID is known to be valid, and its string form is always
/// canonical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryId {
    /// Allocates a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not exactly 32 lowercase hex characters.
    pub fn parse(input: &str) -> IdResult<Self> {
        if !Self::is_canonical(input) {
            return Err(IdError::InvalidInput(format!(
                "entry id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdError::InvalidInput(e.to_string()))
    }

    /// Returns true if `input` is in canonical form. Purely syntactic.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for EntryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EntryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EntryId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_canonical_and_distinct() {
        let a = EntryId::new();
        let b = EntryId::new();
        assert_ne!(a, b);
        assert!(EntryId::is_canonical(&a.to_string()));
    }

    #[test]
    fn parse_accepts_canonical_form() {
        let id = EntryId::parse("550e8400e29b41d4a716446655440000").expect("canonical");
        assert_eq!(id.to_string(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn parse_rejects_hyphenated_and_uppercase() {
        assert!(EntryId::parse("550e8400-e29b-41d4-a716-446655440000").is_err());
        assert!(EntryId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(EntryId::parse("").is_err());
    }

    #[test]
    fn serde_uses_canonical_string() {
        let id = EntryId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");
        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let err = serde_json::from_str::<EntryId>("\"not-an-id\"").expect_err("should reject");
        assert!(err.to_string().contains("32 lowercase hex"));
    }
}
