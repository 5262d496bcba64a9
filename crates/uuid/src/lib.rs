//! Stable identifiers for repeatable form entries.
//!
//! Every medication order, lab test and other repeatable entry receives an [`EntryId`] when it
//! is created and keeps it for its whole life. Positions shift whenever an earlier entry is
//! removed; ids do not.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the same value produced by `Uuid::new_v4().simple().to_string()`. Identifiers that
//! arrive from outside (scripts, CLI arguments, saved snapshots) must already be canonical;
//! hyphenated or uppercase forms are rejected rather than normalised.

mod entry;

pub use entry::{EntryId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
