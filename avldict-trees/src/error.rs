//! The library's error type.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the dictionary and its tree engine.
///
/// Missing keys and deletes of absent keys are not errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The node store could not hold another entry.
    #[error("allocation failed with {live} live entries")]
    Alloc {
        /// Entries alive when the allocation was refused.
        live: usize,
    },
    /// A node reference points at a released arena slot.
    #[error("dangling node reference: {0}")]
    DanglingNode(usize),
    /// A bounded string was built from longer input.
    #[error("string of {len} characters exceeds the {max} character limit")]
    StringTooLong {
        /// Length of the rejected input, in characters.
        len: usize,
        /// The configured maximum.
        max: usize,
    },
    /// A structural check over the tree failed.
    #[error("invariant violated: {0}")]
    Invariant(String),
}
