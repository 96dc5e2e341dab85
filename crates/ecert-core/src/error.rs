//! # Error Types
//!
//! Parse and construction failures for the primitives in this crate.
//! Higher layers wrap these in their own `thiserror` enums.

use thiserror::Error;

/// Error constructing or parsing a core primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The input was not a valid RFC 3339 timestamp.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// An identifier failed validation.
    #[error("invalid {kind} identifier: {reason}")]
    InvalidIdentifier {
        /// Which identifier namespace was being constructed.
        kind: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A state name did not match any known lifecycle state.
    #[error("unknown lifecycle state {0:?}")]
    UnknownState(String),
}
