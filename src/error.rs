//! Error types for index construction.
//!
//! Traversal never fails; these only surface where untrusted input enters
//! the index.

use thiserror::Error;

/// Index construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AtlasError {
    /// Rectangle with `min > max` on at least one axis.
    #[error("invalid rectangle: min {min:?} exceeds max {max:?}")]
    InvalidRect {
        /// Lower corner as given
        min: [i32; 2],
        /// Upper corner as given
        max: [i32; 2],
    },

    /// Node size outside `2..=u16::MAX`.
    #[error("invalid node size {0}: must be between 2 and 65535")]
    InvalidNodeSize(usize),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
