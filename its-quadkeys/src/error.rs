//! Error types for quadtree path and zone operations.

use thiserror::Error;

use crate::coord::CoordError;

pub use crate::config::ConfigFileError;

/// Errors raised while validating quadtree input.
///
/// Every other operation on [`crate::QuadPath`] and [`crate::QuadRegion`]
/// is total, so these are the only failures callers need to handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuadError {
    /// The digit sequence is empty, too deep, or contains something other
    /// than `0`-`3`; or a position could not be projected.
    #[error("Invalid quadkey path: {0}")]
    InvalidPath(String),

    /// A split was requested with neither or both depth parameters, or
    /// with a depth that cannot be reached.
    #[error("Invalid depth request: {0}")]
    InvalidDepthRequest(String),
}

impl From<CoordError> for QuadError {
    fn from(err: CoordError) -> Self {
        QuadError::InvalidPath(err.to_string())
    }
}
