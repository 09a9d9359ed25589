//! This module defines the error types used by the `elevation-map-msg` crate.

#![warn(missing_docs)]

use thiserror::Error;

/// Error type for elevation map message operations.
///
/// This enum covers malformed layouts and invalid map parameters. Lookups that can
/// only be in or out of range return `Option` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MsgError {
    /// The first dimension label is neither `row_index` nor `column_index`.
    #[error("Invalid layout label: {0:?}")]
    InvalidLayoutLabel(String),
    /// The layout has no dimension descriptor at the given position.
    #[error("Layout is missing dimension {0}")]
    MissingDimension(usize),
    /// Error for invalid map resolution.
    /// This variant is returned when a map resolution is provided that is not positive.
    #[error("Invalid map resolution: {0}")]
    InvalidResolution(&'static str),
    /// Error for invalid map length.
    #[error("Invalid map length: {0}")]
    InvalidLength(&'static str),
    /// The alignment matrix is not a signed permutation.
    #[error("Invalid alignment: {0}")]
    InvalidAlignment(&'static str),
}
