// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for shape validation.

use thiserror::Error;

/// Failure to build or evaluate a shape.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// The shape cannot describe a region (too few vertices, non-finite rectangle corners).
    #[error("invalid shape: {0}")]
    InvalidShape(&'static str),

    /// A vertex or query point has a NaN or infinite coordinate.
    #[error("invalid coordinate ({x}, {y}): coordinates must be finite")]
    InvalidCoordinate {
        /// The offending x coordinate.
        x: f64,
        /// The offending y coordinate.
        y: f64,
    },
}
