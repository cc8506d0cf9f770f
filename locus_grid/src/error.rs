// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for index maintenance.

use thiserror::Error;

/// Failure to configure or mutate a [`GeoIndex`](crate::GeoIndex).
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GridError {
    /// A point has a NaN or infinite coordinate.
    #[error("invalid coordinate ({x}, {y}): coordinates must be finite")]
    InvalidCoordinate {
        /// The offending x coordinate.
        x: f64,
        /// The offending y coordinate.
        y: f64,
    },

    /// A point lies outside the hard-bounded domain of the index.
    #[error("point ({x}, {y}) is outside the index domain [{min}, {max}]")]
    CoordinateOutOfDomain {
        /// The rejected x coordinate.
        x: f64,
        /// The rejected y coordinate.
        y: f64,
        /// Lower domain bound, per axis.
        min: f64,
        /// Upper domain bound, per axis.
        max: f64,
    },

    /// The identifier is not indexed.
    #[error("point is not indexed")]
    NotFound,

    /// The identifier is already indexed; use `update` to move it.
    #[error("point is already indexed")]
    DuplicateId,

    /// The grid configuration cannot be used.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(&'static str),
}
