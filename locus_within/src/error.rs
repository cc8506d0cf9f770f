// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use locus_geometry::GeometryError;
use locus_grid::GridError;
use thiserror::Error;

/// Failure of a containment query or an index maintenance hook.
///
/// Kernel and index errors are passed through unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum WithinError {
    /// The query shape or a point is invalid.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The index rejected a configuration or mutation.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The point source has no coordinates for an indexed candidate.
    #[error("candidate point not found in the point source")]
    NotFound,

    /// The collection has no spatial index yet.
    #[error("no spatial index has been built for this collection")]
    NotIndexed,
}
