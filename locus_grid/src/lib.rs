// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locus Grid: a multi-resolution grid index for 2D points.
//!
//! Locus Grid is the broad phase of a containment query. It maps every point
//! to a Z-order (Morton) cell key over a bounded square domain and keeps one
//! sorted cell map per resolution level, so that a query box can be answered by
//! scanning a handful of key ranges instead of the whole collection.
//!
//! - Insert, update, and remove points keyed by caller-supplied identifiers.
//! - Query every point inside a closed rectangle with [`GeoIndex::range_query`].
//! - Inspect how a box is scanned with [`GeoIndex::plan`] and [`ScanPlan`].
//!
//! The index is a pure accelerator: its results for a box are exactly the
//! points inside it, and shape predicates (polygons) are applied by the caller
//! through the [`CandidateSource`] seam. [`FlatScan`] implements the same seam
//! with a linear scan.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use locus_grid::{GeoIndex, GridConfig};
//!
//! let config = GridConfig::new().with_bounds(0.0, 1024.0).with_bits(10);
//! let mut idx: GeoIndex<u64> = GeoIndex::with_config(config)?;
//! for i in 0..64_u32 {
//!     idx.insert(u64::from(i), Point::new(f64::from(i % 8) * 16.0, f64::from(i / 8) * 16.0))?;
//! }
//!
//! // Everything, even though the box dwarfs the domain.
//! assert_eq!(idx.range_query(Rect::new(-1e9, -1e9, 1e9, 1e9)).len(), 64);
//!
//! // A small box touches only a few fine cells.
//! let plan = idx.plan(Rect::new(0.0, 0.0, 16.0, 16.0)).unwrap();
//! assert!(plan.cell_count() <= config.max_scan_cells);
//! assert_eq!(idx.range_query(Rect::new(0.0, 0.0, 16.0, 16.0)).len(), 4);
//! # Ok::<(), locus_grid::GridError>(())
//! ```
//!
//! ## Domain
//!
//! The domain is hard-bounded: inserting a point outside `[min, max]` on
//! either axis fails with [`GridError::CoordinateOutOfDomain`]. Query boxes
//! are clipped to the domain, so arbitrarily large boxes are cheap.
//!
//! ## Features
//!
//! - `std` *(default)* / `libm`: forwarded to `locus_geometry` (and from there to `kurbo`).

#![no_std]

extern crate alloc;

mod candidates;
mod config;
mod error;
mod hash;
mod index;
mod scan;

pub use candidates::{CandidateSource, FlatScan};
pub use config::GridConfig;
pub use error::GridError;
pub use hash::{CellKey, GeoHasher, deinterleave, interleave};
pub use index::GeoIndex;
pub use scan::{RangeScanner, ScanPlan};
