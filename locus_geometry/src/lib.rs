// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locus Geometry: exact planar containment predicates.
//!
//! This crate is the narrow phase of a `$within`-style query: once a spatial
//! index has produced a candidate set, every candidate is checked here against
//! the query shape. It is stateless and built on top of [`kurbo`].
//!
//! - [`Polygon`] – a validated, implicitly closed vertex ring (convex or concave).
//! - [`Polygon::locate`] – crossing-number classification into [`Location`].
//! - [`point_in_polygon`] – the inclusive boolean predicate: boundary points are inside.
//! - [`bounding_box`] – the rectangle an index scans before exact filtering.
//! - [`contains_inclusive`] – closed rectangle test, for rectangle shapes and index filtering.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use locus_geometry::{bounding_box, point_in_polygon, Polygon};
//!
//! let pacman = Polygon::new([
//!     (0.0, 2.0), (0.0, 4.0), (2.0, 6.0), (4.0, 6.0),
//!     (6.0, 4.0), (4.0, 3.0), (6.0, 2.0),
//!     (4.0, 0.0), (2.0, 0.0),
//! ])?;
//!
//! assert!(point_in_polygon(Point::new(1.0, 3.0), &pacman)?);
//! // Inside the bounding box, but in the mouth.
//! assert!(bounding_box(&pacman).contains(Point::new(5.0, 3.0)));
//! assert!(!point_in_polygon(Point::new(5.0, 3.0), &pacman)?);
//! # Ok::<(), locus_geometry::GeometryError>(())
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` targets.

#![no_std]

extern crate alloc;

mod error;
mod polygon;
mod rect;

pub use error::GeometryError;
pub use polygon::{ContainsParams, Location, Polygon, bounding_box, point_in_polygon};
pub use rect::{contains_inclusive, overlaps_inclusive, validate_point, validate_rect};

pub use kurbo;
