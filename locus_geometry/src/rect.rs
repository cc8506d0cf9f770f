// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-rectangle helpers.
//!
//! [`kurbo::Rect::contains`] is half-open (`x0 <= x < x1`), which would drop
//! points sitting on the right or bottom edge of a query box. Containment
//! queries here treat every edge as part of the rectangle.

use kurbo::{Point, Rect};

use crate::error::GeometryError;

/// Whether `pt` lies inside `rect` or on any of its edges.
///
/// The rectangle does not need to be normalized.
#[inline]
pub fn contains_inclusive(rect: &Rect, pt: Point) -> bool {
    let r = rect.abs();
    r.x0 <= pt.x && pt.x <= r.x1 && r.y0 <= pt.y && pt.y <= r.y1
}

/// Whether two closed rectangles share at least one point.
#[inline]
pub fn overlaps_inclusive(a: &Rect, b: &Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// Check that all four corners are finite and return the normalized rectangle.
///
/// A rectangle with a NaN or infinite corner is rejected as
/// [`GeometryError::InvalidShape`]: it does not describe a bounded region.
pub fn validate_rect(rect: Rect) -> Result<Rect, GeometryError> {
    if rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite() {
        Ok(rect.abs())
    } else {
        Err(GeometryError::InvalidShape(
            "rectangle corners must be finite",
        ))
    }
}

/// Check that a point has finite coordinates.
#[inline]
pub fn validate_point(pt: Point) -> Result<Point, GeometryError> {
    if pt.x.is_finite() && pt.y.is_finite() {
        Ok(pt)
    } else {
        Err(GeometryError::InvalidCoordinate { x: pt.x, y: pt.y })
    }
}
