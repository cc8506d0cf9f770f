// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple polygons and the crossing-number containment test.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::error::GeometryError;
use crate::rect::{validate_point, validate_rect};

/// Where a point sits relative to a polygon.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Location {
    /// Strictly inside the polygon.
    Inside,
    /// On an edge or vertex, within the configured tolerance.
    Boundary,
    /// Outside the polygon.
    Outside,
}

impl Location {
    /// Whether the location counts as contained for an inclusive "within" query.
    #[inline]
    pub const fn is_within(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Parameters controlling containment tests.
#[derive(Clone, Copy, Debug)]
pub struct ContainsParams {
    /// Absolute distance under which a point is considered on an edge.
    ///
    /// A point exactly on an edge is always on the boundary regardless of this
    /// value; the tolerance only widens the boundary band to absorb rounding in
    /// the caller's coordinates. Use `0.0` for an exact test.
    pub boundary_tolerance: f64,
}

impl ContainsParams {
    /// Default boundary tolerance.
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    /// Exact boundary test without tolerance.
    pub const fn exact() -> Self {
        Self {
            boundary_tolerance: 0.0,
        }
    }
}

impl Default for ContainsParams {
    fn default() -> Self {
        Self {
            boundary_tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

/// A closed polygon given by its vertices in order.
///
/// The last vertex connects back to the first. Convex and concave polygons are
/// both supported; self-intersecting polygons are evaluated with the even-odd
/// rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    bounds: Rect,
}

impl Polygon {
    /// Build a polygon from at least three finite vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use locus_geometry::{GeometryError, Polygon};
    ///
    /// let tri = Polygon::new([(0.0, 0.0), (1.0, 1.0), (0.0, 2.0)]).unwrap();
    /// assert_eq!(tri.vertices().len(), 3);
    ///
    /// let line = Polygon::new([(0.0, 0.0), (1.0, 1.0)]);
    /// assert!(matches!(line, Err(GeometryError::InvalidShape(_))));
    /// ```
    pub fn new<I, P>(vertices: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let vertices: Vec<Point> = vertices.into_iter().map(Into::into).collect();
        if vertices.len() < 3 {
            return Err(GeometryError::InvalidShape(
                "a polygon needs at least three vertices",
            ));
        }
        let mut bounds = Rect::from_points(vertices[0], vertices[0]);
        for &v in &vertices {
            validate_point(v)?;
            bounds = bounds.union_pt(v);
        }
        Ok(Self { vertices, bounds })
    }

    /// The four-corner polygon covering `rect`.
    ///
    /// Fails with [`GeometryError::InvalidShape`] if a corner is not finite.
    pub fn from_rect(rect: Rect) -> Result<Self, GeometryError> {
        let r = validate_rect(rect)?;
        Ok(Self {
            vertices: alloc::vec![
                Point::new(r.x0, r.y0),
                Point::new(r.x0, r.y1),
                Point::new(r.x1, r.y1),
                Point::new(r.x1, r.y0),
            ],
            bounds: r,
        })
    }

    /// The vertices in order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Minimal axis-aligned rectangle containing every vertex.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        self.bounds
    }

    /// Iterate over the edges, including the closing edge from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Classify `pt` against this polygon.
    ///
    /// Edges are tested in order. A point on any edge is reported as
    /// [`Location::Boundary`] immediately; otherwise a horizontal ray towards
    /// `+x` is cast and each crossing toggles the parity. Edges are treated as
    /// half-open in `y` so that a ray through a vertex is counted once.
    pub fn locate(&self, pt: Point, params: &ContainsParams) -> Result<Location, GeometryError> {
        let pt = validate_point(pt)?;
        let tol = params.boundary_tolerance;
        let bb = self.bounds;
        if pt.x < bb.x0 - tol || pt.x > bb.x1 + tol || pt.y < bb.y0 - tol || pt.y > bb.y1 + tol {
            return Ok(Location::Outside);
        }

        let tol_sq = tol * tol;
        let mut inside = false;
        for (a, b) in self.edges() {
            if on_segment(pt, a, b, tol_sq) {
                return Ok(Location::Boundary);
            }
            if (a.y > pt.y) != (b.y > pt.y) {
                let x_cross = a.x + (pt.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if pt.x < x_cross {
                    inside = !inside;
                }
            }
        }
        Ok(if inside {
            Location::Inside
        } else {
            Location::Outside
        })
    }

    /// Whether `pt` is inside or on the boundary, with default parameters.
    #[inline]
    pub fn contains(&self, pt: Point) -> Result<bool, GeometryError> {
        point_in_polygon(pt, self)
    }
}

/// Whether `pt` lies inside `polygon` or on its boundary.
///
/// Uses [`ContainsParams::default`]; see [`Polygon::locate`] for the full
/// classification and custom tolerances.
///
/// # Examples
///
/// ```
/// use kurbo::Point;
/// use locus_geometry::{point_in_polygon, Polygon};
///
/// let tri = Polygon::new([(0.0, 0.0), (1.0, 1.0), (0.0, 2.0)]).unwrap();
/// assert!(point_in_polygon(Point::new(1.0, 1.0), &tri).unwrap());
/// assert!(!point_in_polygon(Point::new(1.0, 2.0), &tri).unwrap());
/// ```
pub fn point_in_polygon(pt: Point, polygon: &Polygon) -> Result<bool, GeometryError> {
    polygon
        .locate(pt, &ContainsParams::default())
        .map(Location::is_within)
}

/// Minimal axis-aligned rectangle containing every vertex of `polygon`.
#[inline]
pub fn bounding_box(polygon: &Polygon) -> Rect {
    polygon.bounding_box()
}

fn on_segment(p: Point, a: Point, b: Point, tol_sq: f64) -> bool {
    let ab = b - a;
    let ap = p - a;
    // Exact collinearity inside the segment's box: independent of the tolerance.
    if ab.cross(ap) == 0.0
        && a.x.min(b.x) <= p.x
        && p.x <= a.x.max(b.x)
        && a.y.min(b.y) <= p.y
        && p.y <= a.y.max(b.y)
    {
        return true;
    }
    if tol_sq <= 0.0 {
        return false;
    }
    let len_sq = ab.hypot2();
    let t = if len_sq > 0.0 {
        (ap.dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let d = p - (a + ab * t);
    d.hypot2() <= tol_sq
}
