// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query shape descriptors.

use kurbo::{Point, Rect};
use locus_geometry::{GeometryError, Polygon};

/// The region of a `$within` query, as handed over by the query layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// An implicitly closed vertex ring (`$polygon`).
    Polygon(Vec<Point>),
    /// An axis-aligned rectangle (`$box`); the corners may be given in any order.
    Box(Rect),
}

impl Shape {
    /// A polygon shape from anything convertible to points.
    pub fn polygon<I, P>(vertices: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self::Polygon(vertices.into_iter().map(Into::into).collect())
    }

    /// A rectangle shape spanning two opposite corners.
    pub fn from_corners(a: impl Into<Point>, b: impl Into<Point>) -> Self {
        let (a, b) = (a.into(), b.into());
        // Not `Rect::from_points`: its min/max would swallow NaN corners.
        Self::Box(Rect::new(a.x, a.y, b.x, b.y))
    }

    /// Validate the shape and turn it into the polygon the executor evaluates.
    ///
    /// Rectangles become their four-corner polygon, so both descriptors run
    /// through the same containment path.
    pub fn to_polygon(&self) -> Result<Polygon, GeometryError> {
        match self {
            Self::Polygon(vertices) => Polygon::new(vertices.iter().copied()),
            Self::Box(rect) => Polygon::from_rect(*rect),
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Self::Box(rect)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Self::Polygon(polygon.vertices().to_vec())
    }
}
