// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon query execution: bounding box, candidates, exact filter.

use kurbo::{Point, Rect};
use locus_geometry::{ContainsParams, Polygon, contains_inclusive};
use locus_grid::CandidateSource;
use tracing::trace;

use crate::error::WithinError;
use crate::shape::Shape;
use crate::source::PointSource;

/// A validated `$within` query.
///
/// Construction validates the shape, so a query that exists can only fail on
/// its inputs (a candidate the point source does not know, or a non-finite
/// stored coordinate).
#[derive(Clone, Debug)]
pub struct WithinQuery {
    polygon: Polygon,
    params: ContainsParams,
}

impl WithinQuery {
    /// Validate `shape` and prepare a query with default parameters.
    pub fn new(shape: &Shape) -> Result<Self, WithinError> {
        Ok(Self::from_polygon(shape.to_polygon()?))
    }

    /// Query an already validated polygon.
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self {
            polygon,
            params: ContainsParams::default(),
        }
    }

    /// Override the containment parameters (boundary tolerance).
    #[must_use]
    pub fn with_params(mut self, params: ContainsParams) -> Self {
        self.params = params;
        self
    }

    /// The polygon being evaluated.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Minimal axis-aligned rectangle containing the polygon.
    pub fn bounding_box(&self) -> Rect {
        self.polygon.bounding_box()
    }

    /// The box handed to the candidate source.
    ///
    /// The bounding box widened by the boundary tolerance: a point the
    /// tolerance places on an extreme edge lies just outside the bounding box
    /// and must still be a candidate.
    pub fn candidate_box(&self) -> Rect {
        let tol = self.params.boundary_tolerance.max(0.0);
        self.polygon.bounding_box().inflate(tol, tol)
    }

    /// Whether a single point satisfies the query.
    pub fn matches(&self, pt: Point) -> Result<bool, WithinError> {
        Ok(self.polygon.locate(pt, &self.params)?.is_within())
    }

    /// Run the query.
    ///
    /// Candidates come from `candidates` (an index or a linear scan); their
    /// coordinates are read from `source` and tested against the polygon. The
    /// order of the result is unspecified.
    pub fn execute<K, C, S>(&self, candidates: &C, source: &S) -> Result<Vec<K>, WithinError>
    where
        K: Copy,
        C: CandidateSource<K> + ?Sized,
        S: PointSource<K> + ?Sized,
    {
        let mut ids: Vec<K> = Vec::new();
        candidates.visit_candidates(self.candidate_box(), |id, _| ids.push(id));
        let candidate_count = ids.len();

        let mut out = Vec::with_capacity(candidate_count);
        for id in ids {
            let pt = source.coordinates(&id).ok_or(WithinError::NotFound)?;
            if self.matches(pt)? {
                out.push(id);
            }
        }
        trace!(
            vertices = self.polygon.vertices().len(),
            candidates = candidate_count,
            results = out.len(),
            "evaluated within query"
        );
        Ok(out)
    }

    /// Run the query over `(id, point)` pairs whose coordinates are already known.
    ///
    /// Equivalent to [`execute`](Self::execute) with a linear candidate scan,
    /// without a coordinate lookup per candidate.
    pub fn execute_points<K, I>(&self, points: I) -> Result<Vec<K>, WithinError>
    where
        I: IntoIterator<Item = (K, Point)>,
    {
        let bbox = self.candidate_box();
        let mut out = Vec::new();
        let mut candidate_count = 0_usize;
        for (id, pt) in points {
            if !contains_inclusive(&bbox, pt) {
                continue;
            }
            candidate_count += 1;
            if self.matches(pt)? {
                out.push(id);
            }
        }
        trace!(
            vertices = self.polygon.vertices().len(),
            candidates = candidate_count,
            results = out.len(),
            "evaluated within query over known points"
        );
        Ok(out)
    }
}

/// Identifiers of the points of `source` inside `shape`, boundary included.
///
/// Convenience for [`WithinQuery::new`] followed by [`WithinQuery::execute`].
/// An invalid shape fails before any candidate is produced.
///
/// # Examples
///
/// ```
/// use kurbo::Point;
/// use locus_grid::GeoIndex;
/// use locus_within::{within_polygon, Shape};
///
/// let mut idx: GeoIndex<u32> = GeoIndex::new();
/// let mut id = 0;
/// for x in 1..9 {
///     for y in 1..9 {
///         idx.insert(id, Point::new(f64::from(x), f64::from(y)))?;
///         id += 1;
///     }
/// }
///
/// let triangle = Shape::polygon([(0.0, 0.0), (1.0, 1.0), (0.0, 2.0)]);
/// assert_eq!(within_polygon(&triangle, &idx, &idx)?.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn within_polygon<K, C, S>(shape: &Shape, candidates: &C, source: &S) -> Result<Vec<K>, WithinError>
where
    K: Copy,
    C: CandidateSource<K> + ?Sized,
    S: PointSource<K> + ?Sized,
{
    WithinQuery::new(shape)?.execute(candidates, source)
}
