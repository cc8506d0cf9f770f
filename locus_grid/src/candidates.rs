// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate producers for containment queries.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect};
use locus_geometry::contains_inclusive;

use crate::index::GeoIndex;

/// Something that can list the points inside a box.
///
/// This is the seam between a query executor and its acceleration structure:
/// an executor asks for the points in a shape's bounding box and then applies
/// the exact predicate itself. Implementations must not miss any point inside
/// the (closed) box; extra points are allowed.
pub trait CandidateSource<K> {
    /// Visit candidates inside `rect`, with the coordinates the source holds for them.
    fn visit_candidates<F: FnMut(K, Point)>(&self, rect: Rect, f: F);

    /// Collect candidates inside `rect`.
    ///
    /// The default implementation collects [`visit_candidates`][Self::visit_candidates].
    fn candidates(&self, rect: Rect) -> Vec<(K, Point)> {
        let mut out = Vec::new();
        self.visit_candidates(rect, |id, pt| out.push((id, pt)));
        out
    }
}

impl<K> CandidateSource<K> for GeoIndex<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn visit_candidates<F: FnMut(K, Point)>(&self, rect: Rect, f: F) {
        self.visit_rect(rect, f);
    }
}

/// Linear scan over a flat list of points.
///
/// Every query touches every point. Useful for very small collections, as the
/// fallback before an index has been built, and as the reference an index is
/// checked against.
#[derive(Clone, Debug, Default)]
pub struct FlatScan<K> {
    points: Vec<(K, Point)>,
}

impl<K> FlatScan<K> {
    /// Create an empty scan list.
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append a point.
    pub fn push(&mut self, id: K, point: Point) {
        self.points.push((id, point));
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<K: Copy> FlatScan<K> {
    /// Iterate over the points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, Point)> + '_ {
        self.points.iter().copied()
    }
}

impl<K> FromIterator<(K, Point)> for FlatScan<K> {
    fn from_iter<I: IntoIterator<Item = (K, Point)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<K: Copy> CandidateSource<K> for FlatScan<K> {
    fn visit_candidates<F: FnMut(K, Point)>(&self, rect: Rect, mut f: F) {
        for &(id, pt) in &self.points {
            if contains_inclusive(&rect, pt) {
                f(id, pt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn index_and_flat_scan_agree() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut idx: GeoIndex<u32> = GeoIndex::new();
        let mut flat = FlatScan::new();
        for i in 0..300 {
            let pt = Point::new(rng.gen_range(-90.0..90.0), rng.gen_range(-90.0..90.0));
            idx.insert(i, pt).unwrap();
            flat.push(i, pt);
        }
        for rect in [
            Rect::new(-10.0, -10.0, 10.0, 10.0),
            Rect::new(-1000.0, -1000.0, 1000.0, 1000.0),
            Rect::new(50.0, -90.0, 51.0, 90.0),
            Rect::new(500.0, 500.0, 600.0, 600.0),
        ] {
            let mut a = idx.candidates(rect);
            let mut b = flat.candidates(rect);
            a.sort_by_key(|&(id, _)| id);
            b.sort_by_key(|&(id, _)| id);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn flat_scan_from_iterator() {
        let flat: FlatScan<u8> = [(1, Point::new(0.0, 0.0)), (2, Point::new(5.0, 5.0))]
            .into_iter()
            .collect();
        assert_eq!(flat.len(), 2);
        assert_eq!(
            flat.candidates(Rect::new(0.0, 0.0, 1.0, 1.0)),
            [(1, Point::new(0.0, 0.0))]
        );
    }
}
