// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Access to the coordinates held by the storage layer.

use core::fmt::Debug;
use core::hash::{BuildHasher, Hash};

use hashbrown::HashMap;
use kurbo::Point;
use locus_grid::{FlatScan, GeoIndex};

/// Point-coordinate accessor provided by the surrounding storage layer.
///
/// The executor asks the source for the current coordinates of each
/// candidate, and [`SpatialCollection::ensure_index`] walks the whole source
/// to build an index.
///
/// [`SpatialCollection::ensure_index`]: crate::SpatialCollection::ensure_index
pub trait PointSource<K> {
    /// Current coordinates of `id`, or `None` if the source does not hold it.
    fn coordinates(&self, id: &K) -> Option<Point>;

    /// Visit every point held by the source.
    fn for_each_point(&self, f: &mut dyn FnMut(K, Point));
}

impl<K> PointSource<K> for GeoIndex<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn coordinates(&self, id: &K) -> Option<Point> {
        self.get(id)
    }

    fn for_each_point(&self, f: &mut dyn FnMut(K, Point)) {
        for (id, pt) in self.iter() {
            f(id, pt);
        }
    }
}

impl<K, S> PointSource<K> for HashMap<K, Point, S>
where
    K: Copy + Eq + Hash,
    S: BuildHasher,
{
    fn coordinates(&self, id: &K) -> Option<Point> {
        self.get(id).copied()
    }

    fn for_each_point(&self, f: &mut dyn FnMut(K, Point)) {
        for (&id, &pt) in self {
            f(id, pt);
        }
    }
}

impl<K: Copy + Eq> PointSource<K> for [(K, Point)] {
    fn coordinates(&self, id: &K) -> Option<Point> {
        self.iter().find(|(k, _)| k == id).map(|&(_, pt)| pt)
    }

    fn for_each_point(&self, f: &mut dyn FnMut(K, Point)) {
        for &(id, pt) in self {
            f(id, pt);
        }
    }
}

impl<K: Copy + Eq> PointSource<K> for FlatScan<K> {
    fn coordinates(&self, id: &K) -> Option<Point> {
        self.iter().find(|(k, _)| k == id).map(|(_, pt)| pt)
    }

    fn for_each_point(&self, f: &mut dyn FnMut(K, Point)) {
        for (id, pt) in self.iter() {
            f(id, pt);
        }
    }
}
