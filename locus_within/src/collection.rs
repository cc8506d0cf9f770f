// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-collection index ownership and maintenance hooks.

use core::fmt::Debug;
use core::hash::Hash;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use kurbo::Point;
use locus_grid::{GeoIndex, GridConfig};
use tracing::{debug, debug_span, trace_span};

use crate::error::WithinError;
use crate::executor::WithinQuery;
use crate::shape::Shape;
use crate::source::PointSource;

/// The spatial index state of one point collection.
///
/// The collection starts without an index; [`ensure_index`](Self::ensure_index)
/// builds one from the storage layer, after which the storage layer reports
/// every mutation through [`on_insert`](Self::on_insert),
/// [`on_remove`](Self::on_remove) and [`on_update`](Self::on_update).
///
/// Queries share a read lock; hooks and index lifecycle calls take the write
/// lock and apply their change to every level before releasing it, so a query
/// sees either all of a mutation or none of it.
pub struct SpatialCollection<K> {
    config: GridConfig,
    index: RwLock<Option<GeoIndex<K>>>,
}

impl<K: Debug> Debug for SpatialCollection<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let guard = self.index.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SpatialCollection")
            .field("config", &self.config)
            .field("index", &*guard)
            .finish()
    }
}

impl<K> SpatialCollection<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Create an unindexed collection using the default grid configuration.
    pub fn new() -> Self {
        Self {
            config: GridConfig::default(),
            index: RwLock::new(None),
        }
    }

    /// Create an unindexed collection that will build its index with `config`.
    pub fn with_config(config: GridConfig) -> Result<Self, WithinError> {
        config.validate()?;
        Ok(Self {
            config,
            index: RwLock::new(None),
        })
    }

    /// The grid configuration used when building the index.
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Whether an index has been built.
    pub fn is_indexed(&self) -> bool {
        self.read().is_some()
    }

    /// Number of indexed points, or `None` without an index.
    pub fn indexed_len(&self) -> Option<usize> {
        self.read().as_ref().map(GeoIndex::len)
    }

    /// Build the index from every point in `source`, if it does not exist yet.
    ///
    /// Returns the number of indexed points. Building is atomic: if any point
    /// is rejected, the collection stays unindexed and the error is returned.
    pub fn ensure_index<S>(&self, source: &S) -> Result<usize, WithinError>
    where
        S: PointSource<K> + ?Sized,
    {
        let _span = debug_span!("ensure_index").entered();
        let mut guard = self.write();
        if let Some(index) = guard.as_ref() {
            return Ok(index.len());
        }
        let mut index = GeoIndex::with_config(self.config)?;
        let mut failure = None;
        source.for_each_point(&mut |id, pt| {
            if failure.is_none()
                && let Err(e) = index.insert(id, pt)
            {
                failure = Some(e);
            }
        });
        if let Some(e) = failure {
            return Err(e.into());
        }
        let len = index.len();
        *guard = Some(index);
        debug!(points = len, "built spatial index");
        Ok(len)
    }

    /// Discard the index. Returns whether one existed.
    pub fn drop_index(&self) -> bool {
        let dropped = self.write().take().is_some();
        if dropped {
            debug!("dropped spatial index");
        }
        dropped
    }

    /// Storage hook: a point was inserted.
    ///
    /// A no-op until the index exists.
    pub fn on_insert(&self, id: K, point: Point) -> Result<(), WithinError> {
        match self.write().as_mut() {
            Some(index) => Ok(index.insert(id, point)?),
            None => Ok(()),
        }
    }

    /// Storage hook: a point was removed.
    ///
    /// Fails with [`GridError::NotFound`](locus_grid::GridError::NotFound) if
    /// the index does not hold `id`.
    pub fn on_remove(&self, id: &K) -> Result<(), WithinError> {
        match self.write().as_mut() {
            Some(index) => index.remove(id).map(|_| ()).map_err(Into::into),
            None => Ok(()),
        }
    }

    /// Storage hook: a point moved.
    pub fn on_update(&self, id: K, point: Point) -> Result<(), WithinError> {
        match self.write().as_mut() {
            Some(index) => index.update(id, point).map(|_| ()).map_err(Into::into),
            None => Ok(()),
        }
    }

    /// Identifiers of the points inside `shape`, boundary included.
    ///
    /// Uses the index when one exists and a linear scan of `source` otherwise;
    /// both give the same result. Coordinates are always read from `source`.
    pub fn within<S>(&self, shape: &Shape, source: &S) -> Result<Vec<K>, WithinError>
    where
        S: PointSource<K> + ?Sized,
    {
        let _span = trace_span!("within").entered();
        let query = WithinQuery::new(shape)?;
        let guard = self.read();
        match guard.as_ref() {
            Some(index) => query.execute(index, source),
            None => {
                // One pass over the source; its coordinates are already in hand.
                let mut points = Vec::new();
                source.for_each_point(&mut |id, pt| points.push((id, pt)));
                query.execute_points(points)
            }
        }
    }

    /// Like [`within`](Self::within), reading coordinates from the index itself.
    ///
    /// Fails with [`WithinError::NotIndexed`] if no index has been built.
    pub fn within_indexed(&self, shape: &Shape) -> Result<Vec<K>, WithinError> {
        let query = WithinQuery::new(shape)?;
        let guard = self.read();
        let index = guard.as_ref().ok_or(WithinError::NotIndexed)?;
        query.execute(index, index)
    }

    /// Run `f` against the current index under the read lock.
    pub fn with_index<R>(&self, f: impl FnOnce(Option<&GeoIndex<K>>) -> R) -> R {
        f(self.read().as_ref())
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<GeoIndex<K>>> {
        // Mutations validate before touching the index, so a poisoned lock
        // never guards a half-applied change.
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<GeoIndex<K>>> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K> Default for SpatialCollection<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
