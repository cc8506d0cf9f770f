// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The multi-level point index.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use locus_geometry::contains_inclusive;
use smallvec::SmallVec;
use tracing::trace;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::scan::{RangeScanner, ScanPlan};

#[derive(Clone, Debug)]
struct Entry<K> {
    id: K,
    point: Point,
    // Finest-level Morton code; the key at every coarser level derives from it.
    code: u64,
}

#[derive(Clone, Debug, Default)]
struct Cell {
    slots: SmallVec<[usize; 8]>,
}

/// A point index over a hierarchical Z-order grid.
///
/// Every point is stored in exactly one cell at each level `0..=bits`, so a
/// scan at any single level never reports a point twice. Cells are created on
/// first use and dropped when they empty.
///
/// # Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use locus_grid::GeoIndex;
///
/// let mut idx: GeoIndex<u32> = GeoIndex::new();
/// idx.insert(1, Point::new(1.0, 1.0))?;
/// idx.insert(2, Point::new(8.0, 8.0))?;
///
/// let mut hits = idx.range_query(Rect::new(0.0, 0.0, 5.0, 5.0));
/// assert_eq!(hits, [1]);
///
/// idx.update(2, Point::new(2.0, 2.0))?;
/// hits = idx.range_query(Rect::new(0.0, 0.0, 5.0, 5.0));
/// hits.sort();
/// assert_eq!(hits, [1, 2]);
/// # Ok::<(), locus_grid::GridError>(())
/// ```
pub struct GeoIndex<K> {
    config: GridConfig,
    scanner: RangeScanner,
    ids: HashMap<K, usize>,
    entries: Vec<Option<Entry<K>>>,
    free_list: Vec<usize>,
    levels: Vec<BTreeMap<u64, Cell>>,
    // `positions[slot * levels.len() + level]` is the index of `slot` inside
    // its cell at `level`.
    positions: Vec<usize>,
}

impl<K: Debug> Debug for GeoIndex<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let finest_cells = self.levels.last().map_or(0, BTreeMap::len);
        f.debug_struct("GeoIndex")
            .field("config", &self.config)
            .field("points", &self.ids.len())
            .field("slots", &self.entries.len())
            .field("finest_cells", &finest_cells)
            .finish_non_exhaustive()
    }
}

impl<K> GeoIndex<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Create an empty index with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GridConfig::default())
            .expect("geo index invariant violated: default configuration rejected")
    }

    /// Create an empty index with an explicit configuration.
    pub fn with_config(config: GridConfig) -> Result<Self, GridError> {
        let scanner = RangeScanner::new(&config)?;
        let levels = (0..=config.bits).map(|_| BTreeMap::new()).collect();
        Ok(Self {
            config,
            scanner,
            ids: HashMap::new(),
            entries: Vec::new(),
            free_list: Vec::new(),
            levels,
            positions: Vec::new(),
        })
    }

    /// Build an index over `points` in one pass.
    ///
    /// Stops at the first point that cannot be inserted.
    pub fn build<I>(config: GridConfig, points: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (K, Point)>,
    {
        let mut idx = Self::with_config(config)?;
        let points = points.into_iter();
        idx.reserve(points.size_hint().0);
        for (id, pt) in points {
            idx.insert(id, pt)?;
        }
        Ok(idx)
    }

    /// The configuration this index was built with.
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The scanner used to plan range queries.
    pub const fn scanner(&self) -> &RangeScanner {
        &self.scanner
    }

    /// Reserve space for at least `n` more points.
    pub fn reserve(&mut self, n: usize) {
        self.ids.reserve(n);
        self.entries.reserve(n);
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is indexed.
    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains_key(id)
    }

    /// Indexed coordinates of `id`.
    pub fn get(&self, id: &K) -> Option<Point> {
        let &slot = self.ids.get(id)?;
        self.entries[slot].as_ref().map(|e| e.point)
    }

    /// Iterate over all indexed points in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, Point)> + '_ {
        self.entries.iter().flatten().map(|e| (e.id, e.point))
    }

    /// Number of occupied cells at `level`.
    pub fn cell_count(&self, level: u8) -> usize {
        self.levels.get(usize::from(level)).map_or(0, BTreeMap::len)
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.entries.clear();
        self.free_list.clear();
        self.positions.clear();
        for level in &mut self.levels {
            level.clear();
        }
    }

    /// Add a point.
    ///
    /// Fails without modifying the index if the coordinates are not finite,
    /// lie outside the domain, or `id` is already indexed.
    pub fn insert(&mut self, id: K, point: Point) -> Result<(), GridError> {
        let code = self.checked_code(point)?;
        if self.ids.contains_key(&id) {
            return Err(GridError::DuplicateId);
        }
        let entry = Entry { id, point, code };
        let slot = if let Some(slot) = self.free_list.pop() {
            self.entries[slot] = Some(entry);
            slot
        } else {
            self.entries.push(Some(entry));
            self.entries.len() - 1
        };
        self.ids.insert(id, slot);
        self.link(slot, code);
        trace!(?id, x = point.x, y = point.y, "indexed point");
        Ok(())
    }

    /// Remove a point, returning its last indexed coordinates.
    pub fn remove(&mut self, id: &K) -> Result<Point, GridError> {
        let slot = self.ids.remove(id).ok_or(GridError::NotFound)?;
        let entry = self.entries[slot]
            .take()
            .expect("geo index invariant violated: id maps to a vacant slot");
        self.unlink(slot, entry.code);
        self.free_list.push(slot);
        trace!(?id, "removed point");
        Ok(entry.point)
    }

    /// Move a point, returning its previous coordinates.
    ///
    /// Either the point ends up at `point` on every level or, on error, stays
    /// where it was.
    pub fn update(&mut self, id: K, point: Point) -> Result<Point, GridError> {
        let code = self.checked_code(point)?;
        let &slot = self.ids.get(&id).ok_or(GridError::NotFound)?;
        let entry = self.entries[slot]
            .as_mut()
            .expect("geo index invariant violated: id maps to a vacant slot");
        let previous = entry.point;
        let old_code = entry.code;
        entry.point = point;
        entry.code = code;
        if old_code != code {
            self.relink(slot, old_code, code);
        }
        trace!(?id, x = point.x, y = point.y, "moved point");
        Ok(previous)
    }

    /// Identifiers of every point inside `rect` (edges included).
    ///
    /// The order is unspecified.
    pub fn range_query(&self, rect: Rect) -> Vec<K> {
        let mut out = Vec::new();
        self.visit_rect(rect, |id, _| out.push(id));
        out
    }

    /// Visit every point inside `rect` (edges included) without allocating result storage.
    pub fn visit_rect<F: FnMut(K, Point)>(&self, rect: Rect, mut f: F) {
        let Some(plan) = self.scanner.plan(rect) else {
            return;
        };
        let mut visited = 0_usize;
        self.visit_plan(&plan, |entry| {
            visited += 1;
            if contains_inclusive(&rect, entry.point) {
                f(entry.id, entry.point);
            }
        });
        trace!(visited, "range scan visited candidates");
    }

    /// Plan the scan of `rect` without running it.
    pub fn plan(&self, rect: Rect) -> Option<ScanPlan> {
        self.scanner.plan(rect)
    }

    fn visit_plan<F: FnMut(&Entry<K>)>(&self, plan: &ScanPlan, mut f: F) {
        let Some(level) = self.levels.get(usize::from(plan.level())) else {
            return;
        };
        for range in plan.ranges() {
            for cell in level.range(range.clone()).map(|(_, c)| c) {
                for &slot in &cell.slots {
                    if let Some(entry) = &self.entries[slot] {
                        f(entry);
                    }
                }
            }
        }
    }

    fn checked_code(&self, point: Point) -> Result<u64, GridError> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return Err(GridError::InvalidCoordinate {
                x: point.x,
                y: point.y,
            });
        }
        let hasher = self.scanner.hasher();
        if !hasher.in_domain(point) {
            return Err(GridError::CoordinateOutOfDomain {
                x: point.x,
                y: point.y,
                min: self.config.min,
                max: self.config.max,
            });
        }
        Ok(hasher.code(point))
    }

    fn link(&mut self, slot: usize, code: u64) {
        let stride = self.levels.len();
        let base = slot * stride;
        if self.positions.len() < base + stride {
            self.positions.resize(base + stride, 0);
        }
        let finest = stride - 1;
        for (level, cells) in self.levels.iter_mut().enumerate() {
            let key = level_code(code, finest - level);
            self.positions[base + level] = attach(cells, key, slot);
        }
    }

    fn unlink(&mut self, slot: usize, code: u64) {
        let stride = self.levels.len();
        let finest = stride - 1;
        for (level, cells) in self.levels.iter_mut().enumerate() {
            let key = level_code(code, finest - level);
            detach(cells, &mut self.positions, stride, level, key, slot);
        }
    }

    // Only levels whose cell changes are touched.
    fn relink(&mut self, slot: usize, old_code: u64, new_code: u64) {
        let stride = self.levels.len();
        let finest = stride - 1;
        let base = slot * stride;
        for (level, cells) in self.levels.iter_mut().enumerate() {
            let old_key = level_code(old_code, finest - level);
            let new_key = level_code(new_code, finest - level);
            if old_key != new_key {
                detach(cells, &mut self.positions, stride, level, old_key, slot);
                self.positions[base + level] = attach(cells, new_key, slot);
            }
        }
    }
}

impl<K> Default for GeoIndex<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

// Key at the level `depth` steps above the finest.
#[inline]
fn level_code(code: u64, depth: usize) -> u64 {
    u32::try_from(2 * depth)
        .ok()
        .and_then(|shift| code.checked_shr(shift))
        .unwrap_or(0)
}

// Appends `slot` to the cell at `key` and returns its position there.
fn attach(cells: &mut BTreeMap<u64, Cell>, key: u64, slot: usize) -> usize {
    let slots = &mut cells.entry(key).or_default().slots;
    slots.push(slot);
    slots.len() - 1
}

fn detach(
    cells: &mut BTreeMap<u64, Cell>,
    positions: &mut [usize],
    stride: usize,
    level: usize,
    key: u64,
    slot: usize,
) {
    let cell = cells
        .get_mut(&key)
        .expect("geo index invariant violated: missing cell while unlinking slot");
    let pos = positions[slot * stride + level];
    debug_assert_eq!(
        cell.slots.get(pos),
        Some(&slot),
        "geo index invariant violated: slot not at its recorded position"
    );
    cell.slots.swap_remove(pos);
    // The former last slot now sits at `pos`.
    if let Some(&moved) = cell.slots.get(pos) {
        positions[moved * stride + level] = pos;
    }
    if cell.slots.is_empty() {
        cells.remove(&key);
    }
}
