// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive translation of query boxes into cell key ranges.
//!
//! A box is first clipped to the domain. Its corner slices at the finest level
//! bound every point it can contain (the slice mapping is monotonic), and the
//! same bound holds at every coarser level by shifting. The scanner starts at
//! the finest level and steps up one level at a time until the covered cell
//! count fits the budget. Level `0` is a single cell, so planning always
//! terminates, including for boxes far larger than the indexed data.

use alloc::vec::Vec;
use core::ops::RangeInclusive;

use kurbo::Rect;
use locus_geometry::overlaps_inclusive;
use tracing::debug;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::hash::{GeoHasher, interleave};

/// Cells to visit for one query box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanPlan {
    level: u8,
    cells: usize,
    ranges: Vec<RangeInclusive<u64>>,
}

impl ScanPlan {
    /// Level whose cells are scanned.
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Number of cells covered by the plan (occupied or not).
    pub const fn cell_count(&self) -> usize {
        self.cells
    }

    /// Sorted, disjoint, non-adjacent inclusive code ranges at [`level`](Self::level).
    pub fn ranges(&self) -> &[RangeInclusive<u64>] {
        &self.ranges
    }
}

/// Plans range scans for one grid configuration.
#[derive(Copy, Clone, Debug)]
pub struct RangeScanner {
    hasher: GeoHasher,
    max_cells: usize,
}

impl RangeScanner {
    /// Create a scanner for `config`.
    ///
    /// Fails with [`GridError::InvalidConfig`] if the configuration does not
    /// pass [`GridConfig::validate`].
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        Ok(Self {
            hasher: GeoHasher::new(config)?,
            max_cells: config.max_scan_cells,
        })
    }

    /// The hasher used to map coordinates to cells.
    pub const fn hasher(&self) -> &GeoHasher {
        &self.hasher
    }

    /// Plan the scan of `rect`.
    ///
    /// Returns `None` when the box has a non-finite corner or does not meet the
    /// domain, in which case no indexed point can match.
    pub fn plan(&self, rect: Rect) -> Option<ScanPlan> {
        let finite = [rect.x0, rect.y0, rect.x1, rect.y1]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return None;
        }
        let domain = self.hasher.domain();
        if !overlaps_inclusive(&rect, &domain) {
            return None;
        }
        let clipped = rect.abs().intersect(domain);
        let h = &self.hasher;
        let (x0, x1) = (h.cell_coord(clipped.x0), h.cell_coord(clipped.x1));
        let (y0, y1) = (h.cell_coord(clipped.y0), h.cell_coord(clipped.y1));

        let mut level = h.bits();
        let mut shift = 0_u32;
        let (nx, ny) = loop {
            let nx = span(x0, x1, shift);
            let ny = span(y0, y1, shift);
            if nx.saturating_mul(ny) <= self.max_cells as u64 || level == 0 {
                break (nx, ny);
            }
            level -= 1;
            shift += 1;
        };

        let (ix0, iy0) = (shr(x0, shift), shr(y0, shift));
        let mut codes: Vec<u64> = Vec::new();
        for ix in ix0..=shr(x1, shift) {
            for iy in iy0..=shr(y1, shift) {
                codes.push(interleave(ix, iy));
            }
        }
        codes.sort_unstable();

        let mut ranges: Vec<RangeInclusive<u64>> = Vec::new();
        for code in codes.iter().copied() {
            match ranges.last_mut() {
                Some(last) if last.end().checked_add(1) == Some(code) => {
                    *last = *last.start()..=code;
                }
                _ => ranges.push(code..=code),
            }
        }

        debug!(
            scan_level = level,
            cells = codes.len(),
            ranges = ranges.len(),
            "planned range scan"
        );
        debug_assert_eq!(codes.len() as u64, nx * ny, "cell count mismatch");
        Some(ScanPlan {
            level,
            cells: codes.len(),
            ranges,
        })
    }
}

#[inline]
fn shr(v: u32, shift: u32) -> u32 {
    v.checked_shr(shift).unwrap_or(0)
}

// Number of slices between `lo` and `hi` (inclusive) after coarsening.
#[inline]
fn span(lo: u32, hi: u32, shift: u32) -> u64 {
    u64::from(shr(hi, shift) - shr(lo, shift)) + 1
}
