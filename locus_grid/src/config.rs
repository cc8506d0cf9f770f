// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index configuration.

use crate::error::GridError;

/// Configuration of a [`GeoIndex`](crate::GeoIndex).
///
/// The domain is the square `[min, max]` on both axes. It is halved `bits`
/// times per axis, so the finest cells are `(max - min) / 2^bits` wide and
/// every level from `0` (one cell) to `bits` is maintained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Finest resolution, in halvings per axis (`1..=32`).
    pub bits: u8,
    /// Lower domain bound, per axis.
    pub min: f64,
    /// Upper domain bound, per axis (inclusive).
    pub max: f64,
    /// Upper bound on the number of cells a single range scan may cover.
    ///
    /// The scanner steps to coarser levels until a box fits.
    pub max_scan_cells: usize,
}

impl GridConfig {
    /// Default finest resolution.
    pub const DEFAULT_BITS: u8 = 26;
    /// Largest supported resolution; two axes interleave into a `u64`.
    pub const MAX_BITS: u8 = 32;
    /// Default cell budget for one scan.
    pub const DEFAULT_MAX_SCAN_CELLS: usize = 64;

    /// Create the default configuration: `[-180, 180]`, 26 bits, 64 cells per scan.
    pub const fn new() -> Self {
        Self {
            bits: Self::DEFAULT_BITS,
            min: -180.0,
            max: 180.0,
            max_scan_cells: Self::DEFAULT_MAX_SCAN_CELLS,
        }
    }

    /// Set the finest resolution.
    #[must_use]
    pub const fn with_bits(mut self, bits: u8) -> Self {
        self.bits = bits;
        self
    }

    /// Set the domain bounds.
    #[must_use]
    pub const fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the cell budget for one scan.
    #[must_use]
    pub const fn with_max_scan_cells(mut self, max_scan_cells: usize) -> Self {
        self.max_scan_cells = max_scan_cells;
        self
    }

    /// Check that the configuration describes a usable grid.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.bits == 0 || self.bits > Self::MAX_BITS {
            return Err(GridError::InvalidConfig("bits must be in 1..=32"));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GridError::InvalidConfig("domain bounds must be finite"));
        }
        if self.min >= self.max {
            return Err(GridError::InvalidConfig("domain min must be below max"));
        }
        if self.max_scan_cells == 0 {
            return Err(GridError::InvalidConfig("max_scan_cells must be positive"));
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new()
    }
}
