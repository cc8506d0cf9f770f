// Copyright 2025 the Locus Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order cell keys over a bounded square domain.
//!
//! Each axis is split into `2^bits` equal slices. The slice numbers of a point
//! are interleaved bit by bit (x in the higher bit of each pair) into a single
//! Morton code. Dropping the two lowest bits of a code yields the key of the
//! enclosing cell one level up, so keys at coarser levels are prefixes of keys
//! at finer levels and nearby points share long prefixes.

use kurbo::{Point, Rect};

use crate::config::GridConfig;
use crate::error::GridError;

/// A grid cell at a given resolution level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    level: u8,
    code: u64,
}

impl CellKey {
    /// The root cell covering the whole domain.
    pub const ROOT: Self = Self { level: 0, code: 0 };

    /// Create a key from its level and Morton code.
    pub const fn new(level: u8, code: u64) -> Self {
        Self { level, code }
    }

    /// Resolution level (`0` is the whole domain).
    pub const fn level(self) -> u8 {
        self.level
    }

    /// Interleaved cell code at this level.
    pub const fn code(self) -> u64 {
        self.code
    }

    /// The enclosing cell one level up, or `None` for the root.
    pub const fn parent(self) -> Option<Self> {
        if self.level == 0 {
            None
        } else {
            Some(Self {
                level: self.level - 1,
                code: self.code >> 2,
            })
        }
    }

    /// Whether `self` encloses `other` (or is equal to it).
    pub fn contains(self, other: Self) -> bool {
        if other.level < self.level {
            return false;
        }
        let shift = 2 * u32::from(other.level - self.level);
        other.code.checked_shr(shift).unwrap_or(0) == self.code
    }
}

/// Maps coordinates to cells for one domain and resolution.
#[derive(Copy, Clone, Debug)]
pub struct GeoHasher {
    bits: u8,
    min: f64,
    max: f64,
    // Finest cells per domain unit.
    scale: f64,
    max_cell: u32,
}

impl GeoHasher {
    /// Create a hasher for `config`.
    ///
    /// Fails with [`GridError::InvalidConfig`] if the configuration does not
    /// pass [`GridConfig::validate`].
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        let cells = (1_u64 << config.bits) as f64;
        Ok(Self {
            bits: config.bits,
            min: config.min,
            max: config.max,
            scale: cells / (config.max - config.min),
            max_cell: u32::MAX >> (32 - u32::from(config.bits)),
        })
    }

    /// Finest resolution level.
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// The domain as a rectangle.
    pub fn domain(&self) -> Rect {
        Rect::new(self.min, self.min, self.max, self.max)
    }

    /// Whether `pt` lies inside the closed domain.
    pub fn in_domain(&self, pt: Point) -> bool {
        self.min <= pt.x && pt.x <= self.max && self.min <= pt.y && pt.y <= self.max
    }

    /// Finest-level slice number of a coordinate along one axis.
    ///
    /// Values below the domain map to slice `0` and values at or above `max`
    /// map to the last slice. The mapping is monotonic in `value`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The product is clamped to `max_cell`, which fits in u32."
    )]
    #[inline]
    pub fn cell_coord(&self, value: f64) -> u32 {
        let t = (value - self.min) * self.scale;
        if t.is_nan() || t <= 0.0 {
            return 0;
        }
        // Float-to-int casts saturate.
        let c = t as u64;
        if c >= u64::from(self.max_cell) {
            self.max_cell
        } else {
            c as u32
        }
    }

    /// Finest-level Morton code of a point.
    #[inline]
    pub fn code(&self, pt: Point) -> u64 {
        interleave(self.cell_coord(pt.x), self.cell_coord(pt.y))
    }

    /// Key of the cell containing `pt` at `level`.
    pub fn key(&self, pt: Point, level: u8) -> CellKey {
        debug_assert!(level <= self.bits, "level above the finest resolution");
        let shift = 2 * u32::from(self.bits - level);
        CellKey::new(level, self.code(pt).checked_shr(shift).unwrap_or(0))
    }

    /// The region covered by a cell.
    pub fn cell_bounds(&self, key: CellKey) -> Rect {
        let (ix, iy) = deinterleave(key.code);
        let size = (self.max - self.min) / (1_u64 << key.level) as f64;
        let x0 = self.min + f64::from(ix) * size;
        let y0 = self.min + f64::from(iy) * size;
        Rect::new(x0, y0, x0 + size, y0 + size)
    }
}

/// Interleave two 32-bit slice numbers into a Morton code, x first.
#[inline]
pub fn interleave(ix: u32, iy: u32) -> u64 {
    (spread(ix) << 1) | spread(iy)
}

/// Split a Morton code back into its x and y slice numbers.
#[inline]
pub fn deinterleave(code: u64) -> (u32, u32) {
    (compact(code >> 1), compact(code))
}

fn spread(v: u32) -> u64 {
    let mut x = u64::from(v);
    x = (x | (x << 16)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x << 8)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    x = (x | (x << 1)) & 0x5555_5555_5555_5555;
    x
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Only the low 32 bits are populated after compaction."
)]
fn compact(code: u64) -> u32 {
    let mut x = code & 0x5555_5555_5555_5555;
    x = (x | (x >> 1)) & 0x3333_3333_3333_3333;
    x = (x | (x >> 2)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x >> 4)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x >> 8)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x >> 16)) & 0x0000_0000_FFFF_FFFF;
    x as u32
}
