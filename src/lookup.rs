use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::axis::{locate, AxisId, BinCache, Located, Tier};
use crate::cache::ResultCache;
use crate::interp::{interpolate, Corners};

/// Cell types which can be stored in a table.
///
/// Limited to small integers, such that a cell multiplied by a fixed-point
/// weight always fits in an `i32`.
pub trait TableValue: Copy + PartialEq + 'static {
    const ZERO: Self;

    fn widen(self) -> i32;

    /// Narrow an interpolated value back into the cell type. The value is
    /// always within the range spanned by the corners and zero.
    fn narrow(value: i32) -> Self;
}

macro_rules! impl_table_value {
    ($($ty:ty),*) => {
        $(
            impl TableValue for $ty {
                const ZERO: Self = 0;

                #[inline(always)]
                fn widen(self) -> i32 {
                    self.as_()
                }

                #[inline(always)]
                fn narrow(value: i32) -> Self {
                    value.as_()
                }
            }
        )*
    };
}

impl_table_value!(i8, u8, i16);

/// Common interface for anything that maps two inputs to an output.
pub trait Map2D {
    type Output;

    /// Look up the interpolated output for the inputs `x` and `y`.
    fn lookup(&mut self, x: i16, y: i16) -> Self::Output;

    /// Force the next lookup to bypass the result cache.
    fn invalidate(&mut self);
}

/// Counters describing which paths lookups have taken. All counters wrap.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LookupStats {
    pub lookups: u32,
    pub cache_hits: u32,
    pub flat_hits: u32,
    /// Axis searches resolved by the previous bracket
    pub same_bin: u32,
    /// Axis searches resolved by a neighbouring bracket
    pub stepped_bin: u32,
    pub full_scans: u32,
}

impl LookupStats {
    pub const fn new() -> Self {
        LookupStats {
            lookups: 0,
            cache_hits: 0,
            flat_hits: 0,
            same_bin: 0,
            stepped_bin: 0,
            full_scans: 0,
        }
    }

    fn record_tier(&mut self, tier: Tier) {
        let counter = match tier {
            Tier::Same => &mut self.same_bin,
            Tier::Forward | Tier::Backward => &mut self.stepped_bin,
            Tier::Scan => &mut self.full_scans,
        };
        *counter = counter.wrapping_add(1);
    }
}

/// Borrowed view of a table's axes and row-major cells.
///
/// `cells` must hold exactly `x_axis.len() * y_axis.len()` values, and
/// neither axis may be empty. The storage types uphold this on construction.
#[derive(Debug, Copy, Clone)]
pub struct GridRef<'a, T> {
    pub x_axis: &'a [i16],
    pub y_axis: &'a [i16],
    pub cells: &'a [T],
}

impl<T: TableValue> GridRef<'_, T> {
    #[inline]
    fn cell(&self, row: usize, col: usize) -> i32 {
        self.cells[row * self.x_axis.len() + col].widen()
    }

    fn corners(&self, x: &Located, y: &Located) -> Corners {
        let (x, y) = (&x.bracket, &y.bracket);
        Corners {
            a: self.cell(y.low, x.low),
            b: self.cell(y.low, x.high),
            c: self.cell(y.high, x.low),
            d: self.cell(y.high, x.high),
        }
    }
}

/// Mutable lookup state owned by every table: one locator cache per axis,
/// the result cache and the statistics counters.
///
/// None of this is synchronized. A table must only be accessed from one
/// execution context at a time, so calibration writes have to be kept out
/// of the real-time loop (or done with preemption disabled).
#[derive(Debug, Copy, Clone)]
pub struct LookupState<T> {
    x_bin: BinCache,
    y_bin: BinCache,
    result: ResultCache<T>,
    stats: LookupStats,
}

impl<T: TableValue> LookupState<T> {
    pub const fn new() -> Self {
        LookupState {
            x_bin: BinCache::new(),
            y_bin: BinCache::new(),
            result: ResultCache::new(),
            stats: LookupStats::new(),
        }
    }

    /// result cache -> X locator -> Y locator -> flat check -> interpolation -> cache update
    pub fn lookup(&mut self, grid: GridRef<'_, T>, x: i16, y: i16) -> T {
        self.stats.lookups = self.stats.lookups.wrapping_add(1);

        if let Some(output) = self.result.get(x, y) {
            self.stats.cache_hits = self.stats.cache_hits.wrapping_add(1);
            return output;
        }

        let x_loc = locate(grid.x_axis, AxisId::X.orientation(), x, &mut self.x_bin);
        let y_loc = locate(grid.y_axis, AxisId::Y.orientation(), y, &mut self.y_bin);
        self.stats.record_tier(x_loc.tier);
        self.stats.record_tier(y_loc.tier);

        let corners = grid.corners(&x_loc, &y_loc);
        if corners.flat().is_some() {
            self.stats.flat_hits = self.stats.flat_hits.wrapping_add(1);
        }

        let output = T::narrow(interpolate(corners, &x_loc.bracket, &y_loc.bracket));
        self.result.store(x, y, output);
        output
    }

    pub fn invalidate(&mut self) {
        self.result.invalidate();
    }

    /// Invalidate the result cache and move both locators back to bin 0.
    pub fn reset(&mut self) {
        self.result.invalidate();
        self.x_bin.reset();
        self.y_bin.reset();
    }

    pub fn is_cached(&self) -> bool {
        self.result.is_valid()
    }

    pub fn bins(&self) -> ((usize, usize), (usize, usize)) {
        (self.x_bin.indices(), self.y_bin.indices())
    }

    pub fn stats(&self) -> &LookupStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = LookupStats::new();
    }
}

impl<T: TableValue> Default for LookupState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy as many cells from `src` into `dst` as fit, returning the count.
pub(crate) fn write_cells<T: Copy>(dst: &mut [T], src: &[T]) -> usize {
    let count = src.len().min(dst.len());
    dst[..count].copy_from_slice(&src[..count]);
    count
}
