use crate::axis::{write_axis, AxisId};
use crate::consts::{TABLE_SIZE_12, TABLE_SIZE_16, TABLE_SIZE_4, TABLE_SIZE_6, TABLE_SIZE_8};
use crate::errors::TableError;
use crate::lookup::{write_cells, GridRef, LookupState, LookupStats, Map2D, TableValue};

/// Calibration map with fixed dimensions, interpolated over two inputs.
///
/// The X axis must be strictly increasing and the Y axis strictly
/// decreasing, such that row 0 is the highest load. Cells are indexed as
/// `[row][col]`, i.e. `[y][x]`.
///
/// Tables are meant to be placed in static memory. They own all their
/// storage and never allocate.
#[derive(Debug, Clone)]
pub struct Table3D<T, const X: usize, const Y: usize> {
    values: [[T; X]; Y],
    x_axis: [i16; X],
    y_axis: [i16; Y],
    state: LookupState<T>,
}

pub type Table16<T = i8> = Table3D<T, TABLE_SIZE_16, TABLE_SIZE_16>;
pub type Table12<T = i8> = Table3D<T, TABLE_SIZE_12, TABLE_SIZE_12>;
pub type Table8<T = i8> = Table3D<T, TABLE_SIZE_8, TABLE_SIZE_8>;
pub type Table6<T = i8> = Table3D<T, TABLE_SIZE_6, TABLE_SIZE_6>;
pub type Table4<T = i8> = Table3D<T, TABLE_SIZE_4, TABLE_SIZE_4>;

impl<T: TableValue, const X: usize, const Y: usize> Table3D<T, X, Y> {
    const NON_EMPTY: () = assert!(X >= 1 && Y >= 1, "A table needs at least one row and one column");

    /// Create a table with all axes and cells set to zero.
    pub const fn new() -> Self {
        let () = Self::NON_EMPTY;
        Table3D {
            values: [[T::ZERO; X]; Y],
            x_axis: [0; X],
            y_axis: [0; Y],
            state: LookupState::new(),
        }
    }

    /// Create a table and populate it in one go.
    pub fn from_parts(x_axis: &[i16], y_axis: &[i16], values: &[T]) -> Result<Self, TableError> {
        let mut table = Self::new();
        table.set_x_axis(x_axis)?;
        table.set_y_axis(y_axis)?;
        table.set_values(values);
        Ok(table)
    }

    /// Replace the X axis. At most `X` values are copied, extra values are
    /// ignored and missing ones keep their previous value. The resulting
    /// axis, including the kept tail, must be strictly increasing, otherwise
    /// nothing is copied. A partial write to a fresh table, whose tail is
    /// all zeros, is therefore rejected.
    pub fn set_x_axis(&mut self, values: &[i16]) -> Result<usize, TableError> {
        let count = write_axis(&mut self.x_axis, values, AxisId::X)?;
        self.state.invalidate();
        Ok(count)
    }

    /// Replace the Y axis, like [`Table3D::set_x_axis`]. The resulting axis
    /// must be strictly decreasing.
    pub fn set_y_axis(&mut self, values: &[i16]) -> Result<usize, TableError> {
        let count = write_axis(&mut self.y_axis, values, AxisId::Y)?;
        self.state.invalidate();
        Ok(count)
    }

    /// Replace the cells from row-major `values`, copying at most `X * Y`.
    pub fn set_values(&mut self, values: &[T]) -> usize {
        let count = write_cells(self.values.as_flattened_mut(), values);
        self.state.invalidate();
        count
    }

    /// Replace whole rows, copying at most `Y` of them.
    pub fn set_rows(&mut self, rows: &[[T; X]]) -> usize {
        let count = rows.len().min(Y);
        self.values[..count].copy_from_slice(&rows[..count]);
        self.state.invalidate();
        count
    }

    /// Update a single cell.
    pub fn set_value(&mut self, row: usize, col: usize, value: T) -> Result<(), TableError> {
        let cell = self
            .values
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(TableError::CellOutOfRange { row, col })?;

        *cell = value;
        self.state.invalidate();
        Ok(())
    }

    /// Interpolated output for the inputs `x` and `y`.
    ///
    /// Inputs outside the axes are clamped to the nearest edge. Never fails,
    /// and runs in at most one scan of each axis.
    pub fn lookup(&mut self, x: i16, y: i16) -> T {
        let grid = GridRef {
            x_axis: &self.x_axis,
            y_axis: &self.y_axis,
            cells: self.values.as_flattened(),
        };
        self.state.lookup(grid, x, y)
    }

    pub fn invalidate(&mut self) {
        self.state.invalidate();
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn is_cached(&self) -> bool {
        self.state.is_cached()
    }

    pub fn stats(&self) -> &LookupStats {
        self.state.stats()
    }

    pub fn reset_stats(&mut self) {
        self.state.reset_stats();
    }

    pub fn value(&self, row: usize, col: usize) -> Option<T> {
        self.values.get(row)?.get(col).copied()
    }

    pub fn values(&self) -> &[[T; X]; Y] {
        &self.values
    }

    pub fn x_axis(&self) -> &[i16; X] {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &[i16; Y] {
        &self.y_axis
    }

    pub const fn width(&self) -> usize {
        X
    }

    pub const fn height(&self) -> usize {
        Y
    }
}

impl<T: TableValue, const X: usize, const Y: usize> Default for Table3D<T, X, Y> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableValue, const X: usize, const Y: usize> Map2D for Table3D<T, X, Y> {
    type Output = T;

    fn lookup(&mut self, x: i16, y: i16) -> T {
        Table3D::lookup(self, x, y)
    }

    fn invalidate(&mut self) {
        Table3D::invalidate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_table() -> Table3D<i8, 2, 2> {
        Table3D::from_parts(&[1000, 5000], &[100, 0], &[50, 60, 10, 20]).unwrap()
    }

    fn rpm_table() -> Table3D<i8, 4, 3> {
        Table3D::from_parts(
            &[1000, 2000, 4000, 6000],
            &[90, 60, 30],
            &[
                10, 20, 40, 80, //
                5, 10, 20, 40, //
                0, 0, 0, 0, //
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_midpoint_blend() {
        let mut table = simple_table();
        assert_eq!(table.lookup(3000, 50), 35);
    }

    #[test]
    fn test_exact_corner() {
        let mut table = simple_table();
        assert_eq!(table.lookup(1000, 100), 50);
        assert_eq!(table.lookup(5000, 100), 60);
        assert_eq!(table.lookup(1000, 0), 10);
        assert_eq!(table.lookup(5000, 0), 20);
    }

    #[test]
    fn test_clamping() {
        let mut table = simple_table();
        let edge = table.lookup(5000, 100);
        assert_eq!(table.lookup(9999, 100), edge);
        assert_eq!(table.lookup(i16::MAX, 100), edge);

        let low_x = table.lookup(1000, 50);
        assert_eq!(table.lookup(-1000, 50), low_x);

        let high_y = table.lookup(3000, 100);
        assert_eq!(table.lookup(3000, 250), high_y);

        let low_y = table.lookup(3000, 0);
        assert_eq!(low_y, 15);
        assert_eq!(table.lookup(3000, -50), low_y);
    }

    #[test]
    fn test_exact_x_degenerates_to_column() {
        let mut table = simple_table();
        // Only column 1 takes part: halfway between 60 and 20
        assert_eq!(table.lookup(5000, 50), 40);
        // 75% of the way towards the top row
        assert_eq!(table.lookup(5000, 75), 50);
        assert_eq!(table.lookup(1000, 75), 40);
    }

    #[test]
    fn test_quarter_positions() {
        let mut table = simple_table();
        assert_eq!(table.lookup(3000, 75), 45);
        assert_eq!(table.lookup(3000, 100), 55);
    }

    #[test]
    fn test_repeated_query_is_cached() {
        let mut table = rpm_table();
        let first = table.lookup(2500, 75);
        let scans = table.stats().full_scans;

        let second = table.lookup(2500, 75);
        assert_eq!(first, second);
        assert_eq!(table.stats().cache_hits, 1);
        assert_eq!(table.stats().full_scans, scans);
        assert!(table.is_cached());
    }

    #[test]
    fn test_set_values_invalidates() {
        let mut table = simple_table();
        assert_eq!(table.lookup(3000, 50), 35);
        assert!(table.is_cached());

        table.set_values(&[90, 90, 90, 90]);
        assert!(!table.is_cached());
        assert_eq!(table.lookup(3000, 50), 90);
    }

    #[test]
    fn test_partial_updates_invalidate() {
        let mut table = simple_table();
        assert_eq!(table.lookup(1000, 100), 50);

        table.set_value(0, 0, 42).unwrap();
        assert_eq!(table.lookup(1000, 100), 42);

        table.set_rows(&[[-10, -10]]);
        assert_eq!(table.lookup(1000, 100), -10);

        table.set_x_axis(&[0, 5000]).unwrap();
        assert!(!table.is_cached());
        table.set_y_axis(&[200]).unwrap();
        assert!(!table.is_cached());
        assert_eq!(table.y_axis(), &[200, 0]);
    }

    #[test]
    fn test_set_value_out_of_range() {
        let mut table = simple_table();
        table.lookup(3000, 50);
        assert_eq!(
            table.set_value(2, 0, 1),
            Err(TableError::CellOutOfRange { row: 2, col: 0 })
        );
        assert!(table.is_cached());
        assert_eq!(table.value(2, 0), None);
        assert_eq!(table.value(1, 1), Some(20));
    }

    #[test]
    fn test_truncating_setters() {
        let mut table = Table3D::<i8, 2, 2>::new();
        assert_eq!(table.set_x_axis(&[10, 20, 30, 40]), Ok(2));
        assert_eq!(table.x_axis(), &[10, 20]);
        assert_eq!(table.set_values(&[1, 2, 3, 4, 5, 6]), 4);
        assert_eq!(table.values(), &[[1, 2], [3, 4]]);
        assert_eq!(table.set_values(&[7]), 1);
        assert_eq!(table.values(), &[[7, 2], [3, 4]]);
    }

    #[test]
    fn test_partial_axis_needs_valid_tail() {
        let mut table = Table3D::<i8, 4, 3>::new();
        assert_eq!(
            table.set_x_axis(&[1000, 2000]),
            Err(TableError::NonMonotonicAxis { axis: crate::AxisId::X, index: 2 })
        );
        assert_eq!(table.x_axis(), &[0; 4]);

        table.set_x_axis(&[1000, 2000, 3000, 4000]).unwrap();
        assert_eq!(table.set_x_axis(&[500, 1500]), Ok(2));
        assert_eq!(table.x_axis(), &[500, 1500, 3000, 4000]);

        // The Y tail of zeros is only valid below positive values
        assert_eq!(table.set_y_axis(&[100, 50]), Ok(2));
        assert_eq!(table.y_axis(), &[100, 50, 0]);
    }

    #[test]
    fn test_rejects_non_monotonic_axes() {
        let mut table = simple_table();
        table.lookup(3000, 50);

        let err = table.set_x_axis(&[5000, 1000]);
        assert_eq!(err, Err(TableError::NonMonotonicAxis { axis: crate::AxisId::X, index: 1 }));
        assert_eq!(table.x_axis(), &[1000, 5000]);

        let err = table.set_y_axis(&[0, 100]);
        assert_eq!(err, Err(TableError::NonMonotonicAxis { axis: crate::AxisId::Y, index: 1 }));
        assert_eq!(table.y_axis(), &[100, 0]);

        // Nothing changed, so the cached result is still good
        assert!(table.is_cached());

        let result = Table3D::<i8, 2, 2>::from_parts(&[1, 1], &[2, 1], &[0; 4]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flat_region_returns_exact_value() {
        let mut table = Table3D::<i8, 3, 3>::from_parts(&[0, 100, 200], &[200, 100, 0], &[-7; 9]).unwrap();

        for x in (-50..250).step_by(13) {
            for y in (-50..250).step_by(17) {
                assert_eq!(table.lookup(x, y), -7);
            }
        }
        assert!(table.stats().flat_hits > 0);
    }

    #[test]
    fn test_monotonic_along_row() {
        let mut table = rpm_table();
        for y in [90, 60, 30] {
            let mut prev = i8::MIN;
            for x in (0..7000).step_by(7) {
                let value = table.lookup(x, y);
                assert!(value >= prev, "x = {x}, y = {y}: {value} < {prev}");
                prev = value;
            }
        }
    }

    #[test]
    fn test_sweeps_agree_with_cold_table() {
        let mut warm = rpm_table();
        for x in (500..6500).step_by(50).chain((500..6500).step_by(450).rev()) {
            for y in (20..100).step_by(3) {
                let mut cold = rpm_table();
                assert_eq!(warm.lookup(x, y), cold.lookup(x, y), "x = {x}, y = {y}");
            }
        }
        assert!(warm.stats().same_bin > 0);
        assert!(warm.stats().stepped_bin > 0);
    }

    #[test]
    fn test_unpopulated_table_is_total() {
        let mut table = Table16::<i8>::new();
        assert_eq!(table.lookup(1234, -1234), 0);
        assert_eq!(table.lookup(i16::MIN, i16::MAX), 0);
    }

    #[test]
    fn test_single_cell_table() {
        let mut table = Table3D::<u8, 1, 1>::from_parts(&[500], &[50], &[200]).unwrap();
        assert_eq!(table.lookup(0, 0), 200);
        assert_eq!(table.lookup(9000, 90), 200);
        assert_eq!(table.width(), 1);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_map2d_dyn() {
        let mut table = simple_table();
        let map: &mut dyn Map2D<Output = i8> = &mut table;
        assert_eq!(map.lookup(3000, 50), 35);
        map.invalidate();
        assert!(!table.is_cached());
    }
}
