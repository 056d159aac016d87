use crate::axis::{write_axis, AxisId};
use crate::errors::TableError;
use crate::lookup::{write_cells, GridRef, LookupState, LookupStats, Map2D, TableValue};

/// Calibration map over storage owned by someone else.
///
/// Behaves exactly like [`crate::Table3D`], but the dimensions are chosen at
/// run time and the axes and cells live in caller-provided buffers, e.g. a
/// shared [`crate::TableArena`] or memory handed over through FFI. Cells are
/// stored row-major, `cells[row * width + col]`.
#[derive(Debug)]
pub struct TableView<'a, T> {
    x_axis: &'a mut [i16],
    y_axis: &'a mut [i16],
    cells: &'a mut [T],
    state: LookupState<T>,
}

impl<'a, T: TableValue> TableView<'a, T> {
    /// Wrap the given buffers as a `width` x `height` table. Buffers longer
    /// than needed are cut to size, the contents are used as is.
    pub fn new(
        width: usize,
        height: usize,
        x_axis: &'a mut [i16],
        y_axis: &'a mut [i16],
        cells: &'a mut [T],
    ) -> Result<Self, TableError> {
        let area = match width.checked_mul(height) {
            Some(area) if width > 0 && height > 0 => area,
            _ => return Err(TableError::InvalidDimensions { width, height }),
        };

        for (required, provided) in [(width, x_axis.len()), (height, y_axis.len()), (area, cells.len())] {
            if provided < required {
                return Err(TableError::StorageTooSmall { required, provided });
            }
        }

        Ok(TableView {
            x_axis: &mut x_axis[..width],
            y_axis: &mut y_axis[..height],
            cells: &mut cells[..area],
            state: LookupState::new(),
        })
    }

    /// Replace the X axis, see [`crate::Table3D::set_x_axis`].
    pub fn set_x_axis(&mut self, values: &[i16]) -> Result<usize, TableError> {
        let count = write_axis(self.x_axis, values, AxisId::X)?;
        self.state.invalidate();
        Ok(count)
    }

    /// Replace the Y axis, see [`crate::Table3D::set_y_axis`].
    pub fn set_y_axis(&mut self, values: &[i16]) -> Result<usize, TableError> {
        let count = write_axis(self.y_axis, values, AxisId::Y)?;
        self.state.invalidate();
        Ok(count)
    }

    pub fn set_values(&mut self, values: &[T]) -> usize {
        let count = write_cells(self.cells, values);
        self.state.invalidate();
        count
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: T) -> Result<(), TableError> {
        let index = self.index(row, col).ok_or(TableError::CellOutOfRange { row, col })?;
        self.cells[index] = value;
        self.state.invalidate();
        Ok(())
    }

    pub fn lookup(&mut self, x: i16, y: i16) -> T {
        let grid = GridRef {
            x_axis: &*self.x_axis,
            y_axis: &*self.y_axis,
            cells: &*self.cells,
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
        self.index(row, col).map(|index| self.cells[index])
    }

    /// Row-major offset of a cell, checked against both dimensions
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height() && col < self.width()).then(|| row * self.width() + col)
    }

    pub fn x_axis(&self) -> &[i16] {
        &*self.x_axis
    }

    pub fn y_axis(&self) -> &[i16] {
        &*self.y_axis
    }

    pub fn cells(&self) -> &[T] {
        &*self.cells
    }

    pub fn width(&self) -> usize {
        self.x_axis.len()
    }

    pub fn height(&self) -> usize {
        self.y_axis.len()
    }
}

impl<T: TableValue> Map2D for TableView<'_, T> {
    type Output = T;

    fn lookup(&mut self, x: i16, y: i16) -> T {
        TableView::lookup(self, x, y)
    }

    fn invalidate(&mut self) {
        TableView::invalidate(self)
    }
}
