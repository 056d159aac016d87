use core::mem;

use crate::consts::{axis_footprint, cell_footprint};
use crate::errors::TableError;
use crate::lookup::TableValue;
use crate::view::TableView;

/// Bump allocator over a borrowed buffer of `T`.
#[derive(Debug)]
pub struct Arena<'a, T> {
    free: &'a mut [T],
}

impl<'a, T> Arena<'a, T> {
    pub fn new(buffer: &'a mut [T]) -> Self {
        Arena { free: buffer }
    }

    /// Number of elements still available
    pub fn remaining(&self) -> usize {
        self.free.len()
    }

    /// Take the next `len` elements, or `None` if there are not enough left.
    pub fn alloc(&mut self, len: usize) -> Option<&'a mut [T]> {
        if len > self.free.len() {
            return None;
        }

        let (head, tail) = mem::take(&mut self.free).split_at_mut(len);
        self.free = tail;
        Some(head)
    }
}

/// Shared backing storage for a set of [`TableView`]s.
///
/// Memory is handed out front to back and never freed, so all tables should
/// be carved out at start-up.
#[derive(Debug)]
pub struct TableArena<'a, T> {
    axes: Arena<'a, i16>,
    cells: Arena<'a, T>,
}

impl<'a, T: TableValue> TableArena<'a, T> {
    /// Use `axes` for the axis values and `cells` for the table contents. See
    /// [`axis_footprint`] and [`cell_footprint`] for sizing them.
    pub fn new(axes: &'a mut [i16], cells: &'a mut [T]) -> Self {
        TableArena {
            axes: Arena::new(axes),
            cells: Arena::new(cells),
        }
    }

    /// Returns the remaining `(axis, cell)` capacity
    pub fn remaining(&self) -> (usize, usize) {
        (self.axes.remaining(), self.cells.remaining())
    }

    /// Carve out a zeroed `width` x `height` table.
    ///
    /// Returns `None` if the arena cannot fit it, in which case nothing is
    /// consumed. Also returns `None` for an empty table.
    pub fn create(&mut self, width: usize, height: usize) -> Option<TableView<'a, T>> {
        self.try_create(width, height).ok()
    }

    /// Carve out a zeroed `width` x `height` table, see [`TableArena::create`].
    pub fn try_create(&mut self, width: usize, height: usize) -> Result<TableView<'a, T>, TableError> {
        if width == 0 || height == 0 {
            return Err(TableError::InvalidDimensions { width, height });
        }

        let (Some(n_axes), Some(n_cells)) = (width.checked_add(height), width.checked_mul(height)) else {
            return Err(TableError::InvalidDimensions { width, height });
        };
        debug_assert_eq!(n_axes, axis_footprint(width, height));
        debug_assert_eq!(n_cells, cell_footprint(width, height));

        let exhausted = if n_axes > self.axes.remaining() {
            Some(TableError::ArenaExhausted {
                requested: n_axes,
                remaining: self.axes.remaining(),
            })
        } else if n_cells > self.cells.remaining() {
            Some(TableError::ArenaExhausted {
                requested: n_cells,
                remaining: self.cells.remaining(),
            })
        } else {
            None
        };

        if let Some(error) = exhausted {
            error!("Unable to allocate {}x{} table: {}", width, height, error);
            return Err(error);
        }

        let (Some(x_axis), Some(y_axis), Some(cells)) = (
            self.axes.alloc(width),
            self.axes.alloc(height),
            self.cells.alloc(n_cells),
        ) else {
            return Err(TableError::ArenaExhausted {
                requested: n_cells,
                remaining: self.cells.remaining(),
            });
        };

        x_axis.fill(0);
        y_axis.fill(0);
        cells.fill(T::ZERO);

        debug!(
            "Allocated {}x{} table, {} axis and {} cell entries left",
            width,
            height,
            self.axes.remaining(),
            self.cells.remaining()
        );

        TableView::new(width, height, x_axis, y_axis, cells)
    }
}
