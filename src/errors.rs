use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::axis::AxisId;

#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    #[error("The {axis} axis is not strictly monotonic at index {index}.")]
    NonMonotonicAxis { axis: AxisId, index: usize },
    #[error("A table of {width}x{height} cells cannot be constructed.")]
    InvalidDimensions { width: usize, height: usize },
    #[error("The provided storage holds {provided} elements, but {required} are required.")]
    StorageTooSmall { required: usize, provided: usize },
    #[error("The table arena is exhausted, {requested} elements requested with {remaining} remaining.")]
    ArenaExhausted { requested: usize, remaining: usize },
    #[error("The cell at row {row}, column {col} is outside of the table.")]
    CellOutOfRange { row: usize, col: usize },
}
