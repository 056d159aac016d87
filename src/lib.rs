#![no_std]

//! Interpolating 3D lookup tables for engine calibration maps.
//!
//! A table maps two inputs (typically RPM along X and load along Y) to an
//! output, using fixed-point bilinear interpolation over a small grid of
//! calibration cells. Lookups are bounded in time and never fail, which
//! makes them suitable for use inside a hard real-time control loop.

#[cfg(all(feature = "log", feature = "defmt"))]
compile_error!("The `log` and `defmt` features are mutually exclusive");

// Export the logging macros for either defmt or log
#[macro_use]
mod logging;

pub mod arena;
pub mod axis;
pub mod cache;
pub mod consts;
pub mod errors;
pub mod interp;
pub mod lookup;
pub mod table;
pub mod view;

pub use arena::{Arena, TableArena};
pub use axis::AxisId;
pub use errors::TableError;
pub use lookup::{LookupStats, Map2D, TableValue};
pub use table::{Table12, Table16, Table3D, Table4, Table6, Table8};
pub use view::TableView;
