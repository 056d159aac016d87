use static_assertions::const_assert_eq;

/// Number of fractional bits used by the interpolation math
pub const SHIFT_FACTOR: u32 = 8;

/// Fixed-point representation of 1.0
pub const SHIFT_POWER: i32 = 1 << SHIFT_FACTOR;

const_assert_eq!(SHIFT_POWER, 256);

/// Side length of the large maps (fuel, ignition, AFR target)
pub const TABLE_SIZE_16: usize = 16;

/// Side length of the medium-large maps
pub const TABLE_SIZE_12: usize = 12;

/// Side length of the medium maps (staging, boost, VVT, WMI)
pub const TABLE_SIZE_8: usize = 8;

/// Side length of the trim maps
pub const TABLE_SIZE_6: usize = 6;

/// Side length of the smallest maps
pub const TABLE_SIZE_4: usize = 4;

/// Number of axis entries a `width` x `height` table occupies in an arena.
pub const fn axis_footprint(width: usize, height: usize) -> usize {
    width + height
}

/// Number of cells a `width` x `height` table occupies in an arena.
pub const fn cell_footprint(width: usize, height: usize) -> usize {
    width * height
}
