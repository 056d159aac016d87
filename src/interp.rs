use crate::axis::{Bracket, Orientation};
use crate::consts::{SHIFT_FACTOR, SHIFT_POWER};

/// The four cells surrounding a lookup point.
///
/// ```text
/// (y_low, x_low)  a    b  (y_low, x_high)
/// (y_high, x_low) c    d  (y_high, x_high)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Corners {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
}

impl Corners {
    /// Returns the common value if all four corners are equal.
    #[inline]
    pub const fn flat(&self) -> Option<i32> {
        if self.a == self.b && self.a == self.c && self.a == self.d {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Fractional position of the bracket's clamped input, measured from the
/// `low` index towards the `high` index.
///
/// Degenerate brackets return 0, putting all weight on the `low` index.
pub fn fraction(bracket: &Bracket, orientation: Orientation) -> i32 {
    let low = bracket.low_value as i32;
    let high = bracket.high_value as i32;
    let position = bracket.position as i32;

    if bracket.is_degenerate() || low == high {
        return 0;
    }

    match orientation {
        Orientation::Ascending => ((position - low) << SHIFT_FACTOR) / (high - low),
        // Offset is taken from the smaller axis value, then complemented
        Orientation::Descending => SHIFT_POWER - (((position - high) << SHIFT_FACTOR) / (low - high)),
    }
}

/// Blend the corners using fractions `p` (along X) and `q` (along Y), both
/// scaled by [`SHIFT_POWER`]. Shifts of negative values round towards
/// negative infinity.
pub const fn blend(corners: Corners, p: i32, q: i32) -> i32 {
    let Corners { a, b, c, d } = corners;

    let m = ((SHIFT_POWER - p) * (SHIFT_POWER - q)) >> SHIFT_FACTOR;
    let n = (p * (SHIFT_POWER - q)) >> SHIFT_FACTOR;
    let o = ((SHIFT_POWER - p) * q) >> SHIFT_FACTOR;
    let r = (p * q) >> SHIFT_FACTOR;

    (a * m + b * n + c * o + d * r) >> SHIFT_FACTOR
}

/// Interpolate between the corners at the positions given by the two brackets.
///
/// Flat regions (trim maps are commonly all zero) return the corner value
/// directly, without evaluating any fractions.
pub fn interpolate(corners: Corners, x: &Bracket, y: &Bracket) -> i32 {
    if let Some(value) = corners.flat() {
        return value;
    }

    let p = fraction(x, Orientation::Ascending);
    let q = fraction(y, Orientation::Descending);
    blend(corners, p, q)
}
