use core::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TableError;

/// Identifies one of the two table axes.
///
/// The X axis is stored in increasing order. The Y axis is stored in
/// decreasing order, such that row 0 holds the highest load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisId {
    X,
    Y,
}

impl AxisId {
    pub const fn orientation(self) -> Orientation {
        match self {
            AxisId::X => Orientation::Ascending,
            AxisId::Y => Orientation::Descending,
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisId::X => f.write_str("X"),
            AxisId::Y => f.write_str("Y"),
        }
    }
}

/// Direction in which the values of an axis move as the index increases.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Ascending,
    Descending,
}

impl Orientation {
    /// Returns `true` if `a` comes strictly before `b` along this orientation.
    #[inline(always)]
    pub const fn precedes(self, a: i16, b: i16) -> bool {
        match self {
            Orientation::Ascending => a < b,
            Orientation::Descending => a > b,
        }
    }
}

/// A pair of axis indices enclosing the (clamped) input position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bracket {
    pub low: usize,
    pub high: usize,
    pub low_value: i16,
    pub high_value: i16,
    /// Input value after clamping to the axis range
    pub position: i16,
}

impl Bracket {
    const fn degenerate(index: usize, value: i16, position: i16) -> Self {
        Bracket {
            low: index,
            high: index,
            low_value: value,
            high_value: value,
            position,
        }
    }

    /// Returns `true` if both ends of the bracket sit on the same axis entry.
    pub const fn is_degenerate(&self) -> bool {
        self.low == self.high
    }
}

/// Which search tier resolved a bracket.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tier {
    /// Still inside the bracket found last time
    Same,
    /// Moved one bracket towards higher indices
    Forward,
    /// Moved one bracket towards lower indices
    Backward,
    /// Fell back to scanning the entire axis
    Scan,
}

/// Result of a single [`locate`] call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Located {
    pub bracket: Bracket,
    pub tier: Tier,
}

/// The last bracket found on one axis.
///
/// Starts out at bin 0 without having located anything, so the first
/// search after creation (or a reset) is always a full scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BinCache {
    low: usize,
    high: usize,
    primed: bool,
}

impl BinCache {
    pub const fn new() -> Self {
        BinCache {
            low: 0,
            high: 0,
            primed: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the cached `(low, high)` index pair
    pub const fn indices(&self) -> (usize, usize) {
        (self.low, self.high)
    }

    /// Returns `true` once a bracket has been stored
    pub const fn is_primed(&self) -> bool {
        self.primed
    }

    fn store(&mut self, bracket: &Bracket) {
        self.low = bracket.low;
        self.high = bracket.high;
        self.primed = true;
    }
}

/// Saturate `target` to the value range covered by `axis`.
///
/// Does not use `Ord::clamp`, since an axis which has not been populated yet
/// may well have its extremes the wrong way around, and that must not panic.
pub fn clamp(axis: &[i16], orientation: Orientation, target: i16) -> Option<i16> {
    let (&first, &last) = (axis.first()?, axis.last()?);
    let (min, max) = match orientation {
        Orientation::Ascending => (first, last),
        Orientation::Descending => (last, first),
    };

    Some(if target > max {
        max
    } else if target < min {
        min
    } else {
        target
    })
}

/// Find the bracket of `axis` enclosing `target`, updating `cache` with the result.
///
/// Lookups in a control loop tend to move slowly across the table, so the
/// cached bracket and its two neighbours are tried before scanning the
/// whole axis. An input exactly on an axis entry always resolves to the
/// degenerate bin at that entry, never to a bracket with the entry at one end.
pub fn locate(axis: &[i16], orientation: Orientation, target: i16, cache: &mut BinCache) -> Located {
    let Some(position) = clamp(axis, orientation, target) else {
        return Located {
            bracket: Bracket::degenerate(0, target, target),
            tier: Tier::Scan,
        };
    };

    let (low, high) = cache.indices();

    let (bracket, tier) = if !cache.is_primed() {
        (scan(axis, orientation, position), Tier::Scan)
    } else if let Some(bracket) = classify(axis, orientation, low, high, position) {
        (bracket, Tier::Same)
    } else if let Some(bracket) = classify(axis, orientation, high, high + 1, position) {
        (bracket, Tier::Forward)
    } else if let Some(bracket) = low
        .checked_sub(1)
        .and_then(|prev| classify(axis, orientation, prev, low, position))
    {
        (bracket, Tier::Backward)
    } else {
        (scan(axis, orientation, position), Tier::Scan)
    };

    cache.store(&bracket);
    Located { bracket, tier }
}

/// Check whether `position` lies within the bracket `[low, high]`.
fn classify(axis: &[i16], orientation: Orientation, low: usize, high: usize, position: i16) -> Option<Bracket> {
    let low_value = *axis.get(low)?;
    let high_value = *axis.get(high)?;

    if position == low_value {
        Some(Bracket::degenerate(low, low_value, position))
    } else if position == high_value {
        Some(Bracket::degenerate(high, high_value, position))
    } else if orientation.precedes(low_value, position) && orientation.precedes(position, high_value) {
        Some(Bracket {
            low,
            high,
            low_value,
            high_value,
            position,
        })
    } else {
        None
    }
}

/// Walk the axis from the highest index down. The top of the X axis is the
/// high-RPM region, where the CPU is needed the most, so that is where the
/// scan should be the shortest.
fn scan(axis: &[i16], orientation: Orientation, position: i16) -> Bracket {
    for high in (1..axis.len()).rev() {
        let high_value = axis[high];
        if position == high_value {
            return Bracket::degenerate(high, high_value, position);
        }

        let low_value = axis[high - 1];
        if orientation.precedes(low_value, position) && orientation.precedes(position, high_value) {
            return Bracket {
                low: high - 1,
                high,
                low_value,
                high_value,
                position,
            };
        }
    }

    // Reaching the first entry means we are on (or clamped to) it
    let first = axis.first().copied().unwrap_or(position);
    Bracket::degenerate(0, first, position)
}

/// Check that the sequence of axis values is strictly monotonic in the
/// direction the axis `id` requires.
pub fn validate(axis: impl IntoIterator<Item = i16>, id: AxisId) -> Result<(), TableError> {
    let orientation = id.orientation();
    let mut values = axis.into_iter();

    let Some(mut prev) = values.next() else {
        return Ok(());
    };

    for (index, value) in values.enumerate() {
        if !orientation.precedes(prev, value) {
            return Err(TableError::NonMonotonicAxis {
                axis: id,
                index: index + 1,
            });
        }
        prev = value;
    }

    Ok(())
}

/// Copy as much of `src` into `dst` as fits, but only if the resulting axis
/// is valid. On error `dst` is left untouched. Returns the number of entries copied.
pub(crate) fn write_axis(dst: &mut [i16], src: &[i16], id: AxisId) -> Result<usize, TableError> {
    let count = src.len().min(dst.len());

    let merged = src[..count].iter().chain(&dst[count..]).copied();
    if let Err(error) = validate(merged, id) {
        warn!("Rejected new {} axis: {}", id, error);
        return Err(error);
    }

    dst[..count].copy_from_slice(&src[..count]);
    Ok(count)
}
