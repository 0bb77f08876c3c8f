//! Numeric constants and conversions.
//!
//! All geometry in this crate lives on an `i64` grid, but several
//! computations (slopes, intersections, offsets) go through `f64`. The helpers
//! here are the only places where floats are turned back into coordinates, so
//! that the rounding conventions stay consistent.

use crate::Error;

/// The largest coordinate magnitude that the clipper accepts.
///
/// Keeping coordinates below `2^61` means that the difference of any two
/// coordinates fits comfortably in an `i64`.
pub const MAX_COORD: i64 = i64::MAX / 4;

/// The smallest coordinate that the clipper accepts.
pub const MIN_COORD: i64 = -MAX_COORD;

/// Sentinel returned by [`check_cast`] when a value is out of range.
pub const INVALID: i64 = i64::MAX;

/// The default arc tolerance used when approximating round joins.
pub const DEFAULT_ARC_TOLERANCE: f64 = 0.25;

/// The supported range for decimal scaling precision.
pub const PRECISION_RANGE: std::ops::RangeInclusive<i32> = -8..=8;

pub(crate) const FLOATING_POINT_TOLERANCE: f64 = 1e-12;

pub(crate) fn is_almost_zero(value: f64) -> bool {
    value.abs() <= FLOATING_POINT_TOLERANCE
}

/// Rounds half away from zero. Out-of-range values saturate.
#[inline]
pub(crate) fn round_away(value: f64) -> i64 {
    value.round() as i64
}

/// Rounds half to even, matching `nearbyint` under the default rounding mode.
#[inline]
pub(crate) fn round_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Converts a float to a coordinate, returning [`INVALID`] if it is outside
/// the open range `(MIN_COORD, MAX_COORD)`.
pub fn check_cast(value: f64) -> i64 {
    if value >= MAX_COORD as f64 || value <= MIN_COORD as f64 || value.is_nan() {
        INVALID
    } else {
        round_away(value)
    }
}

/// Checks that a decimal precision is usable for scaling.
pub fn check_precision(precision: i32) -> Result<(), Error> {
    if PRECISION_RANGE.contains(&precision) {
        Ok(())
    } else {
        Err(Error::PrecisionOutOfRange(precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_conventions() {
        assert_eq!(round_away(2.5), 3);
        assert_eq!(round_away(-2.5), -3);
        assert_eq!(round_even(2.5), 2);
        assert_eq!(round_even(3.5), 4);
        assert_eq!(round_even(-2.5), -2);
    }

    #[test]
    fn check_cast_rejects_huge_values() {
        assert_eq!(check_cast(1.4), 1);
        assert_eq!(check_cast(MAX_COORD as f64 * 2.0), INVALID);
        assert_eq!(check_cast(f64::NEG_INFINITY), INVALID);
        assert_eq!(check_cast(f64::NAN), INVALID);
    }

    #[test]
    fn precision_bounds() {
        assert!(check_precision(-8).is_ok());
        assert!(check_precision(8).is_ok());
        assert_eq!(check_precision(9), Err(Error::PrecisionOutOfRange(9)));
    }
}
