//! Converting between float and integer coordinates.
//!
//! The clipper only works with integer coordinates. To clip float geometry,
//! scale it up by a power of ten, clip, and scale the result back down.
//!
//! ```
//! use clipsweeper::scale::Scale;
//!
//! let scale = Scale::new(2).unwrap();
//! let p = scale.to_point(kurbo::Point::new(1.234, -0.5)).unwrap();
//! assert_eq!(p, clipsweeper::Point::new(123, -50));
//! assert_eq!(scale.from_point(p), kurbo::Point::new(1.23, -0.5));
//! ```

use crate::geom::{Path, Paths, Point};
use crate::num::{check_cast, check_precision, INVALID};
use crate::Error;

/// A decimal scaling factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    precision: i32,
    factor: f64,
}

impl Scale {
    /// Scale by `10^precision`, where `precision` is between -8 and 8.
    pub fn new(precision: i32) -> Result<Self, Error> {
        check_precision(precision)?;
        Ok(Scale {
            precision,
            factor: 10f64.powi(precision),
        })
    }

    /// The number of decimal digits kept.
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// The multiplier taking float coordinates to integer ones.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    fn coord(&self, value: f64) -> Result<i64, Error> {
        if value.is_nan() {
            return Err(Error::NaN);
        }
        if value.is_infinite() {
            return Err(Error::Infinity);
        }
        match check_cast(value * self.factor) {
            INVALID => Err(Error::CoordinateOutOfRange),
            c => Ok(c),
        }
    }

    /// Scales a float point up to the integer grid.
    pub fn to_point(&self, p: kurbo::Point) -> Result<Point, Error> {
        Ok(Point::new(self.coord(p.x)?, self.coord(p.y)?))
    }

    /// Scales an integer point back down.
    pub fn from_point(&self, p: Point) -> kurbo::Point {
        kurbo::Point::new(p.x as f64 / self.factor, p.y as f64 / self.factor)
    }

    /// Scales a float path up to the integer grid.
    pub fn to_path(&self, path: &[kurbo::Point]) -> Result<Path, Error> {
        path.iter().map(|p| self.to_point(*p)).collect()
    }

    /// Scales several float paths up to the integer grid.
    pub fn to_paths(&self, paths: &[Vec<kurbo::Point>]) -> Result<Paths, Error> {
        paths.iter().map(|p| self.to_path(p)).collect()
    }

    /// Scales an integer path back down.
    pub fn from_path(&self, path: &[Point]) -> Vec<kurbo::Point> {
        path.iter().map(|p| self.from_point(*p)).collect()
    }

    /// Scales integer paths back down.
    pub fn from_paths(&self, paths: &[Path]) -> Vec<Vec<kurbo::Point>> {
        paths.iter().map(|p| self.from_path(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{binary_op, BinaryOp, FillRule};

    #[test]
    fn precision_is_checked() {
        assert_matches!(Scale::new(9), Err(Error::PrecisionOutOfRange(9)));
        assert_matches!(Scale::new(-9), Err(Error::PrecisionOutOfRange(-9)));
        assert_eq!(Scale::new(-8).unwrap().precision(), -8);
    }

    #[test]
    fn bad_floats() {
        let scale = Scale::new(0).unwrap();
        assert_matches!(scale.to_point(kurbo::Point::new(f64::NAN, 0.0)), Err(Error::NaN));
        assert_matches!(scale.to_point(kurbo::Point::new(0.0, f64::INFINITY)), Err(Error::Infinity));
        assert_matches!(scale.to_point(kurbo::Point::new(1e300, 0.0)), Err(Error::CoordinateOutOfRange));
    }

    #[test]
    fn negative_precision_rounds() {
        let scale = Scale::new(-1).unwrap();
        assert_eq!(scale.to_point(kurbo::Point::new(25.0, 34.0)).unwrap(), Point::new(3, 3));
    }

    #[test]
    fn clip_floats() {
        let scale = Scale::new(1).unwrap();
        let square = |x: f64, y: f64| {
            vec![
                kurbo::Point::new(x, y),
                kurbo::Point::new(x + 1.0, y),
                kurbo::Point::new(x + 1.0, y + 1.0),
                kurbo::Point::new(x, y + 1.0),
            ]
        };
        let subj = scale.to_paths(&[square(0.0, 0.0)]).unwrap();
        let clip = scale.to_paths(&[square(0.5, 0.5)]).unwrap();
        let out = binary_op(&subj, &clip, FillRule::NonZero, BinaryOp::Intersection).unwrap();
        let out = scale.from_paths(&out);
        assert_eq!(out.len(), 1);
        let area = kurbo::Shape::area(&kurbo::BezPath::from_vec(
            out[0]
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    if i == 0 {
                        kurbo::PathEl::MoveTo(*p)
                    } else {
                        kurbo::PathEl::LineTo(*p)
                    }
                })
                .chain(std::iter::once(kurbo::PathEl::ClosePath))
                .collect(),
        ));
        assert!((area.abs() - 0.25).abs() < 1e-9);
    }
}
