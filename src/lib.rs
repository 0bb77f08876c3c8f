#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod engine;
mod geom;
pub mod num;
pub mod offset;
pub mod scale;
pub mod tree;

#[cfg(feature = "generators")]
pub mod generators;

pub use engine::{Clipper, ClipperOptions, ReusableData, Solution, TreeSolution};
pub use geom::{
    area, bounds, closest_point_on_segment, cross_product, dot_product, ellipse, intersect_point,
    is_positive, perpendicular_distance_sqrd, point_in_polygon, reverse_path, segments_intersect,
    strip_duplicates, total_area, Path, Paths, Point, PointInPolygon, Rect,
};
pub use tree::{PolyPath, PolyTree};

/// A fill rule tells us how to decide whether a point is "inside" a
/// collection of closed paths, given its winding number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FillRule {
    /// The point is "inside" if its winding number is odd.
    EvenOdd,
    /// The point is "inside" if its winding number is non-zero.
    NonZero,
    /// The point is "inside" if its winding number is positive.
    Positive,
    /// The point is "inside" if its winding number is negative.
    Negative,
}

/// Binary operations between sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    /// A point is in the intersection of two sets if it is in both.
    Intersection,
    /// A point is in the union of two sets if it is in either one.
    Union,
    /// A point is in the difference of two sets if it is in the first but not the second.
    Difference,
    /// A point is in the exclusive-or of two sets if it is in one or the other, but not both.
    Xor,
}

/// Which side of a binary operation a path belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PathType {
    /// The first operand. Subject paths may be open.
    Subject,
    /// The second operand.
    Clip,
}

/// The things that can go wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A decimal precision was outside the supported range.
    #[error("precision {0} is outside the supported range of -8 to 8")]
    PrecisionOutOfRange(i32),
    /// At least one of the inputs was infinite.
    #[error("one of the inputs was infinite")]
    Infinity,
    /// At least one of the inputs was not a number.
    #[error("one of the inputs had a NaN")]
    NaN,
    /// A scaled coordinate was too large to clip.
    #[error("a coordinate was out of range")]
    CoordinateOutOfRange,
    /// The sweep reached an inconsistent state, and produced no output.
    #[error("clipping failed")]
    ExecutionFailed,
}

/// Computes a boolean operation between two sets of closed paths, returning
/// the closed output paths.
///
/// ```
/// use clipsweeper::{binary_op, BinaryOp, FillRule, Rect};
///
/// let a = Rect::new(0, 0, 10, 10).as_path();
/// let b = Rect::new(5, 5, 15, 15).as_path();
/// let out = binary_op(&[a], &[b], FillRule::NonZero, BinaryOp::Union).unwrap();
/// assert_eq!(clipsweeper::total_area(&out), 175.0);
/// ```
pub fn binary_op(subjects: &[Path], clips: &[Path], fill_rule: FillRule, op: BinaryOp) -> Result<Paths, Error> {
    let mut clipper = Clipper::new();
    clipper.add_subject(subjects);
    clipper.add_clip(clips);
    Ok(clipper.execute(op, fill_rule)?.closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(coords: &[(i64, i64)]) -> Path {
        coords.iter().map(|&p| p.into()).collect()
    }

    /// Rotates a closed path so that it starts at its smallest point.
    fn normalize(mut p: Path) -> Path {
        if let Some(i) = (0..p.len()).min_by_key(|&i| (p[i].x, p[i].y)) {
            p.rotate_left(i);
        }
        p
    }

    #[test]
    fn two_squares() {
        let a = path(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let b = path(&[(5, 5), (15, 5), (15, 15), (5, 15)]);
        let output = binary_op(&[a], &[b], FillRule::NonZero, BinaryOp::Intersection).unwrap();
        assert_eq!(output.len(), 1);
        insta::assert_debug_snapshot!(normalize(output[0].clone()), @"
        [
            (5, 5),
            (10, 5),
            (10, 10),
            (5, 10),
        ]
        ");
    }

    #[test]
    fn pentagram_fill_rules() {
        // A pentagram, whose middle pentagon has winding number 2.
        let p = path(&[(0, -100), (59, 81), (-95, -31), (95, -31), (-59, 81)]);
        let even_odd = binary_op(&[p.clone()], &[], FillRule::EvenOdd, BinaryOp::Union).unwrap();
        let non_zero = binary_op(&[p], &[], FillRule::NonZero, BinaryOp::Union).unwrap();
        assert_eq!(non_zero.len(), 1);
        assert!(total_area(&non_zero) > total_area(&even_odd));
    }

    #[test]
    fn empty_subjects() {
        let clip = path(&[(0, 0), (10, 0), (10, 10)]);
        for op in [BinaryOp::Intersection, BinaryOp::Union, BinaryOp::Difference, BinaryOp::Xor] {
            assert!(binary_op(&[], &[], FillRule::NonZero, op).unwrap().is_empty());
            binary_op(&[], &[clip.clone()], FillRule::NonZero, op).unwrap();
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            Error::PrecisionOutOfRange(12).to_string(),
            "precision 12 is outside the supported range of -8 to 8"
        );
    }
}
