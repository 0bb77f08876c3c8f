//! Utilities for fuzz and/or property testing using `arbitrary`.
//!
//! The generators here deliberately keep coordinates in small ranges, so that
//! generated paths share vertices, overlap collinearly and have horizontal
//! edges much more often than uniformly random coordinates would.

use arbitrary::Unstructured;

use crate::geom::{Path, Paths, Point, Rect};
use crate::offset::{EndType, JoinType};
use crate::{BinaryOp, FillRule};

/// Generate an arbitrary coordinate in some (inclusive) range.
pub fn coord_in_range(start: i64, end: i64, u: &mut Unstructured<'_>) -> Result<i64, arbitrary::Error> {
    u.int_in_range(start..=end)
}

/// Generate an arbitrary point with both coordinates in `-size..=size`.
pub fn point(size: i64, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(coord_in_range(-size, size, u)?, coord_in_range(-size, size, u)?))
}

/// Generate a point that has a chance to share a coordinate with `prev`.
fn another_point(prev: Point, size: i64, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(match u.int_in_range(0u8..=3)? {
        0 => Point::new(prev.x, coord_in_range(-size, size, u)?),
        1 => Point::new(coord_in_range(-size, size, u)?, prev.y),
        _ => point(size, u)?,
    })
}

/// Generate an arbitrary path with between 1 and `max_len` points.
///
/// The path may intersect itself, double back on itself or repeat points.
pub fn path(size: i64, max_len: usize, u: &mut Unstructured<'_>) -> Result<Path, arbitrary::Error> {
    let len = u.int_in_range(1..=max_len.max(1))?;
    let mut ret = Vec::with_capacity(len);
    let mut prev = point(size, u)?;
    ret.push(prev);
    for _ in 1..len {
        prev = another_point(prev, size, u)?;
        ret.push(prev);
    }
    Ok(ret)
}

/// Generate a handful of arbitrary paths.
pub fn paths(size: i64, u: &mut Unstructured<'_>) -> Result<Paths, arbitrary::Error> {
    let count = u.int_in_range(0..=4)?;
    (0..count).map(|_| path(size, 12, u)).collect()
}

/// Generate an arbitrary axis-aligned rectangle, with arbitrary orientation.
///
/// Clipping rectangles only ever creates vertices with integer coordinates,
/// so areas computed from clipped rectangles are exact.
pub fn rect(size: i64, u: &mut Unstructured<'_>) -> Result<Path, arbitrary::Error> {
    let x0 = coord_in_range(-size, size - 1, u)?;
    let y0 = coord_in_range(-size, size - 1, u)?;
    let x1 = coord_in_range(x0 + 1, size, u)?;
    let y1 = coord_in_range(y0 + 1, size, u)?;
    let mut ret = Rect::new(x0, y0, x1, y1).as_path();
    if u.arbitrary()? {
        ret.reverse();
    }
    Ok(ret)
}

/// Generate a handful of arbitrary rectangles.
pub fn rects(size: i64, u: &mut Unstructured<'_>) -> Result<Paths, arbitrary::Error> {
    let count = u.int_in_range(0..=4)?;
    (0..count).map(|_| rect(size, u)).collect()
}

/// Generate a fill rule.
pub fn fill_rule(u: &mut Unstructured<'_>) -> Result<FillRule, arbitrary::Error> {
    u.choose(&[FillRule::EvenOdd, FillRule::NonZero, FillRule::Positive, FillRule::Negative])
        .copied()
}

/// Generate a binary operation.
pub fn binary_op(u: &mut Unstructured<'_>) -> Result<BinaryOp, arbitrary::Error> {
    u.choose(&[BinaryOp::Intersection, BinaryOp::Union, BinaryOp::Difference, BinaryOp::Xor])
        .copied()
}

/// Generate a join type.
pub fn join_type(u: &mut Unstructured<'_>) -> Result<JoinType, arbitrary::Error> {
    u.choose(&[JoinType::Miter, JoinType::Square, JoinType::Bevel, JoinType::Round])
        .copied()
}

/// Generate an end type.
pub fn end_type(u: &mut Unstructured<'_>) -> Result<EndType, arbitrary::Error> {
    u.choose(&[EndType::Polygon, EndType::Joined, EndType::Butt, EndType::Square, EndType::Round])
        .copied()
}

/// Properties that can be checked on arbitrary data, either with `arbtest`
/// or with a fuzzer.
pub mod arbtests {
    use arbitrary::Unstructured;

    use super::*;
    use crate::geom::total_area;
    use crate::offset::ClipperOffset;
    use crate::Clipper;

    /// Clipping arbitrary paths either fails cleanly or produces sensible
    /// closed paths.
    pub fn clip_paths(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let subjects = paths(20, u)?;
        let open = paths(20, u)?;
        let clips = paths(20, u)?;
        let op = binary_op(u)?;
        let fill_rule = fill_rule(u)?;

        let mut clipper = Clipper::new();
        clipper.add_subject(&subjects);
        clipper.add_open_subject(&open);
        clipper.add_clip(&clips);
        if let Ok(solution) = clipper.execute(op, fill_rule) {
            for p in &solution.closed {
                assert!(p.len() >= 3, "{p:?}");
            }
            for p in &solution.open {
                assert!(p.len() >= 2, "{p:?}");
            }
        }
        if let Ok(solution) = clipper.execute_tree(op, fill_rule) {
            for p in solution.tree.to_paths() {
                assert!(p.len() >= 3, "{p:?}");
            }
        }
        Ok(())
    }

    /// Intersection and difference split the subject exactly in two.
    pub fn rect_complement(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let subjects = rects(50, u)?;
        let clips = rects(50, u)?;
        let area = |op| {
            let mut clipper = Clipper::new();
            clipper.add_subject(&subjects);
            clipper.add_clip(&clips);
            total_area(&clipper.execute(op, FillRule::NonZero).unwrap().closed)
        };
        let mut clipper = Clipper::new();
        clipper.add_subject(&subjects);
        let whole = total_area(&clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap().closed);
        assert_eq!(area(BinaryOp::Intersection) + area(BinaryOp::Difference), whole);
        Ok(())
    }

    /// Symmetric operations don't care which side is the subject.
    pub fn rect_commutativity(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let a = rects(50, u)?;
        let b = rects(50, u)?;
        let fill_rule = fill_rule(u)?;
        let op = *u.choose(&[BinaryOp::Intersection, BinaryOp::Union, BinaryOp::Xor])?;
        let forward = crate::binary_op(&a, &b, fill_rule, op).unwrap();
        let backward = crate::binary_op(&b, &a, fill_rule, op).unwrap();
        assert_eq!(total_area(&forward), total_area(&backward));
        Ok(())
    }

    /// Offsetting arbitrary paths produces sensible closed paths.
    pub fn offset_paths(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let input = paths(50, u)?;
        let join = join_type(u)?;
        let end = end_type(u)?;
        let delta = coord_in_range(-20, 20, u)? as f64;

        let mut offset = ClipperOffset::new();
        offset.add_paths(&input, join, end);
        if let Ok(out) = offset.execute(delta) {
            for p in &out {
                assert!(p.len() >= 3, "{p:?}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn clip_paths() {
        arbtest::arbtest(super::arbtests::clip_paths);
    }

    #[test]
    fn rect_complement() {
        arbtest::arbtest(super::arbtests::rect_complement);
    }

    #[test]
    fn rect_commutativity() {
        arbtest::arbtest(super::arbtests::rect_commutativity);
    }

    #[test]
    fn offset_paths() {
        arbtest::arbtest(super::arbtests::offset_paths);
    }
}
