use clipsweeper::offset::{ClipperOffset, EndType, JoinType, OffsetOptions};
use clipsweeper::{area, binary_op, total_area, BinaryOp, Clipper, FillRule, Path, Point, Rect};
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (-1000i64..1000, -1000i64..1000, 1i64..500, 1i64..500).prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
}

fn convex_polygon() -> impl Strategy<Value = Path> {
    // Points on a circle are in convex position.
    (3usize..40, 100f64..10_000.0).prop_map(|(n, r)| clipsweeper::ellipse(Point::new(0, 0), r, r, n))
}

/// A path whose points come from a tiny grid, so that it's full of repeated
/// points, spikes and collinear edges.
fn duplicate_heavy_path() -> impl Strategy<Value = Path> {
    prop::collection::vec((0i64..3, 0i64..3), 0..40)
        .prop_map(|pts| pts.into_iter().map(Point::from).collect())
}

/// An arbitrary polygon on a small grid. It may be self-intersecting.
fn grid_polygon() -> impl Strategy<Value = Path> {
    prop::collection::vec((0i64..100, 0i64..100), 3..10)
        .prop_map(|pts| pts.into_iter().map(Point::from).collect())
}

fn perimeter(path: &Path) -> f64 {
    path.iter()
        .zip(path.iter().cycle().skip(1))
        .map(|(p, q)| ((p.x - q.x) as f64).hypot((p.y - q.y) as f64))
        .sum()
}

/// How far apart two computed areas may be. Intersection points are rounded
/// to the grid, and each rounding moves an edge by less than a unit.
fn area_tolerance(a: &[Path], b: &[Path]) -> f64 {
    a.iter().chain(b).map(perimeter).sum::<f64>() + 1.0
}

fn clip_area(a: &[Path], b: &[Path], fill_rule: FillRule, op: BinaryOp) -> f64 {
    total_area(&binary_op(a, b, fill_rule, op).unwrap())
}

fn union(paths: &[Path]) -> Vec<Path> {
    binary_op(paths, &[], FillRule::NonZero, BinaryOp::Union).unwrap()
}

proptest! {
#[test]
fn disjoint_union_conserves_area(rects in prop::collection::vec(rect(), 1..6)) {
    // Spread the rectangles out so that they can't overlap.
    let paths: Vec<Path> = rects
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let dx = 5000 * i as i64;
            Rect::new(r.left + dx, r.top, r.right + dx, r.bottom).as_path()
        })
        .collect();
    prop_assert_eq!(total_area(&union(&paths)), total_area(&paths));
}

#[test]
fn union_is_idempotent(rects in prop::collection::vec(rect(), 1..6)) {
    let paths: Vec<Path> = rects.iter().map(|r| r.as_path()).collect();
    let once = union(&paths);
    let twice = union(&once);
    prop_assert_eq!(total_area(&once), total_area(&twice));
    prop_assert_eq!(once.len(), twice.len());
    prop_assert_eq!(
        once.iter().map(|p| p.len()).sum::<usize>(),
        twice.iter().map(|p| p.len()).sum::<usize>()
    );
}

#[test]
fn difference_is_not_commutative(a in rect(), b in rect()) {
    prop_assume!(a != b);
    let a = [a.as_path()];
    let b = [b.as_path()];
    let ab = binary_op(&a, &b, FillRule::NonZero, BinaryOp::Difference).unwrap();
    let ba = binary_op(&b, &a, FillRule::NonZero, BinaryOp::Difference).unwrap();
    prop_assert_ne!(ab, ba);
}

#[test]
fn union_and_intersection_commute(
    a in prop::collection::vec(grid_polygon(), 1..3),
    b in prop::collection::vec(grid_polygon(), 1..3),
    even_odd in any::<bool>(),
) {
    let fill_rule = if even_odd { FillRule::EvenOdd } else { FillRule::NonZero };
    let tol = area_tolerance(&a, &b);
    for op in [BinaryOp::Union, BinaryOp::Intersection, BinaryOp::Xor] {
        let ab = clip_area(&a, &b, fill_rule, op);
        let ba = clip_area(&b, &a, fill_rule, op);
        prop_assert!((ab - ba).abs() <= tol, "{:?}: {} vs {}", op, ab, ba);
    }
}

#[test]
fn intersection_and_difference_partition_the_subject(
    a in prop::collection::vec(grid_polygon(), 1..3),
    b in prop::collection::vec(grid_polygon(), 1..3),
    even_odd in any::<bool>(),
) {
    let fill_rule = if even_odd { FillRule::EvenOdd } else { FillRule::NonZero };
    let whole = clip_area(&a, &[], fill_rule, BinaryOp::Union);
    let inside = clip_area(&a, &b, fill_rule, BinaryOp::Intersection);
    let outside = clip_area(&a, &b, fill_rule, BinaryOp::Difference);
    prop_assert!(
        (inside + outside - whole).abs() <= area_tolerance(&a, &b),
        "{} + {} vs {}", inside, outside, whole
    );
}

#[test]
fn open_output_has_at_least_two_points(
    open in prop::collection::vec(grid_polygon(), 1..4),
    clip in prop::collection::vec(grid_polygon(), 1..3),
) {
    for op in [BinaryOp::Intersection, BinaryOp::Union, BinaryOp::Difference, BinaryOp::Xor] {
        for fill_rule in [FillRule::EvenOdd, FillRule::NonZero] {
            let mut clipper = Clipper::new();
            clipper.add_open_subject(&open);
            clipper.add_clip(&clip);
            if let Ok(solution) = clipper.execute(op, fill_rule) {
                prop_assert!(solution.open.iter().all(|p| p.len() >= 2), "{:?}", solution.open);
            }
        }
    }
}

#[test]
fn offset_round_trip(poly in convex_polygon(), delta in 1f64..100.0) {
    let original = area(&poly);
    prop_assume!(original > 0.0);

    // A generous miter limit keeps every corner sharp.
    let options = OffsetOptions::default().with_miter_limit(10.0);
    let mut offset = ClipperOffset::with_options(options.clone());
    offset.add_path(&poly, JoinType::Miter, EndType::Polygon);
    let grown = offset.execute(delta).unwrap();
    prop_assert_eq!(grown.len(), 1);

    let mut offset = ClipperOffset::with_options(options);
    offset.add_paths(&grown, JoinType::Miter, EndType::Polygon);
    let shrunk = offset.execute(-delta).unwrap();
    let a = total_area(&shrunk);

    // Every vertex gets rounded twice, and each rounding moves an edge by at
    // most about half a unit.
    prop_assert!((a - original).abs() <= 2.0 * perimeter(&poly), "{} vs {}", a, original);
}

#[test]
fn duplicate_heavy_input(paths in prop::collection::vec(duplicate_heavy_path(), 0..5), clip in duplicate_heavy_path()) {
    for op in [BinaryOp::Intersection, BinaryOp::Union, BinaryOp::Difference, BinaryOp::Xor] {
        let mut clipper = Clipper::new();
        clipper.add_subject(&paths);
        clipper.add_open_subject(&paths);
        clipper.add_clip(&[clip.clone()]);
        if let Ok(solution) = clipper.execute(op, FillRule::EvenOdd) {
            prop_assert!(solution.closed.iter().all(|p| p.len() >= 3));
        }
    }
}
}
