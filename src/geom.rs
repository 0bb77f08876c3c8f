//! Geometric primitives, like points, rectangles and paths.
//!
//! Coordinates are `i64`. Products of coordinate differences are evaluated in
//! `i128`, so the sign of a cross product is exact for every point whose
//! coordinates are within [`MAX_COORD`](crate::num::MAX_COORD).

use crate::num::{round_away, round_even};

/// A two-dimensional point on the integer grid.
///
/// The documentation and method naming assume that larger `y` values are
/// further down, which is the convention that the sweep line uses: it
/// starts at the largest `y` and moves towards smaller ones.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

/// An ordered sequence of points.
///
/// A closed path has an implicit edge from its last point back to its first.
pub type Path = Vec<Point>;

/// A collection of paths.
pub type Paths = Vec<Path>;

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i64, y: i64) -> Self {
        Point { x, y }
    }

    /// Create a point from float coordinates, rounding half away from zero.
    pub fn from_f64(x: f64, y: f64) -> Self {
        Point {
            x: round_away(x),
            y: round_away(y),
        }
    }

    /// Converts to a float point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x as f64, self.y as f64)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned rectangle.
///
/// A rectangle can be "invalid", meaning that it has not been computed yet
/// (see [`Rect::INVALID`]). This is different from a degenerate rectangle of
/// zero size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// The smallest `x` coordinate.
    pub left: i64,
    /// The smallest `y` coordinate.
    pub top: i64,
    /// The largest `x` coordinate.
    pub right: i64,
    /// The largest `y` coordinate.
    pub bottom: i64,
}

impl Rect {
    /// A rectangle that contains nothing, and that grows to fit the first
    /// point added to it.
    pub const INVALID: Rect = Rect {
        left: i64::MAX,
        top: i64::MAX,
        right: i64::MIN,
        bottom: i64::MIN,
    };

    /// Create a new rectangle.
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Is this rectangle in a computed state?
    pub fn is_valid(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    /// Width of the rectangle.
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// Does this rectangle have zero (or negative) area?
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    /// The center of the rectangle, rounded half away from zero.
    pub fn mid_point(&self) -> Point {
        Point::from_f64(
            (self.left as f64 + self.right as f64) / 2.0,
            (self.top as f64 + self.bottom as f64) / 2.0,
        )
    }

    /// Is the point strictly inside this rectangle?
    pub fn contains(&self, pt: Point) -> bool {
        pt.x > self.left && pt.x < self.right && pt.y > self.top && pt.y < self.bottom
    }

    /// Is the other rectangle inside this one (boundaries may touch)?
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Do the two rectangles overlap or touch?
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left.max(other.left) <= self.right.min(other.right)
            && self.top.max(other.top) <= self.bottom.min(other.bottom)
    }

    /// The four corners of this rectangle, as a closed path.
    pub fn as_path(&self) -> Path {
        vec![
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    /// Grows this rectangle to include a point.
    pub fn add_point(&mut self, pt: Point) {
        self.left = self.left.min(pt.x);
        self.right = self.right.max(pt.x);
        self.top = self.top.min(pt.y);
        self.bottom = self.bottom.max(pt.y);
    }

    /// The bounding box of some points, or [`Rect::INVALID`] if there are none.
    pub fn from_points<'a>(pts: impl IntoIterator<Item = &'a Point>) -> Rect {
        let mut ret = Rect::INVALID;
        for p in pts {
            ret.add_point(*p);
        }
        ret
    }
}

/// The bounding box of a collection of paths.
///
/// Returns the zero rectangle if there are no points at all.
pub fn bounds(paths: &[Path]) -> Rect {
    let ret = Rect::from_points(paths.iter().flatten());
    if ret.is_valid() {
        ret
    } else {
        Rect::default()
    }
}

/// The cross product of the vectors `p1 -> p2` and `p2 -> p3`.
///
/// Positive when the three points turn clockwise in y-down coordinates.
#[inline]
pub fn cross_product(p1: Point, p2: Point, p3: Point) -> f64 {
    let a = (p2.x as i128 - p1.x as i128) * (p3.y as i128 - p2.y as i128);
    let b = (p2.y as i128 - p1.y as i128) * (p3.x as i128 - p2.x as i128);
    (a - b) as f64
}

/// The dot product of the vectors `p1 -> p2` and `p2 -> p3`.
#[inline]
pub fn dot_product(p1: Point, p2: Point, p3: Point) -> f64 {
    let a = (p2.x as i128 - p1.x as i128) * (p3.x as i128 - p2.x as i128);
    let b = (p2.y as i128 - p1.y as i128) * (p3.y as i128 - p2.y as i128);
    (a + b) as f64
}

/// Finds where the (infinite) lines through two segments cross.
///
/// The result is clamped to the first segment, and truncated towards zero.
/// Returns `None` if the lines are parallel.
pub fn intersect_point(ln1a: Point, ln1b: Point, ln2a: Point, ln2b: Point) -> Option<Point> {
    let dy1 = (ln1b.y - ln1a.y) as f64;
    let dx1 = (ln1b.x - ln1a.x) as f64;
    let dy2 = (ln2b.y - ln2a.y) as f64;
    let dx2 = (ln2b.x - ln2a.x) as f64;
    let det = dy1 * dx2 - dy2 * dx1;
    if det == 0.0 {
        return None;
    }

    let t = ((ln1a.x - ln2a.x) as f64 * dy2 - (ln1a.y - ln2a.y) as f64 * dx2) / det;
    Some(if t <= 0.0 {
        ln1a
    } else if t >= 1.0 {
        ln1b
    } else {
        Point::new(
            (ln1a.x as f64 + t * dx1) as i64,
            (ln1a.y as f64 + t * dy1) as i64,
        )
    })
}

/// Do two segments cross?
///
/// If `inclusive` is false, only proper crossings count. If it is true,
/// touching counts too, but collinear segments do not.
pub fn segments_intersect(seg1a: Point, seg1b: Point, seg2a: Point, seg2b: Point, inclusive: bool) -> bool {
    let res1 = cross_product(seg1a, seg2a, seg2b);
    let res2 = cross_product(seg1b, seg2a, seg2b);
    let res3 = cross_product(seg2a, seg1a, seg1b);
    let res4 = cross_product(seg2b, seg1a, seg1b);
    if inclusive {
        if res1 * res2 > 0.0 || res3 * res4 > 0.0 {
            return false;
        }
        res1 != 0.0 || res2 != 0.0 || res3 != 0.0 || res4 != 0.0
    } else {
        res1 * res2 < 0.0 && res3 * res4 < 0.0
    }
}

/// The point on the segment `seg1 -- seg2` that is closest to `off_pt`.
pub fn closest_point_on_segment(off_pt: Point, seg1: Point, seg2: Point) -> Point {
    if seg1 == seg2 {
        return seg1;
    }
    let dx = (seg2.x - seg1.x) as f64;
    let dy = (seg2.y - seg1.y) as f64;
    let q = ((off_pt.x - seg1.x) as f64 * dx + (off_pt.y - seg1.y) as f64 * dy) / (dx * dx + dy * dy);
    let q = q.clamp(0.0, 1.0);
    Point::new(seg1.x + round_even(q * dx), seg1.y + round_even(q * dy))
}

/// The squared distance from `pt` to the line through `line1` and `line2`.
pub fn perpendicular_distance_sqrd(pt: Point, line1: Point, line2: Point) -> f64 {
    let a = (pt.x - line1.x) as f64;
    let b = (pt.y - line1.y) as f64;
    let c = (line2.x - line1.x) as f64;
    let d = (line2.y - line1.y) as f64;
    if c == 0.0 && d == 0.0 {
        return 0.0;
    }
    let cross = a * d - c * b;
    cross * cross / (c * c + d * d)
}

/// Where a point lies relative to a polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointInPolygon {
    /// Strictly inside.
    Inside,
    /// Strictly outside.
    Outside,
    /// On the boundary.
    OnEdge,
}

/// Classifies a point against a closed polygon, using the even-odd rule.
pub fn point_in_polygon(pt: Point, polygon: &[Point]) -> PointInPolygon {
    let len = polygon.len();
    if len < 3 {
        return PointInPolygon::Outside;
    }

    let Some(start) = polygon.iter().position(|p| p.y != pt.y) else {
        return PointInPolygon::Outside;
    };

    let mut is_above = polygon[start].y < pt.y;
    let starting_above = is_above;
    let mut val = false;
    let mut i = start + 1;
    let mut end = len;

    loop {
        if i == end {
            if end == 0 || start == 0 {
                break;
            }
            end = start;
            i = 0;
        }

        if is_above {
            while i < end && polygon[i].y < pt.y {
                i += 1;
            }
        } else {
            while i < end && polygon[i].y > pt.y {
                i += 1;
            }
        }
        if i == end {
            continue;
        }

        let curr = polygon[i];
        let prev = if i > 0 { polygon[i - 1] } else { polygon[len - 1] };

        if curr.y == pt.y {
            if curr.x == pt.x || (curr.y == prev.y && (pt.x < prev.x) != (pt.x < curr.x)) {
                return PointInPolygon::OnEdge;
            }
            i += 1;
            if i == start {
                break;
            }
            continue;
        }

        if pt.x < curr.x && pt.x < prev.x {
            // Only edges crossing on the left count.
        } else if pt.x > prev.x && pt.x > curr.x {
            val = !val;
        } else {
            let d = cross_product(prev, curr, pt);
            if d == 0.0 {
                return PointInPolygon::OnEdge;
            }
            if (d < 0.0) == is_above {
                val = !val;
            }
        }
        is_above = !is_above;
        i += 1;
    }

    if is_above != starting_above {
        if i == len {
            i = 0;
        }
        let d = if i == 0 {
            cross_product(polygon[len - 1], polygon[0], pt)
        } else {
            cross_product(polygon[i - 1], polygon[i], pt)
        };
        if d == 0.0 {
            return PointInPolygon::OnEdge;
        }
        if (d < 0.0) == is_above {
            val = !val;
        }
    }

    if val {
        PointInPolygon::Inside
    } else {
        PointInPolygon::Outside
    }
}

/// The signed area of a closed path.
///
/// Paths that turn counter-clockwise in y-up coordinates (clockwise on a
/// y-down screen) have positive area. Paths with fewer than three points
/// have zero area.
pub fn area(path: &[Point]) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    let mut prev = path[path.len() - 1];
    for &pt in path {
        a += (prev.y as f64 + pt.y as f64) * (prev.x as f64 - pt.x as f64);
        prev = pt;
    }
    a * 0.5
}

/// The total signed area of some closed paths.
pub fn total_area(paths: &[Path]) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

/// Does this closed path have non-negative area?
pub fn is_positive(path: &[Point]) -> bool {
    area(path) >= 0.0
}

/// A copy of the path with its points in reverse order.
pub fn reverse_path(path: &[Point]) -> Path {
    path.iter().rev().copied().collect()
}

/// Removes consecutive duplicate points.
///
/// For closed paths, a last point equal to the first point is removed too.
pub fn strip_duplicates(path: &[Point], is_closed: bool) -> Path {
    let mut ret: Path = Vec::with_capacity(path.len());
    for &p in path {
        if ret.last() != Some(&p) {
            ret.push(p);
        }
    }
    if is_closed && ret.len() > 1 && ret.first() == ret.last() {
        ret.pop();
    }
    ret
}

/// Approximates an ellipse with a closed path.
///
/// If `steps` is less than 3, a step count is chosen from the radii. If
/// `radius_y` is not positive, the ellipse is a circle.
pub fn ellipse(center: Point, radius_x: f64, radius_y: f64, steps: usize) -> Path {
    if radius_x <= 0.0 {
        return Vec::new();
    }
    let radius_y = if radius_y <= 0.0 { radius_x } else { radius_y };
    let steps = if steps <= 2 {
        (std::f64::consts::PI * ((radius_x + radius_y) / 2.0).sqrt()).ceil() as usize
    } else {
        steps
    };

    let (si, co) = (2.0 * std::f64::consts::PI / steps as f64).sin_cos();
    let (mut dx, mut dy) = (co, si);
    let cx = center.x as f64;
    let cy = center.y as f64;
    let mut ret = Vec::with_capacity(steps);
    ret.push(Point::from_f64(cx + radius_x, cy));
    for _ in 1..steps {
        ret.push(Point::from_f64(cx + radius_x * dx, cy + radius_y * dy));
        let x = dx * co - dy * si;
        dy = dy * co + dx * si;
        dx = x;
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i64, y0: i64, size: i64) -> Path {
        Rect::new(x0, y0, x0 + size, y0 + size).as_path()
    }

    #[test]
    fn area_sign() {
        let sq = square(0, 0, 10);
        assert_eq!(area(&sq), 100.0);
        assert_eq!(area(&reverse_path(&sq)), -100.0);
        assert_eq!(area(&sq[..2]), 0.0);
    }

    #[test]
    fn cross_product_is_exact_for_large_coordinates() {
        let big = crate::num::MAX_COORD - 1;
        let a = Point::new(-big, -big);
        let b = Point::new(0, 0);
        let c = Point::new(big, big);
        assert_eq!(cross_product(a, b, c), 0.0);
        assert!(cross_product(a, b, Point::new(big, big - 1)) != 0.0);
    }

    #[test]
    fn intersections() {
        let p = intersect_point(
            Point::new(0, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(10, 0),
        );
        assert_eq!(p, Some(Point::new(5, 5)));
        assert_eq!(
            intersect_point(
                Point::new(0, 0),
                Point::new(10, 0),
                Point::new(0, 1),
                Point::new(10, 1)
            ),
            None
        );

        assert!(segments_intersect(
            Point::new(0, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(10, 0),
            false
        ));
        // Touching at an endpoint only counts when inclusive.
        assert!(!segments_intersect(
            Point::new(0, 0),
            Point::new(5, 5),
            Point::new(5, 5),
            Point::new(10, 0),
            false
        ));
        assert!(segments_intersect(
            Point::new(0, 0),
            Point::new(5, 5),
            Point::new(5, 5),
            Point::new(10, 0),
            true
        ));
    }

    #[test]
    fn closest_point() {
        let p = closest_point_on_segment(Point::new(5, 7), Point::new(0, 0), Point::new(10, 0));
        assert_eq!(p, Point::new(5, 0));
        let p = closest_point_on_segment(Point::new(-5, 7), Point::new(0, 0), Point::new(10, 0));
        assert_eq!(p, Point::new(0, 0));
    }

    #[test]
    fn pip() {
        let sq = square(0, 0, 10);
        assert_eq!(point_in_polygon(Point::new(5, 5), &sq), PointInPolygon::Inside);
        assert_eq!(point_in_polygon(Point::new(15, 5), &sq), PointInPolygon::Outside);
        assert_eq!(point_in_polygon(Point::new(10, 5), &sq), PointInPolygon::OnEdge);
        assert_eq!(point_in_polygon(Point::new(5, 0), &sq), PointInPolygon::OnEdge);
        assert_eq!(point_in_polygon(Point::new(0, 0), &sq), PointInPolygon::OnEdge);
        assert_eq!(point_in_polygon(Point::new(-1, 0), &sq), PointInPolygon::Outside);
    }

    #[test]
    fn rect_helpers() {
        let r = Rect::new(0, 0, 10, 20);
        assert_eq!(r.mid_point(), Point::new(5, 10));
        assert!(r.contains(Point::new(1, 1)));
        assert!(!r.contains(Point::new(0, 1)));
        assert!(r.contains_rect(&Rect::new(0, 0, 5, 5)));
        assert!(r.intersects(&Rect::new(10, 20, 30, 30)));
        assert!(!Rect::INVALID.is_valid());
        assert_eq!(bounds(&[]), Rect::default());
        assert_eq!(bounds(&[square(-2, 3, 4)]), Rect::new(-2, 3, 2, 7));
    }

    #[test]
    fn strip() {
        let p = vec![
            Point::new(0, 0),
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(0, 0),
        ];
        assert_eq!(strip_duplicates(&p, false).len(), 4);
        assert_eq!(strip_duplicates(&p, true).len(), 3);
    }

    #[test]
    fn ellipse_is_round() {
        let e = ellipse(Point::new(0, 0), 100.0, 0.0, 0);
        assert!(e.len() > 20);
        for p in &e {
            let r = ((p.x * p.x + p.y * p.y) as f64).sqrt();
            assert!((r - 100.0).abs() < 1.0);
        }
        assert!(area(&e) > 0.0);
    }
}
