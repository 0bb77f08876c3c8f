//! Inflating and shrinking paths.
//!
//! [`ClipperOffset`] offsets groups of paths by a signed distance. Each
//! vertex gets a join (miter, square, bevel or round) and each open path gets
//! end caps. The raw offset paths overlap themselves wherever the offset is
//! larger than a feature of the input, so they always go through a union
//! with a [`Clipper`] before being returned.

use kurbo::Vec2;

use crate::engine::Clipper;
use crate::geom::{area, ellipse, reverse_path, strip_duplicates, Path, Paths, Point, Rect};
use crate::num::{is_almost_zero, DEFAULT_ARC_TOLERANCE};
use crate::tree::PolyTree;
use crate::{BinaryOp, ClipperOptions, Error, FillRule};

/// How the offset edges at a vertex get joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum JoinType {
    /// Extend the edges until they meet, unless that's further than the
    /// miter limit allows, in which case squaring off.
    Miter,
    /// Square off the corner at exactly the offset distance.
    Square,
    /// Cut the corner off between the two offset edges.
    Bevel,
    /// Join with a circular arc.
    Round,
}

/// How the ends of a path get treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EndType {
    /// The path is a closed polygon, offset on one side only.
    Polygon,
    /// The path is closed, but offset on both sides like a thick line.
    Joined,
    /// Open path; the ends are cut square at the end points.
    Butt,
    /// Open path; the ends are squared off past the end points.
    Square,
    /// Open path; the ends are rounded.
    Round,
}

/// Options controlling a [`ClipperOffset`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OffsetOptions {
    /// The furthest a miter join may extend, as a multiple of the offset.
    /// Values of 1 or less are treated as 2.
    pub miter_limit: f64,
    /// The maximum distance between a round join's arc and its
    /// approximation. Zero (or anything below 0.01) picks a tolerance from
    /// the offset distance.
    pub arc_tolerance: f64,
    /// Keep collinear vertices in the output.
    pub preserve_collinear: bool,
    /// Reverse the orientation of the output.
    pub reverse_solution: bool,
    /// Union all the groups together, instead of cleaning up each group on
    /// its own.
    pub merge_groups: bool,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        OffsetOptions {
            miter_limit: 2.0,
            arc_tolerance: 0.0,
            preserve_collinear: false,
            reverse_solution: false,
            merge_groups: true,
        }
    }
}

impl OffsetOptions {
    /// Sets the miter limit.
    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    /// Sets the arc tolerance.
    pub fn with_arc_tolerance(mut self, arc_tolerance: f64) -> Self {
        self.arc_tolerance = arc_tolerance;
        self
    }

    /// Sets whether collinear vertices are kept.
    pub fn with_preserve_collinear(mut self, preserve_collinear: bool) -> Self {
        self.preserve_collinear = preserve_collinear;
        self
    }

    /// Sets whether the output orientation is reversed.
    pub fn with_reverse_solution(mut self, reverse_solution: bool) -> Self {
        self.reverse_solution = reverse_solution;
        self
    }

    /// Sets whether all groups get cleaned up together.
    pub fn with_merge_groups(mut self, merge_groups: bool) -> Self {
        self.merge_groups = merge_groups;
        self
    }
}

#[derive(Clone, Debug)]
struct Group {
    paths: Paths,
    join_type: JoinType,
    end_type: EndType,
    /// The lowest path has negative area, so the whole group gets its
    /// delta negated.
    paths_reversed: bool,
}

impl Group {
    fn new(paths: &[Path], join_type: JoinType, end_type: EndType) -> Self {
        let is_joined = matches!(end_type, EndType::Polygon | EndType::Joined);
        let paths: Paths = paths.iter().map(|p| strip_duplicates(p, is_joined)).collect();
        let paths_reversed = end_type == EndType::Polygon
            && lowest_path(&paths).is_some_and(|i| area(&paths[i]) < 0.0);
        Group {
            paths,
            join_type,
            end_type,
            paths_reversed,
        }
    }
}

/// The index of the path containing the lowest point (largest `y`, then
/// smallest `x`). That path has to be an outer one. Paths with no area are
/// skipped.
fn lowest_path(paths: &[Path]) -> Option<usize> {
    let mut ret = None;
    let mut lowest = Point::new(i64::MAX, i64::MIN);
    for (i, path) in paths.iter().enumerate() {
        if area(path) == 0.0 {
            continue;
        }
        for pt in path {
            if pt.y > lowest.y || (pt.y == lowest.y && pt.x < lowest.x) {
                ret = Some(i);
                lowest = *pt;
            }
        }
    }
    ret
}

/// The outward unit normal of the edge from `pt1` to `pt2`.
fn unit_normal(pt1: Point, pt2: Point) -> Vec2 {
    let d = Vec2::new((pt2.x - pt1.x) as f64, (pt2.y - pt1.y) as f64);
    if d == Vec2::ZERO {
        return Vec2::ZERO;
    }
    let d = d / d.hypot();
    Vec2::new(d.y, -d.x)
}

fn normalize(v: Vec2) -> Vec2 {
    let h = v.hypot();
    if h.abs() < 0.001 {
        Vec2::ZERO
    } else {
        v / h
    }
}

fn to_vec(pt: Point) -> Vec2 {
    Vec2::new(pt.x as f64, pt.y as f64)
}

fn to_point(v: Vec2) -> Point {
    Point::from_f64(v.x, v.y)
}

/// Where two infinite lines cross, or the origin if they're parallel.
fn line_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Vec2 {
    let da = a1 - a0;
    let db = b1 - b0;
    let det = da.cross(db);
    if det == 0.0 {
        return Vec2::ZERO;
    }
    let t = (b0 - a0).cross(db) / det;
    a0 + da * t
}

/// A function choosing the offset distance at a vertex.
///
/// It gets called with the path, the path's edge normals, and the indices of
/// the current and previous vertices.
pub type DeltaCallback<'a> = dyn FnMut(&[Point], &[Vec2], usize, usize) -> f64 + 'a;

/// Offsets paths.
///
/// ```
/// use clipsweeper::offset::{ClipperOffset, EndType, JoinType};
/// use clipsweeper::Point;
///
/// let square = vec![
///     Point::new(0, 0),
///     Point::new(100, 0),
///     Point::new(100, 100),
///     Point::new(0, 100),
/// ];
/// let mut offset = ClipperOffset::new();
/// offset.add_paths(&[square], JoinType::Miter, EndType::Polygon);
/// let grown = offset.execute(10.0).unwrap();
/// assert_eq!(clipsweeper::total_area(&grown), 120.0 * 120.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClipperOffset {
    options: OffsetOptions,
    groups: Vec<Group>,
}

impl ClipperOffset {
    /// Creates an offsetter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an offsetter with the given options.
    pub fn with_options(options: OffsetOptions) -> Self {
        ClipperOffset {
            options,
            groups: Vec::new(),
        }
    }

    /// The current options.
    pub fn options(&self) -> &OffsetOptions {
        &self.options
    }

    /// Changes the options for subsequent executions.
    pub fn set_options(&mut self, options: OffsetOptions) {
        self.options = options;
    }

    /// Adds a single path as its own group.
    pub fn add_path(&mut self, path: &[Point], join_type: JoinType, end_type: EndType) {
        if !path.is_empty() {
            self.add_paths(&[path.to_vec()], join_type, end_type);
        }
    }

    /// Adds a group of paths that share a join and end type.
    ///
    /// For polygons, the group's orientation is decided by its lowest path,
    /// which must be an outer one: holes in the group get offset the
    /// opposite way, so that they shrink when the outer paths grow.
    pub fn add_paths(&mut self, paths: &[Path], join_type: JoinType, end_type: EndType) {
        if !paths.is_empty() {
            self.groups.push(Group::new(paths, join_type, end_type));
        }
    }

    /// Removes all paths.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Offsets all paths by `delta`, returning flat paths.
    ///
    /// Positive deltas grow positively oriented polygons.
    pub fn execute(&mut self, delta: f64) -> Result<Paths, Error> {
        self.execute_flat(delta, None)
    }

    /// Offsets all paths, choosing the offset distance at each vertex with
    /// a callback.
    pub fn execute_with_callback(&mut self, callback: &mut DeltaCallback<'_>) -> Result<Paths, Error> {
        self.execute_flat(1.0, Some(callback))
    }

    /// Offsets all paths by `delta`, returning the output as a tree.
    pub fn execute_tree(&mut self, delta: f64) -> Result<PolyTree, Error> {
        if self.groups.is_empty() {
            return Ok(PolyTree::default());
        }
        let raw = self.raw_offsets(delta, None);
        let mut clipper = self.cleanup_clipper();
        for paths in raw {
            clipper.add_subject(&paths);
        }
        let solution = clipper.execute_tree(BinaryOp::Union, self.fill_rule())?;
        Ok(solution.tree)
    }

    fn execute_flat(&mut self, delta: f64, callback: Option<&mut DeltaCallback<'_>>) -> Result<Paths, Error> {
        if self.groups.is_empty() {
            return Ok(Vec::new());
        }
        let raw = self.raw_offsets(delta, callback);
        let fill_rule = self.fill_rule();

        let mut clipper = self.cleanup_clipper();
        if self.options.merge_groups {
            for paths in raw {
                clipper.add_subject(&paths);
            }
            let solution = clipper.execute(BinaryOp::Union, fill_rule)?;
            tracing::debug!(delta, paths = solution.closed.len(), "offset finished");
            return Ok(solution.closed);
        }

        let mut ret = Vec::new();
        for paths in raw {
            clipper.clear();
            clipper.add_subject(&paths);
            ret.extend(clipper.execute(BinaryOp::Union, fill_rule)?.closed);
        }
        tracing::debug!(delta, paths = ret.len(), "offset finished");
        Ok(ret)
    }

    /// The raw (self-overlapping) offset paths, one list per group.
    fn raw_offsets(&self, delta: f64, callback: Option<&mut DeltaCallback<'_>>) -> Vec<Paths> {
        // Tiny offsets would just round back to the input.
        if delta.abs() < 0.5 && callback.is_none() {
            return self.groups.iter().map(|g| g.paths.clone()).collect();
        }

        let mut state = OffsetState::new(&self.options, delta, callback);
        self.groups.iter().map(|g| state.offset_group(g)).collect()
    }

    fn cleanup_clipper(&self) -> Clipper {
        // The output should keep the orientation of the input.
        let reversed = self.paths_reversed();
        Clipper::with_options(ClipperOptions {
            preserve_collinear: self.options.preserve_collinear,
            reverse_solution: self.options.reverse_solution != reversed,
        })
    }

    fn paths_reversed(&self) -> bool {
        self.groups
            .iter()
            .find(|g| g.end_type == EndType::Polygon)
            .is_some_and(|g| g.paths_reversed)
    }

    fn fill_rule(&self) -> FillRule {
        if self.paths_reversed() {
            FillRule::Negative
        } else {
            FillRule::Positive
        }
    }
}

/// Offsets paths by `delta` in one go.
///
/// Values of `miter_limit` and `arc_tolerance` are as in [`OffsetOptions`].
pub fn inflate_paths(
    paths: &[Path],
    delta: f64,
    join_type: JoinType,
    end_type: EndType,
    miter_limit: f64,
    arc_tolerance: f64,
) -> Result<Paths, Error> {
    let options = OffsetOptions::default()
        .with_miter_limit(miter_limit)
        .with_arc_tolerance(arc_tolerance);
    let mut offset = ClipperOffset::with_options(options);
    offset.add_paths(paths, join_type, end_type);
    offset.execute(delta)
}

/// The working state of one offset run.
struct OffsetState<'o, 'c, 'd> {
    options: &'o OffsetOptions,
    delta: f64,
    callback: Option<&'c mut DeltaCallback<'d>>,
    /// `delta`, adjusted for the current group (halved for open paths and
    /// negated for reversed polygons).
    group_delta: f64,
    mit_lim_sqr: f64,
    steps_per_rad: f64,
    step_sin: f64,
    step_cos: f64,
    join_type: JoinType,
    end_type: EndType,
    normals: Vec<Vec2>,
    out: Path,
}

impl<'o, 'c, 'd> OffsetState<'o, 'c, 'd> {
    fn new(options: &'o OffsetOptions, delta: f64, callback: Option<&'c mut DeltaCallback<'d>>) -> Self {
        let mit_lim_sqr = if options.miter_limit <= 1.0 {
            2.0
        } else {
            2.0 / (options.miter_limit * options.miter_limit)
        };
        OffsetState {
            options,
            delta,
            callback,
            group_delta: delta,
            mit_lim_sqr,
            steps_per_rad: 0.0,
            step_sin: 0.0,
            step_cos: 1.0,
            join_type: JoinType::Miter,
            end_type: EndType::Polygon,
            normals: Vec::new(),
            out: Vec::new(),
        }
    }

    /// Sets up the arc stepping for round joins at the current delta.
    fn set_arc_steps(&mut self) {
        let abs_delta = self.group_delta.abs();
        let arc_tol = if self.options.arc_tolerance > 0.01 {
            self.options.arc_tolerance
        } else {
            (2.0 + abs_delta).log10() * DEFAULT_ARC_TOLERANCE
        };
        let steps_per_360 = std::f64::consts::PI / (1.0 - arc_tol / abs_delta).acos();
        let step = 2.0 * std::f64::consts::PI / steps_per_360;
        self.step_sin = step.sin();
        self.step_cos = step.cos();
        if self.group_delta < 0.0 {
            self.step_sin = -self.step_sin;
        }
        self.steps_per_rad = steps_per_360 / (2.0 * std::f64::consts::PI);
    }

    /// Asks the callback (if there is one) for the delta at a vertex.
    fn update_delta(&mut self, path: &[Point], j: usize, k: usize, reversed: bool) {
        if let Some(cb) = self.callback.as_mut() {
            let d = cb(path, &self.normals, j, k);
            self.group_delta = if reversed { -d } else { d };
        }
    }

    fn offset_group(&mut self, group: &Group) -> Paths {
        if group.end_type == EndType::Polygon {
            self.group_delta = if group.paths_reversed { -self.delta } else { self.delta };
        } else {
            self.group_delta = self.delta.abs() * 0.5;
        }
        let abs_delta = self.group_delta.abs();
        self.join_type = group.join_type;

        if self.callback.is_none() && (group.join_type == JoinType::Round || group.end_type == EndType::Round) {
            self.set_arc_steps();
        }

        let mut ret = Vec::new();
        for path in &group.paths {
            self.end_type = group.end_type;
            let cnt = path.len();
            if cnt == 0 || (cnt < 3 && self.end_type == EndType::Polygon) {
                continue;
            }

            if cnt == 1 {
                // A single point becomes a circle or a square.
                let pt = path[0];
                let circle = if group.end_type == EndType::Round {
                    let steps = (self.steps_per_rad * 2.0 * std::f64::consts::PI).ceil() as usize;
                    ellipse(pt, abs_delta, abs_delta, steps)
                } else {
                    let d = self.group_delta.ceil() as i64;
                    Rect::new(pt.x - d, pt.y - d, pt.x + d, pt.y + d).as_path()
                };
                ret.push(circle);
                continue;
            }

            if cnt == 2 && group.end_type == EndType::Joined {
                self.end_type = if group.join_type == JoinType::Round {
                    EndType::Round
                } else {
                    EndType::Square
                };
            }

            self.build_normals(path);
            match self.end_type {
                EndType::Polygon => self.offset_polygon(path, group.paths_reversed, &mut ret),
                EndType::Joined => {
                    self.offset_polygon(path, group.paths_reversed, &mut ret);
                    let reversed = reverse_path(path);
                    self.build_normals(&reversed);
                    self.offset_polygon(&reversed, group.paths_reversed, &mut ret);
                }
                _ => self.offset_open_path(path, &mut ret),
            }
        }
        ret
    }

    fn build_normals(&mut self, path: &[Point]) {
        self.normals.clear();
        self.normals.reserve(path.len());
        for (i, &pt) in path.iter().enumerate() {
            let next = path[(i + 1) % path.len()];
            self.normals.push(unit_normal(pt, next));
        }
    }

    fn perpendicular(&self, pt: Point, norm: Vec2) -> Vec2 {
        to_vec(pt) + norm * self.group_delta
    }

    fn do_bevel(&mut self, path: &[Point], j: usize, k: usize) {
        let (pt1, pt2) = if j == k {
            let offset = self.normals[j] * self.group_delta.abs();
            (to_vec(path[j]) - offset, to_vec(path[j]) + offset)
        } else {
            (self.perpendicular(path[j], self.normals[k]), self.perpendicular(path[j], self.normals[j]))
        };
        self.out.push(to_point(pt1));
        self.out.push(to_point(pt2));
    }

    fn do_square(&mut self, path: &[Point], j: usize, k: usize) {
        let (nj, nk) = (self.normals[j], self.normals[k]);
        let vec = if j == k {
            Vec2::new(nj.y, -nj.x)
        } else {
            normalize(Vec2::new(-nk.y, nk.x) + Vec2::new(nj.y, -nj.x))
        };
        let gd = self.group_delta;

        // Offset the vertex by delta along the (averaged) direction, then
        // find the two corners of the square end.
        let pt_q = to_vec(path[j]) + vec * gd.abs();
        let pt1 = pt_q + Vec2::new(vec.y, -vec.x) * gd;
        let pt2 = pt_q + Vec2::new(-vec.y, vec.x) * gd;
        let pt3 = self.perpendicular(path[k], nk);
        let reflect = |p: Vec2| pt_q + (pt_q - p);

        if j == k {
            let pt4 = pt3 + vec * gd;
            let pt = line_intersection(pt1, pt2, pt3, pt4);
            self.out.push(to_point(reflect(pt)));
            self.out.push(to_point(pt));
        } else {
            let pt4 = self.perpendicular(path[j], nk);
            let pt = line_intersection(pt1, pt2, pt3, pt4);
            self.out.push(to_point(pt));
            self.out.push(to_point(reflect(pt)));
        }
    }

    fn do_miter(&mut self, path: &[Point], j: usize, k: usize, cos_a: f64) {
        let q = self.group_delta / (cos_a + 1.0);
        let pt = to_vec(path[j]) + (self.normals[k] + self.normals[j]) * q;
        self.out.push(to_point(pt));
    }

    fn do_round(&mut self, path: &[Point], j: usize, k: usize, angle: f64) {
        if self.callback.is_some() {
            // The delta changes from vertex to vertex.
            self.set_arc_steps();
        }

        let pt = to_vec(path[j]);
        let mut offset = self.normals[k] * self.group_delta;
        if j == k {
            offset = -offset;
        }
        self.out.push(to_point(pt + offset));

        let steps = (self.steps_per_rad * angle.abs()).ceil() as usize;
        for _ in 1..steps {
            offset = Vec2::new(
                offset.x * self.step_cos - self.step_sin * offset.y,
                offset.x * self.step_sin + offset.y * self.step_cos,
            );
            self.out.push(to_point(pt + offset));
        }
        self.out.push(to_point(self.perpendicular(path[j], self.normals[j])));
    }

    /// Adds the join at `path[j]`, where `k` is the previous vertex.
    fn offset_point(&mut self, path: &[Point], j: usize, k: usize, reversed: bool) {
        if path[j] == path[k] {
            return;
        }
        let (nj, nk) = (self.normals[j], self.normals[k]);
        let sin_a = (nk.cross(nj)).clamp(-1.0, 1.0);
        let cos_a = nj.dot(nk);

        self.update_delta(path, j, k, reversed);
        if is_almost_zero(self.group_delta) {
            self.out.push(path[j]);
            return;
        }

        if cos_a > -0.99 && sin_a * self.group_delta < 0.0 {
            // Concave. The extra point at the vertex makes sure that the
            // cleanup union removes path reversals completely.
            self.out.push(to_point(self.perpendicular(path[j], nk)));
            self.out.push(path[j]);
            self.out.push(to_point(self.perpendicular(path[j], nj)));
        } else if cos_a > 0.999 {
            self.do_miter(path, j, k, cos_a);
        } else if self.join_type == JoinType::Miter {
            if cos_a > self.mit_lim_sqr - 1.0 {
                self.do_miter(path, j, k, cos_a);
            } else {
                self.do_square(path, j, k);
            }
        } else if cos_a > 0.99 || self.join_type == JoinType::Bevel {
            // Nearly straight, or a bevelled join.
            self.do_bevel(path, j, k);
        } else if self.join_type == JoinType::Round {
            self.do_round(path, j, k, sin_a.atan2(cos_a));
        } else {
            self.do_square(path, j, k);
        }
    }

    fn offset_polygon(&mut self, path: &[Point], reversed: bool, out: &mut Paths) {
        // Skip polygons that would vanish by shrinking.
        if (area(path) < 0.0) != (self.group_delta < 0.0) {
            let rect = Rect::from_points(path);
            let min_dim = self.group_delta.abs() * 2.0;
            if min_dim > rect.width() as f64 || min_dim > rect.height() as f64 {
                return;
            }
        }

        self.out = Vec::with_capacity(path.len() * 2);
        let mut prev = path.len() - 1;
        for i in 0..path.len() {
            self.offset_point(path, i, prev, reversed);
            prev = i;
        }
        out.push(std::mem::take(&mut self.out));
    }

    fn do_cap(&mut self, path: &[Point], i: usize) {
        if is_almost_zero(self.group_delta) {
            self.out.push(path[i]);
            return;
        }
        match self.end_type {
            EndType::Butt => self.do_bevel(path, i, i),
            EndType::Round => self.do_round(path, i, i, std::f64::consts::PI),
            _ => self.do_square(path, i, i),
        }
    }

    fn offset_open_path(&mut self, path: &[Point], out: &mut Paths) {
        self.out = Vec::with_capacity(path.len() * 2 + 4);
        let high = path.len() - 1;

        self.update_delta(path, 0, 0, false);
        self.do_cap(path, 0);

        // One side going forwards...
        let mut k = 0;
        for i in 1..high {
            self.offset_point(path, i, k, false);
            k = i;
        }

        // ...then the other side going backwards, with reversed normals.
        for i in (1..=high).rev() {
            self.normals[i] = -self.normals[i - 1];
        }
        self.normals[0] = self.normals[high];

        self.update_delta(path, high, high, false);
        self.do_cap(path, high);

        let mut k = high;
        for i in (1..high).rev() {
            self.offset_point(path, i, k, false);
            k = i;
        }
        out.push(std::mem::take(&mut self.out));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::total_area;

    fn path(coords: &[(i64, i64)]) -> Path {
        coords.iter().map(|&p| p.into()).collect()
    }

    fn square(size: i64) -> Path {
        path(&[(0, 0), (size, 0), (size, size), (0, size)])
    }

    /// Rotates a closed path so that it starts at its smallest point.
    fn normalize_start(mut p: Path) -> Path {
        if let Some(i) = (0..p.len()).min_by_key(|&i| (p[i].x, p[i].y)) {
            p.rotate_left(i);
        }
        p
    }

    #[test]
    fn butt_line() {
        let mut offset = ClipperOffset::new();
        offset.add_path(&path(&[(0, 0), (10, 0)]), JoinType::Miter, EndType::Butt);
        let out = offset.execute(1.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            normalize_start(out[0].clone()),
            normalize_start(path(&[(10, 1), (0, 1), (0, -1), (10, -1)]))
        );
    }

    #[test]
    fn miter_grow_and_shrink() {
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[square(100)], JoinType::Miter, EndType::Polygon);
        assert_eq!(total_area(&offset.execute(10.0).unwrap()), 14400.0);
        assert_eq!(total_area(&offset.execute(-10.0).unwrap()), 6400.0);
        // Shrinking past the middle leaves nothing.
        assert!(offset.execute(-60.0).unwrap().is_empty());
    }

    #[test]
    fn negative_polygons_keep_their_orientation() {
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[reverse_path(&square(100))], JoinType::Miter, EndType::Polygon);
        let out = offset.execute(10.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), -14400.0);
    }

    #[test]
    fn holes_shrink_when_outers_grow() {
        let outer = square(100);
        let hole = reverse_path(&path(&[(25, 25), (75, 25), (75, 75), (25, 75)]));
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[outer, hole], JoinType::Miter, EndType::Polygon);
        let out = offset.execute(5.0).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(total_area(&out), 110.0 * 110.0 - 40.0 * 40.0);
    }

    #[test]
    fn round_point_is_a_circle() {
        let mut offset = ClipperOffset::new();
        offset.add_path(&path(&[(0, 0)]), JoinType::Round, EndType::Round);
        // Open paths get half the delta on each side.
        let out = offset.execute(200.0).unwrap();
        assert_eq!(out.len(), 1);
        let expected = std::f64::consts::PI * 100.0 * 100.0;
        let a = area(&out[0]);
        assert!((a - expected).abs() < expected * 0.01, "area {a}");
    }

    #[test]
    fn square_point() {
        let mut offset = ClipperOffset::new();
        offset.add_path(&path(&[(5, 5)]), JoinType::Square, EndType::Square);
        let out = offset.execute(4.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 16.0);
    }

    #[test]
    fn round_joins_approach_the_true_area() {
        let mut offset = ClipperOffset::with_options(OffsetOptions::default().with_arc_tolerance(0.05));
        offset.add_paths(&[square(100)], JoinType::Round, EndType::Polygon);
        let out = offset.execute(10.0).unwrap();
        let expected = 100.0 * 100.0 + 4.0 * 100.0 * 10.0 + std::f64::consts::PI * 100.0;
        let a = total_area(&out);
        assert!((a - expected).abs() < 20.0, "area {a}");
    }

    #[test]
    fn tiny_delta_is_identity() {
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[square(10)], JoinType::Round, EndType::Polygon);
        let out = offset.execute(0.1).unwrap();
        assert_eq!(total_area(&out), 100.0);
    }

    #[test]
    fn callback_controls_the_delta() {
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[square(100)], JoinType::Miter, EndType::Polygon);
        let mut calls = 0;
        let out = offset
            .execute_with_callback(&mut |_path: &[Point], _normals: &[Vec2], _j: usize, _k: usize| {
                calls += 1;
                10.0
            })
            .unwrap();
        assert_eq!(calls, 4);
        assert_eq!(total_area(&out), 14400.0);
    }

    #[test]
    fn tree_output() {
        let outer = square(100);
        let hole = reverse_path(&path(&[(25, 25), (75, 25), (75, 75), (25, 75)]));
        let mut offset = ClipperOffset::new();
        offset.add_paths(&[outer, hole], JoinType::Miter, EndType::Polygon);
        let tree = offset.execute_tree(5.0).unwrap();
        assert_eq!(tree.root().count(), 1);
        let outer = tree.root().child(0).unwrap();
        assert_eq!(outer.count(), 1);
        assert!(outer.child(0).unwrap().is_hole());
    }

    #[test]
    fn inflate_helper() {
        let out = inflate_paths(&[square(100)], 10.0, JoinType::Square, EndType::Polygon, 2.0, 0.0).unwrap();
        // Square joins cut the corners off at exactly the offset distance.
        let a = total_area(&out);
        assert!(a > 100.0 * 100.0 + 4000.0 && a < 14400.0, "area {a}");
    }
}
