//! The sweep-line clipping engine.
//!
//! [`Clipper`] takes subject and clip paths, runs a Vatti sweep over them, and
//! produces either flat output paths or a [`PolyTree`].
//!
//! The sweep moves through a sorted set of "scan lines" (the `y` coordinates
//! of vertices). Between two consecutive scan lines (a *scanbeam*) the set of
//! edges crossing the sweep line is fixed up to reordering, and that set is
//! kept in the active edge list. Everything that links to something else
//! (vertices, active edges, output points and output rings) lives in an arena
//! and is linked by typed indices.

use std::collections::BTreeSet;

use crate::geom::{Path, Paths, Rect};
use crate::tree::PolyTree;
use crate::{BinaryOp, Error, FillRule, PathType};

mod active;
mod horizontal;
mod output;
mod reconcile;
mod sweep;
mod vertex;

use active::{Active, ActiveIdx, ActiveVec};
pub(crate) use output::OutRecIdx;
use output::{HorzJoin, HorzSegment, IntersectNode, OutPt, OutPtVec, OutRec, OutRecVec};
use vertex::VertexData;

/// Options controlling the output of a [`Clipper`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClipperOptions {
    /// If true, collinear vertices in the output are kept, except for those
    /// that form 180 degree spikes.
    pub preserve_collinear: bool,
    /// If true, closed output paths have negative orientation.
    pub reverse_solution: bool,
}

impl Default for ClipperOptions {
    fn default() -> Self {
        ClipperOptions {
            preserve_collinear: true,
            reverse_solution: false,
        }
    }
}

/// Paths that have been preprocessed for clipping.
///
/// Converting paths into the clipper's internal representation is cheap but
/// not free; if the same paths are going to be clipped against many
/// different things, they can be converted once and loaded into several
/// clippers with [`Clipper::add_reusable_data`].
#[derive(Clone, Debug, Default)]
pub struct ReusableData {
    data: VertexData,
}

impl ReusableData {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preprocesses and stores some paths.
    pub fn add_paths(&mut self, paths: &[Path], path_type: PathType, is_open: bool) {
        self.data.add_paths(paths, path_type, is_open);
    }

    /// Removes all stored paths.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Does this container have any paths that will take part in clipping?
    pub fn is_empty(&self) -> bool {
        self.data.minima.is_empty()
    }
}

/// The output of [`Clipper::execute`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    /// The closed output paths.
    pub closed: Paths,
    /// The parts of the open subject paths that survived clipping.
    pub open: Paths,
}

/// The output of [`Clipper::execute_tree`].
#[derive(Clone, Debug, Default)]
pub struct TreeSolution {
    /// The closed output paths, nested by containment.
    pub tree: PolyTree,
    /// The parts of the open subject paths that survived clipping.
    pub open: Paths,
}

/// A polygon clipper.
///
/// Add subject paths (and optionally clip paths) and then call
/// [`Clipper::execute`] or [`Clipper::execute_tree`]. The input paths are kept
/// after execution, so the same inputs can be clipped several times with
/// different operations.
///
/// ```
/// use clipsweeper::{BinaryOp, Clipper, FillRule, Point};
///
/// let square = |x: i64, y: i64| {
///     vec![
///         Point::new(x, y),
///         Point::new(x + 10, y),
///         Point::new(x + 10, y + 10),
///         Point::new(x, y + 10),
///     ]
/// };
/// let mut clipper = Clipper::new();
/// clipper.add_subject(&[square(0, 0)]);
/// clipper.add_clip(&[square(5, 5)]);
/// let solution = clipper.execute(BinaryOp::Intersection, FillRule::NonZero).unwrap();
/// assert_eq!(solution.closed.len(), 1);
/// assert_eq!(clipsweeper::area(&solution.closed[0]), 25.0);
/// ```
#[derive(Clone, Debug)]
pub struct Clipper {
    options: ClipperOptions,
    op: BinaryOp,
    fill_rule: FillRule,

    input: VertexData,
    minima_sorted: bool,
    has_open_paths: bool,

    actives: ActiveVec<Active>,
    ael_head: Option<ActiveIdx>,
    sel_head: Option<ActiveIdx>,
    scanlines: BTreeSet<i64>,
    current_locmin: usize,
    current_bot_y: i64,
    intersect_nodes: Vec<IntersectNode>,

    outrecs: OutRecVec<OutRec>,
    outpts: OutPtVec<OutPt>,
    horz_segs: Vec<HorzSegment>,
    horz_joins: Vec<HorzJoin>,

    using_polytree: bool,
    succeeded: bool,
}

impl Default for Clipper {
    fn default() -> Self {
        Self::with_options(ClipperOptions::default())
    }
}

impl Clipper {
    /// Creates a clipper with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipper with the given options.
    pub fn with_options(options: ClipperOptions) -> Self {
        Clipper {
            options,
            op: BinaryOp::Union,
            fill_rule: FillRule::EvenOdd,
            input: VertexData::default(),
            minima_sorted: false,
            has_open_paths: false,
            actives: ActiveVec::default(),
            ael_head: None,
            sel_head: None,
            scanlines: BTreeSet::new(),
            current_locmin: 0,
            current_bot_y: 0,
            intersect_nodes: Vec::new(),
            outrecs: OutRecVec::default(),
            outpts: OutPtVec::default(),
            horz_segs: Vec::new(),
            horz_joins: Vec::new(),
            using_polytree: false,
            succeeded: true,
        }
    }

    /// The options this clipper was created with.
    pub fn options(&self) -> &ClipperOptions {
        &self.options
    }

    /// Changes the options for subsequent executions.
    pub fn set_options(&mut self, options: ClipperOptions) {
        self.options = options;
    }

    /// Adds closed subject paths.
    pub fn add_subject(&mut self, paths: &[Path]) {
        self.add_paths(paths, PathType::Subject, false);
    }

    /// Adds open subject paths.
    ///
    /// Open paths are clipped against the closed paths but never affect the
    /// filled region.
    pub fn add_open_subject(&mut self, paths: &[Path]) {
        self.add_paths(paths, PathType::Subject, true);
    }

    /// Adds closed clip paths.
    pub fn add_clip(&mut self, paths: &[Path]) {
        self.add_paths(paths, PathType::Clip, false);
    }

    /// Adds paths with an explicit type.
    ///
    /// Clip paths must be closed; open clip paths are accepted but play no
    /// part in the output.
    pub fn add_paths(&mut self, paths: &[Path], path_type: PathType, is_open: bool) {
        if is_open {
            self.has_open_paths = true;
        }
        self.minima_sorted = false;
        self.input.add_paths(paths, path_type, is_open);
    }

    /// Adds paths that were preprocessed earlier.
    pub fn add_reusable_data(&mut self, data: &ReusableData) {
        if data.data.minima.is_empty() {
            return;
        }
        self.minima_sorted = false;
        if data.data.minima.iter().any(|(_, lm)| lm.is_open) {
            self.has_open_paths = true;
        }
        self.input.append(&data.data);
    }

    /// Removes all input paths.
    pub fn clear(&mut self) {
        self.clear_solution_only();
        self.input.clear();
        self.current_locmin = 0;
        self.minima_sorted = false;
        self.has_open_paths = false;
    }

    fn clear_solution_only(&mut self) {
        self.ael_head = None;
        self.sel_head = None;
        self.actives.clear();
        self.scanlines.clear();
        self.intersect_nodes.clear();
        self.outrecs.clear();
        self.outpts.clear();
        self.horz_segs.clear();
        self.horz_joins.clear();
    }

    /// The bounding box of all the input paths.
    ///
    /// Returns the zero rectangle if the input is empty (or has no area).
    pub fn bounds(&self) -> Rect {
        let ret = Rect::from_points(self.input.vertices.iter().map(|(_, v)| &v.pt));
        if ret.is_empty() {
            Rect::default()
        } else {
            ret
        }
    }

    /// Runs a boolean operation, returning flat output paths.
    ///
    /// Closed output paths have positive orientation (see
    /// [`is_positive`](crate::is_positive)) unless
    /// [`ClipperOptions::reverse_solution`] is set. On failure no partial
    /// output is returned.
    pub fn execute(&mut self, op: BinaryOp, fill_rule: FillRule) -> Result<Solution, Error> {
        self.using_polytree = false;
        self.execute_internal(op, fill_rule);
        let ret = if self.succeeded {
            let solution = self.build_paths();
            tracing::debug!(
                closed = solution.closed.len(),
                open = solution.open.len(),
                "clipping finished"
            );
            Ok(solution)
        } else {
            tracing::debug!("clipping failed");
            Err(Error::ExecutionFailed)
        };
        self.clear_solution_only();
        ret
    }

    /// Runs a boolean operation, returning the closed output as a tree.
    ///
    /// Each node of the tree is contained in its parent; holes and outer
    /// polygons alternate by level.
    pub fn execute_tree(&mut self, op: BinaryOp, fill_rule: FillRule) -> Result<TreeSolution, Error> {
        self.using_polytree = true;
        self.execute_internal(op, fill_rule);
        let ret = if self.succeeded {
            let solution = self.build_tree();
            tracing::debug!(
                polygons = solution.tree.total_count(),
                open = solution.open.len(),
                "clipping finished"
            );
            Ok(solution)
        } else {
            tracing::debug!("clipping failed");
            Err(Error::ExecutionFailed)
        };
        self.clear_solution_only();
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{area, total_area, Point};

    fn path(coords: &[(i64, i64)]) -> Path {
        coords.iter().map(|&p| p.into()).collect()
    }

    fn square(x: i64, y: i64, size: i64) -> Path {
        Rect::new(x, y, x + size, y + size).as_path()
    }

    fn run(subjects: &[Path], clips: &[Path], op: BinaryOp, fill_rule: FillRule) -> Solution {
        let mut clipper = Clipper::new();
        clipper.add_subject(subjects);
        clipper.add_clip(clips);
        clipper.execute(op, fill_rule).unwrap()
    }

    #[test]
    fn overlapping_squares() {
        let subj = [square(0, 0, 10)];
        let clip = [square(5, 5, 10)];

        let sol = run(&subj, &clip, BinaryOp::Intersection, FillRule::NonZero);
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(area(&sol.closed[0]), 25.0);
        let mut pts = sol.closed[0].clone();
        pts.sort_by_key(|p| (p.x, p.y));
        assert_eq!(pts, path(&[(5, 5), (5, 10), (10, 5), (10, 10)]));

        let sol = run(&subj, &clip, BinaryOp::Union, FillRule::NonZero);
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(total_area(&sol.closed), 175.0);

        let sol = run(&subj, &clip, BinaryOp::Difference, FillRule::NonZero);
        assert_eq!(total_area(&sol.closed), 75.0);

        let sol = run(&subj, &clip, BinaryOp::Xor, FillRule::NonZero);
        assert_eq!(total_area(&sol.closed), 150.0);
    }

    #[test]
    fn empty_input() {
        let sol = run(&[], &[], BinaryOp::Union, FillRule::NonZero);
        assert_eq!(sol, Solution::default());
        let sol = run(&[], &[square(0, 0, 10)], BinaryOp::Intersection, FillRule::EvenOdd);
        assert!(sol.closed.is_empty());
    }

    #[test]
    fn output_orientation() {
        let cw = square(0, 0, 10);
        let ccw: Path = cw.iter().rev().copied().collect();
        for input in [cw, ccw] {
            let sol = run(&[input.clone()], &[], BinaryOp::Union, FillRule::NonZero);
            assert_eq!(sol.closed.len(), 1);
            assert!(area(&sol.closed[0]) > 0.0);

            let mut clipper = Clipper::with_options(ClipperOptions {
                reverse_solution: true,
                ..ClipperOptions::default()
            });
            clipper.add_subject(&[input]);
            let sol = clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap();
            assert!(area(&sol.closed[0]) < 0.0);
        }
    }

    #[test]
    fn overlapping_subjects_fill_rules() {
        // The overlap has winding number 2.
        let subj = [square(0, 0, 10), square(5, 5, 10)];
        let even_odd = run(&subj, &[], BinaryOp::Union, FillRule::EvenOdd);
        let non_zero = run(&subj, &[], BinaryOp::Union, FillRule::NonZero);
        assert_eq!(total_area(&even_odd.closed), 150.0);
        assert_eq!(total_area(&non_zero.closed), 175.0);
    }

    #[test]
    fn positive_and_negative_fill() {
        let cw = square(0, 0, 10);
        let ccw: Path = square(20, 0, 10).into_iter().rev().collect();
        let pos = run(&[cw.clone(), ccw.clone()], &[], BinaryOp::Union, FillRule::Positive);
        assert_eq!(total_area(&pos.closed), 100.0);
        assert!(pos.closed.iter().flatten().all(|p| p.x <= 10));
        let neg = run(&[cw, ccw], &[], BinaryOp::Union, FillRule::Negative);
        assert_eq!(total_area(&neg.closed), 100.0);
        assert!(neg.closed.iter().flatten().all(|p| p.x >= 20));
    }

    #[test]
    fn collinear_points() {
        let p = path(&[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)]);
        let sol = run(&[p.clone()], &[], BinaryOp::Union, FillRule::NonZero);
        assert_eq!(sol.closed[0].len(), 5);

        let mut clipper = Clipper::with_options(ClipperOptions {
            preserve_collinear: false,
            ..ClipperOptions::default()
        });
        clipper.add_subject(&[p]);
        let sol = clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(sol.closed[0].len(), 4);
    }

    #[test]
    fn open_path_clipping() {
        let mut clipper = Clipper::new();
        clipper.add_open_subject(&[path(&[(-5, 5), (15, 5)])]);
        clipper.add_clip(&[square(0, 0, 10)]);
        let sol = clipper.execute(BinaryOp::Intersection, FillRule::NonZero).unwrap();
        assert!(sol.closed.is_empty());
        assert_eq!(sol.open.len(), 1);
        let mut xs: Vec<i64> = sol.open[0].iter().map(|p| p.x).collect();
        xs.sort();
        assert_eq!(xs, vec![0, 10]);
        assert!(sol.open[0].iter().all(|p| p.y == 5));

        let sol = clipper.execute(BinaryOp::Difference, FillRule::NonZero).unwrap();
        assert_eq!(sol.open.len(), 2);
    }

    #[test]
    fn reusable_data() {
        let mut data = ReusableData::new();
        data.add_paths(&[square(0, 0, 10)], PathType::Subject, false);
        assert!(!data.is_empty());

        let mut clipper = Clipper::new();
        clipper.add_reusable_data(&data);
        clipper.add_clip(&[square(5, 0, 10)]);
        let sol = clipper.execute(BinaryOp::Intersection, FillRule::NonZero).unwrap();
        assert_eq!(total_area(&sol.closed), 50.0);

        // The inputs survive execution.
        let sol = clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(total_area(&sol.closed), 150.0);
        assert_eq!(clipper.bounds(), Rect::new(0, 0, 15, 10));

        clipper.clear();
        assert_eq!(clipper.bounds(), Rect::default());
        let sol = clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap();
        assert!(sol.closed.is_empty());
    }

    #[test]
    fn holes_in_tree() {
        let outer = square(0, 0, 30);
        let hole: Path = square(10, 10, 10).into_iter().rev().collect();
        let island = square(13, 13, 4);
        let mut clipper = Clipper::new();
        clipper.add_subject(&[outer, hole, island]);
        let sol = clipper.execute_tree(BinaryOp::Union, FillRule::NonZero).unwrap();
        let root = sol.tree.root();
        assert_eq!(root.count(), 1);
        let outer = root.child(0).unwrap();
        assert!(!outer.is_hole());
        assert_eq!(outer.count(), 1);
        let hole = outer.child(0).unwrap();
        assert!(hole.is_hole());
        assert!(area(hole.polygon()) < 0.0);
        let island = hole.child(0).unwrap();
        assert!(!island.is_hole());
        assert_eq!(island.level(), 3);
        assert_eq!(sol.tree.root().area(), 900.0 - 100.0 + 16.0);
    }

    #[test]
    fn touching_squares_merge() {
        let sol = run(
            &[square(0, 0, 10), square(10, 0, 10)],
            &[],
            BinaryOp::Union,
            FillRule::NonZero,
        );
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(total_area(&sol.closed), 200.0);
    }

    #[test]
    fn crossing_bowtie() {
        // A self-intersecting bowtie has two lobes, of opposite orientation.
        let bowtie = path(&[(0, 0), (10, 10), (10, 0), (0, 10)]);
        let sol = run(&[bowtie.clone()], &[], BinaryOp::Union, FillRule::EvenOdd);
        assert_eq!(sol.closed.len(), 2);
        assert_eq!(total_area(&sol.closed), 50.0);
        for p in &sol.closed {
            assert!(p.contains(&Point::new(5, 5)));
        }
        let sol = run(&[bowtie], &[], BinaryOp::Union, FillRule::Positive);
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(total_area(&sol.closed), 25.0);
    }
}
