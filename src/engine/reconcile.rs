//! Turning output rings into paths (or a tree of paths) after the sweep.
//!
//! Rings come out of the sweep with some debris: collinear runs, spikes, and
//! the occasional small self-intersection caused by rounding. These are
//! cleaned up here. For tree output, this is also where each ring finds the
//! ring that contains it.

use super::output::{area_triangle, OutPtIdx, OutRecIdx};
use super::{Clipper, Solution, TreeSolution};
use crate::geom::{cross_product, dot_product, intersect_point, point_in_polygon, segments_intersect};
use crate::geom::{Path, Point, PointInPolygon, Rect};
use crate::tree::PolyTree;

fn pts_really_close(p1: Point, p2: Point) -> bool {
    (p1.x - p2.x).abs() < 2 && (p1.y - p2.y).abs() < 2
}

impl Clipper {
    fn is_very_small_triangle(&self, op: OutPtIdx) -> bool {
        let pts = &self.outpts;
        let (prev, next) = (pts[op].prev, pts[op].next);
        pts[next].next == prev
            && (pts_really_close(pts[prev].pt, pts[next].pt)
                || pts_really_close(pts[op].pt, pts[next].pt)
                || pts_really_close(pts[op].pt, pts[prev].pt))
    }

    fn is_valid_closed_path(&self, op: Option<OutPtIdx>) -> bool {
        let Some(op) = op else {
            return false;
        };
        let (prev, next) = (self.outpts[op].prev, self.outpts[op].next);
        next != op && (next != prev || !self.is_very_small_triangle(op))
    }

    /// The ring's points, skipping the interior points of axis-aligned runs.
    fn clean_path(&self, op: OutPtIdx) -> Path {
        let pts = &self.outpts;
        let redundant = |o: OutPtIdx, prev: Point| {
            let (pt, next) = (pts[o].pt, pts[pts[o].next].pt);
            (pt.x == next.x && pt.x == prev.x) || (pt.y == next.y && pt.y == prev.y)
        };

        let mut op2 = op;
        while pts[op2].next != op && redundant(op2, pts[pts[op2].prev].pt) {
            op2 = pts[op2].next;
        }
        let mut ret = vec![pts[op2].pt];
        let mut prev_pt = pts[op2].pt;
        op2 = pts[op2].next;
        while op2 != op {
            if !redundant(op2, prev_pt) {
                ret.push(pts[op2].pt);
                prev_pt = pts[op2].pt;
            }
            op2 = pts[op2].next;
        }
        ret
    }

    /// Like [`point_in_polygon`], but for an output ring.
    fn point_in_op_polygon(&self, pt: Point, op: OutPtIdx) -> PointInPolygon {
        let pts = &self.outpts;
        if pts[op].next == op || pts[op].prev == pts[op].next {
            return PointInPolygon::Outside;
        }

        // Start somewhere that isn't at the height of `pt`.
        let mut start = op;
        loop {
            if pts[start].pt.y != pt.y {
                break;
            }
            start = pts[start].next;
            if start == op {
                break;
            }
        }
        if pts[start].pt.y == pt.y {
            // Not a proper polygon.
            return PointInPolygon::Outside;
        }

        let mut is_above = pts[start].pt.y < pt.y;
        let starting_above = is_above;
        let mut inside = false;
        let mut op2 = pts[start].next;
        while op2 != start {
            if is_above {
                while op2 != start && pts[op2].pt.y < pt.y {
                    op2 = pts[op2].next;
                }
            } else {
                while op2 != start && pts[op2].pt.y > pt.y {
                    op2 = pts[op2].next;
                }
            }
            if op2 == start {
                break;
            }

            let curr = pts[op2].pt;
            let prev = pts[pts[op2].prev].pt;
            if curr.y == pt.y {
                if curr.x == pt.x || (curr.y == prev.y && (pt.x < prev.x) != (pt.x < curr.x)) {
                    return PointInPolygon::OnEdge;
                }
                op2 = pts[op2].next;
                if op2 == start {
                    break;
                }
                continue;
            }

            if curr.x <= pt.x || prev.x <= pt.x {
                if prev.x < pt.x && curr.x < pt.x {
                    inside = !inside;
                } else {
                    let d = cross_product(prev, curr, pt);
                    if d == 0.0 {
                        return PointInPolygon::OnEdge;
                    }
                    if (d < 0.0) == is_above {
                        inside = !inside;
                    }
                }
            }
            is_above = !is_above;
            op2 = pts[op2].next;
        }

        if is_above != starting_above {
            let d = cross_product(pts[pts[op2].prev].pt, pts[op2].pt, pt);
            if d == 0.0 {
                return PointInPolygon::OnEdge;
            }
            if (d < 0.0) == is_above {
                inside = !inside;
            }
        }

        if inside {
            PointInPolygon::Inside
        } else {
            PointInPolygon::Outside
        }
    }

    /// Is the ring at `op1` inside the ring at `op2`?
    ///
    /// Rings produced by the sweep never properly cross, so a couple of
    /// vertices usually settle it. Rings that share most of their vertices
    /// fall back to testing the middle of the first ring's bounding box.
    pub(super) fn path1_inside_path2(&self, op1: OutPtIdx, op2: OutPtIdx) -> bool {
        let mut outside_count = 0i32;
        let mut op = op1;
        loop {
            match self.point_in_op_polygon(self.outpts[op].pt, op2) {
                PointInPolygon::Outside => outside_count += 1,
                PointInPolygon::Inside => outside_count -= 1,
                PointInPolygon::OnEdge => {}
            }
            op = self.outpts[op].next;
            if op == op1 || outside_count.abs() >= 2 {
                break;
            }
        }
        if outside_count.abs() > 1 {
            return outside_count < 0;
        }

        let mid = Rect::from_points(&self.clean_path(op1)).mid_point();
        let path2 = self.clean_path(op2);
        point_in_polygon(mid, &path2) != PointInPolygon::Outside
    }

    /// Removes collinear points (or only spikes, if collinear points are
    /// being preserved), then fixes up any small self-intersections.
    fn clean_collinear(&mut self, outrec: OutRecIdx) {
        let Some(outrec) = self.real_outrec(Some(outrec)) else {
            return;
        };
        if self.outrecs[outrec].is_open {
            return;
        }
        if !self.is_valid_closed_path(self.outrecs[outrec].pts) {
            self.outrecs[outrec].pts = None;
            return;
        }
        let Some(mut start) = self.outrecs[outrec].pts else {
            return;
        };

        let mut op2 = start;
        loop {
            let (prev, pt, next) = {
                let o = &self.outpts[op2];
                (self.outpts[o.prev].pt, o.pt, self.outpts[o.next].pt)
            };
            let removable = cross_product(prev, pt, next) == 0.0
                && (pt == prev
                    || pt == next
                    || !self.options.preserve_collinear
                    || dot_product(prev, pt, next) < 0.0);

            if removable {
                if Some(op2) == self.outrecs[outrec].pts {
                    self.outrecs[outrec].pts = Some(self.outpts[op2].prev);
                }
                let next_op = self.dispose_out_pt(op2);
                if !self.is_valid_closed_path(next_op) {
                    self.outrecs[outrec].pts = None;
                    return;
                }
                let Some(next_op) = next_op else {
                    return;
                };
                op2 = next_op;
                start = next_op;
                continue;
            }
            op2 = self.outpts[op2].next;
            if op2 == start {
                break;
            }
        }
        self.fix_self_intersects(outrec);
    }

    /// Splits off the triangle formed by `split_op` and its neighbors, whose
    /// edges on either side cross each other.
    fn do_split_op(&mut self, outrec: OutRecIdx, split_op: OutPtIdx) {
        let prev_op = self.outpts[split_op].prev;
        let next_op = self.outpts[split_op].next;
        let next_next_op = self.outpts[next_op].next;
        self.outrecs[outrec].pts = Some(prev_op);

        let (prev_pt, split_pt, next_pt, next_next_pt) = (
            self.outpts[prev_op].pt,
            self.outpts[split_op].pt,
            self.outpts[next_op].pt,
            self.outpts[next_next_op].pt,
        );
        let ip = intersect_point(prev_pt, split_pt, next_pt, next_next_pt).unwrap_or(split_pt);

        let area1 = self.ring_area(prev_op);
        let abs_area1 = area1.abs();
        if abs_area1 < 2.0 {
            self.outrecs[outrec].pts = None;
            return;
        }

        let area2 = area_triangle(ip, split_pt, next_pt);
        let abs_area2 = area2.abs();

        // Unlink split_op and next_op, inserting the intersection point.
        if ip == prev_pt || ip == next_next_pt {
            self.outpts[next_next_op].prev = prev_op;
            self.outpts[prev_op].next = next_next_op;
        } else {
            let new_op = self.new_outpt(ip, outrec);
            self.outpts[new_op].prev = prev_op;
            self.outpts[new_op].next = next_next_op;
            self.outpts[next_next_op].prev = new_op;
            self.outpts[prev_op].next = new_op;
        }

        // area1 is the whole ring's area before splitting, and area2 is the
        // triangle's. They can only have the same sign if the triangle is
        // bigger than the rest of the ring or if there's more than one
        // self-intersection.
        if abs_area2 > 1.0 && (abs_area2 > abs_area1 || (area2 > 0.0) == (area1 > 0.0)) {
            let new_or = self.new_outrec();
            self.outrecs[new_or].owner = self.outrecs[outrec].owner;
            self.outpts[split_op].outrec = new_or;
            self.outpts[next_op].outrec = new_or;

            let new_op = self.new_outpt(ip, new_or);
            self.outpts[new_op].prev = next_op;
            self.outpts[new_op].next = split_op;
            self.outrecs[new_or].pts = Some(new_op);
            self.outpts[split_op].prev = new_op;
            self.outpts[next_op].next = new_op;

            if self.using_polytree {
                if self.path1_inside_path2(prev_op, new_op) {
                    self.outrecs[new_or].splits.push(outrec);
                } else {
                    self.outrecs[outrec].splits.push(new_or);
                }
            }
        }
    }

    fn fix_self_intersects(&mut self, outrec: OutRecIdx) {
        let Some(mut op2) = self.outrecs[outrec].pts else {
            return;
        };
        loop {
            let o = &self.outpts[op2];
            let next = o.next;
            let next_next = self.outpts[next].next;
            // Triangles can't self-intersect.
            if o.prev == next_next {
                break;
            }
            if segments_intersect(
                self.outpts[o.prev].pt,
                o.pt,
                self.outpts[next].pt,
                self.outpts[next_next].pt,
                false,
            ) {
                self.do_split_op(outrec, op2);
                match self.outrecs[outrec].pts {
                    Some(pts) => op2 = pts,
                    None => return,
                }
                continue;
            }
            op2 = next;
            if Some(op2) == self.outrecs[outrec].pts {
                break;
            }
        }
    }

    /// Reads a ring out into a path, dropping consecutive duplicates.
    ///
    /// Closed rings are read backwards when `reverse` is set. Returns `None`
    /// if the ring is too small to be worth returning.
    fn build_path(&self, op: Option<OutPtIdx>, reverse: bool, is_open: bool) -> Option<Path> {
        let op = op?;
        let pts = &self.outpts;
        if pts[op].next == op || (!is_open && pts[op].next == pts[op].prev) {
            return None;
        }

        let (start, mut op2) = if reverse {
            (op, pts[op].prev)
        } else {
            let start = pts[op].next;
            (start, pts[start].next)
        };
        let mut last_pt = pts[start].pt;
        let mut path = vec![last_pt];
        while op2 != start {
            if pts[op2].pt != last_pt {
                last_pt = pts[op2].pt;
                path.push(last_pt);
            }
            op2 = if reverse { pts[op2].prev } else { pts[op2].next };
        }

        if is_open && path.len() < 2 {
            None
        } else if path.len() == 3 && !is_open && self.is_very_small_triangle(op2) {
            None
        } else {
            Some(path)
        }
    }

    pub(super) fn build_paths(&mut self) -> Solution {
        let mut solution = Solution::default();
        let reverse = self.options.reverse_solution;

        // Cleaning can split rings, which pushes new ones onto the end.
        let mut i = 0;
        while i < self.outrecs.len() {
            let or = OutRecIdx(i);
            i += 1;
            if self.outrecs[or].pts.is_none() {
                continue;
            }
            if self.outrecs[or].is_open {
                if let Some(path) = self.build_path(self.outrecs[or].pts, reverse, true) {
                    solution.open.push(path);
                }
            } else {
                self.clean_collinear(or);
                // Closed paths have positive orientation unless reversed.
                if let Some(path) = self.build_path(self.outrecs[or].pts, reverse, false) {
                    solution.closed.push(path);
                }
            }
        }
        solution
    }

    /// Makes sure that a ring's path and bounds are up to date, returning
    /// false if the ring turned out to be empty.
    fn check_bounds(&mut self, outrec: OutRecIdx) -> bool {
        if self.outrecs[outrec].pts.is_none() {
            return false;
        }
        if !self.outrecs[outrec].bounds.is_empty() {
            return true;
        }
        self.clean_collinear(outrec);
        let Some(path) = self.build_path(self.outrecs[outrec].pts, self.options.reverse_solution, false) else {
            return false;
        };
        let rec = &mut self.outrecs[outrec];
        rec.bounds = Rect::from_points(&path);
        rec.path = path;
        true
    }

    /// Searches the rings split off from `outrec`'s owner (and the rings
    /// split off from those) for one that contains `outrec`.
    fn check_split_owner(&mut self, outrec: OutRecIdx, splits: &[OutRecIdx]) -> bool {
        enum Work {
            Visit(OutRecIdx),
            Test(OutRecIdx),
        }

        let mut stack: Vec<Work> = splits.iter().rev().map(|&s| Work::Visit(s)).collect();
        while let Some(work) = stack.pop() {
            match work {
                Work::Visit(s) => {
                    let Some(split) = self.real_outrec(Some(s)) else {
                        continue;
                    };
                    if split == outrec || self.outrecs[split].recursive_split == Some(outrec) {
                        continue;
                    }
                    self.outrecs[split].recursive_split = Some(outrec);
                    // Nested splits get searched before the split itself.
                    stack.push(Work::Test(split));
                    stack.extend(self.outrecs[split].splits.iter().rev().map(|&s| Work::Visit(s)));
                }
                Work::Test(split) => {
                    if !self.is_valid_owner(outrec, split) || !self.check_bounds(split) {
                        continue;
                    }
                    if !self.outrecs[split].bounds.contains_rect(&self.outrecs[outrec].bounds) {
                        continue;
                    }
                    let (Some(pts), Some(split_pts)) = (self.outrecs[outrec].pts, self.outrecs[split].pts) else {
                        continue;
                    };
                    if self.path1_inside_path2(pts, split_pts) {
                        self.outrecs[outrec].owner = Some(split);
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Walks up `outrec`'s owner chain until reaching a ring that really
    /// contains it.
    fn resolve_owner(&mut self, outrec: OutRecIdx) {
        for _ in 0..self.outrecs.len() {
            let Some(owner) = self.outrecs[outrec].owner else {
                return;
            };
            let splits = self.outrecs[owner].splits.clone();
            if !splits.is_empty() && self.check_split_owner(outrec, &splits) {
                return;
            }
            if self.outrecs[owner].pts.is_some() && self.check_bounds(owner) {
                if let (Some(pts), Some(owner_pts)) = (self.outrecs[outrec].pts, self.outrecs[owner].pts) {
                    if self.path1_inside_path2(pts, owner_pts) {
                        return;
                    }
                }
            }
            self.outrecs[outrec].owner = self.outrecs[owner].owner;
        }
        self.outrecs[outrec].owner = None;
    }

    /// Places `outrec` in the tree, placing its owners first if necessary.
    fn check_owners(&mut self, outrec: OutRecIdx, tree: &mut PolyTree) {
        let mut chain = Vec::new();
        let mut cur = Some(outrec);
        while let Some(or) = cur {
            let rec = &self.outrecs[or];
            if rec.polypath.is_some() || rec.bounds.is_empty() || chain.contains(&or) {
                break;
            }
            self.resolve_owner(or);
            chain.push(or);
            cur = self.outrecs[or].owner;
        }

        // Owners go into the tree before the rings they contain.
        for or in chain.into_iter().rev() {
            let parent = self.outrecs[or]
                .owner
                .and_then(|owner| self.outrecs[owner].polypath)
                .unwrap_or(tree.root_idx());
            let path = std::mem::take(&mut self.outrecs[or].path);
            self.outrecs[or].polypath = Some(tree.add_child(parent, path));
        }
    }

    pub(super) fn build_tree(&mut self) -> TreeSolution {
        let mut solution = TreeSolution::default();
        let reverse = self.options.reverse_solution;

        let mut i = 0;
        while i < self.outrecs.len() {
            let or = OutRecIdx(i);
            i += 1;
            if self.outrecs[or].pts.is_none() {
                continue;
            }
            if self.outrecs[or].is_open {
                if let Some(path) = self.build_path(self.outrecs[or].pts, reverse, true) {
                    solution.open.push(path);
                }
                continue;
            }
            if self.check_bounds(or) {
                self.check_owners(or, &mut solution.tree);
            }
        }
        solution
    }
}

#[cfg(test)]
mod tests {
    use crate::{BinaryOp, Clipper, ClipperOptions, FillRule, Point};

    fn path(coords: &[(i64, i64)]) -> Vec<Point> {
        coords.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn spikes_are_removed() {
        // A square with a spike poking out of its top edge.
        let mut clipper = Clipper::new();
        clipper.add_subject(&[path(&[(0, 0), (5, 0), (5, -10), (5, 0), (10, 0), (10, 10), (0, 10)])]);
        let solution = clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(solution.closed.len(), 1);
        assert!(!solution.closed[0].contains(&Point::new(5, -10)));
    }

    #[test]
    fn collinear_points_can_be_dropped() {
        let subject = path(&[(0, 0), (5, 0), (10, 0), (10, 10), (0, 10)]);

        let mut clipper = Clipper::with_options(ClipperOptions {
            preserve_collinear: false,
            reverse_solution: false,
        });
        clipper.add_subject(&[subject]);
        let solution = clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(solution.closed.len(), 1);
        assert_eq!(solution.closed[0].len(), 4);
    }

    #[test]
    fn reversed_solution_is_negative() {
        let mut clipper = Clipper::with_options(ClipperOptions {
            preserve_collinear: true,
            reverse_solution: true,
        });
        clipper.add_subject(&[path(&[(0, 0), (10, 0), (10, 10), (0, 10)])]);
        let solution = clipper.execute(BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(solution.closed.len(), 1);
        assert_eq!(crate::area(&solution.closed[0]), -100.0);
    }

    #[test]
    fn open_output_has_no_single_points() {
        // The open path's second edge only touches the clip region at the
        // clip's bottom vertex, leaving a one-point fragment behind.
        let open = [path(&[(-3, 2), (4, -3), (2, -2)])];
        let clip = [path(&[(-3, 0), (3, 2), (4, 2), (4, -3), (1, -2)])];

        let mut clipper = Clipper::new();
        clipper.add_open_subject(&open);
        clipper.add_clip(&clip);
        let solution = clipper.execute(BinaryOp::Union, FillRule::EvenOdd).unwrap();
        assert_eq!(solution.open, vec![path(&[(-3, 2), (-1, 0)])]);

        let solution = clipper.execute_tree(BinaryOp::Union, FillRule::EvenOdd).unwrap();
        assert!(solution.open.iter().all(|p| p.len() >= 2), "{:?}", solution.open);
    }

    #[test]
    fn nested_squares_make_a_tree() {
        let mut clipper = Clipper::new();
        clipper.add_subject(&[
            path(&[(0, 0), (100, 0), (100, 100), (0, 100)]),
            path(&[(10, 10), (10, 90), (90, 90), (90, 10)]),
            path(&[(20, 20), (80, 20), (80, 80), (20, 80)]),
        ]);
        let solution = clipper.execute_tree(BinaryOp::Union, FillRule::NonZero).unwrap();
        let root = solution.tree.root();
        assert_eq!(root.count(), 1);
        let outer = root.child(0).unwrap();
        assert!(!outer.is_hole());
        assert_eq!(outer.count(), 1);
        let hole = outer.child(0).unwrap();
        assert!(hole.is_hole());
        assert_eq!(hole.count(), 1);
        let island = hole.child(0).unwrap();
        assert!(!island.is_hole());
        assert_eq!(island.level(), 3);
        assert_eq!(solution.tree.total_count(), 3);
    }
}
