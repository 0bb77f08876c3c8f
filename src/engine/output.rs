//! Output rings under construction.
//!
//! Each output ring is an [`OutRec`] that owns a circular list of
//! [`OutPt`]s. While the sweep is running, a ring is bounded by two hot
//! active edges (its *front* and *back* edges); new points are added at the
//! front or the back depending on which edge produced them. Rings that get
//! merged into others are left in the arena with no points, and their
//! `owner` points towards the ring that absorbed them.

use super::active::{ActiveIdx, JoinWith};
use super::Clipper;
use crate::geom::{cross_product, perpendicular_distance_sqrd, Path, Point, Rect};
use crate::tree::NodeIdx;

typed_vec!(OutRecVec, OutRecIdx, "or");
typed_vec!(OutPtVec, OutPtIdx, "op");

#[derive(Clone, Debug)]
pub(crate) struct OutPt {
    pub pt: Point,
    pub next: OutPtIdx,
    pub prev: OutPtIdx,
    /// The ring this point was added to. This can be stale after rings are
    /// merged; see [`Clipper::real_outrec`].
    pub outrec: OutRecIdx,
    /// Has a horizontal segment claimed this point as its left end?
    pub horz: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct OutRec {
    pub owner: Option<OutRecIdx>,
    pub front_edge: Option<ActiveIdx>,
    pub back_edge: Option<ActiveIdx>,
    pub pts: Option<OutPtIdx>,
    pub polypath: Option<NodeIdx>,
    pub bounds: Rect,
    pub path: Path,
    pub is_open: bool,
    /// Rings that were split off this one after the sweep.
    pub splits: Vec<OutRecIdx>,
    pub recursive_split: Option<OutRecIdx>,
}

/// A run of horizontal output points, recorded so that overlapping runs in
/// different rings can be stitched together after the sweep.
#[derive(Clone, Debug)]
pub(crate) struct HorzSegment {
    pub left_op: OutPtIdx,
    pub right_op: Option<OutPtIdx>,
    pub left_to_right: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct HorzJoin {
    pub op1: OutPtIdx,
    pub op2: OutPtIdx,
}

#[derive(Clone, Debug)]
pub(crate) struct IntersectNode {
    pub pt: Point,
    pub edge1: ActiveIdx,
    pub edge2: ActiveIdx,
}

/// Twice the signed area of a triangle.
pub(crate) fn area_triangle(pt1: Point, pt2: Point, pt3: Point) -> f64 {
    let f = |a: Point, b: Point| (a.y as f64 + b.y as f64) * (a.x as f64 - b.x as f64);
    f(pt3, pt1) + f(pt1, pt2) + f(pt2, pt3)
}

impl Clipper {
    pub(super) fn new_outrec(&mut self) -> OutRecIdx {
        self.outrecs.push(OutRec::default())
    }

    /// Creates a ring containing a single point.
    pub(super) fn new_outpt(&mut self, pt: Point, outrec: OutRecIdx) -> OutPtIdx {
        let idx = OutPtIdx(self.outpts.len());
        self.outpts.push(OutPt {
            pt,
            next: idx,
            prev: idx,
            outrec,
            horz: false,
        })
    }

    /// Follows owner links from a dead ring to the ring that absorbed it.
    pub(super) fn real_outrec(&self, outrec: Option<OutRecIdx>) -> Option<OutRecIdx> {
        let mut outrec = outrec;
        for _ in 0..=self.outrecs.len() {
            let or = outrec?;
            if self.outrecs[or].pts.is_some() {
                return Some(or);
            }
            outrec = self.outrecs[or].owner;
        }
        None
    }

    /// Returns true unless `outrec` appears on the owner chain of `test_owner`.
    pub(super) fn is_valid_owner(&self, outrec: OutRecIdx, test_owner: OutRecIdx) -> bool {
        let mut t = Some(test_owner);
        for _ in 0..=self.outrecs.len() {
            match t {
                None => return true,
                Some(o) if o == outrec => return false,
                Some(o) => t = self.outrecs[o].owner,
            }
        }
        false
    }

    pub(super) fn set_owner(&mut self, outrec: OutRecIdx, new_owner: OutRecIdx) {
        // Skip over dead owners.
        while let Some(o) = self.outrecs[new_owner].owner {
            if self.outrecs[o].pts.is_some() || o == new_owner {
                break;
            }
            self.outrecs[new_owner].owner = self.outrecs[o].owner;
        }

        // Don't let `outrec` end up owning its own owner.
        if !self.is_valid_owner(outrec, new_owner) {
            self.outrecs[new_owner].owner = self.outrecs[outrec].owner;
        }
        self.outrecs[outrec].owner = Some(new_owner);
    }

    pub(super) fn set_sides(&mut self, outrec: OutRecIdx, front: ActiveIdx, back: ActiveIdx) {
        self.outrecs[outrec].front_edge = Some(front);
        self.outrecs[outrec].back_edge = Some(back);
    }

    pub(super) fn swap_outrecs(&mut self, e1: ActiveIdx, e2: ActiveIdx) {
        let or1 = self.actives[e1].outrec;
        let or2 = self.actives[e2].outrec;
        if or1 == or2 {
            if let Some(or) = or1 {
                let rec = &mut self.outrecs[or];
                std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
            }
            return;
        }

        if let Some(or) = or1 {
            let rec = &mut self.outrecs[or];
            if rec.front_edge == Some(e1) {
                rec.front_edge = Some(e2);
            } else {
                rec.back_edge = Some(e2);
            }
        }
        if let Some(or) = or2 {
            let rec = &mut self.outrecs[or];
            if rec.front_edge == Some(e2) {
                rec.front_edge = Some(e1);
            } else {
                rec.back_edge = Some(e1);
            }
        }
        self.actives[e1].outrec = or2;
        self.actives[e2].outrec = or1;
    }

    /// Detaches a finished ring from both of its edges.
    fn uncouple_outrec(&mut self, e: ActiveIdx) {
        let Some(or) = self.actives[e].outrec else {
            return;
        };
        if let Some(front) = self.outrecs[or].front_edge.take() {
            self.actives[front].outrec = None;
        }
        if let Some(back) = self.outrecs[or].back_edge.take() {
            self.actives[back].outrec = None;
        }
    }

    fn swap_front_back_sides(&mut self, outrec: OutRecIdx) {
        let rec = &mut self.outrecs[outrec];
        std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
        if let Some(pts) = rec.pts {
            rec.pts = Some(self.outpts[pts].next);
        }
    }

    /// Adds a point to the end of the ring that `e` is responsible for.
    ///
    /// Returns the existing point if it would be a duplicate.
    pub(super) fn add_out_pt(&mut self, e: ActiveIdx, pt: Point) -> Option<OutPtIdx> {
        let or = self.actives[e].outrec?;
        let to_front = self.is_front(e);
        let op_front = self.outrecs[or].pts?;
        let op_back = self.outpts[op_front].next;

        if to_front && pt == self.outpts[op_front].pt {
            return Some(op_front);
        } else if !to_front && pt == self.outpts[op_back].pt {
            return Some(op_back);
        }

        let new_op = self.outpts.push(OutPt {
            pt,
            next: op_back,
            prev: op_front,
            outrec: or,
            horz: false,
        });
        self.outpts[op_back].prev = new_op;
        self.outpts[op_front].next = new_op;
        if to_front {
            self.outrecs[or].pts = Some(new_op);
        }
        Some(new_op)
    }

    pub(super) fn start_open_path(&mut self, e: ActiveIdx, pt: Point) -> OutPtIdx {
        let or = self.new_outrec();
        self.outrecs[or].is_open = true;
        if self.actives[e].wind_dx > 0 {
            self.outrecs[or].front_edge = Some(e);
        } else {
            self.outrecs[or].back_edge = Some(e);
        }
        self.actives[e].outrec = Some(or);
        let op = self.new_outpt(pt, or);
        self.outrecs[or].pts = Some(op);
        op
    }

    /// Starts a new output ring bounded by `e1` and `e2`.
    pub(super) fn add_local_min_poly(&mut self, e1: ActiveIdx, e2: ActiveIdx, pt: Point, is_new: bool) -> OutPtIdx {
        let or = self.new_outrec();
        self.actives[e1].outrec = Some(or);
        self.actives[e2].outrec = Some(or);

        if self.is_open(e1) {
            self.outrecs[or].is_open = true;
            if self.actives[e1].wind_dx > 0 {
                self.set_sides(or, e1, e2);
            } else {
                self.set_sides(or, e2, e1);
            }
        } else {
            // The wind direction of the input paths is unrelated to the
            // orientation of the output: that is decided by which of the two
            // edges is the front (ascending) one.
            let prev_hot = self
                .prev_hot_edge(e1)
                .and_then(|p| Some((p, self.actives[p].outrec?)));
            match prev_hot {
                Some((prev, prev_or)) => {
                    if self.using_polytree {
                        self.set_owner(or, prev_or);
                    }
                    self.outrecs[or].owner = Some(prev_or);
                    if self.is_front(prev) == is_new {
                        self.set_sides(or, e2, e1);
                    } else {
                        self.set_sides(or, e1, e2);
                    }
                }
                None => {
                    if is_new {
                        self.set_sides(or, e1, e2);
                    } else {
                        self.set_sides(or, e2, e1);
                    }
                }
            }
        }

        let op = self.new_outpt(pt, or);
        self.outrecs[or].pts = Some(op);
        op
    }

    /// Closes off output where `e1` and `e2` meet, either finishing a ring or
    /// merging two rings into one.
    pub(super) fn add_local_max_poly(&mut self, e1: ActiveIdx, e2: ActiveIdx, pt: Point) -> Option<OutPtIdx> {
        if self.actives[e1].is_joined() {
            self.split(e1, pt);
        }
        if self.actives[e2].is_joined() {
            self.split(e2, pt);
        }

        if self.is_front(e1) == self.is_front(e2) {
            if self.is_open_end(e1) {
                self.swap_front_back_sides(self.actives[e1].outrec?);
            } else if self.is_open_end(e2) {
                self.swap_front_back_sides(self.actives[e2].outrec?);
            } else {
                self.succeeded = false;
                return None;
            }
        }

        let result = self.add_out_pt(e1, pt)?;
        let or1 = self.actives[e1].outrec?;
        let or2 = self.actives[e2].outrec?;
        if or1 == or2 {
            self.outrecs[or1].pts = Some(result);
            if self.using_polytree {
                match self.prev_hot_edge(e1).and_then(|p| self.actives[p].outrec) {
                    Some(owner) => self.set_owner(or1, owner),
                    None => self.outrecs[or1].owner = None,
                }
            }
            self.uncouple_outrec(e1);
        } else if self.is_open(e1) {
            if self.actives[e1].wind_dx < 0 {
                self.join_outrec_paths(e1, e2);
            } else {
                self.join_outrec_paths(e2, e1);
            }
        } else if or1 < or2 {
            self.join_outrec_paths(e1, e2);
        } else {
            self.join_outrec_paths(e2, e1);
        }
        Some(result)
    }

    /// Appends the ring of `e2` onto the ring of `e1`, leaving `e2`'s ring empty.
    pub(super) fn join_outrec_paths(&mut self, e1: ActiveIdx, e2: ActiveIdx) {
        let (Some(or1), Some(or2)) = (self.actives[e1].outrec, self.actives[e2].outrec) else {
            return;
        };
        let (Some(p1_start), Some(p2_start)) = (self.outrecs[or1].pts, self.outrecs[or2].pts) else {
            return;
        };
        let p1_end = self.outpts[p1_start].next;
        let p2_end = self.outpts[p2_start].next;

        if self.is_front(e1) {
            self.outpts[p2_end].prev = p1_start;
            self.outpts[p1_start].next = p2_end;
            self.outpts[p2_start].next = p1_end;
            self.outpts[p1_end].prev = p2_start;

            self.outrecs[or1].pts = Some(p2_start);
            // If e1 is open, e1 and e2 must be a maxima pair.
            let front = self.outrecs[or2].front_edge;
            self.outrecs[or1].front_edge = front;
            if let Some(f) = front {
                self.actives[f].outrec = Some(or1);
            }
        } else {
            self.outpts[p1_end].prev = p2_start;
            self.outpts[p2_start].next = p1_end;
            self.outpts[p1_start].next = p2_end;
            self.outpts[p2_end].prev = p1_start;

            let back = self.outrecs[or2].back_edge;
            self.outrecs[or1].back_edge = back;
            if let Some(b) = back {
                self.actives[b].outrec = Some(or1);
            }
        }

        let rec2 = &mut self.outrecs[or2];
        rec2.front_edge = None;
        rec2.back_edge = None;
        rec2.pts = None;
        self.set_owner(or2, or1);

        if self.is_open_end(e1) {
            self.outrecs[or2].pts = self.outrecs[or1].pts.take();
        }

        // e1 and e2 are maxima, and are about to leave the AEL.
        self.actives[e1].outrec = None;
        self.actives[e2].outrec = None;
    }

    /// Undoes a provisional join, starting a new ring at `pt`.
    pub(super) fn split(&mut self, e: ActiveIdx, pt: Point) {
        if self.actives[e].join_with == JoinWith::Right {
            self.actives[e].join_with = JoinWith::None;
            if let Some(next) = self.actives[e].next_in_ael {
                self.actives[next].join_with = JoinWith::None;
                self.add_local_min_poly(e, next, pt, true);
            }
        } else {
            self.actives[e].join_with = JoinWith::None;
            if let Some(prev) = self.actives[e].prev_in_ael {
                self.actives[prev].join_with = JoinWith::None;
                self.add_local_min_poly(prev, e, pt, true);
            }
        }
    }

    /// Are `e` and `other` hot, closed, collinear edges that touch at `pt`?
    fn can_join(&self, e: ActiveIdx, other: ActiveIdx, pt: Point, check_curr_x: bool) -> bool {
        if self.is_open(e) || self.is_open(other) {
            return false;
        }
        let ae = &self.actives[e];
        let oe = &self.actives[other];
        if !ae.is_hot() || !oe.is_hot() {
            return false;
        }

        // Avoid trivial joins.
        if (pt.y < ae.top.y + 2 || pt.y < oe.top.y + 2) && (ae.bot.y > pt.y || oe.bot.y > pt.y) {
            return false;
        }

        if check_curr_x {
            if perpendicular_distance_sqrd(pt, oe.bot, oe.top) > 0.25 {
                return false;
            }
        } else if ae.cur_x != oe.cur_x {
            return false;
        }
        cross_product(ae.top, pt, oe.top) == 0.0
    }

    /// Merges the output of `left` and `right` (adjacent, with `left` on the left).
    fn join_adjacent(&mut self, left: ActiveIdx, right: ActiveIdx, pt: Point) {
        let (Some(or_l), Some(or_r)) = (self.actives[left].outrec, self.actives[right].outrec) else {
            return;
        };
        if or_l == or_r {
            self.add_local_max_poly(left, right, pt);
        } else if or_l < or_r {
            self.join_outrec_paths(left, right);
        } else {
            self.join_outrec_paths(right, left);
        }
        self.actives[left].join_with = JoinWith::Right;
        self.actives[right].join_with = JoinWith::Left;
    }

    /// Joins `e` to its left neighbor if they're collinear and touching.
    pub(super) fn check_join_left(&mut self, e: ActiveIdx, pt: Point, check_curr_x: bool) {
        let Some(prev) = self.actives[e].prev_in_ael else {
            return;
        };
        if self.can_join(e, prev, pt, check_curr_x) {
            self.join_adjacent(prev, e, pt);
        }
    }

    /// Joins `e` to its right neighbor if they're collinear and touching.
    pub(super) fn check_join_right(&mut self, e: ActiveIdx, pt: Point, check_curr_x: bool) {
        let Some(next) = self.actives[e].next_in_ael else {
            return;
        };
        if self.actives[e].is_joined() {
            return;
        }
        if self.can_join(e, next, pt, check_curr_x) {
            self.join_adjacent(e, next, pt);
        }
    }

    /// Points every `OutPt` in the ring back at `outrec`.
    pub(super) fn fix_outrec_pts(&mut self, outrec: OutRecIdx) {
        let Some(start) = self.outrecs[outrec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.outpts[op].outrec = outrec;
            op = self.outpts[op].next;
            if op == start {
                break;
            }
        }
    }

    /// Unlinks a point from its ring, returning the point after it (or
    /// `None` if it was alone).
    pub(super) fn dispose_out_pt(&mut self, op: OutPtIdx) -> Option<OutPtIdx> {
        let OutPt { next, prev, .. } = self.outpts[op];
        self.outpts[prev].next = next;
        self.outpts[next].prev = prev;
        (next != op).then_some(next)
    }

    /// Inserts a copy of `op` next to it.
    pub(super) fn duplicate_op(&mut self, op: OutPtIdx, insert_after: bool) -> OutPtIdx {
        let OutPt { pt, next, prev, outrec, .. } = self.outpts[op];
        let result = self.new_outpt(pt, outrec);
        if insert_after {
            self.outpts[result].next = next;
            self.outpts[next].prev = result;
            self.outpts[result].prev = op;
            self.outpts[op].next = result;
        } else {
            self.outpts[result].prev = prev;
            self.outpts[prev].next = result;
            self.outpts[result].next = op;
            self.outpts[op].prev = result;
        }
        result
    }

    /// The signed area of the ring containing `op`.
    pub(super) fn ring_area(&self, op: OutPtIdx) -> f64 {
        let mut area = 0.0;
        let mut op2 = op;
        loop {
            let curr = self.outpts[op2].pt;
            let prev = self.outpts[self.outpts[op2].prev].pt;
            area += (prev.y as f64 + curr.y as f64) * (prev.x as f64 - curr.x as f64);
            op2 = self.outpts[op2].next;
            if op2 == op {
                break;
            }
        }
        area * 0.5
    }

    /// The point at the end of the ring that `hot_edge` is responsible for.
    pub(super) fn last_op(&self, hot_edge: ActiveIdx) -> Option<OutPtIdx> {
        let or = self.actives[hot_edge].outrec?;
        let pts = self.outrecs[or].pts?;
        if self.outrecs[or].front_edge == Some(hot_edge) {
            Some(pts)
        } else {
            Some(self.outpts[pts].next)
        }
    }
}
