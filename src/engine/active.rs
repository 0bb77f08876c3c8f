//! Active edges, and the two linked lists that hold them.
//!
//! The *active edge list* (AEL) holds, from left to right, every edge that
//! crosses the current scanbeam. The *sorted edge list* (SEL) reuses the
//! same records: it is a scratch ordering used while discovering
//! intersections at the top of a scanbeam, and a stack of horizontal edges
//! waiting to be processed.

use super::vertex::{LocMinIdx, VertIdx, VertexFlags};
use super::{Clipper, OutRecIdx};
use crate::geom::{cross_product, Point};
use crate::num::round_even;
use crate::PathType;

typed_vec!(ActiveVec, ActiveIdx, "ae");

/// Whether an edge has been provisionally joined to a collinear neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JoinWith {
    None,
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub(crate) struct Active {
    pub bot: Point,
    pub top: Point,
    /// The horizontal position at the current scan line.
    pub cur_x: i64,
    /// Inverse slope. Horizontal edges have an infinite `dx`, whose sign says
    /// which way they point:
    ///
    /// ```text
    ///                  0 (90 deg)
    ///                  |
    ///  +inf (180 deg) -o- -inf (0 deg)
    /// ```
    pub dx: f64,
    /// +1 or -1, depending on the direction of the input path.
    pub wind_dx: i32,
    pub wind_count: i32,
    /// The winding count of the other polytype.
    pub wind_count2: i32,
    pub outrec: Option<OutRecIdx>,
    pub prev_in_ael: Option<ActiveIdx>,
    pub next_in_ael: Option<ActiveIdx>,
    pub prev_in_sel: Option<ActiveIdx>,
    pub next_in_sel: Option<ActiveIdx>,
    pub jump: Option<ActiveIdx>,
    pub vertex_top: VertIdx,
    pub local_min: LocMinIdx,
    pub is_left_bound: bool,
    pub join_with: JoinWith,
}

/// The inverse slope of the segment from `pt1` to `pt2`.
pub(crate) fn dx(pt1: Point, pt2: Point) -> f64 {
    let dy = pt2.y - pt1.y;
    if dy != 0 {
        (pt2.x - pt1.x) as f64 / dy as f64
    } else if pt2.x > pt1.x {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }
}

impl Active {
    pub fn new(bot: Point, vertex_top: VertIdx, top: Point, wind_dx: i32, local_min: LocMinIdx) -> Self {
        Active {
            bot,
            top,
            cur_x: bot.x,
            dx: dx(bot, top),
            wind_dx,
            wind_count: 0,
            wind_count2: 0,
            outrec: None,
            prev_in_ael: None,
            next_in_ael: None,
            prev_in_sel: None,
            next_in_sel: None,
            jump: None,
            vertex_top,
            local_min,
            is_left_bound: false,
            join_with: JoinWith::None,
        }
    }

    pub fn set_dx(&mut self) {
        self.dx = dx(self.bot, self.top);
    }

    pub fn is_horizontal(&self) -> bool {
        self.top.y == self.bot.y
    }

    pub fn is_heading_right_horz(&self) -> bool {
        self.dx == f64::NEG_INFINITY
    }

    pub fn is_heading_left_horz(&self) -> bool {
        self.dx == f64::INFINITY
    }

    /// Is this edge currently bounding an output ring?
    pub fn is_hot(&self) -> bool {
        self.outrec.is_some()
    }

    pub fn is_joined(&self) -> bool {
        self.join_with != JoinWith::None
    }

    /// Our horizontal position at the given `y`.
    pub fn top_x(&self, current_y: i64) -> i64 {
        if current_y == self.top.y || self.top.x == self.bot.x {
            self.top.x
        } else if current_y == self.bot.y {
            self.bot.x
        } else {
            self.bot.x + round_even(self.dx * (current_y - self.bot.y) as f64)
        }
    }
}

impl Clipper {
    pub(super) fn polytype(&self, e: ActiveIdx) -> PathType {
        self.input.minima[self.actives[e].local_min].polytype
    }

    pub(super) fn is_same_polytype(&self, e1: ActiveIdx, e2: ActiveIdx) -> bool {
        self.polytype(e1) == self.polytype(e2)
    }

    pub(super) fn is_open(&self, e: ActiveIdx) -> bool {
        self.input.minima[self.actives[e].local_min].is_open
    }

    pub(super) fn is_open_end_vertex(&self, v: VertIdx) -> bool {
        self.input.vertices[v]
            .flags
            .intersects(VertexFlags::OPEN_START | VertexFlags::OPEN_END)
    }

    /// Is this an open path's edge that ends where the path ends?
    pub(super) fn is_open_end(&self, e: ActiveIdx) -> bool {
        self.is_open(e) && self.is_open_end_vertex(self.actives[e].vertex_top)
    }

    pub(super) fn is_maxima_vertex(&self, v: VertIdx) -> bool {
        self.input.vertices[v].flags.intersects(VertexFlags::LOCAL_MAX)
    }

    pub(super) fn is_maxima(&self, e: ActiveIdx) -> bool {
        self.is_maxima_vertex(self.actives[e].vertex_top)
    }

    /// The vertex after our top, following the direction of the bound.
    pub(super) fn next_vertex(&self, e: ActiveIdx) -> VertIdx {
        let ae = &self.actives[e];
        let top = &self.input.vertices[ae.vertex_top];
        if ae.wind_dx > 0 {
            top.next
        } else {
            top.prev
        }
    }

    /// The vertex two steps before our top, following the direction of the bound.
    pub(super) fn prev_prev_vertex(&self, e: ActiveIdx) -> VertIdx {
        let ae = &self.actives[e];
        let v = &self.input.vertices;
        if ae.wind_dx > 0 {
            v[v[ae.vertex_top].prev].prev
        } else {
            v[v[ae.vertex_top].next].next
        }
    }

    pub(super) fn vertex_pt(&self, v: VertIdx) -> Point {
        self.input.vertices[v].pt
    }

    /// Finds the edge, to our right, that shares our maximum vertex.
    pub(super) fn maxima_pair(&self, e: ActiveIdx) -> Option<ActiveIdx> {
        let top = self.actives[e].vertex_top;
        let mut e2 = self.actives[e].next_in_ael;
        while let Some(idx) = e2 {
            if self.actives[idx].vertex_top == top {
                return Some(idx);
            }
            e2 = self.actives[idx].next_in_ael;
        }
        None
    }

    /// Walks along a run of horizontal vertices at our top, returning the
    /// local maximum at the end of it (if there is one).
    pub(super) fn curr_y_maxima_vertex(&self, e: ActiveIdx, is_open: bool) -> Option<VertIdx> {
        let ae = &self.actives[e];
        let verts = &self.input.vertices;
        let stop = VertexFlags::OPEN_END | VertexFlags::LOCAL_MAX;
        let mut result = ae.vertex_top;
        for _ in 0..verts.len() {
            let v = &verts[result];
            let next = if ae.wind_dx > 0 { v.next } else { v.prev };
            if verts[next].pt.y != v.pt.y || (is_open && v.flags.intersects(stop)) {
                break;
            }
            result = next;
        }
        self.is_maxima_vertex(result).then_some(result)
    }

    /// The nearest hot, closed edge to our left.
    pub(super) fn prev_hot_edge(&self, e: ActiveIdx) -> Option<ActiveIdx> {
        let mut prev = self.actives[e].prev_in_ael;
        while let Some(p) = prev {
            if !self.is_open(p) && self.actives[p].is_hot() {
                return Some(p);
            }
            prev = self.actives[p].prev_in_ael;
        }
        None
    }

    /// Is this edge the front edge of its output ring?
    pub(super) fn is_front(&self, e: ActiveIdx) -> bool {
        self.actives[e]
            .outrec
            .is_some_and(|or| self.outrecs[or].front_edge == Some(e))
    }

    /// Decides whether `newcomer` belongs to the right of `resident` in the AEL.
    pub(super) fn is_valid_ael_order(&self, resident: ActiveIdx, newcomer: ActiveIdx) -> bool {
        let res = &self.actives[resident];
        let new = &self.actives[newcomer];
        if new.cur_x != res.cur_x {
            return new.cur_x > res.cur_x;
        }

        // The turning direction of resident.top, newcomer.bot, newcomer.top.
        let d = cross_product(res.top, new.bot, new.top);
        if d != 0.0 {
            return d < 0.0;
        }

        // The edges are collinear. Starting open paths go according to the
        // direction that they're about to turn.
        if !self.is_maxima(resident) && res.top.y > new.top.y {
            return cross_product(new.bot, res.top, self.vertex_pt(self.next_vertex(resident))) <= 0.0;
        }
        if !self.is_maxima(newcomer) && new.top.y > res.top.y {
            return cross_product(new.bot, new.top, self.vertex_pt(self.next_vertex(newcomer))) >= 0.0;
        }

        let y = new.bot.y;
        let newcomer_is_left = new.is_left_bound;
        let res_min_y = self.vertex_pt(self.input.minima[res.local_min].vertex).y;
        if res.bot.y != y || res_min_y != y {
            return newcomer_is_left;
        }
        // The resident was also just inserted.
        if res.is_left_bound != newcomer_is_left {
            return newcomer_is_left;
        }
        let res_pp = self.vertex_pt(self.prev_prev_vertex(resident));
        if cross_product(res_pp, res.bot, res.top) == 0.0 {
            return true;
        }
        // Compare the turning direction of the alternate bound.
        let new_pp = self.vertex_pt(self.prev_prev_vertex(newcomer));
        (cross_product(res_pp, new.bot, new_pp) > 0.0) == newcomer_is_left
    }

    pub(super) fn insert_left_edge(&mut self, e: ActiveIdx) {
        let Some(head) = self.ael_head else {
            self.actives[e].prev_in_ael = None;
            self.actives[e].next_in_ael = None;
            self.ael_head = Some(e);
            return;
        };

        if !self.is_valid_ael_order(head, e) {
            self.actives[e].prev_in_ael = None;
            self.actives[e].next_in_ael = Some(head);
            self.actives[head].prev_in_ael = Some(e);
            self.ael_head = Some(e);
            return;
        }

        let mut e2 = head;
        while let Some(next) = self.actives[e2].next_in_ael {
            if !self.is_valid_ael_order(next, e) {
                break;
            }
            e2 = next;
        }
        // Don't separate joined edges.
        if self.actives[e2].join_with == JoinWith::Right {
            if let Some(next) = self.actives[e2].next_in_ael {
                e2 = next;
            }
        }
        let next = self.actives[e2].next_in_ael;
        self.actives[e].next_in_ael = next;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(e);
        }
        self.actives[e].prev_in_ael = Some(e2);
        self.actives[e2].next_in_ael = Some(e);
    }

    /// Inserts `e2` immediately to the right of `e`.
    pub(super) fn insert_right_edge(&mut self, e: ActiveIdx, e2: ActiveIdx) {
        let next = self.actives[e].next_in_ael;
        self.actives[e2].next_in_ael = next;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = Some(e);
        self.actives[e].next_in_ael = Some(e2);
    }

    pub(super) fn delete_from_ael(&mut self, e: ActiveIdx) {
        let prev = self.actives[e].prev_in_ael;
        let next = self.actives[e].next_in_ael;
        if prev.is_none() && next.is_none() && self.ael_head != Some(e) {
            // Already deleted.
            return;
        }
        match prev {
            Some(p) => self.actives[p].next_in_ael = next,
            None => self.ael_head = next,
        }
        if let Some(n) = next {
            self.actives[n].prev_in_ael = prev;
        }
    }

    /// Swaps two edges in the AEL. `e1` must be immediately to the left of `e2`.
    pub(super) fn swap_positions_in_ael(&mut self, e1: ActiveIdx, e2: ActiveIdx) {
        let next = self.actives[e2].next_in_ael;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(e1);
        }
        let prev = self.actives[e1].prev_in_ael;
        if let Some(p) = prev {
            self.actives[p].next_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = prev;
        self.actives[e2].next_in_ael = Some(e1);
        self.actives[e1].prev_in_ael = Some(e2);
        self.actives[e1].next_in_ael = next;
        if prev.is_none() {
            self.ael_head = Some(e2);
        }
    }

    /// Finds the other bound that was created from our local minimum, as long
    /// as it is still nearby in the AEL.
    pub(super) fn find_edge_with_matching_locmin(&self, e: ActiveIdx) -> Option<ActiveIdx> {
        let ae = &self.actives[e];
        let mut result = ae.next_in_ael;
        while let Some(r) = result {
            let other = &self.actives[r];
            if other.local_min == ae.local_min {
                return Some(r);
            }
            if !other.is_horizontal() && ae.bot != other.bot {
                result = None;
            } else {
                result = other.next_in_ael;
            }
        }

        result = ae.prev_in_ael;
        while let Some(r) = result {
            let other = &self.actives[r];
            if other.local_min == ae.local_min {
                return Some(r);
            }
            if !other.is_horizontal() && ae.bot != other.bot {
                return None;
            }
            result = other.prev_in_ael;
        }
        None
    }

    pub(super) fn push_horz(&mut self, e: ActiveIdx) {
        self.actives[e].next_in_sel = self.sel_head;
        self.sel_head = Some(e);
    }

    pub(super) fn pop_horz(&mut self) -> Option<ActiveIdx> {
        let e = self.sel_head?;
        self.sel_head = self.actives[e].next_in_sel;
        Some(e)
    }

    /// Moves every edge to its position at `top_y`, and copies the AEL order
    /// into the SEL.
    pub(super) fn adjust_curr_x_and_copy_to_sel(&mut self, top_y: i64) {
        let mut e = self.ael_head;
        self.sel_head = e;
        while let Some(idx) = e {
            let prev = self.actives[idx].prev_in_ael;
            let next = self.actives[idx].next_in_ael;
            let cur_x = match (self.actives[idx].join_with, prev) {
                (JoinWith::Left, Some(p)) => self.actives[p].cur_x,
                _ => self.actives[idx].top_x(top_y),
            };
            let ae = &mut self.actives[idx];
            ae.prev_in_sel = prev;
            ae.next_in_sel = next;
            ae.jump = next;
            ae.cur_x = cur_x;
            e = next;
        }
    }

    /// Unlinks an edge from the SEL, returning the edge that followed it.
    pub(super) fn extract_from_sel(&mut self, e: ActiveIdx) -> Option<ActiveIdx> {
        let next = self.actives[e].next_in_sel;
        let prev = self.actives[e].prev_in_sel;
        if let Some(n) = next {
            self.actives[n].prev_in_sel = prev;
        }
        if let Some(p) = prev {
            self.actives[p].next_in_sel = next;
        }
        next
    }

    /// Moves `e1` in the SEL so that it is immediately before `e2`.
    pub(super) fn insert1_before2_in_sel(&mut self, e1: ActiveIdx, e2: ActiveIdx) {
        let prev = self.actives[e2].prev_in_sel;
        self.actives[e1].prev_in_sel = prev;
        if let Some(p) = prev {
            self.actives[p].next_in_sel = Some(e1);
        }
        self.actives[e1].next_in_sel = Some(e2);
        self.actives[e2].prev_in_sel = Some(e1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dx_of_horizontals() {
        assert_eq!(dx(Point::new(0, 0), Point::new(10, 0)), f64::NEG_INFINITY);
        assert_eq!(dx(Point::new(10, 0), Point::new(0, 0)), f64::INFINITY);
        assert_eq!(dx(Point::new(0, 10), Point::new(5, 0)), -0.5);
    }

    #[test]
    fn top_x_rounds_half_to_even() {
        let ae = Active::new(Point::new(0, 10), VertIdx(0), Point::new(5, 0), 1, LocMinIdx(0));
        assert_eq!(ae.top_x(10), 0);
        assert_eq!(ae.top_x(0), 5);
        // dx = -0.5, so at y = 5 the exact position is 2.5.
        assert_eq!(ae.top_x(5), 2);
        assert_eq!(ae.top_x(3), 4);
    }
}
