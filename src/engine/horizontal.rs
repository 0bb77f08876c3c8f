//! Horizontal edges, and the joins between overlapping horizontal output.
//!
//! Horizontal edges at a scan line are processed as if they were layered.
//! The order doesn't matter: each one sweeps sideways through the AEL,
//! intersecting the edges it passes over. When a horizontal ends, it gets
//! promoted to the next edge of its bound, which may be horizontal too.
//!
//! ```text
//!               |                     /    |     (H3)o ========%========== o
//!               o ======= o(H2)      /     |         /         /
//!           o ============#=========*======*========#=========o (H1)
//!          /              |        /       |       /
//! ```

use super::active::ActiveIdx;
use super::output::{HorzJoin, HorzSegment, OutPtIdx, OutRecIdx};
use super::vertex::VertIdx;
use super::Clipper;
use crate::geom::Point;

/// Which way a horizontal sweeps, and how far.
struct HorzDirection {
    left_to_right: bool,
    left_x: i64,
    right_x: i64,
}

impl Clipper {
    fn reset_horz_direction(&self, horz: ActiveIdx, vertex_max: Option<VertIdx>) -> HorzDirection {
        let h = &self.actives[horz];
        if h.bot.x == h.top.x {
            // The horizontal edge is going nowhere. It only heads right if
            // its maxima pair is somewhere to the right.
            let mut ae = h.next_in_ael;
            while let Some(e) = ae {
                if Some(self.actives[e].vertex_top) == vertex_max {
                    break;
                }
                ae = self.actives[e].next_in_ael;
            }
            return HorzDirection {
                left_to_right: ae.is_some(),
                left_x: h.cur_x,
                right_x: h.cur_x,
            };
        }

        if h.cur_x < h.top.x {
            HorzDirection {
                left_to_right: true,
                left_x: h.cur_x,
                right_x: h.top.x,
            }
        } else {
            HorzDirection {
                left_to_right: false,
                left_x: h.top.x,
                right_x: h.cur_x,
            }
        }
    }

    /// Does the bound double back on itself right after this horizontal?
    fn horz_is_spike(&self, horz: ActiveIdx) -> bool {
        let next_pt = self.vertex_pt(self.next_vertex(horz));
        let h = &self.actives[horz];
        (h.bot.x < h.top.x) != (h.top.x < next_pt.x)
    }

    /// Extends a horizontal edge over any following horizontal segments in
    /// its bound.
    ///
    /// 180 degree spikes are always trimmed. Other collinear runs are only
    /// merged if `preserve_collinear` is false.
    pub(super) fn trim_horz(&mut self, horz: ActiveIdx, preserve_collinear: bool) {
        let mut was_trimmed = false;
        let mut pt = self.vertex_pt(self.next_vertex(horz));

        for _ in 0..self.input.vertices.len() {
            let h = &self.actives[horz];
            if pt.y != h.top.y {
                break;
            }
            if preserve_collinear && (pt.x < h.top.x) != (h.bot.x < h.top.x) {
                break;
            }

            let next = self.next_vertex(horz);
            let h = &mut self.actives[horz];
            h.vertex_top = next;
            h.top = pt;
            was_trimmed = true;
            if self.is_maxima(horz) {
                break;
            }
            pt = self.vertex_pt(self.next_vertex(horz));
        }

        if was_trimmed {
            self.actives[horz].set_dx();
        }
    }

    fn add_to_horz_seg_list(&mut self, op: Option<OutPtIdx>) {
        let Some(op) = op else {
            return;
        };
        if self.outrecs[self.outpts[op].outrec].is_open {
            return;
        }
        self.horz_segs.push(HorzSegment {
            left_op: op,
            right_op: None,
            left_to_right: true,
        });
    }

    /// Ends an open horizontal at the end of its path.
    fn finish_open_horz(&mut self, horz: ActiveIdx) {
        if self.actives[horz].is_hot() {
            let top = self.actives[horz].top;
            self.add_out_pt(horz, top);
            self.detach_open_end(horz);
        }
        self.delete_from_ael(horz);
    }

    pub(super) fn do_horizontal(&mut self, horz: ActiveIdx) {
        let horz_is_open = self.is_open(horz);
        let y = self.actives[horz].bot.y;
        let vertex_max = self.curr_y_maxima_vertex(horz, horz_is_open);

        if let Some(vmax) = vertex_max {
            if !horz_is_open && vmax != self.actives[horz].vertex_top {
                self.trim_horz(horz, self.options.preserve_collinear);
            }
        }

        let mut dir = self.reset_horz_direction(horz, vertex_max);

        if self.actives[horz].is_hot() {
            let pt = Point::new(self.actives[horz].cur_x, y);
            let op = self.add_out_pt(horz, pt);
            self.add_to_horz_seg_list(op);
        }

        loop {
            // Loops through consecutive horizontal edges (if open).
            let mut ae = if dir.left_to_right {
                self.actives[horz].next_in_ael
            } else {
                self.actives[horz].prev_in_ael
            };

            while let Some(e) = ae {
                if Some(self.actives[e].vertex_top) == vertex_max {
                    self.finish_horz_at_maxima(horz, e, vertex_max, dir.left_to_right);
                    return;
                }

                // If the horizontal is a maxima, keep going until we reach
                // its pair. Otherwise, check for break conditions.
                if vertex_max != Some(self.actives[horz].vertex_top) || self.is_open_end(horz) {
                    let other = &self.actives[e];
                    if (dir.left_to_right && other.cur_x > dir.right_x)
                        || (!dir.left_to_right && other.cur_x < dir.left_x)
                    {
                        break;
                    }

                    if other.cur_x == self.actives[horz].top.x && !other.is_horizontal() {
                        let pt = self.vertex_pt(self.next_vertex(horz));
                        let top_x = other.top_x(pt.y);
                        // To maximize the chance of putting open edges into
                        // the output, only stop at an open edge that goes
                        // past the end of the horizontal.
                        let stop = if self.is_open(e) && !self.is_same_polytype(e, horz) && !other.is_hot() {
                            (dir.left_to_right && top_x > pt.x) || (!dir.left_to_right && top_x < pt.x)
                        } else {
                            (dir.left_to_right && top_x >= pt.x) || (!dir.left_to_right && top_x <= pt.x)
                        };
                        if stop {
                            break;
                        }
                    }
                }

                let pt = Point::new(self.actives[e].cur_x, y);
                if dir.left_to_right {
                    self.intersect_edges(horz, e, pt);
                    self.swap_positions_in_ael(horz, e);
                    self.actives[horz].cur_x = self.actives[e].cur_x;
                    ae = self.actives[horz].next_in_ael;
                } else {
                    self.intersect_edges(e, horz, pt);
                    self.swap_positions_in_ael(e, horz);
                    self.actives[horz].cur_x = self.actives[e].cur_x;
                    ae = self.actives[horz].prev_in_ael;
                }

                if self.actives[horz].is_hot() {
                    let op = self.last_op(horz);
                    self.add_to_horz_seg_list(op);
                }
            }

            // Are there more consecutive horizontals to process?
            if horz_is_open && self.is_open_end(horz) {
                self.finish_open_horz(horz);
                return;
            }
            if self.vertex_pt(self.next_vertex(horz)).y != self.actives[horz].top.y {
                break;
            }

            if self.actives[horz].is_hot() {
                let top = self.actives[horz].top;
                self.add_out_pt(horz, top);
            }
            self.update_edge_into_ael(horz);

            if self.options.preserve_collinear && !horz_is_open && self.horz_is_spike(horz) {
                self.trim_horz(horz, true);
            }
            dir = self.reset_horz_direction(horz, vertex_max);
        }

        if self.actives[horz].is_hot() {
            let top = self.actives[horz].top;
            let op = self.add_out_pt(horz, top);
            self.add_to_horz_seg_list(op);
        }
        self.update_edge_into_ael(horz);
    }

    /// The horizontal has run into its maxima pair `e`.
    fn finish_horz_at_maxima(
        &mut self,
        horz: ActiveIdx,
        e: ActiveIdx,
        vertex_max: Option<VertIdx>,
        left_to_right: bool,
    ) {
        if self.actives[horz].is_hot() {
            if self.actives[e].is_joined() {
                let top = self.actives[e].top;
                self.split(e, top);
            }

            let mut steps = 0;
            while Some(self.actives[horz].vertex_top) != vertex_max {
                let top = self.actives[horz].top;
                self.add_out_pt(horz, top);
                self.update_edge_into_ael(horz);
                steps += 1;
                if steps > self.input.vertices.len() {
                    tracing::warn!(?horz, "horizontal never reached its maximum");
                    self.succeeded = false;
                    return;
                }
            }

            let top = self.actives[horz].top;
            if left_to_right {
                self.add_local_max_poly(horz, e, top);
            } else {
                self.add_local_max_poly(e, horz, top);
            }
        }
        self.delete_from_ael(e);
        self.delete_from_ael(horz);
    }

    /// Extends a horizontal segment to cover the whole run of output points
    /// at its height. Returns false if the run isn't usable for joining.
    fn update_horz_segment(&mut self, i: usize) -> bool {
        let op = self.horz_segs[i].left_op;
        let Some(outrec) = self.real_outrec(Some(self.outpts[op].outrec)) else {
            self.horz_segs[i].right_op = None;
            return false;
        };
        let has_edges = self.outrecs[outrec].front_edge.is_some();
        let curr_y = self.outpts[op].pt.y;
        let pts = &self.outpts;
        let (mut op_p, mut op_n) = (op, op);

        if has_edges {
            let Some(op_a) = self.outrecs[outrec].pts else {
                self.horz_segs[i].right_op = None;
                return false;
            };
            let op_z = pts[op_a].next;
            while op_p != op_z && pts[pts[op_p].prev].pt.y == curr_y {
                op_p = pts[op_p].prev;
            }
            while op_n != op_a && pts[pts[op_n].next].pt.y == curr_y {
                op_n = pts[op_n].next;
            }
        } else {
            while pts[op_p].prev != op_n && pts[pts[op_p].prev].pt.y == curr_y {
                op_p = pts[op_p].prev;
            }
            while pts[op_n].next != op_p && pts[pts[op_n].next].pt.y == curr_y {
                op_n = pts[op_n].next;
            }
        }

        let (x_p, x_n) = (pts[op_p].pt.x, pts[op_n].pt.x);
        let hs = &mut self.horz_segs[i];
        let heading_ok = if x_p == x_n {
            false
        } else {
            if x_p < x_n {
                hs.left_op = op_p;
                hs.right_op = Some(op_n);
                hs.left_to_right = true;
            } else {
                hs.left_op = op_n;
                hs.right_op = Some(op_p);
                hs.left_to_right = false;
            }
            true
        };

        if heading_ok && !self.outpts[hs.left_op].horz {
            self.outpts[hs.left_op].horz = true;
            true
        } else {
            hs.right_op = None;
            false
        }
    }

    /// Pairs up overlapping horizontal segments heading in opposite
    /// directions, so they can be split apart after the sweep.
    pub(super) fn convert_horz_segs_to_joins(&mut self) {
        let k = (0..self.horz_segs.len())
            .filter(|&i| self.update_horz_segment(i))
            .count();
        if k < 2 {
            return;
        }

        let pts = &self.outpts;
        self.horz_segs.sort_by(|a, b| match (a.right_op, b.right_op) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (Some(_), Some(_)) => pts[a.left_op].pt.x.cmp(&pts[b.left_op].pt.x),
        });

        for i in 0..k - 1 {
            for j in i + 1..k {
                let (hs1, hs2) = (&self.horz_segs[i], &self.horz_segs[j]);
                let (Some(r1), Some(r2)) = (hs1.right_op, hs2.right_op) else {
                    continue;
                };
                let pts = &self.outpts;
                if pts[hs2.left_op].pt.x >= pts[r1].pt.x
                    || hs2.left_to_right == hs1.left_to_right
                    || pts[r2].pt.x <= pts[hs1.left_op].pt.x
                {
                    continue;
                }

                let curr_y = pts[hs1.left_op].pt.y;
                let (mut l1, mut l2) = (hs1.left_op, hs2.left_op);
                let join = if hs1.left_to_right {
                    while pts[pts[l1].next].pt.y == curr_y && pts[pts[l1].next].pt.x <= pts[l2].pt.x {
                        l1 = pts[l1].next;
                    }
                    while pts[pts[l2].prev].pt.y == curr_y && pts[pts[l2].prev].pt.x <= pts[l1].pt.x {
                        l2 = pts[l2].prev;
                    }
                    HorzJoin {
                        op1: self.duplicate_op(l1, true),
                        op2: self.duplicate_op(l2, false),
                    }
                } else {
                    while pts[pts[l1].prev].pt.y == curr_y && pts[pts[l1].prev].pt.x <= pts[l2].pt.x {
                        l1 = pts[l1].prev;
                    }
                    while pts[pts[l2].next].pt.y == curr_y && pts[pts[l2].next].pt.x <= pts[l1].pt.x {
                        l2 = pts[l2].next;
                    }
                    HorzJoin {
                        op1: self.duplicate_op(l2, true),
                        op2: self.duplicate_op(l1, false),
                    }
                };
                self.horz_segs[i].left_op = l1;
                self.horz_segs[j].left_op = l2;
                self.horz_joins.push(join);
            }
        }
    }

    fn move_splits(&mut self, from: OutRecIdx, to: OutRecIdx) {
        let splits = std::mem::take(&mut self.outrecs[from].splits);
        self.outrecs[to].splits.extend(splits);
    }

    /// Splits or merges rings along the horizontal joins found during the
    /// sweep.
    pub(super) fn process_horz_joins(&mut self) {
        let joins = std::mem::take(&mut self.horz_joins);
        for HorzJoin { op1, op2 } in joins {
            let (Some(or1), Some(or2)) = (
                self.real_outrec(Some(self.outpts[op1].outrec)),
                self.real_outrec(Some(self.outpts[op2].outrec)),
            ) else {
                continue;
            };

            let op1b = self.outpts[op1].next;
            let op2b = self.outpts[op2].prev;
            self.outpts[op1].next = op2;
            self.outpts[op2].prev = op1;
            self.outpts[op1b].prev = op2b;
            self.outpts[op2b].next = op1b;

            if or1 != or2 {
                self.outrecs[or2].pts = None;
                if self.using_polytree {
                    self.set_owner(or2, or1);
                    self.move_splits(or2, or1);
                } else {
                    self.outrecs[or2].owner = Some(or1);
                }
                continue;
            }

            // The ring got cut in two.
            let or2 = self.new_outrec();
            self.outrecs[or2].pts = Some(op1b);
            self.fix_outrec_pts(or2);

            if let Some(pts1) = self.outrecs[or1].pts {
                if self.outpts[pts1].outrec == or2 {
                    self.outrecs[or1].pts = Some(op1);
                    self.outpts[op1].outrec = or1;
                }
            }

            if !self.using_polytree {
                self.outrecs[or2].owner = Some(or1);
                continue;
            }

            let (Some(pts1), Some(pts2)) = (self.outrecs[or1].pts, self.outrecs[or2].pts) else {
                continue;
            };
            if self.path1_inside_path2(pts1, pts2) {
                self.outrecs[or1].pts = Some(pts2);
                self.outrecs[or2].pts = Some(pts1);
                self.fix_outrec_pts(or1);
                self.fix_outrec_pts(or2);
                self.outrecs[or2].owner = Some(or1);
            } else if self.path1_inside_path2(pts2, pts1) {
                self.outrecs[or2].owner = Some(or1);
            } else {
                self.outrecs[or2].owner = self.outrecs[or1].owner;
            }
            self.outrecs[or1].splits.push(or2);
        }
    }
}
