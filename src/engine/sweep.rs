//! The main scan-line loop: inserting local minima, winding counts, edge
//! intersections, and the top of each scanbeam.

use super::active::{Active, ActiveIdx};
use super::output::IntersectNode;
use super::vertex::{LocMinIdx, VertexFlags};
use super::Clipper;
use crate::geom::{closest_point_on_segment, intersect_point, Point};
use crate::{BinaryOp, FillRule, PathType};

impl Clipper {
    fn reset(&mut self) {
        if !self.minima_sorted {
            let vertices = &self.input.vertices;
            // The sweep goes from large y to small y.
            self.input
                .minima
                .sort_by(|a, b| vertices[b.vertex].pt.y.cmp(&vertices[a.vertex].pt.y));
            self.minima_sorted = true;
        }

        let vertices = &self.input.vertices;
        self.scanlines
            .extend(self.input.minima.iter().map(|(_, lm)| vertices[lm.vertex].pt.y));

        self.current_bot_y = 0;
        self.current_locmin = 0;
        self.ael_head = None;
        self.sel_head = None;
        self.succeeded = true;
    }

    fn insert_scanline(&mut self, y: i64) {
        self.scanlines.insert(y);
    }

    fn pop_scanline(&mut self) -> Option<i64> {
        self.scanlines.pop_last()
    }

    fn pop_local_minima_at(&mut self, y: i64) -> Option<LocMinIdx> {
        let idx = LocMinIdx(self.current_locmin);
        let lm = self.input.minima.get(idx)?;
        if self.input.vertices[lm.vertex].pt.y != y {
            return None;
        }
        self.current_locmin += 1;
        Some(idx)
    }

    pub(super) fn execute_internal(&mut self, op: BinaryOp, fill_rule: FillRule) {
        self.op = op;
        self.fill_rule = fill_rule;
        self.reset();
        tracing::debug!(
            ?op,
            ?fill_rule,
            minima = self.input.minima.len(),
            vertices = self.input.vertices.len(),
            "starting sweep"
        );

        let Some(mut y) = self.pop_scanline() else {
            return;
        };

        while self.succeeded {
            tracing::trace!(y, "scan line");
            self.insert_local_minima_into_ael(y);
            self.process_horizontals();

            if !self.horz_segs.is_empty() {
                self.convert_horz_segs_to_joins();
                self.horz_segs.clear();
            }
            self.current_bot_y = y;

            // The new y is the top of the scanbeam.
            match self.pop_scanline() {
                Some(top) => y = top,
                None => break,
            }

            self.do_intersections(y);
            self.do_top_of_scanbeam(y);
            self.process_horizontals();
            self.check_invariants();
        }

        if self.succeeded {
            self.process_horz_joins();
        }
    }

    fn process_horizontals(&mut self) {
        while let Some(horz) = self.pop_horz() {
            self.do_horizontal(horz);
        }
    }

    fn insert_local_minima_into_ael(&mut self, bot_y: i64) {
        // Horizontal local minima edges should contain `locmin.vertex.prev`.
        while let Some(lm_idx) = self.pop_local_minima_at(bot_y) {
            let lm = self.input.minima[lm_idx];
            let vertex = &self.input.vertices[lm.vertex];
            let (pt, flags, prev, next) = (vertex.pt, vertex.flags, vertex.prev, vertex.next);

            let left = (!flags.intersects(VertexFlags::OPEN_START)).then(|| {
                self.actives
                    .push(Active::new(pt, prev, self.input.vertices[prev].pt, -1, lm_idx))
            });
            let right = (!flags.intersects(VertexFlags::OPEN_END)).then(|| {
                self.actives
                    .push(Active::new(pt, next, self.input.vertices[next].pt, 1, lm_idx))
            });

            let (left, right) = match (left, right) {
                (Some(l), Some(r)) => {
                    let (lb, rb) = (&self.actives[l], &self.actives[r]);
                    let swap = if lb.is_horizontal() {
                        lb.is_heading_right_horz()
                    } else if rb.is_horizontal() {
                        rb.is_heading_left_horz()
                    } else {
                        lb.dx < rb.dx
                    };
                    // When the left bound has wind_dx == 1, the polygon is
                    // oriented clockwise on a y-down screen.
                    if swap {
                        (r, Some(l))
                    } else {
                        (l, Some(r))
                    }
                }
                (Some(l), None) => (l, None),
                (None, Some(r)) => (r, None),
                (None, None) => continue,
            };

            self.actives[left].is_left_bound = true;
            self.insert_left_edge(left);

            let contributing = if self.is_open(left) {
                self.set_wind_count_for_open_edge(left);
                self.is_contributing_open(left)
            } else {
                self.set_wind_count_for_closed_edge(left);
                self.is_contributing_closed(left)
            };

            let left_bot = self.actives[left].bot;
            if let Some(right) = right {
                self.actives[right].wind_count = self.actives[left].wind_count;
                self.actives[right].wind_count2 = self.actives[left].wind_count2;
                self.insert_right_edge(left, right);

                if contributing {
                    self.add_local_min_poly(left, right, left_bot, true);
                    if !self.actives[left].is_horizontal() {
                        self.check_join_left(left, left_bot, false);
                    }
                }

                while let Some(next) = self.actives[right].next_in_ael {
                    if !self.is_valid_ael_order(next, right) {
                        break;
                    }
                    let bot = self.actives[right].bot;
                    self.intersect_edges(right, next, bot);
                    self.swap_positions_in_ael(right, next);
                }

                if self.actives[right].is_horizontal() {
                    self.push_horz(right);
                } else {
                    let bot = self.actives[right].bot;
                    self.check_join_right(right, bot, false);
                    self.insert_scanline(self.actives[right].top.y);
                }
            } else if contributing {
                self.start_open_path(left, left_bot);
            }

            if self.actives[left].is_horizontal() {
                self.push_horz(left);
            } else {
                self.insert_scanline(self.actives[left].top.y);
            }
        }
    }

    /// Walks left through the AEL to compute the winding counts of a new
    /// closed edge.
    fn set_wind_count_for_closed_edge(&mut self, e: ActiveIdx) {
        let polytype = self.polytype(e);
        let mut e2 = self.actives[e].prev_in_ael;
        while let Some(p) = e2 {
            if self.polytype(p) == polytype && !self.is_open(p) {
                break;
            }
            e2 = self.actives[p].prev_in_ael;
        }

        let wind_dx = self.actives[e].wind_dx;
        let mut walker = match e2 {
            None => {
                self.actives[e].wind_count = wind_dx;
                self.ael_head
            }
            Some(p) if self.fill_rule == FillRule::EvenOdd => {
                self.actives[e].wind_count = wind_dx;
                self.actives[e].wind_count2 = self.actives[p].wind_count2;
                self.actives[p].next_in_ael
            }
            Some(p) => {
                // If p's winding count has the same sign as its wind_dx, the
                // polygon fills to the right of p and e is inside.
                let prev = &self.actives[p];
                let wind_count = if prev.wind_count * prev.wind_dx < 0 {
                    // e is outside p...
                    if prev.wind_count.abs() > 1 {
                        // ...but still inside something else.
                        if prev.wind_dx * wind_dx < 0 {
                            prev.wind_count
                        } else {
                            prev.wind_count + wind_dx
                        }
                    } else if self.is_open(e) {
                        1
                    } else {
                        wind_dx
                    }
                } else if prev.wind_dx * wind_dx < 0 {
                    prev.wind_count
                } else {
                    prev.wind_count + wind_dx
                };
                let wind_count2 = prev.wind_count2;
                let next = prev.next_in_ael;
                self.actives[e].wind_count = wind_count;
                self.actives[e].wind_count2 = wind_count2;
                next
            }
        };

        // Now the winding count of the other polytype.
        let even_odd = self.fill_rule == FillRule::EvenOdd;
        while let Some(w) = walker {
            if w == e {
                break;
            }
            if self.polytype(w) != polytype && !self.is_open(w) {
                let w_dx = self.actives[w].wind_dx;
                let wc2 = &mut self.actives[e].wind_count2;
                if even_odd {
                    *wc2 = if *wc2 == 0 { 1 } else { 0 };
                } else {
                    *wc2 += w_dx;
                }
            }
            walker = self.actives[w].next_in_ael;
        }
    }

    fn set_wind_count_for_open_edge(&mut self, e: ActiveIdx) {
        let mut walker = self.ael_head;
        let mut count1 = 0;
        let mut count2 = 0;
        let even_odd = self.fill_rule == FillRule::EvenOdd;
        while let Some(w) = walker {
            if w == e {
                break;
            }
            let delta = if even_odd { 1 } else { self.actives[w].wind_dx };
            if self.polytype(w) == PathType::Clip {
                count2 += delta;
            } else if !self.is_open(w) {
                count1 += delta;
            }
            walker = self.actives[w].next_in_ael;
        }

        let ae = &mut self.actives[e];
        if even_odd {
            ae.wind_count = count1 % 2;
            ae.wind_count2 = count2 % 2;
        } else {
            ae.wind_count += count1;
            ae.wind_count2 += count2;
        }
    }

    fn is_contributing_closed(&self, e: ActiveIdx) -> bool {
        let ae = &self.actives[e];
        let fill_ok = match self.fill_rule {
            FillRule::Positive => ae.wind_count == 1,
            FillRule::Negative => ae.wind_count == -1,
            FillRule::NonZero => ae.wind_count.abs() == 1,
            FillRule::EvenOdd => true,
        };
        if !fill_ok {
            return false;
        }

        let wc2 = ae.wind_count2;
        let outside_other = match self.fill_rule {
            FillRule::Positive => wc2 <= 0,
            FillRule::Negative => wc2 >= 0,
            _ => wc2 == 0,
        };
        match self.op {
            BinaryOp::Intersection => match self.fill_rule {
                FillRule::Positive => wc2 > 0,
                FillRule::Negative => wc2 < 0,
                _ => wc2 != 0,
            },
            BinaryOp::Union => outside_other,
            BinaryOp::Difference => {
                if self.polytype(e) == PathType::Subject {
                    outside_other
                } else {
                    !outside_other
                }
            }
            BinaryOp::Xor => true,
        }
    }

    fn is_contributing_open(&self, e: ActiveIdx) -> bool {
        let ae = &self.actives[e];
        let (in_subj, in_clip) = match self.fill_rule {
            FillRule::Positive => (ae.wind_count > 0, ae.wind_count2 > 0),
            FillRule::Negative => (ae.wind_count < 0, ae.wind_count2 < 0),
            _ => (ae.wind_count != 0, ae.wind_count2 != 0),
        };
        match self.op {
            BinaryOp::Intersection => in_clip,
            BinaryOp::Union => !in_subj && !in_clip,
            _ => !in_clip,
        }
    }

    /// Stops `e` from adding to its (open) output path.
    pub(super) fn detach_open_end(&mut self, e: ActiveIdx) {
        let Some(or) = self.actives[e].outrec.take() else {
            return;
        };
        let rec = &mut self.outrecs[or];
        if rec.front_edge == Some(e) {
            rec.front_edge = None;
        } else {
            rec.back_edge = None;
        }
    }

    /// Handles an open edge crossing a closed one.
    fn intersect_open_edges(&mut self, e1: ActiveIdx, e2: ActiveIdx, pt: Point) {
        if self.is_open(e1) && self.is_open(e2) {
            return;
        }
        // Make sure that e1 is the open one.
        let (e1, e2) = if self.is_open(e2) { (e2, e1) } else { (e1, e2) };
        if self.actives[e2].is_joined() {
            self.split(e2, pt);
        }

        if self.op == BinaryOp::Union {
            if !self.actives[e2].is_hot() {
                return;
            }
        } else if self.polytype(e2) == PathType::Subject {
            return;
        }

        let wc = self.actives[e2].wind_count;
        let at_boundary = match self.fill_rule {
            FillRule::Positive => wc == 1,
            FillRule::Negative => wc == -1,
            _ => wc.abs() == 1,
        };
        if !at_boundary {
            return;
        }

        // Toggle contribution.
        if self.actives[e1].is_hot() {
            self.add_out_pt(e1, pt);
            self.detach_open_end(e1);
            return;
        }

        // Horizontal edges can pass under open paths at a local minimum.
        let lm_vertex = self.input.minima[self.actives[e1].local_min].vertex;
        if pt == self.vertex_pt(lm_vertex) && !self.is_open_end_vertex(lm_vertex) {
            // Join up with the other side of the local minimum, if it's hot.
            let e3 = self
                .find_edge_with_matching_locmin(e1)
                .and_then(|e3| Some((e3, self.actives[e3].outrec?)));
            if let Some((e3, or)) = e3 {
                self.actives[e1].outrec = Some(or);
                if self.actives[e1].wind_dx > 0 {
                    self.set_sides(or, e1, e3);
                } else {
                    self.set_sides(or, e3, e1);
                }
                return;
            }
        }
        self.start_open_path(e1, pt);
    }

    /// Updates winding counts and output where two edges cross at `pt`.
    pub(super) fn intersect_edges(&mut self, e1: ActiveIdx, e2: ActiveIdx, pt: Point) {
        if self.has_open_paths && (self.is_open(e1) || self.is_open(e2)) {
            self.intersect_open_edges(e1, e2, pt);
            return;
        }

        if self.actives[e1].is_joined() {
            self.split(e1, pt);
        }
        if self.actives[e2].is_joined() {
            self.split(e2, pt);
        }

        let even_odd = self.fill_rule == FillRule::EvenOdd;
        let same_polytype = self.is_same_polytype(e1, e2);
        {
            let (wc1, wc2) = (self.actives[e1].wind_count, self.actives[e2].wind_count);
            let (dx1, dx2) = (self.actives[e1].wind_dx, self.actives[e2].wind_dx);
            if same_polytype {
                if even_odd {
                    self.actives[e1].wind_count = wc2;
                    self.actives[e2].wind_count = wc1;
                } else {
                    self.actives[e1].wind_count = if wc1 + dx2 == 0 { -wc1 } else { wc1 + dx2 };
                    self.actives[e2].wind_count = if wc2 - dx1 == 0 { -wc2 } else { wc2 - dx1 };
                }
            } else if even_odd {
                let toggle = |w: i32| if w == 0 { 1 } else { 0 };
                self.actives[e1].wind_count2 = toggle(self.actives[e1].wind_count2);
                self.actives[e2].wind_count2 = toggle(self.actives[e2].wind_count2);
            } else {
                self.actives[e1].wind_count2 += dx2;
                self.actives[e2].wind_count2 -= dx1;
            }
        }

        let fill_rule = self.fill_rule;
        let signed = move |w: i32| match fill_rule {
            FillRule::Positive => w,
            FillRule::Negative => -w,
            _ => w.abs(),
        };
        let old1 = signed(self.actives[e1].wind_count);
        let old2 = signed(self.actives[e2].wind_count);
        let e1_is_0_or_1 = old1 == 0 || old1 == 1;
        let e2_is_0_or_1 = old2 == 0 || old2 == 1;

        let hot1 = self.actives[e1].is_hot();
        let hot2 = self.actives[e2].is_hot();
        if (!hot1 && !e1_is_0_or_1) || (!hot2 && !e2_is_0_or_1) {
            return;
        }

        if hot1 && hot2 {
            if !e1_is_0_or_1 || !e2_is_0_or_1 || (!same_polytype && self.op != BinaryOp::Xor) {
                self.add_local_max_poly(e1, e2, pt);
            } else if self.is_front(e1) || self.actives[e1].outrec == self.actives[e2].outrec {
                // Split polygons that only touch at a common vertex (and not
                // along common edges).
                self.add_local_max_poly(e1, e2, pt);
                self.add_local_min_poly(e1, e2, pt, false);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_outrecs(e1, e2);
            }
        } else if hot1 {
            self.add_out_pt(e1, pt);
            self.swap_outrecs(e1, e2);
        } else if hot2 {
            self.add_out_pt(e2, pt);
            self.swap_outrecs(e1, e2);
        } else {
            // Neither edge is hot.
            let w1 = signed(self.actives[e1].wind_count2);
            let w2 = signed(self.actives[e2].wind_count2);

            if !same_polytype {
                self.add_local_min_poly(e1, e2, pt, false);
            } else if old1 == 1 && old2 == 1 {
                let starts_ring = match self.op {
                    BinaryOp::Union => w1 <= 0 || w2 <= 0,
                    BinaryOp::Difference => match self.polytype(e1) {
                        PathType::Clip => w1 > 0 && w2 > 0,
                        PathType::Subject => w1 <= 0 && w2 <= 0,
                    },
                    BinaryOp::Xor => true,
                    BinaryOp::Intersection => w1 > 0 && w2 > 0,
                };
                if starts_ring {
                    self.add_local_min_poly(e1, e2, pt, false);
                }
            }
        }
    }

    /// Moves `e` on to the next segment in its bound.
    pub(super) fn update_edge_into_ael(&mut self, e: ActiveIdx) {
        let next = self.next_vertex(e);
        let next_pt = self.vertex_pt(next);
        let ae = &mut self.actives[e];
        ae.bot = ae.top;
        ae.vertex_top = next;
        ae.top = next_pt;
        ae.cur_x = ae.bot.x;
        ae.set_dx();

        let bot = ae.bot;
        if ae.is_joined() {
            self.split(e, bot);
        }
        if self.actives[e].is_horizontal() {
            if !self.is_open(e) {
                self.trim_horz(e, self.options.preserve_collinear);
            }
            return;
        }
        self.insert_scanline(next_pt.y);

        self.check_join_left(e, bot, false);
        self.check_join_right(e, bot, true);
    }

    fn do_intersections(&mut self, top_y: i64) {
        if self.build_intersect_list(top_y) {
            self.process_intersect_list();
            self.intersect_nodes.clear();
        }
    }

    fn add_new_intersect_node(&mut self, e1: ActiveIdx, e2: ActiveIdx, top_y: i64) {
        let a1 = &self.actives[e1];
        let a2 = &self.actives[e2];
        let mut ip = intersect_point(a1.bot, a1.top, a2.bot, a2.top).unwrap_or(Point::new(a1.cur_x, top_y));

        if ip.y > self.current_bot_y || ip.y < top_y {
            let abs_dx1 = a1.dx.abs();
            let abs_dx2 = a2.dx.abs();
            ip = match (abs_dx1 > 100.0, abs_dx2 > 100.0) {
                (true, true) if abs_dx1 > abs_dx2 => closest_point_on_segment(ip, a1.bot, a1.top),
                (true, true) => closest_point_on_segment(ip, a2.bot, a2.top),
                (true, false) => closest_point_on_segment(ip, a1.bot, a1.top),
                (false, true) => closest_point_on_segment(ip, a2.bot, a2.top),
                (false, false) => {
                    let y = if ip.y < top_y { top_y } else { self.current_bot_y };
                    let x = if abs_dx1 < abs_dx2 { a1.top_x(y) } else { a2.top_x(y) };
                    Point::new(x, y)
                }
            };
        }
        self.intersect_nodes.push(IntersectNode {
            pt: ip,
            edge1: e1,
            edge2: e2,
        });
    }

    /// Finds every crossing within the current scanbeam.
    ///
    /// This is a bottom-up merge sort of the SEL by the edges' positions at
    /// the top of the scanbeam. Every time an edge jumps over others, each
    /// pair that it jumps over gets an intersection node, so that only
    /// edges that are adjacent in the AEL ever get intersected.
    fn build_intersect_list(&mut self, top_y: i64) -> bool {
        let Some(head) = self.ael_head else {
            return false;
        };
        if self.actives[head].next_in_ael.is_none() {
            return false;
        }

        self.adjust_curr_x_and_copy_to_sel(top_y);

        let mut left = self.sel_head;
        while left.is_some_and(|l| self.actives[l].jump.is_some()) {
            let mut prev_base: Option<ActiveIdx> = None;
            while let Some(l0) = left {
                let Some(r0) = self.actives[l0].jump else {
                    break;
                };
                let mut curr_base = l0;
                let mut cur_left = Some(l0);
                let mut right = Some(r0);
                let mut l_end = right;
                let r_end = self.actives[r0].jump;
                self.actives[l0].jump = r_end;

                while cur_left != l_end && right != r_end {
                    let (Some(l), Some(r)) = (cur_left, right) else {
                        break;
                    };
                    if self.actives[r].cur_x < self.actives[l].cur_x {
                        let mut tmp = self.actives[r].prev_in_sel;
                        while let Some(t) = tmp {
                            self.add_new_intersect_node(t, r, top_y);
                            if t == l {
                                break;
                            }
                            tmp = self.actives[t].prev_in_sel;
                        }

                        right = self.extract_from_sel(r);
                        l_end = right;
                        self.insert1_before2_in_sel(r, l);
                        if l == curr_base {
                            curr_base = r;
                            self.actives[curr_base].jump = r_end;
                            match prev_base {
                                None => self.sel_head = Some(curr_base),
                                Some(pb) => self.actives[pb].jump = Some(curr_base),
                            }
                        }
                    } else {
                        cur_left = self.actives[l].next_in_sel;
                    }
                }

                prev_base = Some(curr_base);
                left = r_end;
            }
            left = self.sel_head;
        }

        !self.intersect_nodes.is_empty()
    }

    fn edges_adjacent_in_ael(&self, node: &IntersectNode) -> bool {
        let e1 = &self.actives[node.edge1];
        e1.next_in_ael == Some(node.edge2) || e1.prev_in_ael == Some(node.edge2)
    }

    fn process_intersect_list(&mut self) {
        // Process intersections from the bottom up, making sure that only
        // adjacent edges are intersected.
        self.intersect_nodes
            .sort_by(|a, b| b.pt.y.cmp(&a.pt.y).then(a.pt.x.cmp(&b.pt.x)));

        for i in 0..self.intersect_nodes.len() {
            if !self.edges_adjacent_in_ael(&self.intersect_nodes[i]) {
                let j = (i + 1..self.intersect_nodes.len())
                    .find(|&j| self.edges_adjacent_in_ael(&self.intersect_nodes[j]));
                let Some(j) = j else {
                    tracing::warn!("no adjacent intersection found");
                    self.succeeded = false;
                    return;
                };
                self.intersect_nodes.swap(i, j);
            }

            let IntersectNode { pt, edge1, edge2 } = self.intersect_nodes[i];
            self.intersect_edges(edge1, edge2, pt);
            self.swap_positions_in_ael(edge1, edge2);

            self.actives[edge1].cur_x = pt.x;
            self.actives[edge2].cur_x = pt.x;
            self.check_join_left(edge2, pt, true);
            self.check_join_right(edge1, pt, true);
        }
    }

    fn do_top_of_scanbeam(&mut self, y: i64) {
        // The SEL gets reused as the list of horizontals.
        self.sel_head = None;
        let mut e = self.ael_head;
        while let Some(idx) = e {
            // Edges are never horizontal here.
            if self.actives[idx].top.y == y {
                let top = self.actives[idx].top;
                self.actives[idx].cur_x = top.x;
                if self.is_maxima(idx) {
                    e = self.do_maxima(idx);
                    continue;
                }

                // An intermediate vertex.
                if self.actives[idx].is_hot() {
                    self.add_out_pt(idx, top);
                }
                self.update_edge_into_ael(idx);
                if self.actives[idx].is_horizontal() {
                    self.push_horz(idx);
                }
            } else {
                self.actives[idx].cur_x = self.actives[idx].top_x(y);
            }
            e = self.actives[idx].next_in_ael;
        }
    }

    /// Finishes off an edge at the top of its bound, returning the edge that
    /// now follows it in the AEL.
    fn do_maxima(&mut self, e: ActiveIdx) -> Option<ActiveIdx> {
        let prev_e = self.actives[e].prev_in_ael;
        let mut next_e = self.actives[e].next_in_ael;
        let top = self.actives[e].top;

        if self.is_open_end(e) {
            if self.actives[e].is_hot() {
                self.add_out_pt(e, top);
            }
            if !self.actives[e].is_horizontal() {
                self.detach_open_end(e);
                self.delete_from_ael(e);
            }
            return next_e;
        }

        // If there's no pair, it must be horizontal and will be handled later.
        let Some(max_pair) = self.maxima_pair(e) else {
            return next_e;
        };

        if self.actives[e].is_joined() {
            self.split(e, top);
        }
        if self.actives[max_pair].is_joined() {
            let pair_top = self.actives[max_pair].top;
            self.split(max_pair, pair_top);
        }

        // Process any edges between the maxima pair.
        while let Some(next) = next_e {
            if next == max_pair {
                break;
            }
            self.intersect_edges(e, next, top);
            self.swap_positions_in_ael(e, next);
            next_e = self.actives[e].next_in_ael;
        }

        if self.actives[e].is_hot() {
            self.add_local_max_poly(e, max_pair, top);
        }
        self.delete_from_ael(e);
        self.delete_from_ael(max_pair);
        match prev_e {
            Some(p) => self.actives[p].next_in_ael,
            None => self.ael_head,
        }
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&self) {
        let mut prev = None;
        let mut e = self.ael_head;
        let mut count = 0;
        while let Some(idx) = e {
            let ae = &self.actives[idx];
            assert_eq!(ae.prev_in_ael, prev, "broken AEL link at {idx:?}");
            if let Some(or) = ae.outrec {
                let rec = &self.outrecs[or];
                assert!(
                    rec.front_edge == Some(idx) || rec.back_edge == Some(idx),
                    "hot edge {idx:?} isn't a side of {or:?}"
                );
            }
            prev = e;
            e = ae.next_in_ael;
            count += 1;
            assert!(count <= self.actives.len(), "cycle in the AEL");
        }
    }

    #[cfg(not(feature = "slow-asserts"))]
    fn check_invariants(&self) {}
}
