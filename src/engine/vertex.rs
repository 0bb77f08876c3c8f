//! Input paths, preprocessed into vertex rings and local minima.
//!
//! Every input path becomes a ring of [`Vertex`]es (open paths are linked
//! into a ring too, but their ends are flagged so that the sweep never walks
//! across the gap). A *local minimum* is a vertex where the boundary stops
//! descending and starts climbing; it is where the sweep line first meets
//! the path, and where a pair of active edges (a left bound and a right
//! bound) gets created.
//!
//! "Up" and "down" here refer to a y-down display: the sweep starts at the
//! largest `y` and moves up the screen towards smaller `y`.

use crate::geom::{Path, Point};
use crate::PathType;

typed_vec!(VertexVec, VertIdx, "v");
typed_vec!(MinimaVec, LocMinIdx, "lm");

/// Role markers for a vertex.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VertexFlags(u8);

impl VertexFlags {
    pub const NONE: VertexFlags = VertexFlags(0);
    pub const OPEN_START: VertexFlags = VertexFlags(1);
    pub const OPEN_END: VertexFlags = VertexFlags(2);
    pub const LOCAL_MAX: VertexFlags = VertexFlags(4);
    pub const LOCAL_MIN: VertexFlags = VertexFlags(8);

    /// Do we have any of the flags in `other`?
    pub fn intersects(self, other: VertexFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: VertexFlags) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for VertexFlags {
    type Output = VertexFlags;

    fn bitor(self, rhs: VertexFlags) -> VertexFlags {
        VertexFlags(self.0 | rhs.0)
    }
}

impl std::fmt::Debug for VertexFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            (VertexFlags::OPEN_START, "OpenStart"),
            (VertexFlags::OPEN_END, "OpenEnd"),
            (VertexFlags::LOCAL_MAX, "LocalMax"),
            (VertexFlags::LOCAL_MIN, "LocalMin"),
        ];
        let mut list = f.debug_set();
        for (flag, name) in names {
            if self.intersects(flag) {
                list.entry(&format_args!("{name}"));
            }
        }
        list.finish()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Vertex {
    pub pt: Point,
    pub next: VertIdx,
    pub prev: VertIdx,
    pub flags: VertexFlags,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct LocalMinima {
    pub vertex: VertIdx,
    pub polytype: PathType,
    pub is_open: bool,
}

/// The vertex rings and local minima of a set of input paths.
#[derive(Clone, Debug, Default)]
pub(crate) struct VertexData {
    pub vertices: VertexVec<Vertex>,
    pub minima: MinimaVec<LocalMinima>,
}

impl VertexData {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.minima.clear();
    }

    fn add_local_min(&mut self, vertex: VertIdx, polytype: PathType, is_open: bool) {
        // Each vertex can only start one pair of bounds.
        if self.vertices[vertex].flags.intersects(VertexFlags::LOCAL_MIN) {
            return;
        }
        self.vertices[vertex].flags.insert(VertexFlags::LOCAL_MIN);
        self.minima.push(LocalMinima {
            vertex,
            polytype,
            is_open,
        });
    }

    /// Builds vertex rings for some paths and records their local minima.
    ///
    /// Consecutive duplicate points are dropped. Paths that end up too small
    /// (closed paths with fewer than two distinct points, or closed paths that
    /// are completely flat) are skipped.
    pub fn add_paths(&mut self, paths: &[Path], polytype: PathType, is_open: bool) {
        let total_vertex_count: usize = paths.iter().map(Vec::len).sum();
        self.vertices.reserve(total_vertex_count);

        for path in paths {
            let first = self.vertices.len();
            for &pt in path {
                let is_dup = self.vertices.len() > first
                    && self.vertices[VertIdx(self.vertices.len() - 1)].pt == pt;
                if !is_dup {
                    self.vertices.push(Vertex {
                        pt,
                        next: VertIdx(first),
                        prev: VertIdx(first),
                        flags: VertexFlags::NONE,
                    });
                }
            }

            let mut count = self.vertices.len() - first;
            if count < 2 {
                self.vertices.truncate(first);
                continue;
            }
            if !is_open && self.vertices[VertIdx(first + count - 1)].pt == self.vertices[VertIdx(first)].pt {
                count -= 1;
                self.vertices.truncate(first + count);
            }
            if !is_open && count == 1 {
                self.vertices.truncate(first);
                continue;
            }

            for i in 0..count {
                let v = &mut self.vertices[VertIdx(first + i)];
                v.next = VertIdx(first + (i + 1) % count);
                v.prev = VertIdx(first + (i + count - 1) % count);
            }

            if !self.classify_ring(VertIdx(first), polytype, is_open, total_vertex_count) {
                self.vertices.truncate(first);
            }
        }
    }

    /// Flags the local maxima of a ring and registers its local minima.
    ///
    /// Returns false if the ring is a completely flat closed path, which
    /// can't contribute anything.
    fn classify_ring(&mut self, v0: VertIdx, polytype: PathType, is_open: bool, max_steps: usize) -> bool {
        let y0 = self.vertices[v0].pt.y;
        let mut going_up;

        if is_open {
            let mut curr = self.vertices[v0].next;
            let mut steps = 0;
            while curr != v0 && self.vertices[curr].pt.y == y0 {
                curr = self.vertices[curr].next;
                steps += 1;
                if steps > max_steps {
                    tracing::warn!("runaway vertex walk while scanning an open path start");
                    break;
                }
            }
            going_up = self.vertices[curr].pt.y <= y0;
            if going_up {
                self.vertices[v0].flags = VertexFlags::OPEN_START;
                self.add_local_min(v0, polytype, true);
            } else {
                self.vertices[v0].flags = VertexFlags::OPEN_START | VertexFlags::LOCAL_MAX;
            }
        } else {
            let mut prev = self.vertices[v0].prev;
            let mut steps = 0;
            while prev != v0 && self.vertices[prev].pt.y == y0 {
                prev = self.vertices[prev].prev;
                steps += 1;
                if steps > max_steps {
                    tracing::warn!("runaway vertex walk while scanning a closed path");
                    break;
                }
            }
            if prev == v0 {
                // Only open paths can be completely flat.
                return false;
            }
            going_up = self.vertices[prev].pt.y > y0;
        }

        let going_up0 = going_up;
        let mut prev = v0;
        let mut curr = self.vertices[v0].next;
        let mut steps = 0;
        while curr != v0 {
            let curr_y = self.vertices[curr].pt.y;
            let prev_y = self.vertices[prev].pt.y;
            if curr_y > prev_y && going_up {
                self.vertices[prev].flags.insert(VertexFlags::LOCAL_MAX);
                going_up = false;
            } else if curr_y < prev_y && !going_up {
                going_up = true;
                self.add_local_min(prev, polytype, is_open);
            }
            prev = curr;
            curr = self.vertices[curr].next;

            steps += 1;
            if steps > max_steps {
                tracing::warn!("runaway vertex walk while finding local minima");
                break;
            }
        }

        if is_open {
            self.vertices[prev].flags.insert(VertexFlags::OPEN_END);
            if going_up {
                self.vertices[prev].flags.insert(VertexFlags::LOCAL_MAX);
            } else {
                self.add_local_min(prev, polytype, is_open);
            }
        } else if going_up != going_up0 {
            if going_up0 {
                self.add_local_min(prev, polytype, false);
            } else {
                self.vertices[prev].flags.insert(VertexFlags::LOCAL_MAX);
            }
        }
        true
    }

    /// Copies another set of vertex rings and minima into this one.
    pub fn append(&mut self, other: &VertexData) {
        let offset = self.vertices.len();
        let shift = |v: VertIdx| VertIdx(v.0 + offset);
        self.vertices.reserve(other.vertices.len());
        for (_, v) in other.vertices.iter() {
            self.vertices.push(Vertex {
                pt: v.pt,
                next: shift(v.next),
                prev: shift(v.prev),
                flags: v.flags,
            });
        }
        for (_, lm) in other.minima.iter() {
            self.minima.push(LocalMinima {
                vertex: shift(lm.vertex),
                ..*lm
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i64, i64)]) -> Path {
        coords.iter().map(|&p| p.into()).collect()
    }

    fn minima_points(data: &VertexData) -> Vec<Point> {
        data.minima
            .iter()
            .map(|(_, lm)| data.vertices[lm.vertex].pt)
            .collect()
    }

    #[test]
    fn square_has_one_minimum() {
        let mut data = VertexData::default();
        data.add_paths(&[pts(&[(0, 0), (10, 0), (10, 10), (0, 10)])], PathType::Subject, false);
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.minima.len(), 1);
        // The minimum is at the bottom (largest y).
        assert_eq!(minima_points(&data)[0].y, 10);
        let max_count = data
            .vertices
            .iter()
            .filter(|(_, v)| v.flags.intersects(VertexFlags::LOCAL_MAX))
            .count();
        assert_eq!(max_count, 1);
    }

    #[test]
    fn duplicates_and_closing_point_are_stripped() {
        let mut data = VertexData::default();
        data.add_paths(
            &[pts(&[(0, 0), (0, 0), (10, 0), (10, 10), (10, 10), (0, 0)])],
            PathType::Clip,
            false,
        );
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.minima.len(), 1);
    }

    #[test]
    fn degenerate_paths_are_skipped() {
        let mut data = VertexData::default();
        data.add_paths(
            &[
                pts(&[]),
                pts(&[(3, 3)]),
                pts(&[(3, 3), (3, 3), (3, 3)]),
                pts(&[(0, 5), (10, 5), (20, 5)]),
            ],
            PathType::Subject,
            false,
        );
        assert!(data.vertices.is_empty());
        assert!(data.minima.is_empty());
    }

    #[test]
    fn flat_open_path_is_kept() {
        let mut data = VertexData::default();
        data.add_paths(&[pts(&[(0, 5), (10, 5)])], PathType::Subject, true);
        assert_eq!(data.vertices.len(), 2);
        assert_eq!(data.minima.len(), 1);
        let v0 = &data.vertices[VertIdx(0)];
        assert!(v0.flags.intersects(VertexFlags::OPEN_START));
        let v1 = &data.vertices[VertIdx(1)];
        assert!(v1.flags.intersects(VertexFlags::OPEN_END));
        assert!(v1.flags.intersects(VertexFlags::LOCAL_MAX));
    }

    #[test]
    fn append_shifts_indices() {
        let mut a = VertexData::default();
        a.add_paths(&[pts(&[(0, 0), (10, 0), (5, 10)])], PathType::Subject, false);
        let mut b = VertexData::default();
        b.add_paths(&[pts(&[(0, 0), (10, 0), (5, 10)])], PathType::Clip, false);
        a.append(&b);
        assert_eq!(a.vertices.len(), 6);
        assert_eq!(a.minima.len(), 2);
        let lm = a.minima[LocMinIdx(1)];
        assert!(lm.vertex.0 >= 3);
        let v = &a.vertices[lm.vertex];
        assert!(v.next.0 >= 3 && v.prev.0 >= 3);
    }
}
