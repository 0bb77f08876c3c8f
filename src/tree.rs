//! Nested output polygons.
//!
//! A [`PolyTree`] holds the closed output of a clipping operation, arranged
//! by containment. The root is an empty sentinel at level 0; outer polygons
//! are its children at level 1, their holes are at level 2, polygons inside
//! those holes are at level 3, and so on. For example, the shaded set below
//!
//! ```text
//!   ----------------------
//!   |xxxxxxxxxxxxxxxxxxxx|
//!   |xxx--------------xxx|
//!   |xxx|            |xxx|
//!   |xxx|   /\       |xxx|
//!   |xxx|  /xx\      |xxx|
//!   |xxx|  \xx/      |xxx|
//!   |xxx|   \/       |xxx|
//!   |xxx--------------xxx|
//!   |xxxxxxxxxxxxxxxxxxxx|
//!   ----------------------
//! ```
//!
//! is an outer square (level 1) with a hole (level 2) that contains a
//! diamond (level 3).

use std::fmt;

use crate::geom::{area, Path, Paths, Point};

typed_vec!(NodeVec, NodeIdx, "node");

#[derive(Clone, Debug, Default)]
struct Node {
    polygon: Path,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
    level: usize,
}

/// Closed polygons, nested by containment.
#[derive(Clone, Debug)]
pub struct PolyTree {
    nodes: NodeVec<Node>,
}

impl Default for PolyTree {
    fn default() -> Self {
        let mut nodes = NodeVec::default();
        nodes.push(Node::default());
        PolyTree { nodes }
    }
}

impl PolyTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root of the tree.
    ///
    /// The root has no polygon of its own; its children are the outermost
    /// polygons.
    pub fn root(&self) -> PolyPath<'_> {
        PolyPath {
            tree: self,
            idx: self.root_idx(),
        }
    }

    pub(crate) fn root_idx(&self) -> NodeIdx {
        NodeIdx(0)
    }

    pub(crate) fn add_child(&mut self, parent: NodeIdx, polygon: Path) -> NodeIdx {
        let level = self.nodes[parent].level + 1;
        let idx = self.nodes.push(Node {
            polygon,
            parent: Some(parent),
            children: Vec::new(),
            level,
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Removes every polygon.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The number of polygons in the tree, at all levels.
    pub fn total_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Does the tree have no polygons at all?
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// All of the polygons in the tree, flattened.
    ///
    /// Parents come before their children.
    pub fn to_paths(&self) -> Paths {
        let mut ret = Vec::with_capacity(self.total_count());
        let mut stack: Vec<NodeIdx> = self.nodes[self.root_idx()].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            ret.push(node.polygon.clone());
            stack.extend(node.children.iter().rev());
        }
        ret
    }

    /// Draws the tree, with holes in a different color.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self) -> svg::Document {
        use svg::node::element::path::Data;

        let mut document = svg::Document::new();
        let mut min = Point::new(i64::MAX, i64::MAX);
        let mut max = Point::new(i64::MIN, i64::MIN);
        for (idx, node) in self.nodes.iter() {
            let Some((first, rest)) = node.polygon.split_first() else {
                continue;
            };
            let mut data = Data::new().move_to((first.x as f64, first.y as f64));
            for p in rest {
                data = data.line_to((p.x as f64, p.y as f64));
            }
            data = data.close();
            for p in &node.polygon {
                min = Point::new(min.x.min(p.x), min.y.min(p.y));
                max = Point::new(max.x.max(p.x), max.y.max(p.y));
            }

            let color = if (PolyPath { tree: self, idx }).is_hole() {
                "red"
            } else {
                "blue"
            };
            let path = svg::node::element::Path::new()
                .set("stroke", color)
                .set("stroke-width", 1.0)
                .set("fill", "none")
                .set("d", data);
            document = document.add(path);
        }
        if min.x <= max.x {
            let (x, y) = (min.x as f64 - 1.0, min.y as f64 - 1.0);
            let (w, h) = ((max.x - min.x) as f64 + 2.0, (max.y - min.y) as f64 + 2.0);
            document = document.set("viewBox", (x, y, w, h));
        }
        document
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for PolyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn visit(f: &mut fmt::Formatter<'_>, node: PolyPath<'_>, idx: usize) -> fmt::Result {
            let count = node.count();
            let padding = node.level() * 2;
            if node.is_hole() {
                writeln!(
                    f,
                    "{:padding$}+- hole ({idx}) contains {count} nested polygon{}.",
                    "",
                    plural(count)
                )?;
            } else {
                writeln!(f, "{:padding$}+- polygon ({idx}) contains {count} hole{}.", "", plural(count))?;
            }
            for (i, child) in node.children().enumerate() {
                if child.count() > 0 {
                    visit(f, child, i)?;
                }
            }
            Ok(())
        }

        let root = self.root();
        writeln!(f, "Polytree with {} polygon{}.", root.count(), plural(root.count()))?;
        for (i, child) in root.children().enumerate() {
            if child.count() > 0 {
                visit(f, child, i)?;
            }
        }
        Ok(())
    }
}

/// A borrowed view of one node of a [`PolyTree`].
#[derive(Clone, Copy)]
pub struct PolyPath<'a> {
    tree: &'a PolyTree,
    idx: NodeIdx,
}

impl fmt::Debug for PolyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolyPath")
            .field("level", &self.level())
            .field("polygon", &self.polygon())
            .field("count", &self.count())
            .finish()
    }
}

impl<'a> PolyPath<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.idx]
    }

    /// This node's polygon. The root's polygon is empty.
    pub fn polygon(&self) -> &'a [Point] {
        &self.node().polygon
    }

    /// The number of direct children.
    pub fn count(&self) -> usize {
        self.node().children.len()
    }

    /// The `i`th direct child.
    pub fn child(&self, i: usize) -> Option<PolyPath<'a>> {
        let idx = *self.node().children.get(i)?;
        Some(PolyPath { tree: self.tree, idx })
    }

    /// The direct children, in the order they were found.
    pub fn children(&self) -> impl Iterator<Item = PolyPath<'a>> + 'a {
        let tree = self.tree;
        self.node().children.iter().map(move |&idx| PolyPath { tree, idx })
    }

    /// The node containing this one, or `None` for the root.
    pub fn parent(&self) -> Option<PolyPath<'a>> {
        let idx = self.node().parent?;
        Some(PolyPath { tree: self.tree, idx })
    }

    /// The depth of this node; the root is at level 0.
    pub fn level(&self) -> usize {
        self.node().level
    }

    /// Holes are at even, non-zero levels.
    pub fn is_hole(&self) -> bool {
        let level = self.level();
        level != 0 && level % 2 == 0
    }

    /// The signed area of this polygon plus all of its descendants.
    ///
    /// Since holes have the opposite orientation to their parents, this is
    /// the area that this subtree actually covers.
    pub fn area(&self) -> f64 {
        let mut ret = 0.0;
        let mut stack = vec![self.idx];
        while let Some(idx) = stack.pop() {
            let node = &self.tree.nodes[idx];
            ret += area(&node.polygon);
            stack.extend(node.children.iter().copied());
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i64, y: i64, size: i64, positive: bool) -> Path {
        let mut ret: Path = vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ];
        if !positive {
            ret.reverse();
        }
        ret
    }

    fn nested() -> PolyTree {
        let mut tree = PolyTree::new();
        let outer = tree.add_child(tree.root_idx(), square(0, 0, 100, true));
        let hole = tree.add_child(outer, square(10, 10, 80, false));
        tree.add_child(hole, square(20, 20, 10, true));
        tree.add_child(tree.root_idx(), square(200, 0, 10, true));
        tree
    }

    #[test]
    fn levels_and_holes() {
        let tree = nested();
        let root = tree.root();
        assert_eq!(root.level(), 0);
        assert!(!root.is_hole());
        assert!(root.polygon().is_empty());
        assert!(root.parent().is_none());
        assert_eq!(root.count(), 2);
        assert_eq!(tree.total_count(), 4);

        let outer = root.child(0).unwrap();
        let hole = outer.child(0).unwrap();
        let island = hole.child(0).unwrap();
        assert_eq!(outer.level(), 1);
        assert!(!outer.is_hole());
        assert!(hole.is_hole());
        assert!(!island.is_hole());
        assert_eq!(island.parent().unwrap().polygon(), hole.polygon());
        assert!(root.child(2).is_none());
    }

    #[test]
    fn area_subtracts_holes() {
        let tree = nested();
        let outer = tree.root().child(0).unwrap();
        // The square's area is positive and the hole's is negative, so the
        // outer subtree covers 10000 - 6400 + 100.
        assert_eq!(outer.area(), 3700.0);
        assert_eq!(tree.root().area(), 3800.0);
    }

    #[test]
    fn flattening() {
        let tree = nested();
        let paths = tree.to_paths();
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], square(0, 0, 100, true));
        assert_eq!(paths[1], square(10, 10, 80, false));
        assert_eq!(paths[3], square(200, 0, 10, true));
    }

    #[test]
    fn display() {
        let tree = nested();
        insta::assert_snapshot!(tree.to_string(), @r"
        Polytree with 2 polygons.
          +- polygon (0) contains 1 hole.
            +- hole (0) contains 1 nested polygon.
        ");

        let mut tree = tree;
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.to_string(), "Polytree with 0 polygons.\n");
    }
}
