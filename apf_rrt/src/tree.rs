use nalgebra as na;

use crate::path::{extract_path, Path};
use crate::point::Point;
use crate::utils::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Expansion,
    Escape,
}

/// Append-only tree stored as parallel arrays. A node is just an index: `vertices[i]` is its
/// position and `parents[i]` the index of its parent, which is always smaller than `i`. Index
/// 0 is the root and the only node without a parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    vertices: Vec<Point>,
    parents: Vec<Option<usize>>,
    kinds: Vec<NodeKind>,
}

impl Tree {
    pub fn new(root: Point) -> Self {
        Tree::with_capacity(root, 1)
    }

    pub fn with_capacity(root: Point, capacity: usize) -> Self {
        let mut tree = Tree {
            vertices: Vec::with_capacity(capacity),
            parents: Vec::with_capacity(capacity),
            kinds: Vec::with_capacity(capacity),
        };
        tree.vertices.push(root);
        tree.parents.push(None);
        tree.kinds.push(NodeKind::Root);
        tree
    }

    /// Number of nodes, never zero since the root is always there.
    #[allow(clippy::len_without_is_empty)]
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn root(&self) -> Point {
        self.vertices[0]
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    pub fn kinds(&self) -> &[NodeKind] {
        &self.kinds
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.vertices.get(index)
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    pub fn kind(&self, index: usize) -> Option<NodeKind> {
        self.kinds.get(index).copied()
    }

    /// Appends `point` as a child of `parent` and returns its index.
    ///
    /// Panics if `parent` is not already in the tree.
    pub fn insert(&mut self, point: Point, parent: usize, kind: NodeKind) -> usize {
        assert!(
            parent < self.len(),
            "parent index {} is out of bounds for a tree of {} nodes",
            parent,
            self.len()
        );
        assert!(kind != NodeKind::Root, "the tree can only have one root");

        let index = self.len();
        self.vertices.push(point);
        self.parents.push(Some(parent));
        self.kinds.push(kind);
        index
    }

    /// Linear scan for the node closest to `q`. Ties go to the lowest index.
    pub fn nearest(&self, q: &Point) -> (usize, Point) {
        self.vertices
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| na::distance_squared(*p, q).to_ord())
            .map(|(i, p)| (i, *p))
            .unwrap_or((0, self.root()))
    }

    /// `(parent, child)` pairs for every non-root node, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.parents
            .iter()
            .zip(self.vertices.iter())
            .filter_map(move |(parent, &child)| parent.map(|parent| (self.vertices[parent], child)))
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.kinds.iter().filter(|&&k| k == kind).count()
    }

    /// The path from the root to `terminal`, or `None` if there is no such node.
    pub fn backtrace(&self, terminal: usize) -> Option<Path> {
        extract_path(self, terminal)
    }
}
