use itertools::Itertools;
use nalgebra as na;

use crate::point::Point;
use crate::tree::Tree;

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub waypoints: Vec<Point>,
}

impl Path {
    pub fn new(waypoints: Vec<Point>) -> Self {
        Self { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn start(&self) -> Option<&Point> {
        self.waypoints.first()
    }

    pub fn end(&self) -> Option<&Point> {
        self.waypoints.last()
    }

    /// Sum of the lengths of consecutive waypoint segments.
    pub fn length(&self) -> f64 {
        self.waypoints
            .iter()
            .tuple_windows()
            .map(|(a, b)| na::distance(a, b))
            .sum()
    }
}

/// Walks parent links from `terminal` back to the root and returns them in root-to-terminal
/// order. `None` if `terminal` is not a node of `tree`.
pub fn extract_path(tree: &Tree, terminal: usize) -> Option<Path> {
    let mut waypoints = vec![*tree.get(terminal)?];
    let mut curr = terminal;

    while let Some(prev) = tree.parent(curr) {
        waypoints.push(tree.vertices()[prev]);
        curr = prev;
    }
    waypoints.reverse();

    Some(Path::new(waypoints))
}
