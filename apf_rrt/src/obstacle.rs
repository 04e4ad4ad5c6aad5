use itertools::Itertools;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::point::*;

/// Axis aligned rectangle given by its lower-left corner and its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub corner: Point,
    pub size: Vector,
}

impl Rect {
    pub fn new(corner: Point, size: Vector) -> Self {
        Self { corner, size }
    }

    pub fn min_corner(&self) -> Point {
        self.corner
    }

    pub fn max_corner(&self) -> Point {
        self.corner + self.size
    }

    pub fn center(&self) -> Point {
        self.corner + self.size / 2.0
    }

    /// Closed containment, the boundary counts as inside.
    pub fn contains(&self, p: &Point) -> bool {
        let max = self.max_corner();
        (self.corner.x..=max.x).contains(&p.x) && (self.corner.y..=max.y).contains(&p.y)
    }

    /// Open containment, points on the boundary are outside.
    pub fn contains_strict(&self, p: &Point) -> bool {
        let max = self.max_corner();
        p.x > self.corner.x && p.x < max.x && p.y > self.corner.y && p.y < max.y
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect::new(
            self.corner - Vector::repeat(margin),
            self.size + Vector::repeat(2.0 * margin),
        )
    }

    /// Returns the vertices in clockwise order, starting at the top-left one.
    pub fn vertices(&self) -> [Point; 4] {
        let min = self.min_corner();
        let max = self.max_corner();
        [
            point2(min.x, max.y),
            point2(max.x, max.y),
            point2(max.x, min.y),
            point2(min.x, min.y),
        ]
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> {
        self.vertices()
            .into_iter()
            .circular_tuple_windows()
            .map(|(a, b)| Segment::new(a, b))
    }

    /// Parameter range `[t0, t1]` of `a + t * (b - a)`, `t` in `[0, 1]`, that lies inside the
    /// closed rectangle. `None` if the segment misses it.
    pub fn clip(&self, a: &Point, b: &Point) -> Option<(f64, f64)> {
        let d = b - a;
        let (min, max) = (self.min_corner(), self.max_corner());
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

        for axis in 0..2 {
            if d[axis] == 0.0 {
                if a[axis] < min[axis] || a[axis] > max[axis] {
                    return None;
                }
                continue;
            }

            let lo = (min[axis] - a[axis]) / d[axis];
            let hi = (max[axis] - a[axis]) / d[axis];
            t0 = t0.max(lo.min(hi));
            t1 = t1.min(lo.max(hi));
        }

        (t0 <= t1).then_some((t0, t1))
    }

    /// Whether the segment `a -> b` enters the open interior of the rectangle.
    ///
    /// A proper crossing of one of the four edges (strict orientation test) blocks, and so does
    /// any overlap with the interior. Sliding along an edge or ending on the boundary does not.
    pub fn blocks_segment(&self, a: &Point, b: &Point) -> bool {
        let segment = Segment::new(*a, *b);
        if self.edges().any(|edge| segment.intersects(&edge)) {
            return true;
        }

        // The part inside the closed rectangle is convex, its middle is interior iff any of it is.
        self.clip(a, b).map_or(false, |(t0, t1)| {
            self.contains_strict(&(a + (b - a) * (0.5 * (t0 + t1))))
        })
    }
}

/// A static rectangular hazard. `(x, y)` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(point2(self.x, self.y), vec2(self.width, self.height))
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.rect().contains(p)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// The safety-inflated shape that collision checks and repulsion reason about.
    pub fn inflated_bounds(&self, margin: f64) -> Rect {
        self.rect().inflate(margin)
    }

    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

impl From<Rect> for Obstacle {
    fn from(rect: Rect) -> Self {
        Obstacle::new(rect.corner.x, rect.corner.y, rect.size.x, rect.size.y)
    }
}

/// Whether the straight move `a -> b` stays clear of `obstacle` inflated by `margin`.
pub fn segment_clear(a: &Point, b: &Point, obstacle: &Obstacle, margin: f64) -> bool {
    !obstacle.inflated_bounds(margin).blocks_segment(a, b)
}

/// [`segment_clear`] over every obstacle.
pub fn segment_clear_all(a: &Point, b: &Point, obstacles: &[Obstacle], margin: f64) -> bool {
    obstacles.iter().all(|o| segment_clear(a, b, o, margin))
}

/// Distance from `p` to the center of the obstacle's inflated bounds.
#[inline]
pub fn distance_to_center(p: &Point, obstacle: &Obstacle) -> f64 {
    na::distance(p, &obstacle.center())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle() -> Obstacle {
        Obstacle::new(200.0, 200.0, 200.0, 300.0)
    }

    #[test]
    fn contains_is_inclusive() {
        let o = obstacle();
        assert!(o.contains(&point2(200.0, 200.0)));
        assert!(o.contains(&point2(400.0, 500.0)));
        assert!(o.contains(&point2(300.0, 300.0)));
        assert!(!o.contains(&point2(199.9, 300.0)));
        assert!(!o.contains(&point2(300.0, 500.1)));
    }

    #[test]
    fn inflated_bounds_grow_every_side() {
        let r = obstacle().inflated_bounds(10.0);
        assert_eq!(r.corner, point2(190.0, 190.0));
        assert_eq!(r.size, vec2(220.0, 320.0));
        assert_eq!(r.center(), obstacle().center());
    }

    #[test]
    fn rect_has_four_closed_edges() {
        let r = Rect::new(point2(0.0, 0.0), vec2(2.0, 1.0));
        let edges: Vec<_> = r.edges().collect();
        assert_eq!(edges.len(), 4);
        for (e1, e2) in edges.iter().circular_tuple_windows() {
            assert_eq!(e1.b, e2.a);
        }
    }

    #[test]
    fn segment_through_obstacle_is_blocked() {
        let o = obstacle();
        assert!(!segment_clear(&point2(100.0, 350.0), &point2(500.0, 350.0), &o, 10.0));
    }

    #[test]
    fn segment_with_midpoint_inside_inflated_bounds_is_blocked() {
        let o = Obstacle::new(100.0, 100.0, 10.0, 10.0);
        let margin = 5.0;

        // Both endpoints lie in the inflation band, the midpoint is inside the obstacle.
        let a = point2(96.0, 105.0);
        let b = point2(114.0, 105.0);
        assert!(o.inflated_bounds(margin).contains_strict(&Segment::new(a, b).midpoint()));
        assert!(!segment_clear(&a, &b, &o, margin));

        // Completely enclosed segments never touch an edge but are still blocked.
        let a = point2(102.0, 102.0);
        let b = point2(108.0, 108.0);
        assert!(!segment_clear(&a, &b, &o, margin));
    }

    #[test]
    fn boundary_to_boundary_segment_through_interior_is_blocked() {
        let o = Obstacle::new(0.0, 0.0, 10.0, 10.0);

        assert!(!segment_clear(&point2(0.0, 5.0), &point2(10.0, 5.0), &o, 0.0));
        assert!(!segment_clear(&point2(0.0, 0.0), &point2(10.0, 10.0), &o, 0.0));
        assert!(!segment_clear(&point2(5.0, 10.0), &point2(5.0, 0.0), &o, 0.0));

        // Same chords of the inflated rectangle.
        assert!(!segment_clear(&point2(-2.0, 5.0), &point2(12.0, 5.0), &o, 2.0));
    }

    #[test]
    fn clip_keeps_the_covered_parameter_range() {
        let r = Rect::new(point2(0.0, 0.0), vec2(10.0, 10.0));

        let (t0, t1) = r.clip(&point2(-10.0, 5.0), &point2(10.0, 5.0)).unwrap();
        assert_eq!((t0, t1), (0.5, 1.0));

        let (t0, t1) = r.clip(&point2(2.0, 2.0), &point2(3.0, 3.0)).unwrap();
        assert_eq!((t0, t1), (0.0, 1.0));

        assert_eq!(r.clip(&point2(-5.0, 11.0), &point2(15.0, 11.0)), None);
        assert_eq!(r.clip(&point2(8.0, -5.0), &point2(15.0, 2.0)), None);
    }

    #[test]
    fn segment_only_grazing_the_margin_is_blocked() {
        let o = Obstacle::new(100.0, 100.0, 10.0, 10.0);
        // Clear of the obstacle itself but clips the inflated corner.
        let a = point2(90.0, 104.0);
        let b = point2(104.0, 90.0);
        assert!(segment_clear(&a, &b, &o, 0.0));
        assert!(!segment_clear(&a, &b, &o, 5.0));
    }

    #[test]
    fn far_away_segment_is_clear() {
        let obstacles = [obstacle(), Obstacle::new(600.0, 550.0, 200.0, 200.0)];
        assert!(segment_clear_all(&point2(0.0, 0.0), &point2(20.0, 20.0), &obstacles, 10.0));
        assert!(segment_clear_all(&point2(0.0, 0.0), &point2(20.0, 20.0), &[], 10.0));
    }

    #[test]
    fn sliding_along_an_edge_is_tolerated() {
        let o = Obstacle::new(0.0, 0.0, 10.0, 10.0);
        assert!(segment_clear(&point2(-5.0, 10.0), &point2(15.0, 10.0), &o, 0.0));
    }

    #[test]
    fn validity() {
        assert!(obstacle().is_valid());
        assert!(Obstacle::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Obstacle::new(0.0, 0.0, -1.0, 2.0).is_valid());
        assert!(!Obstacle::new(f64::NAN, 0.0, 1.0, 2.0).is_valid());
    }
}
