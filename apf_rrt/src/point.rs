use nalgebra as na;

pub type Point = na::Point2<f64>;
pub type Vector = na::Vector2<f64>;

#[inline(always)]
pub fn point2(x: f64, y: f64) -> Point {
    na::Point2::new(x, y)
}

#[inline(always)]
pub fn vec2(x: f64, y: f64) -> Vector {
    na::Vector2::new(x, y)
}

#[inline(always)]
pub fn distance(a: &Point, b: &Point) -> f64 {
    na::distance(a, b)
}

/// Normalizes `v`, or returns `None` for the zero vector (or anything not finite).
#[inline]
pub fn unit(v: Vector) -> Option<Vector> {
    v.try_normalize(0.0).filter(|u| u.x.is_finite() && u.y.is_finite())
}

/// Unit vector pointing from `from` to `to`. `None` when both points coincide.
#[inline]
pub fn direction(from: &Point, to: &Point) -> Option<Vector> {
    unit(to - from)
}

/// Same as [`direction`], but the coincident case collapses into the zero vector so the
/// result can be summed into a force.
#[inline]
pub fn direction_or_zero(from: &Point, to: &Point) -> Vector {
    direction(from, to).unwrap_or_else(Vector::zeros)
}

/// `v` rotated by +90 degrees.
#[inline(always)]
pub fn perpendicular(v: &Vector) -> Vector {
    vec2(-v.y, v.x)
}

/// Whether `a`, `b`, `c` make a strict counter-clockwise turn. Collinear triples are not.
#[inline]
pub fn ccw(a: &Point, b: &Point, c: &Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        distance(&self.a, &self.b)
    }

    pub fn midpoint(&self) -> Point {
        na::center(&self.a, &self.b)
    }

    /// Proper intersection: each segment's endpoints straddle the other's supporting line.
    /// Segments lying on a common line never count as intersecting.
    pub fn intersects(&self, other: &Segment) -> bool {
        let (a, b, c, d) = (&self.a, &self.b, &other.a, &other.b);
        ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_of_zero_is_none() {
        assert_eq!(unit(Vector::zeros()), None);
        assert_eq!(direction(&point2(1.0, 1.0), &point2(1.0, 1.0)), None);
        assert_eq!(direction_or_zero(&point2(1.0, 1.0), &point2(1.0, 1.0)), Vector::zeros());
    }

    #[test]
    fn direction_is_normalized() {
        let d = direction(&point2(0.0, 0.0), &point2(3.0, 4.0)).unwrap();
        assert!((d.norm() - 1.0).abs() < 1e-12);
        assert!((d.x - 0.6).abs() < 1e-12);
        assert!((d.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_rotates_counter_clockwise() {
        assert_eq!(perpendicular(&vec2(1.0, 0.0)), vec2(0.0, 1.0));
        assert_eq!(perpendicular(&vec2(0.0, 1.0)), vec2(-1.0, 0.0));
    }

    #[test]
    fn crossing_segments_intersect() {
        let s1 = Segment::new(point2(0.0, 0.0), point2(2.0, 2.0));
        let s2 = Segment::new(point2(0.0, 2.0), point2(2.0, 0.0));
        assert!(s1.intersects(&s2));
        assert!(s2.intersects(&s1));
    }

    #[test]
    fn disjoint_and_touching_segments_do_not_intersect() {
        let s1 = Segment::new(point2(0.0, 0.0), point2(1.0, 0.0));
        let s2 = Segment::new(point2(0.0, 1.0), point2(1.0, 1.0));
        assert!(!s1.intersects(&s2));

        // Running along the same line is tangential contact, not a crossing.
        let s3 = Segment::new(point2(0.5, 0.0), point2(2.0, 0.0));
        assert!(!s1.intersects(&s3));
    }

    #[test]
    fn midpoint_and_length() {
        let s = Segment::new(point2(0.0, 0.0), point2(6.0, 8.0));
        assert_eq!(s.midpoint(), point2(3.0, 4.0));
        assert!((s.length() - 10.0).abs() < 1e-12);
    }
}
