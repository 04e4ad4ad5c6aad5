use std::cmp::Ordering;

use nalgebra as na;
use rand::Rng;

use crate::point::Point;

/// Draws a point uniformly from `[0, x_max] x [0, y_max]`.
pub(crate) fn gen_random_in_workspace<R: Rng + ?Sized>(
    rng: &mut R,
    x_max: f64,
    y_max: f64,
) -> Point {
    let rand_vec = rng.gen::<na::Vector2<f64>>();
    Point::from(rand_vec.component_mul(&na::Vector2::new(x_max, y_max)))
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OrdF64(pub f64);

impl Eq for OrdF64 {}

impl Ord for OrdF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

pub trait ToOrd {
    type Ord: Ord;

    fn to_ord(self) -> Self::Ord;
}

impl ToOrd for f64 {
    type Ord = OrdF64;

    #[inline(always)]
    fn to_ord(self) -> OrdF64 {
        OrdF64(self)
    }
}
