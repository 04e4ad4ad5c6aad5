//! Artificial potential field used to bias tree expansion.
//!
//! The field has three parts: an attraction toward the goal, an inverse-distance repulsion
//! from every obstacle whose center is within the influence radius, and (optionally) a noisy
//! velocity repulsion term. Obstacle centers are taken from the inflated bounds, which share
//! their center with the raw rectangle.

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::error::ConfigError;
use crate::obstacle::{distance_to_center, Obstacle};
use crate::point::*;

/// Added to the squared distance in the velocity term so it stays finite near a center.
const VELOCITY_EPSILON: f64 = 1e-6;

/// Makes the influence radius oscillate between `radius / 2` and `radius` as the planner
/// iterates: `radius * (1 - 0.5 * |sin(iteration * phase_step)|)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicInfluence {
    pub phase_step: f64,
}

impl Default for DynamicInfluence {
    fn default() -> Self {
        Self { phase_step: 0.05 }
    }
}

/// Repulsion from an obstacle moving with a random velocity drawn from `N(0, std_dev²)` per
/// axis every time the field is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityRepulsion {
    pub gain: f64,
    pub std_dev: f64,
}

impl Default for VelocityRepulsion {
    fn default() -> Self {
        Self {
            gain: 0.5,
            std_dev: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldParams {
    #[serde(default = "default_gain")]
    pub attractive_gain: f64,
    #[serde(default = "default_gain")]
    pub repulsive_gain: f64,
    #[serde(default = "default_influence_radius")]
    pub influence_radius: f64,
    #[serde(default)]
    pub dynamic_influence: Option<DynamicInfluence>,
    #[serde(default)]
    pub velocity_repulsion: Option<VelocityRepulsion>,
}

fn default_gain() -> f64 {
    1.0
}

fn default_influence_radius() -> f64 {
    250.0
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            attractive_gain: default_gain(),
            repulsive_gain: default_gain(),
            influence_radius: default_influence_radius(),
            dynamic_influence: None,
            velocity_repulsion: None,
        }
    }
}

impl FieldParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("attractive gain", self.attractive_gain),
            ("repulsive gain", self.repulsive_gain),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if !(self.influence_radius.is_finite() && self.influence_radius > 0.0) {
            return Err(ConfigError::InvalidInfluenceRadius(self.influence_radius));
        }

        if let Some(dynamic) = self.dynamic_influence {
            if !dynamic.phase_step.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: "phase step",
                    value: dynamic.phase_step,
                });
            }
        }

        if let Some(velocity) = self.velocity_repulsion {
            if !(velocity.gain.is_finite() && velocity.gain >= 0.0) {
                return Err(ConfigError::Negative {
                    name: "velocity repulsion gain",
                    value: velocity.gain,
                });
            }
            if !(velocity.std_dev.is_finite() && velocity.std_dev > 0.0) {
                return Err(ConfigError::InvalidVelocityNoise(format!(
                    "standard deviation must be positive and finite, but was {}",
                    velocity.std_dev
                )));
            }
        }

        Ok(())
    }
}

/// Magnitude of the repulsion exerted by an obstacle center `distance` away.
///
/// Unbounded as `distance -> 0`, zero from `influence_radius` on.
pub fn repulsive_magnitude(distance: f64, influence_radius: f64) -> f64 {
    if distance >= influence_radius {
        return 0.0;
    }
    (1.0 / distance - 1.0 / influence_radius) / (distance * distance)
}

/// Repulsion exerted on `p` by an obstacle centered at `center`, pointing away from it.
pub fn repulsive_force(p: &Point, center: &Point, influence_radius: f64) -> Vector {
    let away = p - center;
    let distance = away.norm();
    if distance <= 0.0 || distance >= influence_radius {
        return Vector::zeros();
    }

    let magnitude = repulsive_magnitude(distance, influence_radius);
    if !magnitude.is_finite() {
        return Vector::zeros();
    }
    away * (magnitude / distance)
}

#[derive(Debug, Clone, Copy)]
struct VelocityNoise {
    gain: f64,
    normal: Normal,
}

#[derive(Debug, Clone)]
pub struct PotentialField {
    params: FieldParams,
    velocity: Option<VelocityNoise>,
}

impl PotentialField {
    pub fn new(params: FieldParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let velocity = params
            .velocity_repulsion
            .map(|v| {
                Normal::new(0.0, v.std_dev)
                    .map(|normal| VelocityNoise {
                        gain: v.gain,
                        normal,
                    })
                    .map_err(|e| ConfigError::InvalidVelocityNoise(e.to_string()))
            })
            .transpose()?;

        Ok(Self { params, velocity })
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// The influence radius in effect at the given planner iteration.
    pub fn influence_radius(&self, iteration: usize) -> f64 {
        let radius = self.params.influence_radius;
        match self.params.dynamic_influence {
            Some(DynamicInfluence { phase_step }) => {
                let phase = iteration as f64 * phase_step;
                radius * (1.0 - 0.5 * phase.sin().abs())
            }
            None => radius,
        }
    }

    /// Raw, unscaled repulsion at `p`: the sum over all obstacles plus the velocity term
    /// when enabled.
    pub fn repulsion<R: Rng + ?Sized>(
        &self,
        p: &Point,
        obstacles: &[Obstacle],
        iteration: usize,
        rng: &mut R,
    ) -> Vector {
        let radius = self.influence_radius(iteration);
        let mut total = Vector::zeros();

        for obstacle in obstacles {
            let center = obstacle.center();
            total += repulsive_force(p, &center, radius);

            if let Some(noise) = &self.velocity {
                let distance = distance_to_center(p, obstacle);
                if distance > 0.0 && distance < radius {
                    let velocity = vec2(noise.normal.sample(rng), noise.normal.sample(rng));
                    let away = p - center;
                    let magnitude =
                        noise.gain * velocity.dot(&away) / (distance * distance + VELOCITY_EPSILON);
                    total += away * (magnitude / distance);
                }
            }
        }

        total
    }

    /// Goal attraction at `p`, zero when already at the goal.
    pub fn attraction(&self, p: &Point, goal: &Point) -> Vector {
        direction_or_zero(p, goal) * self.params.attractive_gain
    }

    /// Unit steering direction from `p`, combining exploration toward `target`, attraction
    /// toward `goal` and the normalized repulsion. `None` if the combination cancels out.
    pub fn direction<R: Rng + ?Sized>(
        &self,
        p: &Point,
        target: &Point,
        goal: &Point,
        obstacles: &[Obstacle],
        iteration: usize,
        rng: &mut R,
    ) -> Option<Vector> {
        let exploration = direction_or_zero(p, target);
        let attraction = self.attraction(p, goal);
        let repulsion = unit(self.repulsion(p, obstacles, iteration, rng))
            .map(|r| r * self.params.repulsive_gain)
            .unwrap_or_else(Vector::zeros);

        unit(exploration + attraction + repulsion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(params: FieldParams) -> PotentialField {
        PotentialField::new(params).unwrap()
    }

    #[test]
    fn magnitude_vanishes_at_influence_radius() {
        assert_eq!(repulsive_magnitude(50.0, 50.0), 0.0);
        assert_eq!(repulsive_magnitude(80.0, 50.0), 0.0);
        assert!(repulsive_magnitude(49.0, 50.0) > 0.0);
    }

    #[test]
    fn magnitude_increases_toward_center() {
        let radius = 250.0;
        let mut previous = repulsive_magnitude(radius, radius);
        let mut d = radius;
        while d > 0.5 {
            d -= 0.5;
            let m = repulsive_magnitude(d, radius);
            assert!(m > previous, "magnitude at {} ({}) <= {}", d, m, previous);
            previous = m;
        }
    }

    #[test]
    fn force_points_away_from_center() {
        let f = repulsive_force(&point2(10.0, 0.0), &point2(0.0, 0.0), 50.0);
        assert!(f.x > 0.0);
        assert_eq!(f.y, 0.0);
        assert_relative_eq!(f.norm(), repulsive_magnitude(10.0, 50.0));
    }

    #[test]
    fn force_at_center_is_zero() {
        let f = repulsive_force(&point2(1.0, 1.0), &point2(1.0, 1.0), 50.0);
        assert_eq!(f, Vector::zeros());
    }

    #[test]
    fn no_obstacles_means_no_repulsion() {
        let f = field(FieldParams::default());
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(f.repulsion(&point2(3.0, 3.0), &[], 0, &mut rng), Vector::zeros());
    }

    #[test]
    fn direction_without_obstacles_blends_target_and_goal() {
        let f = field(FieldParams::default());
        let mut rng = StdRng::seed_from_u64(0);
        let dir = f
            .direction(&point2(0.0, 0.0), &point2(10.0, 0.0), &point2(0.0, 10.0), &[], 0, &mut rng)
            .unwrap();
        assert_relative_eq!(dir.x, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(dir.y, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn opposing_terms_are_degenerate() {
        let f = field(FieldParams::default());
        let mut rng = StdRng::seed_from_u64(0);
        let p = point2(0.0, 0.0);
        let dir = f.direction(&p, &point2(-5.0, 0.0), &point2(5.0, 0.0), &[], 0, &mut rng);
        assert_eq!(dir, None);
    }

    #[test]
    fn repulsion_pushes_direction_away() {
        let f = field(FieldParams::default());
        let mut rng = StdRng::seed_from_u64(0);
        // Obstacle centered at (10, 15), right above the straight line toward the target.
        let obstacles = [Obstacle::new(0.0, 10.0, 20.0, 10.0)];
        let target = point2(100.0, 0.0);
        let dir = f
            .direction(&point2(10.0, 0.0), &target, &target, &obstacles, 0, &mut rng)
            .unwrap();
        assert!(dir.y < 0.0);
        assert!(dir.x > 0.0);
    }

    #[test]
    fn dynamic_radius_stays_within_half_and_full() {
        let f = field(FieldParams {
            influence_radius: 50.0,
            dynamic_influence: Some(DynamicInfluence::default()),
            ..FieldParams::default()
        });
        assert_eq!(f.influence_radius(0), 50.0);
        for i in 0..1000 {
            let r = f.influence_radius(i);
            assert!((25.0..=50.0).contains(&r));
        }
    }

    #[test]
    fn velocity_term_is_seeded() {
        let f = field(FieldParams {
            velocity_repulsion: Some(VelocityRepulsion::default()),
            ..FieldParams::default()
        });
        let obstacles = [Obstacle::new(0.0, 0.0, 10.0, 10.0)];
        let p = point2(30.0, 30.0);

        let a = f.repulsion(&p, &obstacles, 0, &mut StdRng::seed_from_u64(7));
        let b = f.repulsion(&p, &obstacles, 0, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let plain = field(FieldParams::default());
        let plain = plain.repulsion(&p, &obstacles, 0, &mut StdRng::seed_from_u64(7));
        assert_ne!(a, plain);
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(matches!(
            PotentialField::new(FieldParams {
                influence_radius: 0.0,
                ..FieldParams::default()
            }),
            Err(ConfigError::InvalidInfluenceRadius(_))
        ));
        assert!(matches!(
            PotentialField::new(FieldParams {
                repulsive_gain: -1.0,
                ..FieldParams::default()
            }),
            Err(ConfigError::Negative { .. })
        ));
        assert!(matches!(
            PotentialField::new(FieldParams {
                velocity_repulsion: Some(VelocityRepulsion {
                    gain: 0.5,
                    std_dev: 0.0,
                }),
                ..FieldParams::default()
            }),
            Err(ConfigError::InvalidVelocityNoise(_))
        ));
    }

    #[test]
    fn validate_checks_optional_terms() {
        for std_dev in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let params = FieldParams {
                velocity_repulsion: Some(VelocityRepulsion { gain: 0.5, std_dev }),
                ..FieldParams::default()
            };
            assert!(matches!(params.validate(), Err(ConfigError::InvalidVelocityNoise(_))));
        }

        let params = FieldParams {
            dynamic_influence: Some(DynamicInfluence { phase_step: f64::NAN }),
            ..FieldParams::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, ConfigError::NonFinite { name: "phase step", .. }));
        assert_eq!(err.to_string(), "phase step must be finite, but was NaN");
    }
}
