use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::{FieldParams, PotentialField};
use crate::obstacle::Obstacle;
use crate::point::*;

/// How a new candidate is proposed from the nearest tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringStrategy {
    /// Plain RRT: step straight toward the sampled target.
    Direct,
    /// Step along the potential field direction.
    #[default]
    PotentialField,
}

/// Everything steering needs to know about the current expansion besides the two points.
#[derive(Debug, Clone, Copy)]
pub struct SteerContext<'a> {
    pub goal: &'a Point,
    pub obstacles: &'a [Obstacle],
    pub iteration: usize,
}

#[derive(Debug, Clone)]
pub struct Steering {
    strategy: SteeringStrategy,
    step_size: f64,
    escape: bool,
    field: PotentialField,
}

impl Steering {
    pub fn new(
        strategy: SteeringStrategy,
        step_size: f64,
        escape: bool,
        field: FieldParams,
    ) -> Result<Self, ConfigError> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(ConfigError::InvalidStepSize(step_size));
        }

        Ok(Self {
            strategy,
            step_size,
            escape,
            field: PotentialField::new(field)?,
        })
    }

    pub fn strategy(&self) -> SteeringStrategy {
        self.strategy
    }

    pub fn field(&self) -> &PotentialField {
        &self.field
    }

    pub fn escape_enabled(&self) -> bool {
        self.escape
    }

    /// Proposes a point at most one step away from `from` in the steering direction. The step
    /// is capped at the distance to `target` so close samples are not overshot.
    ///
    /// Returns `None` when the steering direction is undefined or the step has zero length.
    /// The candidate is not checked against obstacles.
    pub fn steer<R: Rng + ?Sized>(
        &self,
        from: &Point,
        target: &Point,
        ctx: &SteerContext<'_>,
        rng: &mut R,
    ) -> Option<Point> {
        let length = self.step_size.min(distance(from, target));
        if !(length > 0.0) {
            return None;
        }

        let dir = match self.strategy {
            SteeringStrategy::Direct => direction(from, target)?,
            SteeringStrategy::PotentialField => {
                self.field
                    .direction(from, target, ctx.goal, ctx.obstacles, ctx.iteration, rng)?
            }
        };

        Some(from + dir * length)
    }

    /// Sidesteps perpendicular to the local repulsion. Unavailable when escape is disabled or
    /// nothing repels `from`, i.e. it is not stuck against an obstacle.
    pub fn escape<R: Rng + ?Sized>(
        &self,
        from: &Point,
        ctx: &SteerContext<'_>,
        rng: &mut R,
    ) -> Option<Point> {
        if !self.escape {
            return None;
        }

        let repulsion = self
            .field
            .repulsion(from, ctx.obstacles, ctx.iteration, rng);
        let dir = unit(perpendicular(&repulsion))?;

        Some(from + dir * self.step_size)
    }
}
