use nalgebra as na;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::{DynamicInfluence, FieldParams, VelocityRepulsion};
use crate::obstacle::Obstacle;
use crate::planner::Planner;
use crate::point::*;
use crate::steering::SteeringStrategy;

fn default_goal_sample_prob() -> f64 {
    0.3
}

fn default_escape() -> bool {
    true
}

/// Immutable description of a planning problem and of how the planner should attack it.
///
/// The workspace is `[0, x_max] x [0, y_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub start: Point,
    pub goal: Point,
    pub step_size: f64,
    /// A node this close to the goal terminates the search.
    pub goal_tolerance: f64,
    /// Iteration budget.
    pub max_iters: usize,
    pub x_max: f64,
    pub y_max: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Safety buffer added around every obstacle.
    #[serde(default)]
    pub inflation_margin: f64,
    #[serde(default = "default_goal_sample_prob")]
    pub goal_sample_prob: f64,
    /// Candidates closer than this to an obstacle center are rejected. Zero disables the check.
    #[serde(default)]
    pub safety_radius: f64,
    #[serde(default)]
    pub strategy: SteeringStrategy,
    #[serde(default)]
    pub field: FieldParams,
    #[serde(default = "default_escape")]
    pub escape: bool,
}

impl PlannerConfig {
    /// Potential-field configuration with default gains and escape enabled. `bias` is the goal
    /// tolerance and `num_nodes` the iteration budget.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start: Point,
        goal: Point,
        step: f64,
        bias: f64,
        num_nodes: usize,
        x_max: f64,
        y_max: f64,
        obstacles: Vec<Obstacle>,
        inflation_margin: f64,
    ) -> Self {
        PlannerConfig {
            start,
            goal,
            step_size: step,
            goal_tolerance: bias,
            max_iters: num_nodes,
            x_max,
            y_max,
            obstacles,
            inflation_margin,
            goal_sample_prob: default_goal_sample_prob(),
            safety_radius: 0.0,
            strategy: SteeringStrategy::default(),
            field: FieldParams::default(),
            escape: default_escape(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(ConfigError::InvalidStepSize(self.step_size));
        }

        if !(self.goal_tolerance.is_finite() && self.goal_tolerance >= 0.0) {
            return Err(ConfigError::InvalidGoalTolerance(self.goal_tolerance));
        }

        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.x_max) && positive(self.y_max)) {
            return Err(ConfigError::InvalidWorkspace {
                x_max: self.x_max,
                y_max: self.y_max,
            });
        }

        for (which, point) in [("start", self.start), ("goal", self.goal)] {
            if !(point.x.is_finite() && point.y.is_finite()) {
                return Err(ConfigError::NonFinitePoint { which, point });
            }
            if !self.in_workspace(&point) {
                return Err(ConfigError::OutsideWorkspace {
                    which,
                    point,
                    x_max: self.x_max,
                    y_max: self.y_max,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.goal_sample_prob) {
            return Err(ConfigError::InvalidProbability(self.goal_sample_prob));
        }

        for (name, value) in [
            ("inflation margin", self.inflation_margin),
            ("safety radius", self.safety_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if let Some(index) = self.obstacles.iter().position(|o| !o.is_valid()) {
            return Err(ConfigError::InvalidObstacle { index });
        }

        if self
            .obstacles
            .iter()
            .any(|o| o.inflated_bounds(self.inflation_margin).contains_strict(&self.start))
        {
            return Err(ConfigError::StartBlocked(self.start));
        }

        self.field.validate()
    }

    pub fn in_workspace(&self, p: &Point) -> bool {
        (0.0..=self.x_max).contains(&p.x) && (0.0..=self.y_max).contains(&p.y)
    }
}

pub struct PlannerBuilder {
    from: Point,
    to: Point,
    obstacles: Vec<Obstacle>,
    step_size: Option<f64>,
    goal_tolerance: Option<f64>,
    max_iters: Option<usize>,
    workspace: Option<(f64, f64)>,
    inflation_margin: f64,
    sample_goal_prob: Option<f64>,
    safety_radius: f64,
    strategy: SteeringStrategy,
    field: FieldParams,
    escape: bool,
}

impl PlannerBuilder {
    pub fn new(from: Point, to: Point) -> PlannerBuilder {
        PlannerBuilder {
            from,
            to,
            obstacles: Vec::new(),
            step_size: None,
            goal_tolerance: None,
            max_iters: None,
            workspace: None,
            inflation_margin: 0.0,
            sample_goal_prob: None,
            safety_radius: 0.0,
            strategy: SteeringStrategy::default(),
            field: FieldParams::default(),
            escape: true,
        }
    }

    pub fn add_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn extend_obstacles(mut self, obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size.replace(step_size);
        self
    }

    pub fn with_goal_tolerance(mut self, goal_tolerance: f64) -> Self {
        self.goal_tolerance.replace(goal_tolerance);
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters.replace(max_iters);
        self
    }

    pub fn with_workspace(mut self, x_max: f64, y_max: f64) -> Self {
        self.workspace.replace((x_max, y_max));
        self
    }

    pub fn with_inflation_margin(mut self, margin: f64) -> Self {
        self.inflation_margin = margin;
        self
    }

    pub fn with_sample_goal_prob(mut self, prob: f64) -> Self {
        self.sample_goal_prob.replace(prob);
        self
    }

    pub fn with_safety_radius(mut self, radius: f64) -> Self {
        self.safety_radius = radius;
        self
    }

    pub fn with_strategy(mut self, strategy: SteeringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_attractive_gain(mut self, gain: f64) -> Self {
        self.field.attractive_gain = gain;
        self
    }

    pub fn with_repulsive_gain(mut self, gain: f64) -> Self {
        self.field.repulsive_gain = gain;
        self
    }

    pub fn with_influence_radius(mut self, radius: f64) -> Self {
        self.field.influence_radius = radius;
        self
    }

    pub fn with_dynamic_influence(mut self, dynamic: DynamicInfluence) -> Self {
        self.field.dynamic_influence.replace(dynamic);
        self
    }

    pub fn with_velocity_repulsion(mut self, velocity: VelocityRepulsion) -> Self {
        self.field.velocity_repulsion.replace(velocity);
        self
    }

    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    pub fn get_from(&self) -> Point {
        self.from
    }

    pub fn get_to(&self) -> Point {
        self.to
    }

    pub fn get_obstacles(&self) -> &[Obstacle] {
        self.obstacles.as_slice()
    }

    pub fn get_step_size(&self) -> f64 {
        self.step_size
            .unwrap_or(na::distance(&self.from, &self.to) / 100.0)
    }

    pub fn get_goal_tolerance(&self) -> f64 {
        self.goal_tolerance
            .unwrap_or_else(|| 1.5 * self.get_step_size())
    }

    pub fn get_max_iters(&self) -> usize {
        self.max_iters.unwrap_or(5000)
    }

    /// Without an explicit workspace, the smallest one holding both endpoints plus some padding.
    pub fn get_workspace(&self) -> (f64, f64) {
        self.workspace.unwrap_or_else(|| {
            let padding = self.get_goal_tolerance();
            (
                self.from.x.max(self.to.x) + padding,
                self.from.y.max(self.to.y) + padding,
            )
        })
    }

    pub fn get_sample_goal_prob(&self) -> f64 {
        self.sample_goal_prob.unwrap_or_else(default_goal_sample_prob)
    }

    pub fn build(self) -> Result<PlannerConfig, ConfigError> {
        let (x_max, y_max) = self.get_workspace();
        let config = PlannerConfig {
            start: self.from,
            goal: self.to,
            step_size: self.get_step_size(),
            goal_tolerance: self.get_goal_tolerance(),
            max_iters: self.get_max_iters(),
            x_max,
            y_max,
            goal_sample_prob: self.get_sample_goal_prob(),
            inflation_margin: self.inflation_margin,
            safety_radius: self.safety_radius,
            strategy: self.strategy,
            field: self.field,
            escape: self.escape,
            obstacles: self.obstacles,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn planner<R: Rng>(self, rng: R) -> Result<Planner<R>, ConfigError> {
        Planner::new(self.build()?, rng)
    }

    pub fn seeded(self, seed: u64) -> Result<Planner<StdRng>, ConfigError> {
        self.planner(StdRng::seed_from_u64(seed))
    }
}
