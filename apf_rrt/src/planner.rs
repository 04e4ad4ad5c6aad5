use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::builder::PlannerConfig;
use crate::error::ConfigError;
use crate::obstacle::{distance_to_center, segment_clear_all};
use crate::path::Path;
use crate::point::*;
use crate::steering::{SteerContext, Steering};
use crate::tree::{NodeKind, Tree};
use crate::utils::gen_random_in_workspace;

/// Upper bound for the up-front tree allocation, huge budgets grow on demand instead.
const MAX_PREALLOCATED_NODES: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// `terminal` is the first node found within the goal tolerance.
    GoalReached { terminal: usize },
    /// The iteration budget ran out; there is no path for this run.
    Exhausted,
}

impl Status {
    pub fn is_running(&self) -> bool {
        matches!(self, Status::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The steering direction cancelled out or the step had zero length.
    Degenerate,
    /// The move crosses an inflated obstacle or ends too close to one.
    Collision,
    /// The move ends outside of the workspace.
    OutOfBounds,
}

/// What a single expansion step did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Extended(usize),
    Escaped(usize),
    Rejected(Rejection),
}

impl Expansion {
    /// Index of the node this step added, if any.
    pub fn inserted(&self) -> Option<usize> {
        match *self {
            Expansion::Extended(idx) | Expansion::Escaped(idx) => Some(idx),
            Expansion::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub iterations: usize,
    pub extensions: usize,
    pub escapes: usize,
    pub collisions: usize,
    pub degenerate: usize,
    pub out_of_bounds: usize,
}

impl RunStats {
    pub fn accepted(&self) -> usize {
        self.extensions + self.escapes
    }

    pub fn rejected(&self) -> usize {
        self.collisions + self.degenerate + self.out_of_bounds
    }

    /// Share of iterations that grew the tree.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted() as f64 / self.iterations as f64
        }
    }

    fn record(&mut self, expansion: &Expansion) {
        match expansion {
            Expansion::Extended(_) => self.extensions += 1,
            Expansion::Escaped(_) => self.escapes += 1,
            Expansion::Rejected(Rejection::Collision) => self.collisions += 1,
            Expansion::Rejected(Rejection::Degenerate) => self.degenerate += 1,
            Expansion::Rejected(Rejection::OutOfBounds) => self.out_of_bounds += 1,
        }
    }
}

/// Potential-field biased RRT.
///
/// Every call to [`Planner::step`] draws one sample and tries to grow the tree toward it. The
/// planner is also an iterator over those steps, which ends once the goal is reached or the
/// iteration budget is spent.
pub struct Planner<R = StdRng> {
    config: PlannerConfig,
    steering: Steering,
    tree: Tree,
    rng: R,
    status: Status,
    stats: RunStats,
}

impl Planner<StdRng> {
    pub fn with_seed(config: PlannerConfig, seed: u64) -> Result<Self, ConfigError> {
        Planner::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Planner<R> {
    pub fn new(config: PlannerConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let steering = Steering::new(
            config.strategy,
            config.step_size,
            config.escape,
            config.field,
        )?;
        let capacity = config.max_iters.saturating_add(1).min(MAX_PREALLOCATED_NODES);
        let tree = Tree::with_capacity(config.start, capacity);

        let status = if distance(&config.start, &config.goal) <= config.goal_tolerance {
            Status::GoalReached { terminal: 0 }
        } else {
            Status::Running
        };

        debug!(
            "[Planner] new: start=({:.2},{:.2}) goal=({:.2},{:.2}) step={} obstacles={} strategy={:?}",
            config.start.x,
            config.start.y,
            config.goal.x,
            config.goal.y,
            config.step_size,
            config.obstacles.len(),
            config.strategy,
        );

        Ok(Planner {
            config,
            steering,
            tree,
            rng,
            status,
            stats: RunStats::default(),
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Whether `p` is a legal place for a node: inside the workspace, outside every inflated
    /// obstacle and not within the safety radius of any obstacle center.
    pub fn is_point_safe(&self, p: &Point) -> bool {
        self.config.in_workspace(p) && self.point_clear(p)
    }

    fn point_clear(&self, p: &Point) -> bool {
        let margin = self.config.inflation_margin;
        let safety_radius = self.config.safety_radius;
        self.config.obstacles.iter().all(|o| {
            !o.inflated_bounds(margin).contains(p) && distance_to_center(p, o) >= safety_radius
        })
    }

    /// Validates the straight move `from -> to` against the workspace and every obstacle.
    pub fn check_move(&self, from: &Point, to: &Point) -> Result<(), Rejection> {
        if !self.config.in_workspace(to) {
            return Err(Rejection::OutOfBounds);
        }

        let margin = self.config.inflation_margin;
        if segment_clear_all(from, to, &self.config.obstacles, margin) && self.point_clear(to) {
            Ok(())
        } else {
            Err(Rejection::Collision)
        }
    }

    pub fn is_move_valid(&self, from: &Point, to: &Point) -> bool {
        self.check_move(from, to).is_ok()
    }

    fn sample(&mut self) -> Point {
        if self.rng.gen::<f64>() > self.config.goal_sample_prob {
            gen_random_in_workspace(&mut self.rng, self.config.x_max, self.config.y_max)
        } else {
            self.config.goal
        }
    }

    /// Runs one expansion: sample, nearest, steer, validate, insert, goal check.
    ///
    /// Only a candidate rejected for a collision falls back to the escape move, which has to
    /// pass the same validation. Degenerate and out-of-workspace candidates just fail the step.
    ///
    /// Returns `None` once the planner has terminated.
    pub fn step(&mut self) -> Option<Expansion> {
        if !self.status.is_running() {
            return None;
        }
        if self.stats.iterations >= self.config.max_iters {
            self.exhaust();
            return None;
        }

        let iteration = self.stats.iterations;
        self.stats.iterations += 1;

        let target = self.sample();
        let (near_idx, near) = self.tree.nearest(&target);

        let ctx = SteerContext {
            goal: &self.config.goal,
            obstacles: &self.config.obstacles,
            iteration,
        };

        let primary = match self.steering.steer(&near, &target, &ctx, &mut self.rng) {
            Some(candidate) => self.check_move(&near, &candidate).map(|()| candidate),
            None => Err(Rejection::Degenerate),
        };

        let expansion = match primary {
            Ok(candidate) => {
                Expansion::Extended(self.tree.insert(candidate, near_idx, NodeKind::Expansion))
            }
            Err(Rejection::Collision) => {
                let escape = self
                    .steering
                    .escape(&near, &ctx, &mut self.rng)
                    .filter(|p| self.is_move_valid(&near, p));

                match escape {
                    Some(p) => Expansion::Escaped(self.tree.insert(p, near_idx, NodeKind::Escape)),
                    None => Expansion::Rejected(Rejection::Collision),
                }
            }
            Err(rejection) => Expansion::Rejected(rejection),
        };
        self.stats.record(&expansion);

        trace!(
            "[Planner] iteration {}: target=({:.2},{:.2}) near={} -> {:?}",
            iteration,
            target.x,
            target.y,
            near_idx,
            expansion
        );

        if let Some(idx) = expansion.inserted() {
            let node = self.tree.vertices()[idx];
            if distance(&node, &self.config.goal) <= self.config.goal_tolerance {
                self.status = Status::GoalReached { terminal: idx };
                debug!(
                    "[Planner] goal reached after {} iterations: terminal node {} of {}, {} escapes",
                    self.stats.iterations,
                    idx,
                    self.tree.len(),
                    self.stats.escapes
                );
            }
        }

        if self.status.is_running() && self.stats.iterations >= self.config.max_iters {
            self.exhaust();
        }

        Some(expansion)
    }

    fn exhaust(&mut self) {
        self.status = Status::Exhausted;
        debug!(
            "[Planner] exhausted {} iterations without reaching the goal ({} nodes, acceptance {:.2})",
            self.stats.iterations,
            self.tree.len(),
            self.stats.acceptance_ratio()
        );
    }

    /// Steps until the planner terminates and returns the final status.
    pub fn run(&mut self) -> Status {
        for _ in self.by_ref() {}
        self.status
    }

    /// The start-to-goal path, available only once the goal has been reached.
    pub fn extract_path(&self) -> Option<Path> {
        match self.status {
            Status::GoalReached { terminal } => self.tree.backtrace(terminal),
            Status::Running | Status::Exhausted => None,
        }
    }
}

impl<R: Rng> Iterator for Planner<R> {
    type Item = Expansion;

    fn next(&mut self) -> Option<Expansion> {
        self.step()
    }
}
