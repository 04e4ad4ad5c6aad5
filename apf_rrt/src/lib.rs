//! Rapidly-exploring random trees steered by an artificial potential field.
//!
//! ```ignore
//! let mut planner = PlannerBuilder::new(point2(0.0, 0.0), point2(999.0, 999.0))
//!     .with_workspace(1000.0, 1000.0)
//!     .with_step_size(20.0)
//!     .add_obstacle(Obstacle::new(200.0, 200.0, 200.0, 300.0))
//!     .seeded(42)?;
//!
//! if let Status::GoalReached { .. } = planner.run() {
//!     let path = planner.extract_path();
//! }
//! ```

pub mod builder;
pub mod error;
pub mod field;
pub mod obstacle;
pub mod path;
pub mod planner;
pub mod point;
pub mod steering;
pub mod tree;

mod utils;

pub use builder::{PlannerBuilder, PlannerConfig};
pub use error::ConfigError;
pub use field::{
    repulsive_magnitude, DynamicInfluence, FieldParams, PotentialField, VelocityRepulsion,
};
pub use obstacle::{segment_clear, segment_clear_all, Obstacle, Rect};
pub use path::{extract_path, Path};
pub use planner::{Expansion, Planner, Rejection, RunStats, Status};
pub use point::{point2, vec2, Point, Vector};
pub use steering::{SteerContext, Steering, SteeringStrategy};
pub use tree::{NodeKind, Tree};
