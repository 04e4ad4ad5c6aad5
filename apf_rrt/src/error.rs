use thiserror::Error;

use crate::point::Point;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("step size must be positive and finite, but was {0}")]
    InvalidStepSize(f64),

    #[error("goal tolerance must be non-negative and finite, but was {0}")]
    InvalidGoalTolerance(f64),

    #[error("workspace [0, {x_max}] x [0, {y_max}] is empty or inverted")]
    InvalidWorkspace { x_max: f64, y_max: f64 },

    #[error("{which} point {point} has non-finite coordinates")]
    NonFinitePoint { which: &'static str, point: Point },

    #[error("{which} point {point} lies outside of the workspace [0, {x_max}] x [0, {y_max}]")]
    OutsideWorkspace {
        which: &'static str,
        point: Point,
        x_max: f64,
        y_max: f64,
    },

    #[error("start point {0} lies inside an inflated obstacle")]
    StartBlocked(Point),

    #[error("probability must be between 0 and 1, but was {0}")]
    InvalidProbability(f64),

    #[error("{name} must be non-negative and finite, but was {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be finite, but was {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("influence radius must be positive and finite, but was {0}")]
    InvalidInfluenceRadius(f64),

    #[error("obstacle #{index} has a negative or non-finite extent")]
    InvalidObstacle { index: usize },

    #[error("velocity noise is invalid: {0}")]
    InvalidVelocityNoise(String),
}
