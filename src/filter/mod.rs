//! Position estimators.
//!
//! This module provides:
//! - `KalmanEstimator` / `kalman_step` - HDOP-aware 2D Kalman filter
//! - `PassthroughEstimator` - Baseline that reports raw fixes

mod traits;
mod kalman;
mod passthrough;

pub use traits::{Estimator, StepOutcome};
pub use kalman::{elapsed_seconds, kalman_step, KalmanEstimator, MIN_STEP_SECONDS};
pub use passthrough::PassthroughEstimator;
