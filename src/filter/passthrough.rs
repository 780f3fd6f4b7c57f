//! Baseline estimator that reports raw fixes unchanged.
//!
//! Useful for comparing filtered tracks against the unfiltered input through
//! the same on-line and off-line machinery.

use super::kalman::elapsed_seconds;
use super::traits::{Estimator, StepOutcome};
use crate::linalg::Matrix2;
use crate::{Error, FilterState, Position, Result};

/// Estimator whose state is always the latest raw fix, with zero covariance.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughEstimator;

impl PassthroughEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl Estimator for PassthroughEstimator {
    fn initialize(&self, first: &Position) -> Result<FilterState> {
        first.validate()?;
        Ok(FilterState::initialize(first, Matrix2::zeros()))
    }

    fn step(&self, prior: &FilterState, measurement: &Position) -> Result<StepOutcome> {
        if elapsed_seconds(prior.timestamp, measurement.timestamp) < 0.0 {
            return Err(Error::InvalidInput(format!(
                "measurement at {} is older than state at {} for device {}",
                measurement.timestamp, prior.timestamp, measurement.device_id
            )));
        }
        measurement.validate()?;
        Ok(StepOutcome::Updated(FilterState::initialize(
            measurement,
            Matrix2::zeros(),
        )))
    }
}
