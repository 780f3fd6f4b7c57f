//! 2D Kalman filter over (latitude, longitude).
//!
//! The state transition and measurement matrices are both the identity:
//! position is assumed static between fixes apart from the modeled process
//! noise.

use chrono::{DateTime, Utc};

use super::traits::{Estimator, StepOutcome};
use crate::linalg::{add, identity, invert, multiply, multiply_vector, subtract, Vector2};
use crate::{Error, FilterConfig, FilterState, Position, Result};

/// Fixes closer together than this are treated as duplicates of the prior.
pub const MIN_STEP_SECONDS: f64 = 1.0;

/// Seconds from `from` to `to`, negative if `to` is earlier.
pub fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to.signed_duration_since(from);
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// One predict + update step.
///
/// # Arguments
/// * `prior` - State after the previous fix
/// * `measurement` - Incoming fix
/// * `config` - Noise parameters
///
/// # Returns
/// * `ShortCircuit(prior)` if a valid fix is less than [`MIN_STEP_SECONDS`] newer
/// * `SingularMatrix(prior)` if the innovation covariance has a zero determinant
/// * `Updated(posterior)` otherwise
///
/// # Errors
/// `Error::InvalidInput` if the fix is older than the prior, has invalid
/// coordinates, or the prior latitude is polar.
pub fn kalman_step(prior: &FilterState, measurement: &Position, config: &FilterConfig) -> Result<StepOutcome> {
    let dt = elapsed_seconds(prior.timestamp, measurement.timestamp);
    if dt < 0.0 {
        return Err(Error::InvalidInput(format!(
            "measurement at {} is older than state at {} for device {}",
            measurement.timestamp, prior.timestamp, measurement.device_id
        )));
    }
    measurement.validate()?;
    if dt < MIN_STEP_SECONDS {
        log::debug!(
            "device {}: fix {:.3}s after prior, keeping prior",
            measurement.device_id,
            dt
        );
        return Ok(StepOutcome::ShortCircuit(prior.clone()));
    }

    let (r, q) = config
        .noise_model()
        .covariances(prior.latitude, measurement.hdop, dt)?;

    // Predict: F = I
    let x_pred = prior.estimate();
    let p_pred = add(&prior.covariance, &q);

    // Innovation and its covariance: H = I
    let z = Vector2::new(measurement.latitude, measurement.longitude);
    let y = z - x_pred;
    let s = add(&p_pred, &r);

    let s_inv = match invert(&s) {
        Ok(inv) => inv,
        Err(e) => {
            log::warn!(
                "device {}: {} at {}, keeping prior state",
                measurement.device_id,
                e,
                measurement.timestamp
            );
            return Ok(StepOutcome::SingularMatrix(prior.clone()));
        }
    };

    let k = multiply(&p_pred, &s_inv);
    let x_new = x_pred + multiply_vector(&k, &y);
    let p_new = multiply(&subtract(&identity(), &k), &p_pred);

    log::trace!(
        "device {}: dt={:.1}s innovation=({:.3e}, {:.3e}) gain=({:.4}, {:.4})",
        measurement.device_id,
        dt,
        y[0],
        y[1],
        k[(0, 0)],
        k[(1, 1)]
    );

    Ok(StepOutcome::Updated(FilterState::new(
        x_new[0],
        x_new[1],
        p_new,
        measurement.timestamp,
    )))
}

/// Kalman estimator bound to one configuration.
#[derive(Clone, Debug)]
pub struct KalmanEstimator {
    config: FilterConfig,
}

impl KalmanEstimator {
    /// Create a new estimator, validating the configuration.
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline(always)]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl Estimator for KalmanEstimator {
    fn initialize(&self, first: &Position) -> Result<FilterState> {
        first.validate()?;
        Ok(FilterState::initialize(first, self.config.initial_covariance))
    }

    fn step(&self, prior: &FilterState, measurement: &Position) -> Result<StepOutcome> {
        kalman_step(prior, measurement, &self.config)
    }
}
