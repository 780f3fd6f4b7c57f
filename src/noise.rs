//! Measurement and process noise in degree units.
//!
//! Meters are converted to degrees with a planar approximation: one degree of
//! latitude is [`METERS_PER_DEGREE`] meters everywhere, and one degree of
//! longitude shrinks by `cos(latitude)`. This is not geodesically exact.
//!
//! Tracks that reach the poles are unsupported: at `|latitude| >= 90` the
//! longitude scale collapses and the noise model rejects the input.

use crate::linalg::{diag, Matrix2};
use crate::position::effective_hdop;
use crate::{Error, Result};

/// Approximate meters per degree of latitude at the equator.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Measurement noise covariance `R = diag(σ_lat², σ_lon²)`.
///
/// # Arguments
/// * `latitude` - Prior latitude in degrees, used for the longitude scale
/// * `hdop` - Horizontal dilution of precision (missing or non-positive means 1.0)
/// * `measurement_std_m` - Position standard deviation in meters at HDOP 1
///
/// # Errors
/// `Error::InvalidInput` for polar or non-finite latitudes.
pub fn measurement_noise(latitude: f64, hdop: Option<f64>, measurement_std_m: f64) -> Result<Matrix2> {
    if !latitude.is_finite() || latitude.abs() >= 90.0 {
        return Err(Error::InvalidInput(format!(
            "latitude {} has no usable longitude scale",
            latitude
        )));
    }

    let std_m = measurement_std_m * effective_hdop(hdop);
    let sigma_lat = std_m / METERS_PER_DEGREE;
    let sigma_lon = std_m / (METERS_PER_DEGREE * latitude.to_radians().cos());

    Ok(diag(sigma_lat * sigma_lat, sigma_lon * sigma_lon))
}

/// Process noise covariance `Q = diag(k·Δt, k·Δt)`.
///
/// Uncertainty grows linearly with the time since the last observation.
#[inline]
pub fn process_noise(elapsed_seconds: f64, process_noise_rate: f64) -> Matrix2 {
    let q = process_noise_rate * elapsed_seconds;
    diag(q, q)
}

/// Noise parameters for one filter configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseModel {
    /// Position standard deviation in meters at HDOP 1.
    pub measurement_std_m: f64,
    /// Process noise growth per second, in squared degrees.
    pub process_noise_rate: f64,
}

impl NoiseModel {
    pub fn new(measurement_std_m: f64, process_noise_rate: f64) -> Self {
        Self {
            measurement_std_m,
            process_noise_rate,
        }
    }

    /// Compute `(R, Q)` for a step.
    ///
    /// # Arguments
    /// * `latitude` - Prior latitude in degrees
    /// * `hdop` - HDOP of the incoming measurement
    /// * `elapsed_seconds` - Time since the prior observation
    pub fn covariances(
        &self,
        latitude: f64,
        hdop: Option<f64>,
        elapsed_seconds: f64,
    ) -> Result<(Matrix2, Matrix2)> {
        let r = measurement_noise(latitude, hdop, self.measurement_std_m)?;
        let q = process_noise(elapsed_seconds, self.process_noise_rate);
        Ok((r, q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_measurement_noise_equator() {
        let r = measurement_noise(0.0, Some(1.0), 5.0).unwrap();
        let sigma = 5.0 / 111_320.0;

        assert_relative_eq!(r[(0, 0)], sigma * sigma, epsilon = 1e-20);
        // cos(0) = 1, so longitude noise equals latitude noise
        assert_relative_eq!(r[(1, 1)], sigma * sigma, epsilon = 1e-20);
        assert_eq!(r[(0, 1)], 0.0);
        assert_eq!(r[(1, 0)], 0.0);
    }

    #[test]
    fn test_measurement_noise_longitude_grows_with_latitude() {
        let r = measurement_noise(60.0, Some(1.0), 5.0).unwrap();

        // cos(60°) = 0.5, so σ_lon = 2σ_lat and the variance is 4x
        assert_relative_eq!(r[(1, 1)] / r[(0, 0)], 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_measurement_noise_scales_with_hdop() {
        let r1 = measurement_noise(47.0, Some(1.0), 5.0).unwrap();
        let r5 = measurement_noise(47.0, Some(5.0), 5.0).unwrap();

        assert_relative_eq!(r5[(0, 0)] / r1[(0, 0)], 25.0, max_relative = 1e-12);
        assert_relative_eq!(r5[(1, 1)] / r1[(1, 1)], 25.0, max_relative = 1e-12);
    }

    #[test]
    fn test_measurement_noise_missing_hdop_is_one() {
        let r_none = measurement_noise(47.0, None, 5.0).unwrap();
        let r_zero = measurement_noise(47.0, Some(0.0), 5.0).unwrap();
        let r_one = measurement_noise(47.0, Some(1.0), 5.0).unwrap();

        assert_eq!(r_none, r_one);
        assert_eq!(r_zero, r_one);
    }

    #[test]
    fn test_measurement_noise_rejects_poles() {
        assert!(matches!(measurement_noise(90.0, None, 5.0), Err(Error::InvalidInput(_))));
        assert!(matches!(measurement_noise(-90.0, None, 5.0), Err(Error::InvalidInput(_))));
        assert!(measurement_noise(f64::NAN, None, 5.0).is_err());
        assert!(measurement_noise(89.9, None, 5.0).is_ok());
    }

    #[test]
    fn test_process_noise_linear_in_time() {
        let q = process_noise(10.0, 0.00001);
        assert_relative_eq!(q[(0, 0)], 0.0001, epsilon = 1e-18);
        assert_relative_eq!(q[(1, 1)], 0.0001, epsilon = 1e-18);
        assert_eq!(q[(0, 1)], 0.0);

        assert_eq!(process_noise(0.0, 0.00001), Matrix2::zeros());
    }

    #[test]
    fn test_noise_model_covariances() {
        let model = NoiseModel::new(5.0, 0.00001);
        let (r, q) = model.covariances(47.3769, Some(2.0), 30.0).unwrap();

        assert_eq!(r, measurement_noise(47.3769, Some(2.0), 5.0).unwrap());
        assert_eq!(q, process_noise(30.0, 0.00001));
    }
}
