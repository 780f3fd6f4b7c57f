//! Filter tunables.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::linalg::{diag, Matrix2};
use crate::noise::NoiseModel;
use crate::{Error, Result};

/// Default position standard deviation at HDOP 1, in meters.
pub const DEFAULT_MEASUREMENT_STD_M: f64 = 5.0;

/// Default process noise growth per second, in squared degrees.
pub const DEFAULT_PROCESS_NOISE_RATE: f64 = 0.00001;

/// Default covariance assigned on a device's first observation.
pub const DEFAULT_INITIAL_VARIANCE: f64 = 0.001;

/// Configuration for the GPS Kalman filter.
///
/// Every field can be overridden per track or per call; see
/// [`OnlineFilter::process_with`](crate::OnlineFilter::process_with) and
/// [`TrackFilter::new`](crate::TrackFilter::new).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Measurement noise scale in meters (`σ_m`).
    pub measurement_std_m: f64,

    /// Process noise rate `k` (degree² per second).
    pub process_noise_rate: f64,

    /// Covariance prior used when a device is first seen.
    pub initial_covariance: Matrix2,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            measurement_std_m: DEFAULT_MEASUREMENT_STD_M,
            process_noise_rate: DEFAULT_PROCESS_NOISE_RATE,
            initial_covariance: diag(DEFAULT_INITIAL_VARIANCE, DEFAULT_INITIAL_VARIANCE),
        }
    }
}

impl FilterConfig {
    /// Create a configuration with the given measurement noise and default
    /// process noise and covariance prior.
    pub fn new(measurement_std_m: f64) -> Self {
        Self {
            measurement_std_m,
            ..Self::default()
        }
    }

    pub fn with_process_noise_rate(mut self, process_noise_rate: f64) -> Self {
        self.process_noise_rate = process_noise_rate;
        self
    }

    pub fn with_initial_covariance(mut self, initial_covariance: Matrix2) -> Self {
        self.initial_covariance = initial_covariance;
        self
    }

    /// Noise parameters derived from this configuration.
    pub fn noise_model(&self) -> NoiseModel {
        NoiseModel::new(self.measurement_std_m, self.process_noise_rate)
    }

    /// Check the configuration.
    ///
    /// Zero noise is allowed; it can make the innovation covariance singular,
    /// which the filter handles as a passthrough.
    pub fn validate(&self) -> Result<()> {
        if !self.measurement_std_m.is_finite() || self.measurement_std_m < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "measurement_std_m must be finite and non-negative, got {}",
                self.measurement_std_m
            )));
        }

        if !self.process_noise_rate.is_finite() || self.process_noise_rate < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "process_noise_rate must be finite and non-negative, got {}",
                self.process_noise_rate
            )));
        }

        let p = &self.initial_covariance;
        if p.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig(
                "initial_covariance must be finite".to_string(),
            ));
        }
        if p[(0, 1)] != p[(1, 0)] {
            return Err(Error::InvalidConfig(
                "initial_covariance must be symmetric".to_string(),
            ));
        }
        if p[(0, 0)] < 0.0 || p[(1, 1)] < 0.0 {
            return Err(Error::InvalidConfig(
                "initial_covariance must have non-negative variances".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let display = path.as_ref().to_string_lossy().to_string();
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to open config file '{}': {}", display, e),
            ))
        })?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.measurement_std_m, 5.0);
        assert_eq!(config.process_noise_rate, 0.00001);
        assert_eq!(config.initial_covariance, diag(0.001, 0.001));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = FilterConfig::new(3.0)
            .with_process_noise_rate(0.0)
            .with_initial_covariance(diag(0.01, 0.02));

        assert_eq!(config.measurement_std_m, 3.0);
        assert_eq!(config.process_noise_rate, 0.0);
        assert_eq!(config.initial_covariance, diag(0.01, 0.02));
        assert!(config.validate().is_ok());

        let noise = config.noise_model();
        assert_eq!(noise.measurement_std_m, 3.0);
        assert_eq!(noise.process_noise_rate, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(FilterConfig::new(-1.0).validate().is_err());
        assert!(FilterConfig::new(f64::NAN).validate().is_err());
        assert!(FilterConfig::default()
            .with_process_noise_rate(-0.1)
            .validate()
            .is_err());
        assert!(FilterConfig::default()
            .with_initial_covariance(Matrix2::new(0.001, 0.0005, 0.0, 0.001))
            .validate()
            .is_err());
        assert!(FilterConfig::default()
            .with_initial_covariance(diag(-0.001, 0.001))
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = FilterConfig::from_json_str(r#"{"measurement_std_m": 8.0}"#).unwrap();
        assert_eq!(config.measurement_std_m, 8.0);
        assert_eq!(config.process_noise_rate, DEFAULT_PROCESS_NOISE_RATE);
        assert_eq!(config.initial_covariance, diag(0.001, 0.001));
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            FilterConfig::from_json_str(r#"{"measurement_std_m": -8.0}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            FilterConfig::from_json_str("not json"),
            Err(Error::JsonError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"measurement_std_m": 4.0, "process_noise_rate": 0.00002}}"#).unwrap();

        let config = FilterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.measurement_std_m, 4.0);
        assert_eq!(config.process_noise_rate, 0.00002);
    }

    #[test]
    fn test_from_file_missing() {
        let result = FilterConfig::from_file("/nonexistent/gps-kalman.json");
        assert!(matches!(result, Err(Error::IoError(_))));
    }
}
