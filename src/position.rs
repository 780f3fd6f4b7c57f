//! Raw GPS measurements fed into the filter.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// HDOP used when a fix reports none, or a non-positive one.
pub const DEFAULT_HDOP: f64 = 1.0;

/// Identifier of a tracked device.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single raw GPS fix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Device that reported the fix.
    pub device_id: DeviceId,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Horizontal dilution of precision, if the receiver reported one.
    #[serde(default)]
    pub hdop: Option<f64>,
}

impl Position {
    /// Create a new fix.
    ///
    /// # Arguments
    /// * `device_id` - Reporting device
    /// * `timestamp` - Observation time
    /// * `longitude` - Degrees east
    /// * `latitude` - Degrees north
    /// * `hdop` - Optional horizontal dilution of precision
    pub fn new(
        device_id: impl Into<DeviceId>,
        timestamp: DateTime<Utc>,
        longitude: f64,
        latitude: f64,
        hdop: Option<f64>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            longitude,
            latitude,
            hdop,
        }
    }

    /// HDOP actually used for noise computation.
    #[inline]
    pub fn effective_hdop(&self) -> f64 {
        effective_hdop(self.hdop)
    }

    /// Check that the fix can be fused without corrupting the filter.
    ///
    /// Rejects non-finite coordinates, latitudes outside [-90, 90], longitudes
    /// outside [-180, 180] and infinite HDOP. A missing, zero, negative or NaN
    /// HDOP is not an error; it falls back to [`DEFAULT_HDOP`].
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(Error::InvalidInput(format!(
                "non-finite coordinates ({}, {}) for device {} at {}",
                self.latitude, self.longitude, self.device_id, self.timestamp
            )));
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude {} out of range for device {} at {}",
                self.latitude, self.device_id, self.timestamp
            )));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude {} out of range for device {} at {}",
                self.longitude, self.device_id, self.timestamp
            )));
        }

        if let Some(h) = self.hdop {
            if h.is_infinite() {
                return Err(Error::InvalidInput(format!(
                    "infinite hdop for device {} at {}",
                    self.device_id, self.timestamp
                )));
            }
        }

        Ok(())
    }
}

/// Resolve an optional HDOP, defaulting missing or non-positive values to 1.0.
#[inline]
pub fn effective_hdop(hdop: Option<f64>) -> f64 {
    match hdop {
        Some(h) if h > 0.0 => h,
        _ => DEFAULT_HDOP,
    }
}
