//! Filter state carried between steps and persisted per device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::linalg::{Matrix2, Vector2};
use crate::Position;

/// Posterior belief about a device's position.
///
/// `covariance` is in squared degrees with latitude first. It stays symmetric
/// under the filter's algebra; positive semi-definiteness is not enforced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Estimated latitude in degrees.
    pub latitude: f64,
    /// Estimated longitude in degrees.
    pub longitude: f64,
    /// Estimate covariance `P`.
    pub covariance: Matrix2,
    /// Time of the observation that produced this state.
    pub timestamp: DateTime<Utc>,
}

impl FilterState {
    pub fn new(latitude: f64, longitude: f64, covariance: Matrix2, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            covariance,
            timestamp,
        }
    }

    /// Seed a state from a first observation: the estimate is the raw fix.
    pub fn initialize(position: &Position, initial_covariance: Matrix2) -> Self {
        Self::new(
            position.latitude,
            position.longitude,
            initial_covariance,
            position.timestamp,
        )
    }

    /// Estimate as a `(lat, lon)` vector.
    #[inline]
    pub fn estimate(&self) -> Vector2 {
        Vector2::new(self.latitude, self.longitude)
    }

    /// Sum of the covariance diagonal.
    #[inline]
    pub fn trace(&self) -> f64 {
        self.covariance.trace()
    }

    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.covariance[(0, 1)] == self.covariance[(1, 0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::diag;
    use chrono::TimeZone;

    #[test]
    fn test_initialize_from_position() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let p = Position::new("dev-1", t, 8.5417, 47.3769, Some(2.0));
        let state = FilterState::initialize(&p, diag(0.001, 0.001));

        assert_eq!(state.latitude, 47.3769);
        assert_eq!(state.longitude, 8.5417);
        assert_eq!(state.covariance, diag(0.001, 0.001));
        assert_eq!(state.timestamp, t);
        assert_eq!(state.estimate(), Vector2::new(47.3769, 8.5417));
        assert_eq!(state.trace(), 0.002);
        assert!(state.is_symmetric());
    }

    #[test]
    fn test_state_persists_as_json() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let state = FilterState::new(47.5, 8.25, diag(0.125, 0.5), t);

        let json = serde_json::to_string(&state).unwrap();
        let back: FilterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
