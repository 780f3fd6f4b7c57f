//! Filtered output records and sinks that consume them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DeviceId, FilterState, Position};

/// One filtered position, emitted per processed measurement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilteredPosition {
    pub device_id: DeviceId,
    pub timestamp: DateTime<Utc>,
    pub longitude: f64,
    pub latitude: f64,
}

impl FilteredPosition {
    /// Filtered output for a measurement.
    ///
    /// The record is stamped with the measurement's time, not the state's: a
    /// short-circuited fix still yields one row at its own time, carrying the
    /// prior estimate.
    pub fn for_measurement(measurement: &Position, state: &FilterState) -> Self {
        Self {
            device_id: measurement.device_id.clone(),
            timestamp: measurement.timestamp,
            longitude: state.longitude,
            latitude: state.latitude,
        }
    }
}

/// Consumer of filtered positions, e.g. a database writer or a geometry builder.
pub trait FilteredSink {
    fn accept(&mut self, position: FilteredPosition);
}

impl FilteredSink for Vec<FilteredPosition> {
    fn accept(&mut self, position: FilteredPosition) {
        self.push(position);
    }
}

/// Ordered filtered points of one track, as a line geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    /// `(longitude, latitude)` pairs in acceptance order.
    points: Vec<(f64, f64)>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time span covered, if any point was accepted.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.start.zip(self.end)
    }

    /// Render as WKT, `LINESTRING(lon lat, ...)`.
    ///
    /// A single point renders as `POINT(lon lat)` and an empty trajectory as
    /// `LINESTRING EMPTY`.
    pub fn to_wkt(&self) -> String {
        match self.points.as_slice() {
            [] => "LINESTRING EMPTY".to_string(),
            [(lon, lat)] => format!("POINT({} {})", lon, lat),
            points => {
                let coords: Vec<String> = points.iter().map(|(lon, lat)| format!("{} {}", lon, lat)).collect();
                format!("LINESTRING({})", coords.join(", "))
            }
        }
    }
}

impl FilteredSink for Trajectory {
    fn accept(&mut self, position: FilteredPosition) {
        self.points.push((position.longitude, position.latitude));
        if self.start.is_none() {
            self.start = Some(position.timestamp);
        }
        self.end = Some(position.timestamp);
    }
}
