//! Driving an estimator over measurement streams.
//!
//! Both execution strategies are built on [`advance`]:
//! - `OnlineFilter` - one call per incoming fix, state held in a `DeviceStateStore`
//! - `Smoothed` / `TrackFilter` - a lazy left fold over one device's ordered track
//!
//! Given the same ordered input and starting state they produce bit-identical
//! states.

mod online;
mod fold;
mod batch;

pub use online::OnlineFilter;
pub use fold::{SmoothExt, Smoothed, TrackFilter};
pub use batch::{final_states, group_by_device, smooth_devices, sort_track};

use crate::filter::{Estimator, StepOutcome};
use crate::{FilterState, Position, Result};

/// Apply one measurement to an optional prior.
///
/// With no prior the state is seeded from the measurement without running a
/// filter step; otherwise exactly one estimator step runs.
pub fn advance<E: Estimator + ?Sized>(
    estimator: &E,
    prior: Option<&FilterState>,
    measurement: &Position,
) -> Result<StepOutcome> {
    match prior {
        None => {
            let state = estimator.initialize(measurement)?;
            log::debug!(
                "device {}: first fix at {}, initializing",
                measurement.device_id,
                measurement.timestamp
            );
            Ok(StepOutcome::Initialized(state))
        }
        Some(prior) => estimator.step(prior, measurement),
    }
}
