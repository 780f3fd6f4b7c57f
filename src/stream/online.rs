//! On-line filtering: one update per incoming fix against a device store.

use super::advance;
use crate::filter::{Estimator, StepOutcome};
use crate::store::DeviceStateStore;
use crate::{DeviceId, FilterState, FilteredPosition, FilteredSink, Position, Result};

/// Stateful single-step filter.
///
/// Each call reads the device's latest state, applies one fix, and writes the
/// result back atomically through [`DeviceStateStore::update`]. Concurrent
/// calls for the same device serialize; calls for different devices do not
/// contend beyond what the store imposes.
#[derive(Debug)]
pub struct OnlineFilter<S, E> {
    store: S,
    estimator: E,
}

impl<S: DeviceStateStore, E: Estimator> OnlineFilter<S, E> {
    /// Create a new on-line filter.
    ///
    /// # Arguments
    /// * `store` - Per-device state storage
    /// * `estimator` - Default estimator for `process`
    pub fn new(store: S, estimator: E) -> Self {
        Self { store, estimator }
    }

    #[inline(always)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline(always)]
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Latest state for a device.
    pub fn state(&self, device: &DeviceId) -> Option<FilterState> {
        self.store.get(device)
    }

    /// Apply a fix with the default estimator.
    pub fn process(&self, measurement: &Position) -> Result<StepOutcome> {
        self.process_with(measurement, &self.estimator)
    }

    /// Apply a fix with a caller-supplied estimator, e.g. one built from a
    /// per-device configuration.
    ///
    /// # Errors
    /// Rejected fixes return the error and leave the stored state unchanged.
    pub fn process_with<F: Estimator + ?Sized>(
        &self,
        measurement: &Position,
        estimator: &F,
    ) -> Result<StepOutcome> {
        let result = self.store.update(&measurement.device_id, |prior| {
            let outcome = advance(estimator, prior, measurement)?;
            Ok((outcome.state().clone(), outcome))
        });

        if let Err(e) = &result {
            log::warn!(
                "device {}: rejected fix at {}: {}",
                measurement.device_id,
                measurement.timestamp,
                e
            );
        }
        result
    }

    /// Apply a fix and emit the filtered position to `sink`.
    ///
    /// Nothing is emitted for a rejected fix.
    pub fn process_into<K: FilteredSink + ?Sized>(
        &self,
        measurement: &Position,
        sink: &mut K,
    ) -> Result<StepOutcome> {
        let outcome = self.process(measurement)?;
        sink.accept(FilteredPosition::for_measurement(measurement, outcome.state()));
        Ok(outcome)
    }
}
