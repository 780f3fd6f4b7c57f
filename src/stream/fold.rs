//! Off-line filtering: a lazy left fold over one device's ordered track.

use std::borrow::Borrow;

use super::advance;
use crate::filter::{Estimator, StepOutcome};
use crate::{DeviceId, Error, FilterConfig, FilterState, FilteredPosition, FilteredSink, KalmanEstimator, Position, Result};

/// Iterator of per-record outcomes over an ordered track.
///
/// Each input record is stepped exactly once. A rejected record yields `Err`
/// and the fold continues from the last good state. The first accepted record
/// seeds the state.
///
/// The fold is pure, so cloning a fresh `Smoothed` (or calling
/// [`TrackFilter::smooth`] again) restarts it from the beginning with identical
/// results.
#[derive(Clone, Debug)]
pub struct Smoothed<I, E> {
    positions: I,
    estimator: E,
    state: Option<FilterState>,
    device: Option<DeviceId>,
}

impl<I, E> Smoothed<I, E>
where
    I: Iterator,
    I::Item: Borrow<Position>,
    E: Estimator,
{
    pub fn new(positions: I, estimator: E) -> Self {
        Self::with_prior(positions, estimator, None)
    }

    /// Start the fold from an existing state instead of the first record.
    pub fn with_prior(positions: I, estimator: E, prior: Option<FilterState>) -> Self {
        Self {
            positions,
            estimator,
            state: prior,
            device: None,
        }
    }

    /// State after the records consumed so far.
    #[inline]
    pub fn state(&self) -> Option<&FilterState> {
        self.state.as_ref()
    }

    /// Run the fold to the end and return only the final state.
    pub fn final_state(mut self) -> Option<FilterState> {
        for _ in self.by_ref() {}
        self.state
    }

    /// Run the fold to the end, emitting one filtered position per accepted
    /// record. Returns the rejected records as `(index, error)`.
    pub fn drain_into<K: FilteredSink + ?Sized>(mut self, sink: &mut K) -> Vec<(usize, Error)> {
        let mut rejected = Vec::new();
        let mut index = 0;
        while let Some(position) = self.positions.next() {
            let position: &Position = position.borrow();
            match self.apply(position) {
                Ok(outcome) => sink.accept(FilteredPosition::for_measurement(position, outcome.state())),
                Err(e) => rejected.push((index, e)),
            }
            index += 1;
        }
        rejected
    }

    fn apply(&mut self, measurement: &Position) -> Result<StepOutcome> {
        match self.device.as_ref() {
            Some(device) if *device != measurement.device_id => {
                let e = Error::InvalidInput(format!(
                    "track for device {} contains a fix from device {}",
                    device, measurement.device_id
                ));
                log::warn!("skipping fix at {}: {}", measurement.timestamp, e);
                return Err(e);
            }
            _ => {}
        }

        match advance(&self.estimator, self.state.as_ref(), measurement) {
            Ok(outcome) => {
                if self.device.is_none() {
                    self.device = Some(measurement.device_id.clone());
                }
                self.state = Some(outcome.state().clone());
                Ok(outcome)
            }
            Err(e) => {
                log::warn!(
                    "device {}: skipping fix at {}: {}",
                    measurement.device_id,
                    measurement.timestamp,
                    e
                );
                Err(e)
            }
        }
    }
}

impl<I, E> Iterator for Smoothed<I, E>
where
    I: Iterator,
    I::Item: Borrow<Position>,
    E: Estimator,
{
    type Item = Result<StepOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.positions.next()?;
        Some(self.apply(position.borrow()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

/// Adapter to smooth any iterator of positions.
///
/// ```rust,ignore
/// let last = track.iter().smoothed(&estimator).final_state();
/// ```
pub trait SmoothExt: Iterator + Sized {
    fn smoothed<E: Estimator>(self, estimator: E) -> Smoothed<Self, E>
    where
        Self::Item: Borrow<Position>,
    {
        Smoothed::new(self, estimator)
    }
}

impl<I: Iterator> SmoothExt for I {}

/// Off-line smoother for whole tracks.
#[derive(Clone, Debug)]
pub struct TrackFilter<E> {
    estimator: E,
}

impl TrackFilter<KalmanEstimator> {
    /// Kalman smoother with the given configuration.
    pub fn with_config(config: FilterConfig) -> Result<Self> {
        Ok(Self::new(KalmanEstimator::new(config)?))
    }
}

impl<E: Estimator> TrackFilter<E> {
    pub fn new(estimator: E) -> Self {
        Self { estimator }
    }

    #[inline(always)]
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Every intermediate outcome, lazily. `track` must be ordered by time.
    pub fn smooth<'a>(&'a self, track: &'a [Position]) -> Smoothed<std::slice::Iter<'a, Position>, &'a E> {
        Smoothed::new(track.iter(), &self.estimator)
    }

    /// Final state only.
    pub fn final_state(&self, track: &[Position]) -> Option<FilterState> {
        self.smooth(track).final_state()
    }

    /// Accepted states, dropping rejected records.
    pub fn states(&self, track: &[Position]) -> Vec<FilterState> {
        self.smooth(track)
            .filter_map(|outcome| outcome.ok().map(StepOutcome::into_state))
            .collect()
    }

    /// Feed every accepted record's filtered position to `sink`.
    pub fn smooth_into<K: FilteredSink + ?Sized>(&self, track: &[Position], sink: &mut K) -> Vec<(usize, Error)> {
        self.smooth(track).drain_into(sink)
    }
}
