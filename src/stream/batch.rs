//! Batch helpers: ordering tracks and smoothing many devices in parallel.

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::fold::SmoothExt;
use crate::filter::{Estimator, StepOutcome};
use crate::{DeviceId, FilterState, Position, Result};

/// Sort a track by timestamp. Ties keep their arrival order.
pub fn sort_track(track: &mut [Position]) {
    track.sort_by_key(|p| p.timestamp);
}

/// Split mixed measurements into per-device tracks, each sorted by timestamp.
pub fn group_by_device<I>(positions: I) -> BTreeMap<DeviceId, Vec<Position>>
where
    I: IntoIterator<Item = Position>,
{
    let mut tracks: BTreeMap<DeviceId, Vec<Position>> = BTreeMap::new();
    for position in positions {
        tracks.entry(position.device_id.clone()).or_default().push(position);
    }
    for track in tracks.values_mut() {
        sort_track(track);
    }
    tracks
}

/// Smooth every device's track, folding devices in parallel.
///
/// Returns one outcome per input record, per device, in timestamp order.
pub fn smooth_devices<E, I>(estimator: &E, positions: I) -> BTreeMap<DeviceId, Vec<Result<StepOutcome>>>
where
    E: Estimator,
    I: IntoIterator<Item = Position>,
{
    group_by_device(positions)
        .into_par_iter()
        .map(|(device, track)| {
            let outcomes = track.iter().smoothed(estimator).collect::<Vec<_>>();
            (device, outcomes)
        })
        .collect()
}

/// Final state of every device, folding devices in parallel.
///
/// Devices whose records were all rejected are absent.
pub fn final_states<E, I>(estimator: &E, positions: I) -> BTreeMap<DeviceId, FilterState>
where
    E: Estimator,
    I: IntoIterator<Item = Position>,
{
    group_by_device(positions)
        .into_par_iter()
        .filter_map(|(device, track)| {
            track
                .iter()
                .smoothed(estimator)
                .final_state()
                .map(|state| (device, state))
        })
        .collect()
}
