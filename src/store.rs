//! Keyed storage of the latest filter state per device.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::{DeviceId, FilterState, Result};

/// A device together with its latest belief.
#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    pub id: DeviceId,
    pub state: FilterState,
}

/// Storage for per-device filter state.
///
/// `update` must be atomic per device: while `f` runs for a device, no other
/// `update` or `set` for that device may interleave. Updates for different
/// devices are independent.
pub trait DeviceStateStore: Send + Sync {
    /// Latest state for a device, if it has been seen.
    fn get(&self, device: &DeviceId) -> Option<FilterState>;

    /// Overwrite the state for a device.
    fn set(&self, device: &DeviceId, state: FilterState);

    /// Read-modify-write the state for a device.
    ///
    /// `f` receives the current state (or `None`) and returns the state to
    /// store. If `f` fails, the stored state is left untouched and the error is
    /// returned. `f` must not call back into the store.
    fn update<T, F>(&self, device: &DeviceId, f: F) -> Result<T>
    where
        F: FnOnce(Option<&FilterState>) -> Result<(FilterState, T)>;
}

/// In-memory store backed by `DashMap`.
///
/// `update` holds the entry's shard lock for the whole read-modify-write.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    states: DashMap<DeviceId, FilterState>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    /// Number of devices with a state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Snapshot of every device and its state, sorted by device id.
    pub fn devices(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self
            .states
            .iter()
            .map(|entry| Device {
                id: entry.key().clone(),
                state: entry.value().clone(),
            })
            .collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));
        devices
    }
}

impl DeviceStateStore for InMemoryStateStore {
    fn get(&self, device: &DeviceId) -> Option<FilterState> {
        self.states.get(device).map(|s| s.value().clone())
    }

    fn set(&self, device: &DeviceId, state: FilterState) {
        self.states.insert(device.clone(), state);
    }

    fn update<T, F>(&self, device: &DeviceId, f: F) -> Result<T>
    where
        F: FnOnce(Option<&FilterState>) -> Result<(FilterState, T)>,
    {
        match self.states.entry(device.clone()) {
            Entry::Occupied(mut occupied) => {
                let (next, out) = f(Some(occupied.get()))?;
                occupied.insert(next);
                Ok(out)
            }
            Entry::Vacant(vacant) => {
                let (next, out) = f(None)?;
                vacant.insert(next);
                Ok(out)
            }
        }
    }
}
