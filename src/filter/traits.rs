//! Estimator trait and step outcomes.

use crate::{FilterState, Position, Result};

/// Result of applying one measurement to a device's state.
///
/// Every variant carries the state the caller should keep. Only `Initialized`
/// and `Updated` differ from the prior.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// No prior state existed; the state was seeded from the measurement.
    Initialized(FilterState),
    /// The measurement was fused.
    Updated(FilterState),
    /// The measurement arrived less than a second after the prior; prior kept.
    ShortCircuit(FilterState),
    /// The innovation covariance could not be inverted; prior kept.
    SingularMatrix(FilterState),
}

impl StepOutcome {
    /// State to carry forward.
    #[inline]
    pub fn state(&self) -> &FilterState {
        match self {
            StepOutcome::Initialized(s)
            | StepOutcome::Updated(s)
            | StepOutcome::ShortCircuit(s)
            | StepOutcome::SingularMatrix(s) => s,
        }
    }

    #[inline]
    pub fn into_state(self) -> FilterState {
        match self {
            StepOutcome::Initialized(s)
            | StepOutcome::Updated(s)
            | StepOutcome::ShortCircuit(s)
            | StepOutcome::SingularMatrix(s) => s,
        }
    }

    /// Whether the state changed as a result of the measurement.
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Initialized(_) | StepOutcome::Updated(_))
    }
}

/// A recursive position estimator.
///
/// Implementations must be pure: the same prior and measurement always give
/// the same outcome. The on-line and off-line paths both drive estimators
/// through [`advance`](crate::stream::advance) and rely on this to produce
/// identical results.
pub trait Estimator: Send + Sync {
    /// Seed a state from a device's first measurement.
    fn initialize(&self, first: &Position) -> Result<FilterState>;

    /// Fuse a measurement into a prior state.
    ///
    /// # Errors
    /// `Error::InvalidInput` when the measurement cannot be fused. The caller
    /// keeps the prior.
    fn step(&self, prior: &FilterState, measurement: &Position) -> Result<StepOutcome>;
}

impl<E: Estimator + ?Sized> Estimator for &E {
    fn initialize(&self, first: &Position) -> Result<FilterState> {
        (**self).initialize(first)
    }

    fn step(&self, prior: &FilterState, measurement: &Position) -> Result<StepOutcome> {
        (**self).step(prior, measurement)
    }
}
