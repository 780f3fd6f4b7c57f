//! # gps_kalman_rs - GPS position smoothing
//!
//! Estimates the true position of a moving device from noisy, irregularly-timed
//! GPS fixes using a 2D Kalman filter over latitude/longitude.
//!
//! ## Features
//!
//! - HDOP-aware measurement noise and time-proportional process noise
//! - On-line filtering: one constant-time update per fix against a keyed device store
//! - Off-line smoothing: a lazy fold over an ordered track, final state or every step
//! - Explicit fallback outcomes instead of errors for singular covariances
//! - Parallel smoothing of many devices at once
//!
//! ## Example
//!
//! ```rust,ignore
//! use gps_kalman_rs::{FilterConfig, InMemoryStateStore, KalmanEstimator, OnlineFilter};
//!
//! let estimator = KalmanEstimator::new(FilterConfig::default()).unwrap();
//! let online = OnlineFilter::new(InMemoryStateStore::new(), estimator);
//!
//! for fix in fixes {
//!     let outcome = online.process(&fix)?;
//!     println!("{:?}", outcome.state());
//! }
//! ```

pub mod linalg;
pub mod position;
pub mod state;
pub mod noise;
pub mod config;
pub mod filter;
pub mod store;
pub mod sink;
pub mod stream;

// Re-exports for convenience
pub use position::{DeviceId, Position};
pub use state::FilterState;
pub use config::FilterConfig;
pub use noise::NoiseModel;
pub use filter::{kalman_step, Estimator, KalmanEstimator, PassthroughEstimator, StepOutcome};
pub use store::{Device, DeviceStateStore, InMemoryStateStore};
pub use sink::{FilteredPosition, FilteredSink, Trajectory};
pub use stream::{OnlineFilter, Smoothed, TrackFilter};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur while filtering GPS positions
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Singular matrix: {context}")]
        SingularMatrix { context: String },

        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),

        #[error("JSON error: {0}")]
        JsonError(#[from] serde_json::Error),
    }

    /// Result type for gps_kalman_rs operations
    pub type Result<T> = std::result::Result<T, Error>;
}
