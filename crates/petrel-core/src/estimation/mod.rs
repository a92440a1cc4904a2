//! Online system identification
//!
//! - Thrust-model estimator: recursive least squares with vanishing memory,
//!   fed by time-delayed acceleration observations
//! - Shared hand-off cell between the control path and the estimator path

pub mod shared;
pub mod thrust_model;

pub use shared::*;
pub use thrust_model::*;
