//! Tracking control
//!
//! - Linear control law: trajectory setpoint + odometry/IMU feedback →
//!   collective thrust and attitude command
//! - Control pipeline: per-cycle integration with the thrust-model
//!   estimator (gain read, issued-command recording)

pub mod linear;
pub mod pipeline;

pub use linear::*;
pub use pipeline::*;
