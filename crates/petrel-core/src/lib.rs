//! # Petrel Core
//!
//! Quadrotor tracking control with online thrust-model identification.
//!
//! The crate computes, every control cycle, the collective-thrust and
//! attitude command a flight controller hands to the autopilot so the
//! vehicle follows a position/velocity/acceleration/yaw setpoint, while a
//! recursive least-squares filter keeps the thrust-to-acceleration gain
//! calibrated against battery, payload, and air-density drift.
//!
//! ## Modules
//!
//! - [`math`]: Quaternion utilities (yaw extraction, tilt composition)
//! - [`control`]: Linear tracking control law and control-loop pipeline
//! - [`estimation`]: Online thrust-model estimator and shared hand-off cell
//! - [`simulation`]: Point-mass closed-loop simulator for validation
//! - [`config`]: Parameter structures
//! - [`state`]: Sensor samples, setpoints, and command outputs

pub mod config;
pub mod control;
pub mod estimation;
pub mod math;
pub mod simulation;
pub mod state;

// Common type aliases
use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f64>;

/// Gravity constant [m/s²]
pub const GRAVITY: f64 = 9.81;

/// Gravity compensation vector added to the desired acceleration (ENU, z-up)
pub fn gravity_compensation() -> Vec3 {
    Vec3::new(0.0, 0.0, GRAVITY)
}
