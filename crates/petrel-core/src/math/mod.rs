//! Mathematical utilities
//!
//! Quaternion helpers shared by the control law: heading extraction and
//! tilt composition with documented operand order.

pub mod quaternion;

pub use quaternion::*;
