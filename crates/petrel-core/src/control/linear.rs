//! Linear tracking control law
//!
//! Converts a trajectory setpoint plus current odometry and IMU attitude
//! into a collective-thrust and attitude command:
//!
//! 1. PD law in acceleration space:
//!    `des_acc = a_ref + Kv ⊙ (v_ref − v) + Kp ⊙ (p_ref − p) + (0, 0, g)`
//! 2. Thrust from the vertical axis only, through the learned mapping:
//!    `thrust = des_acc.z / thr2acc`
//! 3. Roll/pitch realize the horizontal acceleration through tilt, resolved
//!    against the odometry-frame heading, then the command is re-expressed
//!    in the autopilot's own attitude reference.

use nalgebra::Vector3;

use crate::config::{ControlConfig, TrackerGains};
use crate::math::{tilt_quaternion, yaw_from_quaternion};
use crate::state::{ControlDebug, ControlOutput, ImuSample, OdometrySample, Setpoint};

/// Linear (small-angle) tracking controller
#[derive(Debug, Clone)]
pub struct LinearController {
    /// Tracking gains
    pub gains: TrackerGains,
    /// Gravity magnitude [m/s²]; also the tilt-decomposition denominator
    pub gravity: f64,
}

impl LinearController {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            gains: config.gains.clone(),
            gravity: config.gravity,
        }
    }

    /// Compute the thrust and attitude command for one control cycle
    ///
    /// `thr2acc` is the current thrust-to-acceleration gain from the
    /// estimator; it must be positive and finite, which the estimator
    /// guarantees by construction.
    pub fn compute(
        &self,
        setpoint: &Setpoint,
        odom: &OdometrySample,
        imu: &ImuSample,
        thr2acc: f64,
    ) -> (ControlOutput, ControlDebug) {
        // Desired acceleration: PD on position/velocity error plus
        // feedforward, with gravity folded into the vertical axis
        let des_acc = setpoint.acceleration
            + self
                .gains
                .kv
                .component_mul(&(setpoint.velocity - odom.velocity))
            + self
                .gains
                .kp
                .component_mul(&(setpoint.position - odom.position))
            + Vector3::new(0.0, 0.0, self.gravity);

        // Collective thrust covers the vertical requirement alone; the
        // horizontal components are realized entirely through tilt
        let thrust = des_acc.z / thr2acc;

        // Tilt decomposition against the odometry-frame heading. The
        // denominator is the gravity constant, not the estimated gain:
        // small-angle tilt depends on gravity, not on thrust calibration.
        let yaw_odom = yaw_from_quaternion(&odom.orientation);
        let (sin_yaw, cos_yaw) = yaw_odom.sin_cos();
        let roll = (des_acc.x * sin_yaw - des_acc.y * cos_yaw) / self.gravity;
        let pitch = (des_acc.x * cos_yaw + des_acc.y * sin_yaw) / self.gravity;

        let target = tilt_quaternion(setpoint.yaw, pitch, roll);

        // The odometry source and the autopilot's own attitude estimate may
        // disagree slightly; commanding relative to the autopilot frame
        // keeps that disagreement out of the steady-state tilt
        let orientation = imu.orientation * odom.orientation.inverse() * target;

        let output = ControlOutput {
            thrust,
            orientation,
        };
        let debug = ControlDebug {
            des_v: setpoint.velocity,
            des_a: des_acc,
            des_q: [orientation.w, orientation.i, orientation.j, orientation.k],
            des_thrust: thrust,
            thr2acc,
            hover_percentage: self.gravity / thr2acc,
        };
        (output, debug)
    }
}
