//! Sensor samples, trajectory setpoints, and command outputs
//!
//! These are the internal forms of the data exchanged with the transport
//! layer; message decoding and validation happen before values reach here,
//! so all fields are assumed finite.

use nalgebra::{UnitQuaternion, Vector3};

/// Trajectory setpoint for one instant (world frame)
#[derive(Debug, Clone)]
pub struct Setpoint {
    /// Desired position [m]
    pub position: Vector3<f64>,
    /// Desired velocity [m/s]
    pub velocity: Vector3<f64>,
    /// Desired acceleration [m/s²] (feedforward)
    pub acceleration: Vector3<f64>,
    /// Desired yaw [rad]
    pub yaw: f64,
    /// Desired yaw rate [rad/s]
    pub yaw_rate: f64,
}

impl Setpoint {
    /// Hover setpoint at a fixed position and heading
    pub fn hover_at(position: Vector3<f64>, yaw: f64) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            yaw,
            yaw_rate: 0.0,
        }
    }
}

/// Odometry feedback (world frame pose and twist)
#[derive(Debug, Clone)]
pub struct OdometrySample {
    /// Position [m]
    pub position: Vector3<f64>,
    /// Velocity [m/s]
    pub velocity: Vector3<f64>,
    /// Orientation (body to world)
    pub orientation: UnitQuaternion<f64>,
    /// Angular rate [rad/s] (body frame)
    pub angular_rate: Vector3<f64>,
}

impl OdometrySample {
    /// Sample at rest at a given position with identity attitude
    pub fn at_rest(position: Vector3<f64>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            angular_rate: Vector3::zeros(),
        }
    }
}

/// Inertial-sensor feedback (the autopilot's own attitude estimate)
#[derive(Debug, Clone)]
pub struct ImuSample {
    /// Orientation (body to world)
    pub orientation: UnitQuaternion<f64>,
    /// Angular rate [rad/s] (body frame)
    pub angular_rate: Vector3<f64>,
    /// Linear acceleration [m/s²]
    pub linear_acceleration: Vector3<f64>,
}

impl ImuSample {
    /// Level, motionless sample reading only gravity
    pub fn level(gravity: f64) -> Self {
        Self {
            orientation: UnitQuaternion::identity(),
            angular_rate: Vector3::zeros(),
            linear_acceleration: Vector3::new(0.0, 0.0, gravity),
        }
    }
}

/// Command handed to the autopilot interface
#[derive(Debug, Clone)]
pub struct ControlOutput {
    /// Collective thrust, normalized throttle units (typically 0–1)
    pub thrust: f64,
    /// Commanded orientation in the autopilot's attitude reference
    pub orientation: UnitQuaternion<f64>,
}

/// Telemetry scalars mirrored from one control evaluation
///
/// Read-only observability hooks with no behavioral effect.
#[derive(Debug, Clone, Default)]
pub struct ControlDebug {
    /// Desired velocity [m/s]
    pub des_v: Vector3<f64>,
    /// Desired acceleration after the PD law and gravity compensation [m/s²]
    pub des_a: Vector3<f64>,
    /// Commanded orientation components (w, x, y, z)
    pub des_q: [f64; 4],
    /// Commanded collective thrust
    pub des_thrust: f64,
    /// Current thrust-to-acceleration gain
    pub thr2acc: f64,
    /// Modelled hover throttle fraction (gravity / gain)
    pub hover_percentage: f64,
}
