//! Point-mass closed-loop simulator
//!
//! A deliberately small plant model for validating the controller and the
//! thrust-model estimator together: a point mass driven by the commanded
//! collective thrust through a configurable true thrust-to-acceleration
//! gain, with an actuation/sensing latency and optional Gaussian sensor
//! noise. Attitude tracking is assumed ideal (the commanded orientation is
//! reached after the latency), which isolates the thrust/translation loop
//! under test.

use std::collections::VecDeque;

use nalgebra::{UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::state::{ControlOutput, ImuSample, OdometrySample};

/// Plant and sensor parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Integration step [s]
    pub dt: f64,
    /// True thrust-to-acceleration gain of the plant
    pub thr2acc: f64,
    /// Actuation/sensing pipeline delay [s]
    pub latency: f64,
    /// Gravity magnitude [m/s²]
    pub gravity: f64,
    /// Accelerometer noise std dev [m/s²]
    pub accel_noise_std: f64,
    /// Odometry position noise std dev [m]
    pub position_noise_std: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            thr2acc: 25.0,
            latency: 0.040,
            gravity: crate::GRAVITY,
            accel_noise_std: 0.0,
            position_noise_std: 0.0,
            seed: 42,
        }
    }
}

/// Point-mass vehicle with delayed command take-up
#[derive(Debug)]
pub struct PointMassSim {
    config: SimConfig,
    time: f64,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    /// Commands issued but not yet past the actuation delay
    pending: VecDeque<(f64, ControlOutput)>,
    /// Command currently driving the plant; none before the first take-up
    /// (the vehicle rests on the ground until then)
    active: Option<ControlOutput>,
    rng: StdRng,
}

impl PointMassSim {
    pub fn new(config: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            time: 0.0,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            pending: VecDeque::new(),
            active: None,
            rng,
        }
    }

    /// Current simulation time [s]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// True position (noise-free)
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// Issue a command at the current time; takes effect after the latency
    pub fn apply(&mut self, output: &ControlOutput) {
        self.pending.push_back((self.time, output.clone()));
    }

    /// Promote the newest issued command whose delay has elapsed
    fn refresh_active(&mut self) {
        while self
            .pending
            .front()
            .is_some_and(|(stamp, _)| stamp + self.config.latency <= self.time)
        {
            if let Some((_, cmd)) = self.pending.pop_front() {
                self.active = Some(cmd);
            }
        }
    }

    fn attitude(&self) -> UnitQuaternion<f64> {
        self.active
            .as_ref()
            .map(|cmd| cmd.orientation)
            .unwrap_or_else(UnitQuaternion::identity)
    }

    /// Specific-force magnitude along body z the accelerometer reports
    ///
    /// At rest on the ground this reads gravity; in flight it is the thrust
    /// response through the true gain.
    pub fn measured_accel_z(&mut self) -> f64 {
        self.refresh_active();
        let clean = match &self.active {
            Some(cmd) => cmd.thrust * self.config.thr2acc,
            None => self.config.gravity,
        };
        clean + self.noise(self.config.accel_noise_std)
    }

    /// Odometry sample of the current true state
    pub fn odometry(&mut self) -> OdometrySample {
        self.refresh_active();
        let noise = Vector3::new(
            self.noise(self.config.position_noise_std),
            self.noise(self.config.position_noise_std),
            self.noise(self.config.position_noise_std),
        );
        OdometrySample {
            position: self.position + noise,
            velocity: self.velocity,
            orientation: self.attitude(),
            angular_rate: Vector3::zeros(),
        }
    }

    /// IMU sample consistent with the odometry attitude
    pub fn imu(&mut self) -> ImuSample {
        self.refresh_active();
        let accel_z = self.measured_accel_z();
        ImuSample {
            orientation: self.attitude(),
            angular_rate: Vector3::zeros(),
            linear_acceleration: Vector3::new(0.0, 0.0, accel_z),
        }
    }

    /// Advance the plant by one step
    pub fn step(&mut self) {
        self.refresh_active();

        if let Some(cmd) = &self.active {
            let body_thrust = Vector3::new(0.0, 0.0, cmd.thrust * self.config.thr2acc);
            let accel = cmd.orientation * body_thrust - Vector3::new(0.0, 0.0, self.config.gravity);
            // Semi-implicit Euler
            self.velocity += accel * self.config.dt;
            self.position += self.velocity * self.config.dt;
        }
        self.time += self.config.dt;
    }

    fn noise(&mut self, std_dev: f64) -> f64 {
        match Normal::new(0.0, std_dev) {
            Ok(normal) if std_dev > 0.0 => normal.sample(&mut self.rng),
            _ => 0.0,
        }
    }
}
