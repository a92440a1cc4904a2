//! Control-loop pipeline
//!
//! Ties the control law to the shared thrust model for one evaluation per
//! cycle: read the current gain, run the law, and record the issued thrust
//! so the estimator path can later correlate it with the measured
//! acceleration. The estimator path holds its own handle to the shared
//! model and drives [`SharedThrustModel::update`] as acceleration samples
//! arrive.

use std::sync::Arc;

use crate::config::{ConfigError, ControlConfig};
use crate::estimation::SharedThrustModel;
use crate::state::{ControlDebug, ControlOutput, ImuSample, OdometrySample, Setpoint};

use super::LinearController;

/// One control path: law plus its handle to the shared thrust model
#[derive(Debug)]
pub struct ControlPipeline {
    controller: LinearController,
    thrust_model: Arc<SharedThrustModel>,
}

impl ControlPipeline {
    /// Build a pipeline (and its thrust model) from a validated config
    pub fn new(config: &ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let thrust_model = Arc::new(SharedThrustModel::new(
            config.thrust_map.clone(),
            config.gravity,
        ));
        Ok(Self {
            controller: LinearController::new(config),
            thrust_model,
        })
    }

    /// Handle to the shared thrust model for the estimator path
    pub fn thrust_model(&self) -> Arc<SharedThrustModel> {
        Arc::clone(&self.thrust_model)
    }

    /// Evaluate one control cycle at time `now` [s]
    ///
    /// Reads the gain lock-free, computes the command, and records the
    /// issued `(now, thrust)` pair for future calibration.
    pub fn step(
        &self,
        setpoint: &Setpoint,
        odom: &OdometrySample,
        imu: &ImuSample,
        now: f64,
    ) -> (ControlOutput, ControlDebug) {
        let thr2acc = self.thrust_model.gain();
        let (output, debug) = self.controller.compute(setpoint, odom, imu, thr2acc);
        self.thrust_model.record(now, output.thrust);
        (output, debug)
    }
}
