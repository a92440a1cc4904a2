//! Thrust-model estimator
//!
//! Maintains a scalar gain `thr2acc` such that
//! `measured_vertical_acceleration ≈ thr2acc · commanded_thrust`, refined
//! online with a recursive least-squares filter with vanishing memory. The
//! gain drifts in flight with battery charge, payload, and air density, so
//! it is tracked continuously rather than calibrated once.
//!
//! Thrust commands take effect in the measured acceleration only after the
//! actuator/sensor pipeline delay, so each issued command is kept in a
//! timestamped queue and matched against acceleration samples 35–45 ms
//! later.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::ThrustMapConfig;

/// Capacity of the pending-command queue; a leak guard, not a tuning knob
pub const THRUST_QUEUE_CAPACITY: usize = 100;

/// Covariance assigned on reset: effectively no confidence in the seed gain
const INITIAL_COVARIANCE: f64 = 1e6;

/// One issued thrust command awaiting its delayed acceleration observation
#[derive(Debug, Clone, Copy)]
pub struct TimedThrust {
    /// Time the command was issued [s]
    pub stamp: f64,
    /// Commanded collective thrust (normalized)
    pub thrust: f64,
}

/// Recursive least-squares estimator of the thrust-to-acceleration gain
#[derive(Debug, Clone)]
pub struct ThrustModelEstimator {
    /// Current gain estimate: thrust → vertical acceleration [m/s² per unit]
    thr2acc: f64,
    /// Scalar estimate covariance; strictly positive by the update algebra
    p: f64,
    /// Gravity magnitude [m/s²], used to seed and report the hover fraction
    gravity: f64,
    /// Estimator parameters (forgetting factor, latency window, seed)
    config: ThrustMapConfig,
    /// Issued commands not yet matched to an acceleration sample
    queue: VecDeque<TimedThrust>,
}

impl ThrustModelEstimator {
    /// Create an estimator seeded from the configured hover fraction
    pub fn new(config: ThrustMapConfig, gravity: f64) -> Self {
        let mut estimator = Self {
            thr2acc: 0.0,
            p: INITIAL_COVARIANCE,
            gravity,
            config,
            queue: VecDeque::with_capacity(THRUST_QUEUE_CAPACITY + 1),
        };
        estimator.reset();
        estimator
    }

    /// Re-seed the gain from the hover fraction and forget all history
    ///
    /// Called at startup and whenever the operator requests recalibration.
    pub fn reset(&mut self) {
        self.thr2acc = self.gravity / self.config.hover_percentage;
        self.p = INITIAL_COVARIANCE;
        self.queue.clear();
        debug!(thr2acc = self.thr2acc, "thrust mapping reset");
    }

    /// Current thrust-to-acceleration gain
    pub fn gain(&self) -> f64 {
        self.thr2acc
    }

    /// Current estimate covariance
    pub fn covariance(&self) -> f64 {
        self.p
    }

    /// Throttle fraction the current model predicts for hover
    pub fn hover_percentage(&self) -> f64 {
        self.gravity / self.thr2acc
    }

    /// Number of commands awaiting an acceleration match
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Record an issued thrust command for later correlation
    ///
    /// Never blocks, never fails; beyond capacity the oldest entry is
    /// discarded.
    pub fn record(&mut self, stamp: f64, thrust: f64) {
        self.queue.push_back(TimedThrust { stamp, thrust });
        while self.queue.len() > THRUST_QUEUE_CAPACITY {
            self.queue.pop_front();
        }
    }

    /// Attempt one RLS step against a fresh vertical-acceleration sample
    ///
    /// Uses the oldest queued command whose age at `now` falls inside the
    /// latency window; older entries are purged as stale, younger ones left
    /// for a later call. Returns `false` when no usable command exists yet,
    /// which is a normal outcome the caller retries next cycle. A single
    /// call performs at most one step.
    pub fn update(&mut self, accel_z: f64, now: f64) -> bool {
        while let Some(front) = self.queue.front().copied() {
            let age = now - front.stamp;
            if age > self.config.max_delay {
                self.queue.pop_front();
                continue;
            }
            if age < self.config.min_delay {
                return false;
            }

            // Recursive least squares with vanishing memory,
            // model: accel_z = thr2acc * thrust
            let u = front.thrust;
            self.queue.pop_front();

            let rho2 = self.config.rho2;
            let gamma = 1.0 / (rho2 + u * self.p * u);
            let k = gamma * self.p * u;
            self.thr2acc += k * (accel_z - u * self.thr2acc);
            self.p = (1.0 - k * u) * self.p / rho2;

            trace!(
                thr2acc = self.thr2acc,
                gamma,
                k,
                p = self.p,
                "thrust model step"
            );
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_estimator() -> ThrustModelEstimator {
        ThrustModelEstimator::new(ThrustMapConfig::default(), 9.81)
    }

    #[test]
    fn test_reset_seeds_gain_from_hover_fraction() {
        let estimator = make_estimator();
        assert_relative_eq!(estimator.gain(), 9.81 / 0.5, epsilon = 1e-12);
        assert_relative_eq!(estimator.hover_percentage(), 0.5, epsilon = 1e-12);
        assert_eq!(estimator.pending(), 0);
    }

    #[test]
    fn test_update_skips_samples_younger_than_window() {
        let mut estimator = make_estimator();
        estimator.record(0.0, 0.5);

        let gain_before = estimator.gain();
        let p_before = estimator.covariance();

        assert!(!estimator.update(10.0, 0.020));
        assert_eq!(estimator.pending(), 1);
        assert_eq!(estimator.gain(), gain_before);
        assert_eq!(estimator.covariance(), p_before);
    }

    #[test]
    fn test_update_consumes_sample_inside_window_once() {
        let mut estimator = make_estimator();
        estimator.record(0.0, 0.5);

        assert!(estimator.update(10.0, 0.040));
        assert_eq!(estimator.pending(), 0);
        // The same sample is gone; a second call has nothing to use
        assert!(!estimator.update(10.0, 0.040));
    }

    #[test]
    fn test_update_purges_stale_samples_without_mutating() {
        let mut estimator = make_estimator();
        estimator.record(0.0, 0.5);
        estimator.record(0.001, 0.6);

        let gain_before = estimator.gain();
        assert!(!estimator.update(10.0, 0.100));
        assert_eq!(estimator.pending(), 0);
        assert_eq!(estimator.gain(), gain_before);
    }

    #[test]
    fn test_stale_purge_then_usable_sample_in_one_call() {
        let mut estimator = make_estimator();
        estimator.record(0.000, 0.5); // 80 ms old at update time: stale
        estimator.record(0.040, 0.5); // 40 ms old: usable

        assert!(estimator.update(10.0, 0.080));
        assert_eq!(estimator.pending(), 0);
    }

    #[test]
    fn test_queue_bounded_at_capacity_keeping_newest() {
        let mut estimator = make_estimator();
        for i in 0..250 {
            estimator.record(i as f64 * 0.01, 0.5);
        }
        assert_eq!(estimator.pending(), THRUST_QUEUE_CAPACITY);
        // Oldest surviving entry is the 150th recorded command
        assert_relative_eq!(
            estimator.queue.front().unwrap().stamp,
            1.50,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            estimator.queue.back().unwrap().stamp,
            2.49,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_gain_converges_to_true_mapping() {
        let mut estimator = make_estimator();
        let true_gain = 24.0;
        let thrust = 0.45;

        for i in 0..100 {
            let stamp = i as f64 * 0.01;
            estimator.record(stamp, thrust);
            estimator.update(true_gain * thrust, stamp + 0.040);
        }

        assert_relative_eq!(estimator.gain(), true_gain, epsilon = 1e-6);
    }

    #[test]
    fn test_covariance_stays_positive() {
        let mut estimator = make_estimator();
        for i in 0..500 {
            let stamp = i as f64 * 0.01;
            let thrust = 0.3 + 0.4 * ((i % 7) as f64 / 7.0);
            estimator.record(stamp, thrust);
            estimator.update(20.0 * thrust, stamp + 0.040);
            assert!(estimator.covariance() > 0.0);
        }
    }
}
