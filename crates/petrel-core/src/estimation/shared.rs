//! Cross-path hand-off for the thrust model
//!
//! The control loop and the acceleration-measurement path share exactly one
//! piece of mutable state: the thrust model and its pending-command queue.
//! [`SharedThrustModel`] makes the hand-off contract explicit: mutation
//! happens only inside short critical sections on the estimator path (and
//! `record` on the control path), while the gain itself is additionally
//! published through an atomic cell so the control loop reads it lock-free
//! and can never observe a torn value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::config::ThrustMapConfig;

use super::ThrustModelEstimator;

/// Thread-safe wrapper around [`ThrustModelEstimator`]
///
/// Producer/consumer roles: the control loop calls [`record`] and [`gain`];
/// the estimator path calls [`update`] (and [`reset`] on operator request).
/// No long-held locks: every operation is O(1) over a bounded queue.
///
/// [`record`]: SharedThrustModel::record
/// [`gain`]: SharedThrustModel::gain
/// [`update`]: SharedThrustModel::update
/// [`reset`]: SharedThrustModel::reset
#[derive(Debug)]
pub struct SharedThrustModel {
    inner: Mutex<ThrustModelEstimator>,
    gain_bits: AtomicU64,
}

impl SharedThrustModel {
    /// Create a shared model seeded from the configured hover fraction
    pub fn new(config: ThrustMapConfig, gravity: f64) -> Self {
        let estimator = ThrustModelEstimator::new(config, gravity);
        let gain_bits = AtomicU64::new(estimator.gain().to_bits());
        Self {
            inner: Mutex::new(estimator),
            gain_bits,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ThrustModelEstimator> {
        // Estimator state stays consistent across a panic elsewhere; a
        // poisoned lock carries no broken invariant here
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current gain, lock-free
    pub fn gain(&self) -> f64 {
        f64::from_bits(self.gain_bits.load(Ordering::Acquire))
    }

    /// Throttle fraction the current model predicts for hover
    pub fn hover_percentage(&self) -> f64 {
        self.lock().hover_percentage()
    }

    /// Record an issued thrust command (control path)
    pub fn record(&self, stamp: f64, thrust: f64) {
        self.lock().record(stamp, thrust);
    }

    /// Attempt one RLS step against a measured vertical acceleration
    /// (estimator path); publishes the new gain on success
    pub fn update(&self, accel_z: f64, now: f64) -> bool {
        let mut estimator = self.lock();
        let updated = estimator.update(accel_z, now);
        if updated {
            self.gain_bits
                .store(estimator.gain().to_bits(), Ordering::Release);
        }
        updated
    }

    /// Re-seed the gain and forget all pending commands
    pub fn reset(&self) {
        let mut estimator = self.lock();
        estimator.reset();
        self.gain_bits
            .store(estimator.gain().to_bits(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_gain_published_on_construction() {
        let shared = SharedThrustModel::new(ThrustMapConfig::default(), 9.81);
        assert_relative_eq!(shared.gain(), 19.62, epsilon = 1e-12);
    }

    #[test]
    fn test_update_publishes_new_gain() {
        let shared = SharedThrustModel::new(ThrustMapConfig::default(), 9.81);
        shared.record(0.0, 0.5);
        assert!(shared.update(12.0, 0.040));
        assert!(shared.gain() != 19.62);
    }

    #[test]
    fn test_reset_republishes_seed_gain() {
        let shared = SharedThrustModel::new(ThrustMapConfig::default(), 9.81);
        shared.record(0.0, 0.5);
        shared.update(12.0, 0.040);
        shared.reset();
        assert_relative_eq!(shared.gain(), 19.62, epsilon = 1e-12);
    }

    #[test]
    fn test_two_path_access() {
        let shared = Arc::new(SharedThrustModel::new(ThrustMapConfig::default(), 9.81));
        let true_gain = 22.0;

        let producer = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for i in 0..200 {
                    shared.record(i as f64 * 0.01, 0.5);
                }
            })
        };
        let consumer = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for i in 0..200 {
                    shared.update(true_gain * 0.5, i as f64 * 0.01 + 0.040);
                }
            })
        };

        producer.join().unwrap();
        consumer.join().unwrap();

        // Whatever interleaving happened, the published gain is a finite,
        // positive value between the seed and the true mapping
        let gain = shared.gain();
        assert!(gain.is_finite() && gain > 0.0);
        assert!(gain >= 19.62 - 1e-9 && gain <= true_gain + 1e-9);
    }
}
