//! Controller configuration
//!
//! Parameter structures for the tracking control law and the thrust-model
//! estimator, with physically reasonable defaults.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("hover percentage must lie in (0, 1], got {0}")]
    HoverPercentageOutOfRange(f64),
    #[error("forgetting factor must lie in (0, 1), got {0}")]
    ForgettingFactorOutOfRange(f64),
    #[error("latency window is empty: min_delay {min} >= max_delay {max}")]
    EmptyLatencyWindow { min: f64, max: f64 },
    #[error("gravity must be positive and finite, got {0}")]
    InvalidGravity(f64),
    #[error("tracker gain {name}.{axis} must be non-negative and finite, got {value}")]
    InvalidGain {
        name: &'static str,
        axis: char,
        value: f64,
    },
}

/// Position/velocity tracking gains (diagonal, per axis)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerGains {
    /// Position proportional gain [1/s²]
    pub kp: Vector3<f64>,
    /// Velocity derivative gain [1/s]
    pub kv: Vector3<f64>,
}

impl Default for TrackerGains {
    fn default() -> Self {
        Self {
            kp: Vector3::new(1.5, 1.5, 1.5),
            kv: Vector3::new(1.5, 1.5, 1.5),
        }
    }
}

/// Thrust-to-acceleration mapping parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrustMapConfig {
    /// Throttle fraction expected to exactly cancel gravity; seeds the gain
    pub hover_percentage: f64,
    /// Forgetting factor ρ² of the recursive estimator, < 1
    pub rho2: f64,
    /// Lower bound of the actuation/sensing latency window [s]
    pub min_delay: f64,
    /// Upper bound of the actuation/sensing latency window [s]
    pub max_delay: f64,
}

impl Default for ThrustMapConfig {
    fn default() -> Self {
        Self {
            hover_percentage: 0.5,
            rho2: 0.998,
            min_delay: 0.035,
            max_delay: 0.045,
        }
    }
}

/// Full controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Gravity magnitude [m/s²]
    pub gravity: f64,
    /// Tracking gains
    pub gains: TrackerGains,
    /// Thrust-model estimator parameters
    pub thrust_map: ThrustMapConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            gravity: crate::GRAVITY,
            gains: TrackerGains::default(),
            thrust_map: ThrustMapConfig::default(),
        }
    }
}

impl ControlConfig {
    /// Check the configuration for values the control law cannot operate on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        let hp = self.thrust_map.hover_percentage;
        if !hp.is_finite() || hp <= 0.0 || hp > 1.0 {
            return Err(ConfigError::HoverPercentageOutOfRange(hp));
        }
        let rho2 = self.thrust_map.rho2;
        if !rho2.is_finite() || rho2 <= 0.0 || rho2 >= 1.0 {
            return Err(ConfigError::ForgettingFactorOutOfRange(rho2));
        }
        if self.thrust_map.min_delay >= self.thrust_map.max_delay {
            return Err(ConfigError::EmptyLatencyWindow {
                min: self.thrust_map.min_delay,
                max: self.thrust_map.max_delay,
            });
        }
        for (name, gain) in [("kp", &self.gains.kp), ("kv", &self.gains.kv)] {
            for (axis, value) in ['x', 'y', 'z'].into_iter().zip(gain.iter().copied()) {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidGain { name, axis, value });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ControlConfig::default().validate().is_ok());
    }

    #[test]
    fn test_hover_percentage_bounds() {
        let mut config = ControlConfig::default();
        config.thrust_map.hover_percentage = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HoverPercentageOutOfRange(_))
        ));
        config.thrust_map.hover_percentage = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_forgetting_factor_must_vanish() {
        let mut config = ControlConfig::default();
        config.thrust_map.rho2 = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ForgettingFactorOutOfRange(_))
        ));
    }

    #[test]
    fn test_latency_window_must_be_nonempty() {
        let mut config = ControlConfig::default();
        config.thrust_map.min_delay = 0.05;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyLatencyWindow { .. })
        ));
    }

    #[test]
    fn test_negative_gain_rejected() {
        let mut config = ControlConfig::default();
        config.gains.kv.y = -1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidGain {
                name: "kv",
                axis: 'y',
                ..
            }
        ));
    }

    #[test]
    fn test_default_latency_window() {
        let config = ControlConfig::default();
        assert_eq!(config.thrust_map.min_delay, 0.035);
        assert_eq!(config.thrust_map.max_delay, 0.045);
    }
}
