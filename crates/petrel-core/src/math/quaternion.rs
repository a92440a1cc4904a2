//! Quaternion operations for attitude representation
//!
//! Heading extraction and the yaw/pitch/roll tilt composition used by the
//! control law. Quaternion composition is non-commutative and the operand
//! order here is semantically load-bearing; see [`tilt_quaternion`].

use nalgebra::{UnitQuaternion, Vector3};

/// Extract the heading (yaw) angle from an orientation
///
/// yaw = atan2(2(qx·qy + qw·qz), qw² + qx² − qy² − qz²)
///
/// This is the projection of the full attitude onto a single heading angle
/// (the Z angle of the ZYX Euler decomposition).
pub fn yaw_from_quaternion(q: &UnitQuaternion<f64>) -> f64 {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    (2.0 * (x * y + w * z)).atan2(w * w + x * x - y * y - z * z)
}

/// Build an attitude from heading and tilt angles
///
/// Composes Rz(yaw) · Ry(pitch) · Rx(roll): yaw first, applied
/// extrinsically, then pitch, then roll. The order must not be changed;
/// Rx(roll) · Ry(pitch) · Rz(yaw) is a different rotation.
pub fn tilt_quaternion(yaw: f64, pitch: f64, roll: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), pitch)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), roll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_yaw_of_identity() {
        assert_relative_eq!(
            yaw_from_quaternion(&UnitQuaternion::identity()),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_yaw_of_pure_heading_rotation() {
        for yaw in [-PI + 0.01, -FRAC_PI_2, 0.3, FRAC_PI_4, PI - 0.01] {
            let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw);
            assert_relative_eq!(yaw_from_quaternion(&q), yaw, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_yaw_recovered_from_tilted_attitude() {
        // ZYX composition: the heading component survives tilt exactly
        let q = tilt_quaternion(0.7, 0.2, -0.1);
        assert_relative_eq!(yaw_from_quaternion(&q), 0.7, epsilon = 1e-10);
    }

    #[test]
    fn test_tilt_composition_order_matters() {
        let zyx = tilt_quaternion(FRAC_PI_4, 0.3, 0.2);
        let xyz = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.2)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4);
        assert!(zyx.angle_to(&xyz) > 1e-3);
    }

    #[test]
    fn test_tilt_quaternion_zero_angles_is_identity() {
        let q = tilt_quaternion(0.0, 0.0, 0.0);
        assert_relative_eq!(q.angle(), 0.0, epsilon = 1e-12);
    }
}
