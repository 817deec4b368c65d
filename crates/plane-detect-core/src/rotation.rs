use std::f64::consts::PI;

use nalgebra::{UnitQuaternion, UnitVector3, Vector3};

/// Shortest-arc rotation taking `normal` onto `+Z`.
///
/// The shortest arc is not unique when `normal` points along `-Z`; in that
/// case a half turn about `+X` is returned so the choice is stable.
pub fn rotation_to_z(normal: &UnitVector3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::rotation_between_axis(normal, &Vector3::z_axis())
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn maps_normal_onto_z() {
        for v in [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.3, -0.4, 0.8),
            Vector3::new(-0.2, 0.1, -0.9),
            Vector3::new(0.0, 0.0, 1.0),
        ] {
            let n = UnitVector3::new_normalize(v);
            let r = rotation_to_z(&n);
            assert_relative_eq!(r * n.into_inner(), Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn anti_parallel_normal_uses_half_turn_about_x() {
        let n = -Vector3::z_axis();
        let r = rotation_to_z(&n);
        assert_relative_eq!(r * n.into_inner(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(r * Vector3::x(), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(r * Vector3::y(), -Vector3::y(), epsilon = 1e-12);
    }
}
