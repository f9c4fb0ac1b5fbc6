use cgmath::{InnerSpace, Quaternion, Rotation, Vector3, vec3};

// Y is up, -Z is forward, matching the renderer's right-handed frame.
pub const UP: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};
pub const FORWARD: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.0,
    z: -1.0,
};
pub const RIGHT: Vector3<f32> = Vector3 {
    x: 1.0,
    y: 0.0,
    z: 0.0,
};

/// Vectors shorter than this are treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1e-5;

/// Sign with a defined zero case: `sign(0.0) == 0.0`.
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn flatten(v: Vector3<f32>) -> Vector3<f32> {
    vec3(v.x, 0.0, v.z)
}

pub fn try_normalize(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let magnitude = v.magnitude();
    if magnitude > DIRECTION_EPSILON && magnitude.is_finite() {
        Some(v / magnitude)
    } else {
        None
    }
}

/// Normalizes, leaving degenerate vectors untouched instead of producing NaN.
pub fn normalize_or_keep(v: Vector3<f32>) -> Vector3<f32> {
    try_normalize(v).unwrap_or(v)
}

/// Unsigned angle in degrees, or `None` when either vector has no direction.
pub fn angle_between_degrees(a: Vector3<f32>, b: Vector3<f32>) -> Option<f32> {
    let (a, b) = (try_normalize(a)?, try_normalize(b)?);
    Some(a.dot(b).clamp(-1.0, 1.0).acos().to_degrees())
}

pub fn forward_of(rotation: Quaternion<f32>) -> Vector3<f32> {
    rotation.rotate_vector(FORWARD)
}

pub fn right_of(rotation: Quaternion<f32>) -> Vector3<f32> {
    rotation.rotate_vector(RIGHT)
}

pub fn up_of(rotation: Quaternion<f32>) -> Vector3<f32> {
    rotation.rotate_vector(UP)
}


#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3};

    #[test]
    fn test_sign_has_zero_case() {
        assert_eq!(sign(0.7), 1.0);
        assert_eq!(sign(-0.2), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
    }

    #[test]
    fn test_degenerate_vectors_do_not_produce_nan() {
        let zero = vec3(0.0, 0.0, 0.0);
        assert_eq!(try_normalize(zero), None);
        assert_eq!(normalize_or_keep(zero), zero);
        assert_eq!(angle_between_degrees(zero, UP), None);
    }

    #[test]
    fn test_angle_between() {
        let angle = |v| angle_between_degrees(UP, v).unwrap();
        assert!((angle(RIGHT) - 90.0).abs() < 0.05);
        assert!(angle(vec3(0.0, 2.0, 0.0)) < 0.05);
        assert!((angle(vec3(1.0, 1.0, 0.0)) - 45.0).abs() < 0.05);
    }

    #[test]
    fn test_frame_axes() {
        let yaw = Quaternion::from_angle_y(Deg(90.0));
        test_util::assert_vec_near(forward_of(yaw), vec3(-1.0, 0.0, 0.0), 1e-5);
        test_util::assert_vec_near(right_of(yaw), vec3(0.0, 0.0, -1.0), 1e-5);
        test_util::assert_vec_near(up_of(yaw), UP, 1e-5);
    }
}
