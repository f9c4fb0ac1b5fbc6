use cgmath::{Quaternion, Vector3, vec3};
use rapier3d::{na::UnitQuaternion, prelude::*};

pub fn nvec_to_cgmath(vec: Vector<Real>) -> Vector3<f32> {
    vec3(vec.x, vec.y, vec.z)
}

pub fn npoint_to_cgvec(point: Point<Real>) -> Vector3<f32> {
    vec3(point.x, point.y, point.z)
}

pub fn vec_to_npoint(vec: Vector3<f32>) -> Point<Real> {
    point![vec.x, vec.y, vec.z]
}

pub fn vec_to_nvec(vec: Vector3<f32>) -> Vector<Real> {
    vector![vec.x, vec.y, vec.z]
}

pub fn nquat_to_quat(quat: UnitQuaternion<f32>) -> Quaternion<f32> {
    Quaternion::new(quat.w, quat.i, quat.j, quat.k)
}

pub fn quat_to_nquat(rotation: Quaternion<f32>) -> UnitQuaternion<f32> {
    let nquat =
        rapier3d::na::Quaternion::new(rotation.s, rotation.v.x, rotation.v.y, rotation.v.z);
    UnitQuaternion::from_quaternion(nquat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Rotation3};

    #[test]
    fn test_quaternion_conversion_keeps_rotation() {
        let rotation = Quaternion::from_angle_y(Deg(30.0));
        let back = nquat_to_quat(quat_to_nquat(rotation));
        assert!((back.s - rotation.s).abs() < 1e-6);
        assert!((back.v.y - rotation.v.y).abs() < 1e-6);
    }

    #[test]
    fn test_vector_conversion() {
        let v = vec3(1.0, -2.0, 3.5);
        assert_eq!(nvec_to_cgmath(vec_to_nvec(v)), v);
        assert_eq!(npoint_to_cgvec(vec_to_npoint(v)), v);
    }
}
