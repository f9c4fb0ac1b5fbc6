// In-memory scene used by unit tests: infinite planes and axis-aligned boxes.

use cgmath::{InnerSpace, Quaternion, Vector3, vec3};

use super::{LineHit, PlayerBody, SceneQuery};

#[derive(Clone, Copy, Debug)]
pub enum FakeShape {
    /// Solid half-space below `normal · p = offset`
    Plane { normal: Vector3<f32>, offset: f32 },
    Aabb { min: Vector3<f32>, max: Vector3<f32> },
}

pub struct FakeWorld {
    pub shapes: Vec<FakeShape>,
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub velocity: Vector3<f32>,
    pub collisions: bool,
    pub gravity: bool,
    pub velocity_changes: Vec<Vector3<f32>>,
}

impl FakeWorld {
    pub fn empty() -> Self {
        FakeWorld {
            shapes: Vec::new(),
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            velocity: vec3(0.0, 0.0, 0.0),
            collisions: true,
            gravity: true,
            velocity_changes: Vec::new(),
        }
    }

    /// Flat floor at y = 0 with the player standing at the origin.
    pub fn with_floor() -> Self {
        let mut world = Self::empty();
        world.add_plane(vec3(0.0, 1.0, 0.0), 0.0);
        world
    }

    pub fn add_plane(&mut self, normal: Vector3<f32>, offset: f32) {
        self.shapes.push(FakeShape::Plane {
            normal: normal.normalize(),
            offset,
        });
    }

    pub fn add_box(&mut self, min: Vector3<f32>, max: Vector3<f32>) {
        self.shapes.push(FakeShape::Aabb { min, max });
    }
}

fn cast_shape(shape: &FakeShape, from: Vector3<f32>, to: Vector3<f32>) -> Option<(f32, Vector3<f32>)> {
    let delta = to - from;
    match *shape {
        FakeShape::Plane { normal, offset } => {
            let d_from = normal.dot(from) - offset;
            let d_to = normal.dot(to) - offset;
            if d_from >= 0.0 && d_to < 0.0 {
                Some((d_from / (d_from - d_to), normal))
            } else {
                None
            }
        }
        FakeShape::Aabb { min, max } => {
            let inside = (0..3).all(|axis| from[axis] > min[axis] && from[axis] < max[axis]);
            if inside {
                return None;
            }

            let mut t_enter = 0.0f32;
            let mut t_exit = 1.0f32;
            let mut enter_normal = vec3(0.0, 0.0, 0.0);
            for axis in 0..3 {
                if delta[axis].abs() < 1e-9 {
                    if from[axis] < min[axis] || from[axis] > max[axis] {
                        return None;
                    }
                    continue;
                }
                let t0 = (min[axis] - from[axis]) / delta[axis];
                let t1 = (max[axis] - from[axis]) / delta[axis];
                let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
                if near > t_enter {
                    t_enter = near;
                    enter_normal = vec3(0.0, 0.0, 0.0);
                    enter_normal[axis] = -delta[axis].signum();
                }
                t_exit = t_exit.min(far);
                if t_enter > t_exit {
                    return None;
                }
            }
            Some((t_enter, enter_normal))
        }
    }
}

fn point_aabb_distance(p: Vector3<f32>, min: Vector3<f32>, max: Vector3<f32>) -> f32 {
    let clamped = vec3(
        p.x.clamp(min.x, max.x),
        p.y.clamp(min.y, max.y),
        p.z.clamp(min.z, max.z),
    );
    (p - clamped).magnitude()
}

impl SceneQuery for FakeWorld {
    fn line_cast(&self, from: Vector3<f32>, to: Vector3<f32>) -> Option<LineHit> {
        self.shapes
            .iter()
            .filter_map(|shape| cast_shape(shape, from, to))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, normal)| LineHit {
                point: from + (to - from) * t,
                normal,
            })
    }

    fn capsule_overlap(&self, bottom: Vector3<f32>, top: Vector3<f32>, radius: f32) -> bool {
        self.shapes.iter().any(|shape| match *shape {
            FakeShape::Plane { normal, offset } => {
                let lowest = (normal.dot(bottom) - offset).min(normal.dot(top) - offset);
                lowest < radius
            }
            FakeShape::Aabb { min, max } => (0..=8).any(|i| {
                let p = bottom + (top - bottom) * (i as f32 / 8.0);
                point_aabb_distance(p, min, max) < radius
            }),
        })
    }
}

impl PlayerBody for FakeWorld {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.rotation = rotation;
    }

    fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.velocity = velocity;
    }

    fn apply_velocity_change(&mut self, delta: Vector3<f32>) {
        self.velocity_changes.push(delta);
        self.velocity += delta;
    }

    fn collisions_enabled(&self) -> bool {
        self.collisions
    }

    fn set_collisions_enabled(&mut self, enabled: bool) {
        self.collisions = enabled;
    }

    fn gravity_enabled(&self) -> bool {
        self.gravity
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity = enabled;
    }
}
