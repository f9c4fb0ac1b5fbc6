use cgmath::{Quaternion, Vector3};
use engine::trajectory_log;

use crate::config::BezierConfig;
use crate::util::{flatten, forward_of, normalize_or_keep, right_of, up_of};

/// Cubic Bezier aim path anchored to a moving frame.
///
/// Points are expressed relative to the anchor's origin, in world orientation.
/// The curve is only resampled when the endpoint or the segment count changes;
/// a rotating anchor alone does not trigger a resample.
pub struct BezierPathBuilder {
    config: BezierConfig,
    endpoint: Vector3<f32>,
    sampled_endpoint: Option<Vector3<f32>>,
    points: Vec<Vector3<f32>>,
    recomputations: usize,
}

impl BezierPathBuilder {
    pub fn new(config: BezierConfig) -> Self {
        let endpoint = config.initial_endpoint;
        BezierPathBuilder {
            config,
            endpoint,
            sampled_endpoint: None,
            points: Vec::new(),
            recomputations: 0,
        }
    }

    pub fn endpoint(&self) -> Vector3<f32> {
        self.endpoint
    }

    /// Target point relative to the anchor origin.
    pub fn set_endpoint(&mut self, endpoint: Vector3<f32>) {
        self.endpoint = endpoint;
    }

    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    /// Sample `segments + 1` points along the curve for an anchor oriented by `orientation`.
    pub fn sample(&mut self, orientation: Quaternion<f32>, segments: usize) -> &[Vector3<f32>] {
        let count = segments.max(1) + 1;
        if self.sampled_endpoint == Some(self.endpoint) && self.points.len() == count {
            return &self.points;
        }

        let [p0, p1, p2, p3] = self.control_points(orientation);
        self.points.clear();
        self.points.extend((0..count).map(|i| {
            let t = i as f32 / (count - 1) as f32;
            cubic_bezier(p0, p1, p2, p3, t)
        }));

        self.sampled_endpoint = Some(self.endpoint);
        self.recomputations += 1;
        trajectory_log!(
            TRACE,
            points = count,
            recomputations = self.recomputations,
            "resampled bezier aim path"
        );

        &self.points
    }

    fn control_points(&self, orientation: Quaternion<f32>) -> [Vector3<f32>; 4] {
        let right = right_of(orientation);
        let up = up_of(orientation);
        let forward = forward_of(orientation);
        let along_frame = |offset: Vector3<f32>| right * offset.x + up * offset.y + forward * offset.z;

        let start = along_frame(self.config.start_offset);
        let end = self.endpoint + along_frame(self.config.end_offset);

        // Inner control points bend along the flattened start -> end direction
        let direction = normalize_or_keep(flatten(end - start));
        let side = normalize_or_keep(direction.cross(up));
        let along_path = |offset: Vector3<f32>| side * offset.x + up * offset.y + direction * offset.z;

        let start_control = start + along_path(self.config.start_control);
        let end_control = end + along_path(self.config.end_control);

        [start, start_control, end_control, end]
    }
}

fn cubic_bezier(
    p0: Vector3<f32>,
    p1: Vector3<f32>,
    p2: Vector3<f32>,
    p3: Vector3<f32>,
    t: f32,
) -> Vector3<f32> {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
