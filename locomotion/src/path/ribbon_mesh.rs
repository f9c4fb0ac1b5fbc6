use cgmath::{Quaternion, Rotation, Vector2, Vector3};
use engine::mesh_log;
use engine::scene::StripGeometry;

use crate::util::{FORWARD, UP, flatten, forward_of, try_normalize};

/// What a call to [`RibbonMeshBuilder::build`] did to the buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Inputs matched the previous build; nothing was touched
    Unchanged,
    /// Vertex data rewritten in place, topology kept
    Rewritten,
    /// Point count changed; all buffers were reallocated
    Reallocated,
}

impl BuildOutcome {
    pub fn changed(self) -> bool {
        self != BuildOutcome::Unchanged
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BuildKey {
    terminal: Vector3<f32>,
    point_count: usize,
    width: f32,
    offset: Vector3<f32>,
    orientation: Quaternion<f32>,
}

/// Extrudes a centerline into a flat, horizontally-oriented strip two vertices wide.
///
/// Vertex positions are written in the owner's local frame: each point is
/// shifted by `offset` and then rotated by the inverse of `orientation`.
#[derive(Default)]
pub struct RibbonMeshBuilder {
    geometry: StripGeometry,
    segment_normals: Vec<Vector3<f32>>,
    last_key: Option<BuildKey>,
    reallocations: usize,
}

impl RibbonMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> &StripGeometry {
        &self.geometry
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Rebuild the strip for `centerline`. Fewer than two points cannot form a
    /// segment and leave the previous geometry untouched.
    pub fn build(
        &mut self,
        centerline: &[Vector3<f32>],
        offset: Vector3<f32>,
        width: f32,
        orientation: Quaternion<f32>,
    ) -> BuildOutcome {
        let point_count = centerline.len();
        if point_count < 2 {
            mesh_log!(TRACE, points = point_count, "centerline too short for a ribbon");
            return BuildOutcome::Unchanged;
        }

        let key = BuildKey {
            terminal: centerline[point_count - 1],
            point_count,
            width,
            offset,
            orientation,
        };
        if self.last_key == Some(key) {
            return BuildOutcome::Unchanged;
        }

        let outcome = if self.geometry.vertex_count() != point_count * 2 {
            self.allocate(point_count);
            BuildOutcome::Reallocated
        } else {
            BuildOutcome::Rewritten
        };

        self.write_positions(centerline, offset, width, orientation);
        self.write_normals(orientation);
        self.last_key = Some(key);
        outcome
    }

    fn allocate(&mut self, point_count: usize) {
        self.geometry = StripGeometry::for_points(point_count);
        self.segment_normals = vec![UP; point_count - 1];
        self.reallocations += 1;

        let last = (point_count - 1) as f32;
        for i in 0..point_count {
            let t = i as f32 / last;
            self.geometry.uvs[2 * i] = Vector2::new(0.0, t);
            self.geometry.uvs[2 * i + 1] = Vector2::new(1.0, t);
        }

        for segment in 0..point_count - 1 {
            let i0 = (2 * segment) as u32;
            let (i1, i2, i3) = (i0 + 1, i0 + 2, i0 + 3);
            self.geometry.indices[6 * segment..6 * segment + 6]
                .copy_from_slice(&[i0, i1, i2, i2, i1, i3]);
        }

        mesh_log!(DEBUG, points = point_count, "allocated ribbon buffers");
    }

    fn write_positions(
        &mut self,
        centerline: &[Vector3<f32>],
        offset: Vector3<f32>,
        width: f32,
        orientation: Quaternion<f32>,
    ) {
        let first = centerline[0] + offset;
        let last = centerline[centerline.len() - 1] + offset;

        // One horizontal direction for the whole strip, so it never twists
        let direction = try_normalize(flatten(last - first))
            .or_else(|| try_normalize(flatten(forward_of(orientation))))
            .unwrap_or(FORWARD);
        let half_span = direction.cross(UP) * (width * 0.5);
        let to_local = orientation.invert();

        for (i, point) in centerline.iter().enumerate() {
            let center = *point + offset;
            self.geometry.positions[2 * i] = to_local.rotate_vector(center - half_span);
            self.geometry.positions[2 * i + 1] = to_local.rotate_vector(center + half_span);
        }
    }

    fn write_normals(&mut self, orientation: Quaternion<f32>) {
        let positions = &self.geometry.positions;
        let fallback = orientation.invert().rotate_vector(UP);

        for (segment, normal) in self.segment_normals.iter_mut().enumerate() {
            let v0 = positions[2 * segment];
            let v1 = positions[2 * segment + 1];
            let v2 = positions[2 * segment + 2];
            *normal = try_normalize((v1 - v0).cross(v2 - v0)).unwrap_or(fallback);
        }

        let segments = self.segment_normals.len();
        for i in 0..=segments {
            let normal = if i == 0 {
                self.segment_normals[0]
            } else if i == segments {
                self.segment_normals[segments - 1]
            } else {
                let blended = self.segment_normals[i - 1] + self.segment_normals[i];
                try_normalize(blended).unwrap_or(self.segment_normals[i])
            };
            self.geometry.normals[2 * i] = normal;
            self.geometry.normals[2 * i + 1] = normal;
        }
    }
}
