use cgmath::{Vector2, Vector3};

/// CPU-side triangle strip buffers, laid out as a left/right vertex pair per
/// centerline point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StripGeometry {
    pub positions: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub indices: Vec<u32>,
}

impl StripGeometry {
    /// Buffers sized for a strip along `point_count` centerline points.
    pub fn for_points(point_count: usize) -> Self {
        let vertex_count = point_count * 2;
        let index_count = point_count.saturating_sub(1) * 6;
        Self {
            positions: vec![Vector3::new(0.0, 0.0, 0.0); vertex_count],
            normals: vec![Vector3::new(0.0, 1.0, 0.0); vertex_count],
            uvs: vec![Vector2::new(0.0, 0.0); vertex_count],
            indices: vec![0; index_count],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Receives rebuilt strip buffers for display.
pub trait MeshSink {
    fn upload(&mut self, geometry: &StripGeometry);
}

/// Keeps the latest upload around; used by headless runs and tests.
#[derive(Default)]
pub struct RecordingMeshSink {
    pub uploads: usize,
    pub last: Option<StripGeometry>,
}

impl MeshSink for RecordingMeshSink {
    fn upload(&mut self, geometry: &StripGeometry) {
        self.uploads += 1;
        match self.last.as_mut() {
            Some(last) => last.clone_from(geometry),
            None => self.last = Some(geometry.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_points_sizes() {
        let geometry = StripGeometry::for_points(5);
        assert_eq!(geometry.vertex_count(), 10);
        assert_eq!(geometry.normals.len(), 10);
        assert_eq!(geometry.uvs.len(), 10);
        assert_eq!(geometry.index_count(), 24);
        assert_eq!(geometry.triangle_count(), 8);
    }

    #[test]
    fn test_single_point_has_no_triangles() {
        let geometry = StripGeometry::for_points(1);
        assert_eq!(geometry.vertex_count(), 2);
        assert!(geometry.is_empty());
    }

    #[test]
    fn test_recording_sink_counts_uploads() {
        let mut sink = RecordingMeshSink::default();
        sink.upload(&StripGeometry::for_points(2));
        sink.upload(&StripGeometry::for_points(3));
        assert_eq!(sink.uploads, 2);
        assert_eq!(sink.last.as_ref().map(|g| g.vertex_count()), Some(6));
    }
}
