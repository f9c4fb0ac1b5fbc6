pub mod strip_geometry;
pub use strip_geometry::{MeshSink, RecordingMeshSink, StripGeometry};
