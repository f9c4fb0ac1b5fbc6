pub mod bezier;
pub mod ribbon_mesh;
pub mod trajectory;

pub use bezier::BezierPathBuilder;
pub use ribbon_mesh::{BuildOutcome, RibbonMeshBuilder};
pub use trajectory::{LaunchPose, TrajectoryPath, TrajectorySolver};

/// Which generator feeds the aim ribbon this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathSource {
    Hidden,
    Trajectory,
    Bezier,
}
