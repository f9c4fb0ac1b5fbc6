use cgmath::{InnerSpace, Quaternion, Vector3, vec3};
use engine::trajectory_log;

use crate::config::TrajectoryConfig;
use crate::input_context::AimPose;
use crate::physics::SceneQuery;
use crate::util::{UP, flatten, forward_of, normalize_or_keep};

/// Where the arc is launched from. The launch direction is the pose's forward axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchPose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl LaunchPose {
    pub fn direction(&self) -> Vector3<f32> {
        forward_of(self.rotation)
    }
}

impl From<AimPose> for LaunchPose {
    fn from(aim: AimPose) -> Self {
        LaunchPose {
            position: aim.position,
            rotation: aim.rotation,
        }
    }
}

/// A sampled ballistic arc, clipped at its first obstruction.
///
/// Always holds exactly `resolution` points. When a segment is obstructed, the
/// point at `hit_index` and every point after it equal the impact point.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryPath {
    pub points: Vec<Vector3<f32>>,
    /// Surface normal at the impact point, or straight up without an impact
    pub terminal_normal: Vector3<f32>,
    pub hit_index: Option<usize>,
}

impl TrajectoryPath {
    fn with_resolution(resolution: usize) -> Self {
        TrajectoryPath {
            points: vec![vec3(0.0, 0.0, 0.0); resolution],
            terminal_normal: UP,
            hit_index: None,
        }
    }

    pub fn has_hit(&self) -> bool {
        self.hit_index.is_some()
    }

    pub fn arc_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).magnitude())
            .sum()
    }
}

pub struct TrajectorySolver {
    config: TrajectoryConfig,
    path: TrajectoryPath,
    last_pose: Option<LaunchPose>,
    solved: bool,
    solve_count: usize,
}

impl TrajectorySolver {
    pub fn new(config: TrajectoryConfig) -> Self {
        let resolution = config.resolution.max(2);
        TrajectorySolver {
            config,
            path: TrajectoryPath::with_resolution(resolution),
            last_pose: None,
            solved: false,
            solve_count: 0,
        }
    }

    pub fn resolution(&self) -> usize {
        self.path.points.len()
    }

    pub fn path(&self) -> &TrajectoryPath {
        &self.path
    }

    /// Pose the current path was solved for.
    pub fn last_pose(&self) -> Option<LaunchPose> {
        self.last_pose
    }

    pub fn solve_count(&self) -> usize {
        self.solve_count
    }

    /// Last sample of the solved arc, or `fallback` before the first solve.
    pub fn final_point(&self, fallback: Vector3<f32>) -> Vector3<f32> {
        if !self.solved {
            return fallback;
        }
        self.path.points.last().copied().unwrap_or(fallback)
    }

    /// Forget the memoized pose so the next [`update`](Self::update) solves again.
    pub fn invalidate(&mut self) {
        self.last_pose = None;
    }

    /// Solves for `pose` unless it is exactly the pose of the previous solve.
    /// Returns whether a new solve ran.
    pub fn update<Q: SceneQuery + ?Sized>(&mut self, pose: LaunchPose, scene: &Q) -> bool {
        if self.last_pose == Some(pose) {
            return false;
        }
        let speed = self.config.launch_speed;
        self.solve(pose.position, pose.direction(), speed, scene);
        self.last_pose = Some(pose);
        true
    }

    /// Samples the arc launched from `launch_position` along `launch_direction`
    /// at `speed`, stopping at the first segment the scene obstructs.
    pub fn solve<Q: SceneQuery + ?Sized>(
        &mut self,
        launch_position: Vector3<f32>,
        launch_direction: Vector3<f32>,
        speed: f32,
        scene: &Q,
    ) -> &TrajectoryPath {
        let gravity = self.config.gravity;
        let velocity = normalize_or_keep(launch_direction) * speed;
        let vertical_speed = velocity.y;

        let up_time = (vertical_speed / gravity).max(0.0);
        let apex =
            launch_position.y + vertical_speed * up_time - 0.5 * gravity * up_time * up_time;
        let fall = (apex - self.config.floor_height).max(0.0);
        let down_time = (2.0 * fall / gravity).sqrt();
        let flight_time = up_time + down_time;

        let horizontal = flatten(velocity);
        let elevation = vertical_speed.abs().atan2(horizontal.magnitude());
        let (sin_elevation, cos_elevation) = elevation.sin_cos();

        let resolution = self.path.points.len();
        let path = &mut self.path;
        path.points[0] = launch_position;
        path.terminal_normal = UP;
        path.hit_index = None;

        for i in 1..resolution {
            let t = i as f32 / (resolution - 1) as f32 * flight_time;
            let sample = launch_position
                + horizontal * cos_elevation * t
                + UP * (vertical_speed * sin_elevation * t - 0.5 * gravity * t * t);

            if let Some(hit) = scene.line_cast(path.points[i - 1], sample) {
                path.points[i..].fill(hit.point);
                path.terminal_normal = hit.normal;
                path.hit_index = Some(i);
                break;
            }
            path.points[i] = sample;
        }

        self.solved = true;
        self.solve_count += 1;

        trajectory_log!(
            TRACE,
            flight_time = flight_time,
            hit = ?path.hit_index,
            "solved teleport arc"
        );

        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::fake::FakeWorld;
    use crate::util::test_util::assert_vec_near;
    use cgmath::{Deg, Rotation3};

    fn solver() -> TrajectorySolver {
        TrajectorySolver::new(TrajectoryConfig::default())
    }

    fn pitched_pose(degrees: f32) -> LaunchPose {
        LaunchPose {
            position: vec3(0.0, 1.5, 0.0),
            rotation: Quaternion::from_angle_x(Deg(degrees)),
        }
    }

    fn assert_finite(path: &TrajectoryPath) {
        for point in &path.points {
            assert!(point.x.is_finite() && point.y.is_finite() && point.z.is_finite());
        }
        assert!(path.terminal_normal.magnitude().is_finite());
    }

    #[test]
    fn test_arc_lands_on_floor() {
        let world = FakeWorld::with_floor();
        let mut solver = solver();
        let pose = pitched_pose(30.0);
        solver.solve(pose.position, pose.direction(), 10.0, &world);

        let path = solver.path();
        assert_eq!(path.points.len(), 16);
        let hit = path.hit_index.expect("arc should land");
        let landing = path.points[hit];
        assert!(landing.y.abs() < 1e-4);
        assert!(landing.z < -1.0);
        for point in &path.points[hit..] {
            assert_eq!(*point, landing);
        }
        assert_vec_near(path.terminal_normal, UP, 1e-6);
        assert_eq!(path.points[0], pose.position);
    }

    #[test]
    fn test_unobstructed_arc_keeps_all_samples() {
        let world = FakeWorld::empty();
        let mut solver = solver();
        let pose = pitched_pose(30.0);
        solver.solve(pose.position, pose.direction(), 10.0, &world);

        let path = solver.path();
        assert_eq!(path.points.len(), 16);
        assert!(!path.has_hit());
        assert_eq!(path.terminal_normal, UP);
        // Moves away from the launch point along the aim
        assert!(path.points[15].z < path.points[1].z);
        assert!(path.arc_length() > 0.0);
    }

    #[test]
    fn test_wall_normal_is_reported() {
        let mut world = FakeWorld::with_floor();
        world.add_box(vec3(-5.0, 0.0, -3.0), vec3(5.0, 10.0, -2.5));
        let mut solver = solver();
        let pose = pitched_pose(10.0);
        solver.solve(pose.position, pose.direction(), 10.0, &world);

        let path = solver.path();
        assert!(path.has_hit());
        assert_vec_near(path.terminal_normal, vec3(0.0, 0.0, 1.0), 1e-6);
        assert!((path.points[15].z + 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_launches_stay_finite() {
        let world = FakeWorld::with_floor();
        let mut solver = solver();

        solver.solve(vec3(0.0, 1.5, 0.0), vec3(0.0, 0.0, 0.0), 10.0, &world);
        assert_finite(solver.path());

        solver.solve(vec3(0.0, 1.5, 0.0), vec3(0.0, -1.0, 0.0), 10.0, &world);
        assert_finite(solver.path());
        assert!(solver.path().has_hit());

        // Already below the floor height: no flight time at all
        solver.solve(vec3(0.0, -3.0, 0.0), vec3(0.0, 0.0, -1.0), 10.0, &FakeWorld::empty());
        assert_finite(solver.path());
        assert_eq!(solver.path().points[15], vec3(0.0, -3.0, 0.0));
    }

    #[test]
    fn test_update_memoizes_on_exact_pose() {
        let world = FakeWorld::with_floor();
        let mut solver = solver();
        let pose = pitched_pose(20.0);

        assert_eq!(solver.final_point(vec3(1.0, 2.0, 3.0)), vec3(1.0, 2.0, 3.0));
        assert!(solver.update(pose, &world));
        assert!(!solver.update(pose, &world));
        assert_eq!(solver.solve_count(), 1);

        solver.invalidate();
        assert!(solver.update(pose, &world));
        assert_eq!(solver.solve_count(), 2);

        let moved = LaunchPose {
            position: pose.position + vec3(0.0, 0.0, -0.001),
            ..pose
        };
        assert!(solver.update(moved, &world));
        assert_eq!(solver.last_pose(), Some(moved));
        assert_eq!(solver.final_point(vec3(0.0, 0.0, 0.0)), solver.path().points[15]);
    }
}
