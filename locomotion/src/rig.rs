use cgmath::{Vector3, Zero};
use engine::mesh_log;
use engine::scene::{MeshSink, StripGeometry};

use crate::config::LocomotionConfig;
use crate::error::{LocomotionError, Result};
use crate::input_context::InputSnapshot;
use crate::movement::{LocomotionStateMachine, ModeKind};
use crate::path::{BezierPathBuilder, BuildOutcome, PathSource, RibbonMeshBuilder};
use crate::physics::LocomotionWorld;
use crate::teleport::TeleportFeedback;

/// Assembles a [`LocomotionRig`]; every collaborator must be supplied.
#[derive(Default)]
pub struct LocomotionRigBuilder {
    config: Option<LocomotionConfig>,
    feedback: Option<Box<dyn TeleportFeedback>>,
    mesh_sink: Option<Box<dyn MeshSink>>,
}

impl LocomotionRigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: LocomotionConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn feedback(mut self, feedback: Box<dyn TeleportFeedback>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn mesh_sink(mut self, mesh_sink: Box<dyn MeshSink>) -> Self {
        self.mesh_sink = Some(mesh_sink);
        self
    }

    pub fn build(self) -> Result<LocomotionRig> {
        let config = self.config.ok_or(LocomotionError::MissingCollaborator { name: "config" })?;
        let mut feedback = self
            .feedback
            .ok_or(LocomotionError::MissingCollaborator { name: "teleport feedback" })?;
        let mesh_sink = self
            .mesh_sink
            .ok_or(LocomotionError::MissingCollaborator { name: "mesh sink" })?;

        let mut state_machine = LocomotionStateMachine::new(config.clone())?;
        state_machine.start(feedback.as_mut());

        Ok(LocomotionRig {
            bezier: BezierPathBuilder::new(config.bezier.clone()),
            ribbon: RibbonMeshBuilder::new(),
            state_machine,
            feedback,
            mesh_sink,
            accumulator: 0.0,
            config,
        })
    }
}

/// Ties the state machine, the path generators and the ribbon mesh together
/// and runs them in physics-then-frame order.
pub struct LocomotionRig {
    config: LocomotionConfig,
    state_machine: LocomotionStateMachine,
    bezier: BezierPathBuilder,
    ribbon: RibbonMeshBuilder,
    feedback: Box<dyn TeleportFeedback>,
    mesh_sink: Box<dyn MeshSink>,
    accumulator: f32,
}

impl LocomotionRig {
    pub fn builder() -> LocomotionRigBuilder {
        LocomotionRigBuilder::new()
    }

    pub fn state_machine(&self) -> &LocomotionStateMachine {
        &self.state_machine
    }

    pub fn mode(&self) -> ModeKind {
        self.state_machine.kind()
    }

    pub fn ribbon(&self) -> &StripGeometry {
        self.ribbon.geometry()
    }

    pub fn physics_tick<W: LocomotionWorld + ?Sized>(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        world: &mut W,
    ) {
        self.state_machine
            .update_per_physics_tick(input, dt, world, self.feedback.as_mut());
    }

    pub fn frame<W: LocomotionWorld + ?Sized>(&mut self, input: &InputSnapshot, dt: f32, world: &mut W) {
        self.state_machine
            .update_per_frame(input, dt, world, self.feedback.as_mut());
        self.refresh_path(input);
    }

    /// Run as many fixed physics ticks as `frame_dt` covers, then one frame.
    ///
    /// `integrate` steps the external simulation after each tick. Backlog
    /// beyond the configured tick cap is dropped. Returns the ticks run.
    pub fn advance<W, F>(
        &mut self,
        input: &InputSnapshot,
        frame_dt: f32,
        world: &mut W,
        mut integrate: F,
    ) -> u32
    where
        W: LocomotionWorld + ?Sized,
        F: FnMut(&mut W, f32),
    {
        let step = self.config.scheduler.fixed_timestep;
        let max_ticks = self.config.scheduler.max_ticks_per_frame;

        self.accumulator += frame_dt.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= step && ticks < max_ticks {
            self.physics_tick(input, step, world);
            integrate(world, step);
            self.accumulator -= step;
            ticks += 1;
        }
        if self.accumulator >= step {
            tracing::warn!(
                backlog = self.accumulator,
                max_ticks,
                "physics fell behind, dropping backlog"
            );
            self.accumulator %= step;
        }

        self.frame(input, frame_dt, world);
        ticks
    }

    // Feed the active generator's centerline to the ribbon and upload on change
    fn refresh_path(&mut self, input: &InputSnapshot) {
        let width = self.config.ribbon.width;
        let outcome = match self.state_machine.active_path() {
            PathSource::Hidden => return,
            PathSource::Trajectory => {
                let solver = self.state_machine.trajectory();
                let Some(pose) = solver.last_pose() else {
                    return;
                };
                self.ribbon
                    .build(&solver.path().points, -pose.position, width, pose.rotation)
            }
            PathSource::Bezier => {
                let Some(aim) = self.state_machine.aim() else {
                    return;
                };
                self.bezier
                    .set_endpoint(aim.marker_position - input.aim.position);
                let points = self
                    .bezier
                    .sample(input.aim.rotation, self.config.bezier.segments);
                self.ribbon
                    .build(points, Vector3::zero(), width, input.aim.rotation)
            }
        };

        if outcome.changed() {
            if outcome == BuildOutcome::Reallocated {
                let geometry = self.ribbon.geometry();
                mesh_log!(
                    DEBUG,
                    vertices = geometry.vertex_count(),
                    triangles = geometry.triangle_count(),
                    "ribbon topology changed"
                );
            }
            self.mesh_sink.upload(self.ribbon.geometry());
        }
    }
}
