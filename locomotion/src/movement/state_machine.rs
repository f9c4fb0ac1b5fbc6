use cgmath::{InnerSpace, Vector3, Zero};
use engine::{input_log, locomotion_log};

use super::mode::{
    AimData, FrameSignals, LocomotionMode, ModeKind, ModeRequest, enter_mode, exit_mode, next_mode,
};
use crate::config::{LocomotionConfig, PathStyle};
use crate::error::Result;
use crate::input_context::{EdgeTrigger, InputSnapshot, stick_speed};
use crate::path::{LaunchPose, PathSource, TrajectorySolver};
use crate::physics::LocomotionWorld;
use crate::teleport::{DestinationCheck, PathAppearance, TeleportFeedback};
use crate::util::{FORWARD, UP, flatten, forward_of, try_normalize};

/// Drives the four locomotion modes.
///
/// Frame updates own mode timing and transitions; physics ticks own anything
/// that pushes the body or queries the scene for the aim arc.
pub struct LocomotionStateMachine {
    config: LocomotionConfig,
    mode: LocomotionMode,
    jump: EdgeTrigger,
    solver: TrajectorySolver,
    destination_check: DestinationCheck,
    transitions: u64,
}

impl LocomotionStateMachine {
    pub fn new(config: LocomotionConfig) -> Result<Self> {
        config.validate()?;
        Ok(LocomotionStateMachine {
            solver: TrajectorySolver::new(config.trajectory.clone()),
            destination_check: DestinationCheck::from_config(&config),
            config,
            mode: LocomotionMode::ManualMovement,
            jump: EdgeTrigger::default(),
            transitions: 0,
        })
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn mode(&self) -> &LocomotionMode {
        &self.mode
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn trajectory(&self) -> &TrajectorySolver {
        &self.solver
    }

    pub fn aim(&self) -> Option<&AimData> {
        match &self.mode {
            LocomotionMode::AimingTeleport(aim) => Some(aim),
            _ => None,
        }
    }

    /// Where the feet would land if the aim were released now.
    pub fn pending_destination(&self) -> Option<Vector3<f32>> {
        self.aim()
            .filter(|aim| aim.destination_valid)
            .map(|aim| aim.marker_position)
    }

    pub fn active_path(&self) -> PathSource {
        match (&self.mode, self.config.teleport.path_style) {
            (LocomotionMode::AimingTeleport(_), PathStyle::Ballistic) => PathSource::Trajectory,
            (LocomotionMode::AimingTeleport(_), PathStyle::Bezier) => PathSource::Bezier,
            _ => PathSource::Hidden,
        }
    }

    /// Hide the aim visuals and settle into manual movement.
    pub fn start(&mut self, feedback: &mut dyn TeleportFeedback) {
        feedback.set_marker_visible(false);
        feedback.set_path_visible(false);
        self.mode = LocomotionMode::ManualMovement;
        self.jump.clear();
    }

    /// Leave the current mode and enter the requested one.
    pub fn enter<W: LocomotionWorld + ?Sized>(
        &mut self,
        request: ModeRequest,
        input: &InputSnapshot,
        world: &mut W,
        feedback: &mut dyn TeleportFeedback,
    ) {
        let from = self.mode.kind();
        exit_mode(&self.mode, world, feedback);
        self.mode = enter_mode(request, input, &self.config, world, feedback);

        match request {
            ModeRequest::ManualMovement => self.jump.clear(),
            ModeRequest::AimingTeleport => self.solver.invalidate(),
            ModeRequest::Turning { .. } | ModeRequest::Warping { .. } => {}
        }

        self.transitions += 1;
        locomotion_log!(DEBUG, from = ?from, to = ?request.kind(), "mode transition");
    }

    pub fn update_per_frame<W: LocomotionWorld + ?Sized>(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        world: &mut W,
        feedback: &mut dyn TeleportFeedback,
    ) {
        self.observe_jump(input);
        let signals = self.advance_mode(input, dt, world);
        if let Some(request) = next_mode(&self.mode, &signals, &self.config) {
            if let (LocomotionMode::AimingTeleport(aim), ModeRequest::ManualMovement) =
                (&self.mode, request)
            {
                locomotion_log!(
                    TRACE,
                    stick_speed = signals.stick_speed,
                    destination_valid = aim.destination_valid,
                    "aim released without warping"
                );
            }
            self.enter(request, input, world, feedback);
        }
    }

    pub fn update_per_physics_tick<W: LocomotionWorld + ?Sized>(
        &mut self,
        input: &InputSnapshot,
        _dt: f32,
        world: &mut W,
        feedback: &mut dyn TeleportFeedback,
    ) {
        self.observe_jump(input);
        match self.mode {
            LocomotionMode::ManualMovement => {
                self.walk(input, world);
                self.try_jump(world);
            }
            LocomotionMode::AimingTeleport(_) => self.update_aim(input, world, feedback),
            LocomotionMode::Turning(_) | LocomotionMode::Warping(_) => {}
        }
    }

    fn observe_jump(&mut self, input: &InputSnapshot) {
        if self.jump.observe(input.jump_pressed) {
            input_log!(TRACE, "jump pressed");
        }
    }

    // Mode-local timing; returns what the transition table needs this frame
    fn advance_mode<W: LocomotionWorld + ?Sized>(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        world: &mut W,
    ) -> FrameSignals {
        let mut signals = FrameSignals {
            steering: input.steering,
            stick_speed: 0.0,
        };

        match &mut self.mode {
            LocomotionMode::ManualMovement => {}
            LocomotionMode::Turning(turn) => {
                turn.elapsed += dt;
                let turn_time = self.config.turn.turn_time;
                let rotation = if turn.elapsed >= turn_time {
                    turn.target
                } else {
                    turn.origin.slerp(turn.target, turn.elapsed / turn_time)
                };
                world.set_rotation(rotation);
            }
            LocomotionMode::AimingTeleport(aim) => {
                signals.stick_speed = stick_speed(aim.last_steering, input.steering, dt);
                aim.last_steering = input.steering;
            }
            LocomotionMode::Warping(warp) => warp.elapsed += dt,
        }

        signals
    }

    fn walk<W: LocomotionWorld + ?Sized>(&mut self, input: &InputSnapshot, world: &mut W) {
        let movement = &self.config.movement;
        let forward = try_normalize(flatten(forward_of(input.head_rotation))).unwrap_or(FORWARD);
        let right = forward.cross(UP);
        let target = try_normalize(right * input.movement.x + forward * input.movement.y)
            .map_or(Vector3::zero(), |direction| direction * movement.move_speed);

        let limit = movement.max_velocity_change;
        let mut change = flatten(target - world.velocity());
        if change.magnitude() > limit {
            change = change.normalize_to(limit);
        }

        if change.magnitude2() > 0.001 {
            world.apply_velocity_change(change);
        }
    }

    fn try_jump<W: LocomotionWorld + ?Sized>(&mut self, world: &mut W) {
        if !self.jump.consume() {
            return;
        }

        let probe = self.config.movement.jump_probe_distance;
        let feet = world.position();
        let grounded = world.line_cast(feet + UP * probe, feet - UP * probe).is_some();
        if grounded {
            world.apply_velocity_change(UP * self.config.movement.jump_velocity);
            locomotion_log!(DEBUG, "jump");
        } else {
            locomotion_log!(TRACE, "jump ignored while airborne");
        }
    }

    fn update_aim<W: LocomotionWorld + ?Sized>(
        &mut self,
        input: &InputSnapshot,
        world: &mut W,
        feedback: &mut dyn TeleportFeedback,
    ) {
        let LocomotionMode::AimingTeleport(aim) = &mut self.mode else {
            return;
        };

        let pose = LaunchPose::from(input.aim);
        self.solver.update(pose, &*world);
        let landing = self.solver.final_point(pose.position);
        let normal = self.solver.path().terminal_normal;

        let verdict = self
            .destination_check
            .evaluate(landing, normal, world.position(), &*world);
        aim.destination_valid = verdict.is_valid();
        aim.marker_position = self.destination_check.marker_position(landing);
        feedback.set_marker_position(aim.marker_position);

        let appearance = if aim.destination_valid {
            PathAppearance::Valid
        } else {
            PathAppearance::Invalid
        };
        if aim.appearance != Some(appearance) {
            feedback.set_path_appearance(appearance);
            feedback.set_marker_visible(aim.destination_valid);
            aim.appearance = Some(appearance);
            locomotion_log!(TRACE, verdict = ?verdict, "teleport destination changed");
        }
    }
}
