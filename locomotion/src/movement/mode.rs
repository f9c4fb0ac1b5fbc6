use cgmath::{Deg, Quaternion, Rotation3, Vector2, Vector3, Zero};

use crate::config::LocomotionConfig;
use crate::input_context::InputSnapshot;
use crate::physics::LocomotionWorld;
use crate::teleport::{PathAppearance, TeleportFeedback};
use crate::util::sign;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeKind {
    ManualMovement,
    Turning,
    AimingTeleport,
    Warping,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnData {
    pub origin: Quaternion<f32>,
    pub target: Quaternion<f32>,
    pub elapsed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimData {
    /// Marker position, which is also where a warp would land the feet
    pub marker_position: Vector3<f32>,
    pub last_steering: Vector2<f32>,
    pub destination_valid: bool,
    /// Appearance last pushed to the feedback sink
    pub appearance: Option<PathAppearance>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpData {
    pub origin: Vector3<f32>,
    pub destination: Vector3<f32>,
    pub elapsed: f32,
    pub duration: f32,
}

/// The active mode together with the data only that mode uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocomotionMode {
    ManualMovement,
    Turning(TurnData),
    AimingTeleport(AimData),
    Warping(WarpData),
}

impl LocomotionMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            LocomotionMode::ManualMovement => ModeKind::ManualMovement,
            LocomotionMode::Turning(_) => ModeKind::Turning,
            LocomotionMode::AimingTeleport(_) => ModeKind::AimingTeleport,
            LocomotionMode::Warping(_) => ModeKind::Warping,
        }
    }
}

/// A requested transition, carrying what the target mode needs on entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModeRequest {
    ManualMovement,
    /// `direction` is +1 or -1 and scales the configured turn amount about +Y
    Turning { direction: f32 },
    AimingTeleport,
    Warping { destination: Vector3<f32> },
}

impl ModeRequest {
    pub fn kind(&self) -> ModeKind {
        match self {
            ModeRequest::ManualMovement => ModeKind::ManualMovement,
            ModeRequest::Turning { .. } => ModeKind::Turning,
            ModeRequest::AimingTeleport => ModeKind::AimingTeleport,
            ModeRequest::Warping { .. } => ModeKind::Warping,
        }
    }
}

/// Per-frame signals the transition table reads besides the mode's own data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSignals {
    pub steering: Vector2<f32>,
    /// Speed of the steering y axis, only meaningful while aiming
    pub stick_speed: f32,
}

/// The transition table. Returns the mode to switch to, if any.
pub fn next_mode(
    mode: &LocomotionMode,
    signals: &FrameSignals,
    config: &LocomotionConfig,
) -> Option<ModeRequest> {
    let threshold = config.turn.stick_threshold;
    let steering = signals.steering;

    match mode {
        LocomotionMode::ManualMovement => {
            let direction = sign(steering.x);
            if steering.x.abs() >= threshold && direction != 0.0 {
                Some(ModeRequest::Turning { direction })
            } else if steering.y >= threshold {
                Some(ModeRequest::AimingTeleport)
            } else {
                None
            }
        }
        LocomotionMode::Turning(turn) => {
            let finished = turn.elapsed >= config.turn.turn_time;
            (finished && steering.x.abs() < threshold).then_some(ModeRequest::ManualMovement)
        }
        LocomotionMode::AimingTeleport(aim) => {
            if steering.y >= config.teleport.warp_stick_y_threshold {
                None
            } else if signals.stick_speed >= config.teleport.warp_stick_speed_threshold
                && aim.destination_valid
            {
                Some(ModeRequest::Warping {
                    destination: aim.marker_position,
                })
            } else {
                Some(ModeRequest::ManualMovement)
            }
        }
        LocomotionMode::Warping(warp) => {
            (warp.elapsed >= warp.duration).then_some(ModeRequest::ManualMovement)
        }
    }
}

/// Undo whatever the leaving mode changed on the body or the presentation.
pub fn exit_mode<W: LocomotionWorld + ?Sized>(
    mode: &LocomotionMode,
    world: &mut W,
    feedback: &mut dyn TeleportFeedback,
) {
    match mode {
        LocomotionMode::ManualMovement | LocomotionMode::Turning(_) => {}
        LocomotionMode::AimingTeleport(_) => {
            feedback.set_marker_visible(false);
            feedback.set_path_visible(false);
        }
        LocomotionMode::Warping(warp) => {
            world.set_position(warp.destination);
            world.set_velocity(Vector3::zero());
            world.set_collisions_enabled(true);
            world.set_gravity_enabled(true);
        }
    }
}

/// Build the entered mode's data and apply its entry actions.
pub fn enter_mode<W: LocomotionWorld + ?Sized>(
    request: ModeRequest,
    input: &InputSnapshot,
    config: &LocomotionConfig,
    world: &mut W,
    feedback: &mut dyn TeleportFeedback,
) -> LocomotionMode {
    match request {
        ModeRequest::ManualMovement => LocomotionMode::ManualMovement,
        ModeRequest::Turning { direction } => {
            let origin = world.rotation();
            let turn = Quaternion::from_angle_y(Deg(config.turn.turn_amount_degrees * direction));
            LocomotionMode::Turning(TurnData {
                origin,
                target: turn * origin,
                elapsed: 0.0,
            })
        }
        ModeRequest::AimingTeleport => {
            let marker_position = world.position();
            feedback.set_marker_visible(true);
            feedback.set_marker_position(marker_position);
            feedback.set_path_visible(true);
            LocomotionMode::AimingTeleport(AimData {
                marker_position,
                last_steering: input.steering,
                destination_valid: false,
                appearance: None,
            })
        }
        ModeRequest::Warping { destination } => {
            let origin = world.position();
            let duration = config.teleport.warp_time;
            world.set_velocity((destination - origin) / duration);
            world.set_collisions_enabled(false);
            world.set_gravity_enabled(false);
            LocomotionMode::Warping(WarpData {
                origin,
                destination,
                elapsed: 0.0,
                duration,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PlayerBody;
    use crate::physics::fake::FakeWorld;
    use crate::teleport::RecordingFeedback;
    use crate::util::test_util::{assert_quat_near, assert_vec_near};
    use cgmath::vec3;

    fn signals(x: f32, y: f32, stick_speed: f32) -> FrameSignals {
        FrameSignals {
            steering: Vector2::new(x, y),
            stick_speed,
        }
    }

    fn aiming(valid: bool) -> LocomotionMode {
        LocomotionMode::AimingTeleport(AimData {
            marker_position: vec3(0.0, 0.04, -4.0),
            last_steering: Vector2::new(0.0, 0.6),
            destination_valid: valid,
            appearance: None,
        })
    }

    #[test]
    fn test_manual_transitions() {
        let config = LocomotionConfig::default();
        let manual = LocomotionMode::ManualMovement;

        assert_eq!(next_mode(&manual, &signals(0.0, 0.0, 0.0), &config), None);
        assert_eq!(
            next_mode(&manual, &signals(-0.7, 0.9, 0.0), &config),
            Some(ModeRequest::Turning { direction: -1.0 })
        );
        assert_eq!(
            next_mode(&manual, &signals(0.2, 0.6, 0.0), &config),
            Some(ModeRequest::AimingTeleport)
        );
    }

    #[test]
    fn test_zero_threshold_does_not_turn_at_rest() {
        let mut config = LocomotionConfig::default();
        config.turn.stick_threshold = 0.0;
        assert_eq!(
            next_mode(&LocomotionMode::ManualMovement, &signals(0.0, -0.5, 0.0), &config),
            None
        );
    }

    #[test]
    fn test_turning_waits_for_time_and_release() {
        let config = LocomotionConfig::default();
        let mut turn = TurnData {
            origin: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            target: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            elapsed: 0.05,
        };
        assert_eq!(next_mode(&LocomotionMode::Turning(turn), &signals(0.0, 0.0, 0.0), &config), None);

        turn.elapsed = 0.1;
        assert_eq!(next_mode(&LocomotionMode::Turning(turn), &signals(0.8, 0.0, 0.0), &config), None);
        assert_eq!(
            next_mode(&LocomotionMode::Turning(turn), &signals(0.1, 0.0, 0.0), &config),
            Some(ModeRequest::ManualMovement)
        );
    }

    #[test]
    fn test_aim_release_warps_only_when_fast_and_valid() {
        let config = LocomotionConfig::default();

        assert_eq!(next_mode(&aiming(true), &signals(0.0, 0.5, 30.0), &config), None);
        assert_eq!(
            next_mode(&aiming(true), &signals(0.0, 0.0, 30.0), &config),
            Some(ModeRequest::Warping {
                destination: vec3(0.0, 0.04, -4.0)
            })
        );
        assert_eq!(
            next_mode(&aiming(true), &signals(0.0, 0.0, 5.0), &config),
            Some(ModeRequest::ManualMovement)
        );
        assert_eq!(
            next_mode(&aiming(false), &signals(0.0, 0.0, 30.0), &config),
            Some(ModeRequest::ManualMovement)
        );
    }

    #[test]
    fn test_turn_entry_targets_rotation_about_up() {
        let config = LocomotionConfig::default();
        let mut world = FakeWorld::with_floor();
        let mut feedback = RecordingFeedback::default();

        let mode = enter_mode(
            ModeRequest::Turning { direction: 1.0 },
            &InputSnapshot::default(),
            &config,
            &mut world,
            &mut feedback,
        );
        let LocomotionMode::Turning(turn) = mode else {
            panic!("expected turning, got {:?}", mode);
        };
        assert_quat_near(turn.target, Quaternion::from_angle_y(Deg(45.0)), 1e-6);
        assert_eq!(turn.elapsed, 0.0);
    }

    #[test]
    fn test_warp_entry_and_exit_restore_body() {
        let config = LocomotionConfig::default();
        let mut world = FakeWorld::with_floor();
        let mut feedback = RecordingFeedback::default();
        let destination = vec3(0.0, 0.04, -3.0);

        let mode = enter_mode(
            ModeRequest::Warping { destination },
            &InputSnapshot::default(),
            &config,
            &mut world,
            &mut feedback,
        );
        assert!(!world.collisions_enabled());
        assert!(!world.gravity_enabled());
        assert_vec_near(world.velocity(), vec3(0.0, 0.04, -3.0) / 0.3, 1e-5);

        exit_mode(&mode, &mut world, &mut feedback);
        assert_eq!(world.position(), destination);
        assert_eq!(world.velocity(), vec3(0.0, 0.0, 0.0));
        assert!(world.collisions_enabled());
        assert!(world.gravity_enabled());
    }

    #[test]
    fn test_aim_entry_and_exit_toggle_visuals() {
        let config = LocomotionConfig::default();
        let mut world = FakeWorld::with_floor();
        world.position = vec3(1.0, 0.0, 1.0);
        let mut feedback = RecordingFeedback::default();

        let mode = enter_mode(
            ModeRequest::AimingTeleport,
            &InputSnapshot::default().with_steering(0.0, 0.7),
            &config,
            &mut world,
            &mut feedback,
        );
        assert!(feedback.marker_visible && feedback.path_visible);
        assert_eq!(feedback.marker_position, Some(vec3(1.0, 0.0, 1.0)));
        let LocomotionMode::AimingTeleport(aim) = mode else {
            panic!("expected aiming, got {:?}", mode);
        };
        assert_eq!(aim.last_steering, Vector2::new(0.0, 0.7));

        exit_mode(&mode, &mut world, &mut feedback);
        assert!(!feedback.marker_visible && !feedback.path_visible);
    }
}
