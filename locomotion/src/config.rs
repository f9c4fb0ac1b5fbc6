use std::path::Path;

use cgmath::{Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::error::{LocomotionError, Result};

/// Tuning for every locomotion mode, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub movement: MovementConfig,
    pub turn: TurnConfig,
    pub teleport: TeleportConfig,
    pub trajectory: TrajectoryConfig,
    pub ribbon: RibbonConfig,
    pub bezier: BezierConfig,
    pub player: PlayerConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_speed: f32,
    /// Upper bound on the horizontal velocity change applied in one physics tick
    pub max_velocity_change: f32,
    pub jump_velocity: f32,
    /// Ground probe starts this far above the feet and reaches twice as far down
    pub jump_probe_distance: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            max_velocity_change: 12.0,
            jump_velocity: 6.0,
            jump_probe_distance: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    pub turn_time: f32,
    pub turn_amount_degrees: f32,
    /// Steering magnitude that starts a snap-turn or teleport aim
    pub stick_threshold: f32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            turn_time: 0.1,
            turn_amount_degrees: 45.0,
            stick_threshold: 0.5,
        }
    }
}

/// Which generator draws the aim path while aiming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    #[default]
    Ballistic,
    Bezier,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    pub warp_stick_y_threshold: f32,
    pub warp_stick_speed_threshold: f32,
    pub warp_time: f32,
    pub marker_y_offset: f32,
    pub max_vertical_travel: f32,
    pub max_slope_degrees: f32,
    pub path_style: PathStyle,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            warp_stick_y_threshold: 0.4,
            warp_stick_speed_threshold: 20.0,
            warp_time: 0.3,
            marker_y_offset: 0.04,
            max_vertical_travel: 1.1,
            max_slope_degrees: 30.0,
            path_style: PathStyle::Ballistic,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    pub launch_speed: f32,
    /// Number of samples along the arc, launch point included
    pub resolution: usize,
    pub gravity: f32,
    /// Height the arc is allowed to fall to before flight time runs out
    pub floor_height: f32,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            launch_speed: 10.0,
            resolution: 16,
            gravity: 9.81,
            floor_height: -1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonConfig {
    pub width: f32,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self { width: 0.1 }
    }
}

/// Control point offsets are expressed along (right, up, forward) of the anchor
/// frame for the start/end points, and along (right, up, flattened direction)
/// for the two inner control points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BezierConfig {
    pub segments: usize,
    pub start_offset: Vector3<f32>,
    pub start_control: Vector3<f32>,
    pub end_control: Vector3<f32>,
    pub end_offset: Vector3<f32>,
    pub initial_endpoint: Vector3<f32>,
}

impl Default for BezierConfig {
    fn default() -> Self {
        Self {
            segments: 16,
            start_offset: vec3(0.0, 0.0, 0.0),
            start_control: vec3(0.0, 1.0, 1.0),
            end_control: vec3(0.0, 1.0, -1.0),
            end_offset: vec3(0.0, 0.0, 0.0),
            initial_endpoint: vec3(0.0, 0.0, -6.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub capsule_radius: f32,
    /// Total capsule height, hemispheres included
    pub capsule_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            capsule_radius: 0.3,
            capsule_height: 1.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub fixed_timestep: f32,
    pub max_ticks_per_frame: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 90.0,
            max_ticks_per_frame: 8,
        }
    }
}

impl LocomotionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LocomotionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LocomotionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make a mode divide by zero or never finish.
    pub fn validate(&self) -> Result<()> {
        positive("movement.move_speed", self.movement.move_speed)?;
        positive("movement.max_velocity_change", self.movement.max_velocity_change)?;
        non_negative("movement.jump_velocity", self.movement.jump_velocity)?;
        positive("movement.jump_probe_distance", self.movement.jump_probe_distance)?;

        positive("turn.turn_time", self.turn.turn_time)?;
        unit_interval("turn.stick_threshold", self.turn.stick_threshold)?;

        unit_interval(
            "teleport.warp_stick_y_threshold",
            self.teleport.warp_stick_y_threshold,
        )?;
        non_negative(
            "teleport.warp_stick_speed_threshold",
            self.teleport.warp_stick_speed_threshold,
        )?;
        positive("teleport.warp_time", self.teleport.warp_time)?;
        non_negative("teleport.max_vertical_travel", self.teleport.max_vertical_travel)?;
        if !(0.0..=90.0).contains(&self.teleport.max_slope_degrees) {
            return Err(LocomotionError::invalid(
                "teleport.max_slope_degrees",
                "must be between 0 and 90",
            ));
        }

        positive("trajectory.launch_speed", self.trajectory.launch_speed)?;
        positive("trajectory.gravity", self.trajectory.gravity)?;
        if self.trajectory.resolution < 2 {
            return Err(LocomotionError::invalid(
                "trajectory.resolution",
                "needs at least 2 samples",
            ));
        }

        positive("ribbon.width", self.ribbon.width)?;
        if self.bezier.segments == 0 {
            return Err(LocomotionError::invalid(
                "bezier.segments",
                "needs at least 1 segment",
            ));
        }

        positive("player.capsule_radius", self.player.capsule_radius)?;
        if self.player.capsule_height < 2.0 * self.player.capsule_radius {
            return Err(LocomotionError::invalid(
                "player.capsule_height",
                "must be at least twice the capsule radius",
            ));
        }

        positive("scheduler.fixed_timestep", self.scheduler.fixed_timestep)?;
        if self.scheduler.max_ticks_per_frame == 0 {
            return Err(LocomotionError::invalid(
                "scheduler.max_ticks_per_frame",
                "must allow at least one tick",
            ));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LocomotionError::invalid(field, format!("must be positive, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LocomotionError::invalid(field, format!("must not be negative, got {}", value)))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LocomotionError::invalid(field, format!("must be within [0, 1], got {}", value)))
    }
}
