use cgmath::Vector3;
use engine::locomotion_log;

use crate::config::LocomotionConfig;
use crate::physics::SceneQuery;
use crate::util::{UP, angle_between_degrees};

/// Why a landing spot was accepted or rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DestinationVerdict {
    Valid,
    TooSteep { slope_degrees: f32 },
    TooFarVertically { distance: f32 },
    /// The player's capsule would not fit at the landing spot
    Obstructed,
}

impl DestinationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, DestinationVerdict::Valid)
    }
}

/// Landing rules for a teleport destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DestinationCheck {
    pub max_slope_degrees: f32,
    pub max_vertical_travel: f32,
    pub marker_y_offset: f32,
    pub capsule_radius: f32,
    pub capsule_height: f32,
}

impl DestinationCheck {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        DestinationCheck {
            max_slope_degrees: config.teleport.max_slope_degrees,
            max_vertical_travel: config.teleport.max_vertical_travel,
            marker_y_offset: config.teleport.marker_y_offset,
            capsule_radius: config.player.capsule_radius,
            capsule_height: config.player.capsule_height,
        }
    }

    /// Where the marker (and the player's feet after warping) ends up for a landing point.
    pub fn marker_position(&self, landing: Vector3<f32>) -> Vector3<f32> {
        landing + UP * self.marker_y_offset
    }

    /// Judge a landing point with surface `normal` for a player currently
    /// standing at `player_position`.
    pub fn evaluate<Q: SceneQuery + ?Sized>(
        &self,
        landing: Vector3<f32>,
        normal: Vector3<f32>,
        player_position: Vector3<f32>,
        scene: &Q,
    ) -> DestinationVerdict {
        // A zero normal (ray started inside geometry) is treated as a wall
        let slope_degrees = angle_between_degrees(normal, UP).unwrap_or(90.0);
        if slope_degrees > self.max_slope_degrees {
            return DestinationVerdict::TooSteep { slope_degrees };
        }

        let distance = (landing.y - player_position.y).abs();
        if distance > self.max_vertical_travel {
            return DestinationVerdict::TooFarVertically { distance };
        }

        let bottom = landing + UP * (self.marker_y_offset + self.capsule_radius);
        let top = bottom + UP * (self.capsule_height - 2.0 * self.capsule_radius);
        if scene.capsule_overlap(bottom, top, self.capsule_radius) {
            locomotion_log!(TRACE, x = landing.x, y = landing.y, z = landing.z, "landing obstructed");
            return DestinationVerdict::Obstructed;
        }

        DestinationVerdict::Valid
    }
}
