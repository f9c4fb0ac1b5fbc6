// Input snapshot handed to the locomotion rig once per tick.
// The runtime fills this from whatever device layer it has; axes are in [-1, 1],
// with +x to the right and +y away from the player on both sticks.

use cgmath::{Quaternion, Vector2, Vector3, Zero};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSnapshot {
    /// Walk direction, relative to the head's heading
    pub movement: Vector2<f32>,
    /// Snap-turn on x, teleport aim on y
    pub steering: Vector2<f32>,
    /// Raw jump button level; edges are derived by [`EdgeTrigger`]
    pub jump_pressed: bool,
    /// Reference heading for walking
    pub head_rotation: Quaternion<f32>,
    /// Pose the teleport arc launches from (usually the aiming controller)
    pub aim: AimPose,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        InputSnapshot {
            movement: Vector2::zero(),
            steering: Vector2::zero(),
            jump_pressed: false,
            head_rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            aim: AimPose::default(),
        }
    }
}

impl InputSnapshot {
    pub fn with_steering(mut self, x: f32, y: f32) -> Self {
        self.steering = Vector2::new(x, y);
        self
    }

    pub fn with_movement(mut self, x: f32, y: f32) -> Self {
        self.movement = Vector2::new(x, y);
        self
    }

    pub fn with_jump(mut self, pressed: bool) -> Self {
        self.jump_pressed = pressed;
        self
    }

    pub fn with_aim(mut self, position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        self.aim = AimPose { position, rotation };
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AimPose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Default for AimPose {
    fn default() -> Self {
        AimPose {
            position: Vector3::zero(),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Turns a held button level into a single latched press.
///
/// `observe` runs on every frame; `consume` is called by whoever acts on the
/// press (the physics tick for jumping). A press observed on several frames
/// before a physics tick still yields one jump.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeTrigger {
    previous: bool,
    latched: bool,
}

impl EdgeTrigger {
    /// Returns true on the frame the level goes from released to pressed.
    pub fn observe(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.previous;
        self.previous = pressed;
        if rising {
            self.latched = true;
        }
        rising
    }

    #[cfg(test)]
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn consume(&mut self) -> bool {
        std::mem::replace(&mut self.latched, false)
    }

    /// Drops a pending press without forgetting the current level, so a held
    /// button does not fire again.
    pub fn clear(&mut self) {
        self.latched = false;
    }
}

/// Speed of the stick's y axis in units per second; zero when no time passed.
pub fn stick_speed(previous: Vector2<f32>, current: Vector2<f32>, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    ((current.y - previous.y) / dt).abs()
}
