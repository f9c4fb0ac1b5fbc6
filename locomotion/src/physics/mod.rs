// Collaborators the locomotion core talks to. The core never integrates
// physics itself: it reads and writes the player body and asks the scene
// questions, then lets the owning runtime step the simulation.

pub mod rapier_world;
pub mod util;

#[cfg(test)]
pub(crate) mod fake;

pub use rapier_world::{RapierLocomotionWorld, StaticShape};

use cgmath::{Quaternion, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineHit {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
}

/// Ray/line and overlap queries against static level geometry. Implementations
/// must never report the player's own collider.
pub trait SceneQuery {
    /// First obstruction along the segment `from -> to`, if any.
    fn line_cast(&self, from: Vector3<f32>, to: Vector3<f32>) -> Option<LineHit>;

    /// Whether any solid overlaps the capsule spanning the two hemisphere centres.
    fn capsule_overlap(&self, bottom: Vector3<f32>, top: Vector3<f32>, radius: f32) -> bool;
}

/// The player's rigid body. `position` is the feet position.
pub trait PlayerBody {
    fn position(&self) -> Vector3<f32>;
    fn set_position(&mut self, position: Vector3<f32>);

    fn rotation(&self) -> Quaternion<f32>;
    fn set_rotation(&mut self, rotation: Quaternion<f32>);

    fn velocity(&self) -> Vector3<f32>;
    fn set_velocity(&mut self, velocity: Vector3<f32>);

    /// Instant velocity change, independent of mass.
    fn apply_velocity_change(&mut self, delta: Vector3<f32>) {
        let velocity = self.velocity();
        self.set_velocity(velocity + delta);
    }

    fn collisions_enabled(&self) -> bool;
    fn set_collisions_enabled(&mut self, enabled: bool);

    fn gravity_enabled(&self) -> bool;
    fn set_gravity_enabled(&mut self, enabled: bool);
}

/// Everything a locomotion tick needs from the physics side.
pub trait LocomotionWorld: SceneQuery + PlayerBody {}

impl<T: SceneQuery + PlayerBody + ?Sized> LocomotionWorld for T {}
