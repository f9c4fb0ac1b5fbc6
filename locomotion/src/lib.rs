//! Comfort locomotion for a VR rig: stick walking, snap turning and
//! aim-and-release teleporting, plus the aim path geometry that goes with it.
//!
//! The crate never integrates physics itself. Callers implement
//! [`physics::SceneQuery`] and [`physics::PlayerBody`] (or use
//! [`physics::RapierLocomotionWorld`]) and drive a [`LocomotionRig`] once per
//! fixed physics tick and once per rendered frame.

pub mod config;
pub mod error;
pub mod input_context;
pub mod movement;
pub mod path;
pub mod physics;
pub mod rig;
pub mod teleport;
pub mod util;

pub use config::LocomotionConfig;
pub use error::{LocomotionError, Result};
pub use input_context::{AimPose, InputSnapshot};
pub use movement::{LocomotionStateMachine, ModeKind};
pub use rig::{LocomotionRig, LocomotionRigBuilder};
