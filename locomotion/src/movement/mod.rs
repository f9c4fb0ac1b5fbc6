pub mod mode;
pub mod state_machine;

pub use mode::{AimData, LocomotionMode, ModeKind, ModeRequest, TurnData, WarpData};
pub use state_machine::LocomotionStateMachine;
