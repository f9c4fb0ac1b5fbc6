// Teleport aiming support: deciding whether a landing spot is usable and
// telling the presentation layer what to show while aiming.

pub mod destination;
pub mod teleport_ui;

pub use destination::{DestinationCheck, DestinationVerdict};
pub use teleport_ui::{PathAppearance, RecordingFeedback, TeleportFeedback, TeleportVisualStyle};
