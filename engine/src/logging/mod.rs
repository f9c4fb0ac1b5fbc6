//! Scoped logging on top of `tracing`.
//!
//! Each subsystem logs under a short scope name. The per-scope verbosity is read
//! once from an environment variable (see [`init_logging`]) and consulted by the
//! `*_log!` macros before anything reaches the subscriber.

pub mod config;
pub mod macros;

pub use config::{init_logging, LogConfig, ParseLevelError};
pub use tracing::{debug, error, info, trace, warn, Level};

use once_cell::sync::Lazy;
use std::sync::OnceLock;

pub const SCOPE_LOCOMOTION: &str = "locomotion";
pub const SCOPE_TRAJECTORY: &str = "trajectory";
pub const SCOPE_MESH: &str = "mesh";
pub const SCOPE_INPUT: &str = "input";
pub const SCOPE_PHYSICS: &str = "physics";

static ACTIVE_CONFIG: OnceLock<LogConfig> = OnceLock::new();
static FALLBACK_CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::default);

/// The config installed by [`init_logging`], or the default (`warn` everywhere).
pub fn get_log_config() -> &'static LogConfig {
    ACTIVE_CONFIG.get().unwrap_or(&FALLBACK_CONFIG)
}

pub fn is_enabled(scope: &str, level: Level) -> bool {
    get_log_config().should_log(scope, level)
}

// First install wins; later calls are ignored so tests can call init freely.
pub(crate) fn install_log_config(config: LogConfig) -> bool {
    ACTIVE_CONFIG.set(config).is_ok()
}
