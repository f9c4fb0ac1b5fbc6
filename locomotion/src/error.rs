use std::fmt;
use std::io;

/// Startup failures. Nothing in the per-tick path returns an error.
#[derive(Debug)]
pub enum LocomotionError {
    /// A collaborator the rig cannot run without was never provided
    MissingCollaborator { name: &'static str },

    /// A configuration value is out of its usable range
    InvalidConfig { field: &'static str, reason: String },

    /// Configuration text could not be parsed
    ConfigParse { source: serde_json::Error },

    /// Configuration file could not be read
    Io { path: String, source: io::Error },
}

impl LocomotionError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LocomotionError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LocomotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocomotionError::MissingCollaborator { name } => {
                write!(f, "Missing required collaborator '{}'", name)
            }
            LocomotionError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            LocomotionError::ConfigParse { source } => {
                write!(f, "Unable to parse configuration: {}", source)
            }
            LocomotionError::Io { path, source } => {
                write!(f, "Unable to read '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for LocomotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocomotionError::ConfigParse { source } => Some(source),
            LocomotionError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LocomotionError {
    fn from(source: serde_json::Error) -> Self {
        LocomotionError::ConfigParse { source }
    }
}

pub type Result<T> = std::result::Result<T, LocomotionError>;
