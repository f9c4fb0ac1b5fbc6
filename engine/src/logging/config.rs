use std::collections::HashMap;
use std::fmt;
use tracing::Level;

/// Per-scope verbosity, parsed from strings like `"warn,locomotion=debug,mesh=trace"`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        match std::env::var(env_var_name) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::new(),
        }
    }

    /// Unknown levels are skipped rather than failing the whole string, so a typo
    /// in one scope does not silence the others.
    pub fn parse(config_str: &str) -> Self {
        let mut config = Self::new();

        for entry in config_str.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match entry.split_once('=') {
                Some((scope, level)) => {
                    if let Ok(level) = parse_level(level.trim()) {
                        config.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Ok(level) = parse_level(entry) {
                        config.global_level = level;
                    }
                }
            }
        }

        config
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        let target_level = self.scope_levels.get(scope).unwrap_or(&self.global_level);
        level <= *target_level
    }

    pub fn global_level(&self) -> Level {
        self.global_level
    }

    pub fn scope_level(&self, scope: &str) -> Option<Level> {
        self.scope_levels.get(scope).copied()
    }

    #[cfg(test)]
    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_level(level_str: &str) -> Result<Level, ParseLevelError> {
    match level_str.to_ascii_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(ParseLevelError(level_str.to_string())),
    }
}

/// Install the tracing subscriber (honouring `RUST_LOG`) and the scoped config read
/// from `env_var_name`, e.g. `init_logging("LOCOMOTION_LOG")`.
pub fn init_logging(env_var_name: &str) -> LogConfig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = LogConfig::from_env(env_var_name);
    super::install_log_config(config.clone());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_level() {
        let config = LogConfig::parse("debug");
        assert_eq!(config.global_level(), Level::DEBUG);
    }

    #[test]
    fn test_parse_scope_levels() {
        let config = LogConfig::parse("warn, locomotion=debug ,trajectory=trace");

        assert_eq!(config.global_level(), Level::WARN);
        assert_eq!(config.scope_level("locomotion"), Some(Level::DEBUG));
        assert_eq!(config.scope_level("trajectory"), Some(Level::TRACE));
        assert_eq!(config.scope_level("mesh"), None);
    }

    #[test]
    fn test_unknown_level_is_skipped() {
        let config = LogConfig::parse("info,mesh=loud");
        assert_eq!(config.global_level(), Level::INFO);
        assert_eq!(config.scope_level("mesh"), None);
        assert_eq!(
            parse_level("loud"),
            Err(ParseLevelError("loud".to_string()))
        );
    }

    #[test]
    fn test_should_log() {
        let mut config = LogConfig::new();
        config.set_scope_level("physics", Level::DEBUG);

        assert!(config.should_log("input", Level::ERROR));
        assert!(config.should_log("input", Level::WARN));
        assert!(!config.should_log("input", Level::INFO));

        assert!(config.should_log("physics", Level::DEBUG));
        assert!(!config.should_log("physics", Level::TRACE));
    }
}
