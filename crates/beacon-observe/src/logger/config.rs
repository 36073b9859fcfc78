use std::io::IsTerminal;

use crate::logger::{error::LoggerError, format::LoggerFormat};

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `beacon=debug,warn`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

/// Environment variable holding the `EnvFilter` directive.
pub const ENV_LEVEL: &str = "BEACON_LOG";
/// Environment variable holding the output format.
pub const ENV_FORMAT: &str = "BEACON_LOG_FORMAT";

impl LoggerConfig {
    /// Defaults overridden by [`ENV_FORMAT`] and [`ENV_LEVEL`] when set.
    pub fn from_env() -> Result<Self, LoggerError> {
        let format = std::env::var(ENV_FORMAT).ok();
        let level = std::env::var(ENV_LEVEL).ok();
        Self::default().with_overrides(format.as_deref(), level.as_deref())
    }

    /// Override format and level from their string forms, keeping everything else.
    pub fn with_overrides(
        mut self,
        format: Option<&str>,
        level: Option<&str>,
    ) -> Result<Self, LoggerError> {
        if let Some(format) = format {
            self.format = format.parse()?;
        }
        if let Some(level) = level {
            if level.trim().is_empty() {
                return Err(LoggerError::InvalidLogLevel(level.to_string()));
            }
            self.level = level.trim().to_string();
        }
        Ok(self)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stderr().is_terminal();
        Self {
            format: LoggerFormat::default(),
            level: "info".to_string(),
            with_targets: true,
            use_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_only_when_present() {
        let cfg = LoggerConfig::default()
            .with_overrides(Some("json"), None)
            .unwrap();
        assert_eq!(cfg.format, LoggerFormat::Json);
        assert_eq!(cfg.level, "info");

        let cfg = LoggerConfig::default()
            .with_overrides(None, Some(" beacon=debug "))
            .unwrap();
        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.level, "beacon=debug");
    }

    #[test]
    fn overrides_reject_bad_values() {
        assert!(matches!(
            LoggerConfig::default().with_overrides(Some("yaml"), None),
            Err(LoggerError::InvalidFormat(_))
        ));
        assert!(matches!(
            LoggerConfig::default().with_overrides(None, Some("  ")),
            Err(LoggerError::InvalidLogLevel(_))
        ));
    }
}
