use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    /// Unknown value for `BEACON_LOG_FORMAT` or [`LoggerConfig::format`](crate::LoggerConfig).
    #[error("invalid log format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),
    #[error("journald output needs Linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
    #[error("logger initialization failed: {0}")]
    InitializationFailed(String),
    /// Not a valid `EnvFilter` directive.
    #[error("invalid log filter: {0}")]
    InvalidLogLevel(String),
}
