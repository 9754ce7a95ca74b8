//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive for the mdshell crates.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Trace => "mdshell=trace",
            Self::Debug => "mdshell=debug",
            Self::Info => "mdshell=info",
            Self::Warn => "mdshell=warn",
            Self::Error => "mdshell=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
