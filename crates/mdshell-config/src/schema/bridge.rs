//! Bridge and relay configuration.

use std::path::PathBuf;

use mdshell_common::CapabilityName;
use serde::{Deserialize, Serialize};

/// Capability exposure settings for the preload context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Whether the host runs the UI with context isolation. Read once at startup.
    pub context_isolation: bool,
    /// Capabilities to expose. Anything not listed stays unavailable.
    pub exposed: Vec<CapabilityName>,
    /// Explicit location of the search tool, bypassing lookup.
    pub search_tool_path: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            context_isolation: true,
            exposed: CapabilityName::ALL.to_vec(),
            search_tool_path: None,
        }
    }
}

impl BridgeConfig {
    pub fn exposes(&self, name: CapabilityName) -> bool {
        self.exposed.contains(&name)
    }
}

/// Message relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Log a warning when a send targets a destroyed endpoint (debug level otherwise).
    pub log_dropped_sends: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            log_dropped_sends: true,
        }
    }
}
