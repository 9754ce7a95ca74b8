//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod system;

pub use bridge::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MdshellConfig {
    pub bridge: BridgeConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}
