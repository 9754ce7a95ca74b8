//! Configuration for the mdshell messaging bridge.
//!
//! TOML-based, with serde defaults on every section so partial files
//! work out of the box.
//!
//! ```rust,no_run
//! use mdshell_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("isolation: {}", config.bridge.context_isolation);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BridgeConfig, LogLevel, LoggingConfig, MdshellConfig, RelayConfig,
};
pub use toml_loader::{load_default, load_from_path};

use mdshell_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<MdshellConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &MdshellConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&MdshellConfig::default());
        assert!(json.contains("\"bridge\""));
        assert!(json.contains("\"relay\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"context_isolation\": true"));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&MdshellConfig::default());
        let parsed: MdshellConfig = serde_json::from_str(&json).unwrap();
        assert!(parsed.bridge.context_isolation);
        assert_eq!(parsed.bridge.exposed.len(), 5);
        assert_eq!(parsed.logging.level, LogLevel::Info);
    }
}
