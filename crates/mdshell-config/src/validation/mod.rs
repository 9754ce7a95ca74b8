//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` instead of stopping
//! at the first one. Unknown capability names and log levels are already
//! rejected when the TOML is parsed; this covers what parses but is wrong.


use std::collections::HashSet;

use crate::schema::MdshellConfig;
use mdshell_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &MdshellConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_exposed(&mut errors, config);
    validate_search_tool(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_exposed(errors: &mut Vec<String>, config: &MdshellConfig) {
    let mut seen = HashSet::new();
    for name in &config.bridge.exposed {
        if !seen.insert(*name) {
            errors.push(format!("bridge.exposed lists '{name}' more than once"));
        }
    }
}

fn validate_search_tool(errors: &mut Vec<String>, config: &MdshellConfig) {
    if let Some(path) = &config.bridge.search_tool_path {
        if path.as_os_str().is_empty() {
            errors.push("bridge.search_tool_path is empty".into());
        } else if !path.is_absolute() {
            errors.push(format!(
                "bridge.search_tool_path must be absolute, got {}",
                path.display()
            ));
        }
    }
}
