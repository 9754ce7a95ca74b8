use std::fs;

use mdshell_common::PlatformError;

use super::resolve::{config_dir, data_dir, tools_dir};

/// Creates the config, data and tools directories if missing.
pub fn ensure_dirs() -> Result<(), PlatformError> {
    for dir in [config_dir()?, data_dir()?, tools_dir()?] {
        fs::create_dir_all(&dir).map_err(|e| PlatformError::file(dir, e))?;
    }
    Ok(())
}
