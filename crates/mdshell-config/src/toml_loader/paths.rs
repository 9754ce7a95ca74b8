use mdshell_common::ConfigError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "mdshell";
const CONFIG_FILE: &str = "config.toml";

/// `<config dir>/mdshell/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no config directory on this platform".into()))
}

fn io_failure(action: &str, path: &Path, err: io::Error) -> ConfigError {
    ConfigError::ParseError(format!("{action} {}: {err}", path.display()))
}

/// Write the documented default config, creating parent directories.
///
/// The file is written next to its final location and renamed into place so
/// a crash never leaves a half-written config behind.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_failure("cannot create config directory", parent, e))?;
    }

    let staging = path.with_extension("toml.new");
    std::fs::write(&staging, default_config_toml())
        .map_err(|e| io_failure("cannot write", &staging, e))?;
    std::fs::rename(&staging, path).map_err(|e| io_failure("cannot move config into", path, e))?;

    info!(path = %path.display(), "default config written");
    Ok(())
}
