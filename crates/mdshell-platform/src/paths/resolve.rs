use std::path::PathBuf;

use mdshell_common::PlatformError;

pub(super) const APP_NAME: &str = "mdshell";

/// Returns the platform-specific configuration directory.
///
/// - macOS: `~/Library/Application Support/mdshell`
/// - Linux: `$XDG_CONFIG_HOME/mdshell` (defaults to `~/.config/mdshell`)
/// - Windows: `%APPDATA%\mdshell`
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine config directory".into()))?
        .join(APP_NAME))
}

/// Returns the platform-specific data directory.
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| PlatformError::PathError("could not determine data directory".into()))?
        .join(APP_NAME))
}

/// Returns the path to the main configuration file.
pub fn config_file() -> Result<PathBuf, PlatformError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory holding bundled helper binaries (the search tool).
pub fn tools_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("bin"))
}
