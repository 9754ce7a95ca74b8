//! Desktop shell integration: open URLs and files with the system handler.

use std::path::Path;

use mdshell_common::PlatformError;
use tracing::info;

/// URL schemes `open_external` will hand to the system.
const ALLOWED_EXTERNAL_SCHEMES: &[&str] = &["https://", "http://", "mailto:"];

#[derive(Debug, Clone, Copy, Default)]
pub struct Shell;

/// Check whether a URL may be opened externally.
pub fn is_external_url_allowed(url: &str) -> bool {
    ALLOWED_EXTERNAL_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

impl Shell {
    pub fn new() -> Self {
        Self
    }

    /// Open a web or mail link in the default application.
    pub fn open_external(&self, url: &str) -> Result<(), PlatformError> {
        if !is_external_url_allowed(url) {
            return Err(PlatformError::ShellError(format!(
                "refusing to open url with unsupported scheme: {url}"
            )));
        }
        info!(url, "opening external url");
        open::that_detached(url)
            .map_err(|e| PlatformError::ShellError(format!("open-external failed: {e}")))
    }

    /// Open a file or directory with its default application.
    pub fn open_path(&self, path: &Path) -> Result<(), PlatformError> {
        require_existing(path)?;
        info!(path = %path.display(), "opening path");
        open::that_detached(path)
            .map_err(|e| PlatformError::ShellError(format!("open-path failed: {e}")))
    }

    /// Reveal a file in the platform file manager.
    pub fn show_item_in_folder(&self, path: &Path) -> Result<(), PlatformError> {
        require_existing(path)?;
        info!(path = %path.display(), "revealing item in folder");
        reveal(path)
    }
}

fn require_existing(path: &Path) -> Result<(), PlatformError> {
    if path.exists() {
        Ok(())
    } else {
        Err(PlatformError::PathError(format!(
            "path does not exist: {}",
            path.display()
        )))
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn spawn_reveal(mut cmd: std::process::Command) -> Result<(), PlatformError> {
    cmd.spawn()
        .map(drop)
        .map_err(|e| PlatformError::ShellError(format!("reveal failed: {e}")))
}

#[cfg(target_os = "macos")]
fn reveal(path: &Path) -> Result<(), PlatformError> {
    let mut cmd = std::process::Command::new("open");
    cmd.arg("-R").arg(path);
    spawn_reveal(cmd)
}

#[cfg(target_os = "windows")]
fn reveal(path: &Path) -> Result<(), PlatformError> {
    let mut arg = std::ffi::OsString::from("/select,");
    arg.push(path.as_os_str());
    let mut cmd = std::process::Command::new("explorer");
    cmd.arg(arg);
    spawn_reveal(cmd)
}

/// Directory shown when the platform cannot select a single item.
pub fn reveal_target(path: &Path) -> &Path {
    if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn reveal(path: &Path) -> Result<(), PlatformError> {
    open::that_detached(reveal_target(path))
        .map_err(|e| PlatformError::ShellError(format!("reveal failed: {e}")))
}
