//! `commandExists` capability: look up executables on `PATH`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

#[derive(Debug, Clone, Default)]
pub struct CommandProbe {
    /// Search path override; `None` reads `PATH` on every lookup.
    search_path: Option<OsString>,
}

impl CommandProbe {
    pub fn new() -> Self {
        Self { search_path: None }
    }

    /// Probe a fixed search path instead of the process `PATH`.
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(path.into()),
        }
    }

    /// Whether an executable called `command` is reachable.
    pub fn exists(&self, command: &str) -> bool {
        let found = self.locate(command).is_some();
        debug!(command, found, "command lookup");
        found
    }

    /// Full path of the first matching executable.
    pub fn locate(&self, command: &str) -> Option<PathBuf> {
        if command.is_empty() {
            return None;
        }
        if command.contains(['/', '\\']) {
            let path = Path::new(command);
            return is_executable(path).then(|| path.to_path_buf());
        }

        let search_path = match &self.search_path {
            Some(p) => p.clone(),
            None => match std::env::var_os("PATH") {
                Some(p) => p,
                None => {
                    error!(command, "command lookup failed: PATH is not set");
                    return None;
                }
            },
        };

        std::env::split_paths(&search_path)
            .flat_map(|dir| candidates(&dir, command))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, command: &str) -> Vec<PathBuf> {
    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".into());
    let with_ext = exts
        .split(';')
        .filter(|e| !e.is_empty())
        .map(|e| dir.join(format!("{command}{e}")));
    std::iter::once(dir.join(command)).chain(with_ext).collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, command: &str) -> Vec<PathBuf> {
    vec![dir.join(command)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
