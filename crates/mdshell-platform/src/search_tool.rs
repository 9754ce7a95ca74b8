//! Locating the search tool (`rg`) handed to the UI as `rgPath`.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::command::CommandProbe;
use crate::paths::tools_dir;

#[cfg(windows)]
const SEARCH_TOOL_BIN: &str = "rg.exe";
#[cfg(not(windows))]
const SEARCH_TOOL_BIN: &str = "rg";

/// Resolve the search tool location.
///
/// Order: explicit override, the bundled copy in the tools directory, then
/// `PATH`. Falls back to the bundled location even if it does not exist so
/// the UI still gets a stable value to report in its errors.
pub fn resolve_search_tool(override_path: Option<&Path>, probe: &CommandProbe) -> PathBuf {
    if let Some(path) = override_path {
        debug!(path = %path.display(), "search tool: using configured path");
        return path.to_path_buf();
    }

    let bundled = tools_dir().ok().map(|dir| dir.join(SEARCH_TOOL_BIN));
    if let Some(path) = bundled.as_ref().filter(|p| p.is_file()) {
        debug!(path = %path.display(), "search tool: using bundled copy");
        return path.clone();
    }

    if let Some(path) = probe.locate("rg") {
        debug!(path = %path.display(), "search tool: found on PATH");
        return path;
    }

    warn!("search tool not found; search in folders will be unavailable");
    bundled.unwrap_or_else(|| PathBuf::from(SEARCH_TOOL_BIN))
}
