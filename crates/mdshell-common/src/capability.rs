use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of global names the preload context exposes to the UI.
///
/// The set is closed: nothing registers extra names at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityName {
    /// Host API: IPC shim, shell, clipboard and logging.
    #[serde(rename = "bridge")]
    Bridge,
    #[serde(rename = "fileUtils")]
    FileUtils,
    #[serde(rename = "path")]
    Path,
    /// Location of the bundled search tool.
    #[serde(rename = "rgPath")]
    RgPath,
    #[serde(rename = "commandExists")]
    CommandExists,
}

impl CapabilityName {
    pub const ALL: [CapabilityName; 5] = [
        Self::Bridge,
        Self::FileUtils,
        Self::Path,
        Self::RgPath,
        Self::CommandExists,
    ];

    /// Name under which the capability appears in the UI global namespace.
    pub const fn global_name(self) -> &'static str {
        match self {
            Self::Bridge => "bridge",
            Self::FileUtils => "fileUtils",
            Self::Path => "path",
            Self::RgPath => "rgPath",
            Self::CommandExists => "commandExists",
        }
    }

    pub fn from_global_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.global_name() == name)
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.global_name())
    }
}
