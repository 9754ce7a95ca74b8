//! The closed set of capability objects the preload context hands to the UI.

mod host;
mod set;

pub use host::{HostApi, RendererLog};
pub use set::CapabilitySet;

use std::path::PathBuf;

use mdshell_common::CapabilityName;
use mdshell_platform::{CommandProbe, FileUtils, PathUtils, MARKDOWN_INCLUSIONS};
use serde_json::{json, Value};

// =============================================================================
// OPERATION TABLES
// =============================================================================

const BRIDGE_OPERATIONS: &[&str] = &[
    "shell.openExternal",
    "shell.openPath",
    "shell.showItemInFolder",
    "clipboard.readText",
    "clipboard.writeText",
    "log.debug",
    "log.info",
    "log.warn",
    "log.error",
];

const FILE_UTILS_OPERATIONS: &[&str] = &[
    "isFile",
    "isDirectory",
    "pathExistsSync",
    "ensureDirSync",
    "isChildOfDirectory",
    "hasMarkdownExtension",
    "isImageFile",
    "isSamePathSync",
    "emptyDir",
    "copy",
    "ensureDir",
    "outputFile",
    "move",
    "stat",
    "writeFile",
    "readFile",
];

const PATH_OPERATIONS: &[&str] = &[
    "join",
    "dirname",
    "basename",
    "extname",
    "normalize",
    "isAbsolute",
];

const COMMAND_EXISTS_OPERATIONS: &[&str] = &["exists"];

/// Callable operations of a capability, as the UI names them.
///
/// `rgPath` is a plain value and has none.
pub const fn operations(name: CapabilityName) -> &'static [&'static str] {
    match name {
        CapabilityName::Bridge => BRIDGE_OPERATIONS,
        CapabilityName::FileUtils => FILE_UTILS_OPERATIONS,
        CapabilityName::Path => PATH_OPERATIONS,
        CapabilityName::RgPath => &[],
        CapabilityName::CommandExists => COMMAND_EXISTS_OPERATIONS,
    }
}

// =============================================================================
// CAPABILITY
// =============================================================================

/// One exposed capability object.
#[derive(Debug, Clone)]
pub enum Capability {
    Bridge(HostApi),
    FileUtils(FileUtils),
    Path(PathUtils),
    RgPath(PathBuf),
    CommandExists(CommandProbe),
}

impl Capability {
    pub fn name(&self) -> CapabilityName {
        match self {
            Self::Bridge(_) => CapabilityName::Bridge,
            Self::FileUtils(_) => CapabilityName::FileUtils,
            Self::Path(_) => CapabilityName::Path,
            Self::RgPath(_) => CapabilityName::RgPath,
            Self::CommandExists(_) => CapabilityName::CommandExists,
        }
    }

    pub fn operations(&self) -> &'static [&'static str] {
        operations(self.name())
    }

    /// Data members that travel with the capability instead of being called.
    pub fn constants(&self) -> Vec<(&'static str, Value)> {
        match self {
            Self::FileUtils(_) => vec![("MARKDOWN_INCLUSIONS", json!(MARKDOWN_INCLUSIONS))],
            Self::Path(p) => vec![("sep", json!(p.sep()))],
            Self::Bridge(_) | Self::RgPath(_) | Self::CommandExists(_) => Vec::new(),
        }
    }

    /// The capability itself as a value, for capabilities that are one.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::RgPath(path) => Some(Value::String(path.to_string_lossy().into_owned())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_maps_back_from_its_capability() {
        let caps = [
            Capability::Bridge(HostApi::default()),
            Capability::FileUtils(FileUtils::new()),
            Capability::Path(PathUtils::new()),
            Capability::RgPath(PathBuf::from("/usr/bin/rg")),
            Capability::CommandExists(CommandProbe::new()),
        ];
        let names: Vec<_> = caps.iter().map(Capability::name).collect();
        assert_eq!(names, CapabilityName::ALL.to_vec());
    }

    #[test]
    fn rg_path_is_a_value_without_operations() {
        let cap = Capability::RgPath(PathBuf::from("/usr/bin/rg"));
        assert!(cap.operations().is_empty());
        assert_eq!(cap.as_value(), Some(json!("/usr/bin/rg")));
    }

    #[test]
    fn operation_names_are_unique_per_capability() {
        for name in CapabilityName::ALL {
            let ops = operations(name);
            let mut sorted = ops.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), ops.len(), "{name}");
        }
    }

    #[test]
    fn path_carries_separator_constant() {
        let constants = Capability::Path(PathUtils::new()).constants();
        assert_eq!(constants.len(), 1);
        assert_eq!(constants[0].0, "sep");
        assert!(constants[0].1.is_string());
    }
}
