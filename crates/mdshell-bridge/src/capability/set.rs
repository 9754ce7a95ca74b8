use mdshell_common::CapabilityName;
use mdshell_config::BridgeConfig;
use mdshell_platform::{resolve_search_tool, CommandProbe, FileUtils, PathUtils};
use tracing::debug;

use super::{Capability, HostApi};

/// The capabilities chosen at bridge initialization.
///
/// Built once and never mutated; entries keep the order of
/// [`CapabilityName::ALL`] and each name appears at most once.
#[derive(Debug, Clone)]
pub struct CapabilitySet {
    entries: Vec<Capability>,
}

impl CapabilitySet {
    /// The standard set, filtered by `config.exposed`.
    pub fn standard(config: &BridgeConfig) -> Self {
        let probe = CommandProbe::new();
        let entries = CapabilityName::ALL
            .into_iter()
            .filter(|name| config.exposes(*name))
            .map(|name| match name {
                CapabilityName::Bridge => Capability::Bridge(HostApi::new()),
                CapabilityName::FileUtils => Capability::FileUtils(FileUtils::new()),
                CapabilityName::Path => Capability::Path(PathUtils::new()),
                CapabilityName::RgPath => Capability::RgPath(resolve_search_tool(
                    config.search_tool_path.as_deref(),
                    &probe,
                )),
                CapabilityName::CommandExists => Capability::CommandExists(probe.clone()),
            })
            .collect::<Vec<_>>();
        debug!(count = entries.len(), "capability set built");
        Self { entries }
    }

    /// Build a set from explicit capabilities. Later duplicates of a name are ignored.
    pub fn from_capabilities(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        let mut entries: Vec<Capability> = Vec::new();
        for cap in capabilities {
            if entries.iter().all(|e| e.name() != cap.name()) {
                entries.push(cap);
            }
        }
        entries.sort_by_key(|c| CapabilityName::ALL.iter().position(|n| *n == c.name()));
        Self { entries }
    }

    pub fn get(&self, name: CapabilityName) -> Option<&Capability> {
        self.entries.iter().find(|c| c.name() == name)
    }

    pub fn contains(&self, name: CapabilityName) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = CapabilityName> + '_ {
        self.entries.iter().map(Capability::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_rg() -> BridgeConfig {
        BridgeConfig {
            search_tool_path: Some(PathBuf::from("/opt/tools/rg")),
            ..BridgeConfig::default()
        }
    }

    #[test]
    fn standard_set_has_every_capability_in_order() {
        let set = CapabilitySet::standard(&config_with_rg());
        assert_eq!(set.len(), 5);
        assert_eq!(set.names().collect::<Vec<_>>(), CapabilityName::ALL.to_vec());
    }

    #[test]
    fn standard_set_uses_configured_search_tool() {
        let set = CapabilitySet::standard(&config_with_rg());
        match set.get(CapabilityName::RgPath) {
            Some(Capability::RgPath(path)) => assert_eq!(path, &PathBuf::from("/opt/tools/rg")),
            other => panic!("unexpected rgPath entry: {other:?}"),
        }
    }

    #[test]
    fn standard_set_respects_exposed_list() {
        let config = BridgeConfig {
            exposed: vec![CapabilityName::Path, CapabilityName::Bridge],
            ..config_with_rg()
        };
        let set = CapabilitySet::standard(&config);
        assert_eq!(
            set.names().collect::<Vec<_>>(),
            vec![CapabilityName::Bridge, CapabilityName::Path]
        );
        assert!(!set.contains(CapabilityName::FileUtils));
    }

    #[test]
    fn empty_exposed_list_gives_empty_set() {
        let config = BridgeConfig {
            exposed: Vec::new(),
            ..config_with_rg()
        };
        assert!(CapabilitySet::standard(&config).is_empty());
    }

    #[test]
    fn explicit_set_drops_duplicates() {
        let set = CapabilitySet::from_capabilities([
            Capability::Path(PathUtils::new()),
            Capability::RgPath(PathBuf::from("/a")),
            Capability::RgPath(PathBuf::from("/b")),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(CapabilityName::RgPath)
                .and_then(Capability::as_value),
            Some(serde_json::json!("/a"))
        );
    }
}
