use std::collections::{BTreeMap, BTreeSet};

use mdshell_common::BridgeError;

use super::UiContext;
use crate::capability::Capability;

#[derive(Debug, Clone)]
pub struct ExposedEntry {
    pub capability: Capability,
    /// Set for bridge registrations, which the UI cannot overwrite.
    pub read_only: bool,
}

/// A UI global namespace held in memory.
///
/// Used by the headless preload binary and by tests.
#[derive(Debug, Default)]
pub struct MemoryContext {
    bridge_available: bool,
    /// Names the page already defines before the preload runs.
    occupied: BTreeSet<&'static str>,
    globals: BTreeMap<&'static str, ExposedEntry>,
}

impl MemoryContext {
    /// A context whose isolation bridge is present.
    pub fn new() -> Self {
        Self {
            bridge_available: true,
            ..Self::default()
        }
    }

    /// A context with no isolation bridge; every registration fails.
    pub fn without_bridge() -> Self {
        Self::default()
    }

    /// Mark `name` as already defined by the page.
    pub fn with_occupied(mut self, name: &'static str) -> Self {
        self.occupied.insert(name);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ExposedEntry> {
        self.globals.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.globals.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.globals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }
}

impl UiContext for MemoryContext {
    fn expose_in_main_world(
        &mut self,
        name: &'static str,
        capability: Capability,
    ) -> Result<(), BridgeError> {
        if !self.bridge_available {
            return Err(BridgeError::BridgeUnavailable);
        }
        if self.occupied.contains(name) || self.globals.contains_key(name) {
            return Err(BridgeError::NameCollision(name.to_string()));
        }
        self.globals.insert(
            name,
            ExposedEntry {
                capability,
                read_only: true,
            },
        );
        Ok(())
    }

    fn assign_global(&mut self, name: &'static str, capability: Capability) {
        self.occupied.remove(name);
        self.globals.insert(
            name,
            ExposedEntry {
                capability,
                read_only: false,
            },
        );
    }
}
