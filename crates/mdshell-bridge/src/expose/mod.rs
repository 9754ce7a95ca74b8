//! Handing the capability set to the UI context.
//!
//! The host tells the preload context once, at startup, whether the UI runs
//! isolated. [`select_strategy`] turns that flag into one of two strategies:
//!
//! - [`IsolatedExposer`] registers each capability through the one-way
//!   bridging primitive. A failed registration is logged and that capability
//!   stays unavailable; the others are still attempted.
//! - [`GlobalExposer`] assigns each capability onto the UI global object.
//!
//! Either way the UI sees the same global names.

mod memory;
mod script;


pub use memory::{ExposedEntry, MemoryContext};
pub use script::ScriptContext;

use std::fmt;

use mdshell_common::{BridgeError, CapabilityName};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::capability::{Capability, CapabilitySet};

/// The UI context as seen from the preload side.
pub trait UiContext {
    /// Register a read-only global through the isolation bridge.
    fn expose_in_main_world(
        &mut self,
        name: &'static str,
        capability: Capability,
    ) -> Result<(), BridgeError>;

    /// Assign a global directly. Only valid without isolation.
    fn assign_global(&mut self, name: &'static str, capability: Capability);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureMode {
    Isolated,
    NonIsolated,
}

impl fmt::Display for ExposureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isolated => f.write_str("isolated"),
            Self::NonIsolated => f.write_str("non-isolated"),
        }
    }
}

/// Outcome of one exposure pass.
#[derive(Debug)]
pub struct ExposureReport {
    pub mode: ExposureMode,
    pub exposed: Vec<CapabilityName>,
    pub failed: Vec<(CapabilityName, BridgeError)>,
}

impl ExposureReport {
    fn new(mode: ExposureMode) -> Self {
        Self {
            mode,
            exposed: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub trait ExposeCapabilities {
    fn mode(&self) -> ExposureMode;

    fn expose(&self, capabilities: &CapabilitySet, ui: &mut dyn UiContext) -> ExposureReport;
}

/// Registration through the isolation bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsolatedExposer;

impl ExposeCapabilities for IsolatedExposer {
    fn mode(&self) -> ExposureMode {
        ExposureMode::Isolated
    }

    fn expose(&self, capabilities: &CapabilitySet, ui: &mut dyn UiContext) -> ExposureReport {
        let mut report = ExposureReport::new(self.mode());
        for cap in capabilities.iter() {
            let name = cap.name();
            match ui.expose_in_main_world(name.global_name(), cap.clone()) {
                Ok(()) => {
                    debug!(capability = %name, "capability exposed");
                    report.exposed.push(name);
                }
                Err(e) => {
                    error!(capability = %name, error = %e, "failed to expose capability");
                    report.failed.push((name, e));
                }
            }
        }
        info!(
            exposed = report.exposed.len(),
            failed = report.failed.len(),
            "APIs exposed via bridge"
        );
        report
    }
}

/// Direct assignment onto the UI global object.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalExposer;

impl ExposeCapabilities for GlobalExposer {
    fn mode(&self) -> ExposureMode {
        ExposureMode::NonIsolated
    }

    fn expose(&self, capabilities: &CapabilitySet, ui: &mut dyn UiContext) -> ExposureReport {
        let mut report = ExposureReport::new(self.mode());
        for cap in capabilities.iter() {
            ui.assign_global(cap.name().global_name(), cap.clone());
            report.exposed.push(cap.name());
        }
        info!(exposed = report.exposed.len(), "APIs attached to global object");
        report
    }
}

/// Pick the exposure strategy from the host's isolation flag.
pub fn select_strategy(isolation_active: bool) -> Box<dyn ExposeCapabilities> {
    if isolation_active {
        Box::new(IsolatedExposer)
    } else {
        Box::new(GlobalExposer)
    }
}
