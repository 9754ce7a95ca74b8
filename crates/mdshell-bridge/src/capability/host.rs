use mdshell_platform::{Clipboard, Shell};

/// The `bridge` capability: host services reachable from the UI.
///
/// The IPC shim itself lives UI-side (`window.__mdshell`); this struct
/// carries the services that need the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostApi {
    pub shell: Shell,
    pub clipboard: Clipboard,
    pub log: RendererLog,
}

impl HostApi {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Forwards UI log lines into the host's `tracing` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct RendererLog;

impl RendererLog {
    pub fn debug(&self, message: &str) {
        tracing::debug!(target: "mdshell::renderer", "{message}");
    }

    pub fn info(&self, message: &str) {
        tracing::info!(target: "mdshell::renderer", "{message}");
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(target: "mdshell::renderer", "{message}");
    }

    pub fn error(&self, message: &str) {
        tracing::error!(target: "mdshell::renderer", "{message}");
    }
}
