//! Defensive message delivery from the host to UI endpoints.
//!
//! Every send reports a boolean (or a count) and logs the reason for a
//! failure; nothing here returns an error or panics because a window went
//! away.

mod endpoint;
mod memory;


pub use endpoint::{is_live, Endpoint, EndpointSource};
pub use memory::{MemoryEndpoint, MemoryEndpoints};

use mdshell_common::Channel;
use mdshell_config::RelayConfig;
use serde_json::Value;
use tracing::{debug, error, trace, warn};

pub struct MessageRelay<S: EndpointSource> {
    source: S,
    log_dropped_sends: bool,
}

impl<S: EndpointSource> MessageRelay<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            log_dropped_sends: true,
        }
    }

    pub fn with_config(source: S, config: &RelayConfig) -> Self {
        Self {
            source,
            log_dropped_sends: config.log_dropped_sends,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_live(&self, endpoint: Option<&S::Endpoint>) -> bool {
        is_live(endpoint)
    }

    /// Deliver one message to one endpoint.
    ///
    /// Returns `false` without touching the transport when the endpoint is
    /// absent or destroyed, and `false` when the transport rejects the write.
    pub fn send_to(&self, endpoint: Option<&S::Endpoint>, channel: Channel, data: &Value) -> bool {
        let endpoint = match endpoint {
            Some(e) if !e.is_destroyed() => e,
            Some(e) => {
                self.log_dropped(channel, Some(e.id().to_string()));
                return false;
            }
            None => {
                self.log_dropped(channel, None);
                return false;
            }
        };

        match endpoint.deliver(channel, data) {
            Ok(()) => {
                trace!(endpoint = %endpoint.id(), channel = %channel, "IPC message sent");
                true
            }
            Err(e) if e.is_broken_pipe() => {
                warn!(
                    endpoint = %endpoint.id(),
                    channel = %channel,
                    error = %e,
                    "broken pipe when sending IPC message"
                );
                false
            }
            Err(e) => {
                error!(
                    endpoint = %endpoint.id(),
                    channel = %channel,
                    error = %e,
                    "error sending IPC message"
                );
                false
            }
        }
    }

    /// Deliver to every endpoint in the current snapshot. Returns the number of
    /// successful deliveries.
    pub fn broadcast(&self, channel: Channel, data: &Value) -> usize {
        let endpoints = self.source.all_endpoints();
        let delivered = endpoints
            .iter()
            .filter(|e| self.send_to(Some(&***e), channel, data))
            .count();
        debug!(
            channel = %channel,
            delivered,
            total = endpoints.len(),
            "IPC broadcast"
        );
        delivered
    }

    /// Deliver to the focused endpoint, or the first live endpoint if none has focus.
    pub fn send_to_primary(&self, channel: Channel, data: &Value) -> bool {
        let target = self.source.focused_endpoint().or_else(|| {
            self.source
                .all_endpoints()
                .into_iter()
                .find(|e| !e.is_destroyed())
        });
        self.send_to(target.as_deref(), channel, data)
    }

    fn log_dropped(&self, channel: Channel, endpoint: Option<String>) {
        let endpoint = endpoint.as_deref().unwrap_or("none");
        if self.log_dropped_sends {
            warn!(endpoint, channel = %channel, "cannot send IPC message to destroyed endpoint");
        } else {
            debug!(endpoint, channel = %channel, "cannot send IPC message to destroyed endpoint");
        }
    }
}
