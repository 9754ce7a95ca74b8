//! Headless bridge boot.
//!
//! Builds the capability set, selects the exposure strategy once from the
//! isolation flag, exposes into an in-memory UI context and then drives a
//! few messages through the relay and router against in-memory endpoints.

use mdshell_bridge::{
    route_inbound, select_strategy, CapabilityDispatcher, CapabilitySet, ChannelHub,
    ExposureReport, InboundMessage, IpcMessage, MemoryContext, MemoryEndpoint, MemoryEndpoints,
    MessageRelay, Routed, ScriptContext,
};
use mdshell_common::{channels, EndpointId};
use mdshell_config::MdshellConfig;
use serde_json::json;
use tracing::{debug, info};

pub struct BootSummary {
    pub exposure: ExposureReport,
    /// Messages the relay handed to live endpoints during the smoke run.
    pub delivered: usize,
    pub routed: Vec<Routed>,
}

pub async fn run(config: &MdshellConfig, isolation_active: bool) -> BootSummary {
    let capabilities = CapabilitySet::standard(&config.bridge);
    let strategy = select_strategy(isolation_active);
    debug!(mode = %strategy.mode(), "exposure strategy selected");

    let mut ui = MemoryContext::new();
    let exposure = strategy.expose(&capabilities, &mut ui);

    let mut script = ScriptContext::new();
    strategy.expose(&capabilities, &mut script);
    debug!(bytes = script.into_script().len(), "init script generated");

    let endpoints = MemoryEndpoints::new();
    endpoints.add(MemoryEndpoint::new(0).focused());
    endpoints.add(MemoryEndpoint::new(1));
    endpoints.add(MemoryEndpoint::new(2).destroyed());
    let relay = MessageRelay::with_config(endpoints, &config.relay);

    let mut delivered = relay.broadcast(channels::PING, &json!({ "n": 1 }));
    if relay.send_to_primary(channels::BOOTSTRAP_EDITOR, &json!({ "ready": true })) {
        delivered += 1;
    }

    let dispatcher = CapabilityDispatcher::new(capabilities);
    let hub = ChannelHub::new();
    let mut routed = Vec::new();
    for raw in [
        r#"{"kind":"commandExists::exists","payload":["\"rg\""],"_reqId":1}"#,
        r#"{"kind":"path::join","payload":["\"notes\"","\"today.md\""],"_reqId":2}"#,
    ] {
        let Some(message) = IpcMessage::from_json(raw) else {
            continue;
        };
        let outcome = route_inbound(
            InboundMessage {
                sender: EndpointId(0),
                message,
            },
            &dispatcher,
            &hub,
            &relay,
        )
        .await;
        if matches!(outcome, Routed::Capability { replied: true }) {
            delivered += 1;
        }
        routed.push(outcome);
    }

    info!(
        exposed = ?exposure.exposed,
        names = ?ui.names().collect::<Vec<_>>(),
        "UI context ready"
    );

    BootSummary {
        exposure,
        delivered,
        routed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdshell_bridge::ExposureMode;
    use std::path::PathBuf;

    fn config() -> MdshellConfig {
        let mut config = MdshellConfig::default();
        config.bridge.search_tool_path = Some(PathBuf::from("/opt/tools/rg"));
        config
    }

    #[tokio::test]
    async fn isolated_boot_exposes_everything() {
        let summary = run(&config(), true).await;
        assert_eq!(summary.exposure.mode, ExposureMode::Isolated);
        assert!(summary.exposure.is_complete());
        assert_eq!(summary.exposure.exposed.len(), 5);
    }

    #[tokio::test]
    async fn non_isolated_boot_assigns_globals() {
        let summary = run(&config(), false).await;
        assert_eq!(summary.exposure.mode, ExposureMode::NonIsolated);
        assert_eq!(summary.exposure.exposed.len(), 5);
    }

    #[tokio::test]
    async fn smoke_messages_reach_live_endpoints_only() {
        let summary = run(&config(), true).await;
        // Broadcast to two live endpoints, one primary send, two capability replies.
        assert_eq!(summary.delivered, 5);
        assert!(summary
            .routed
            .iter()
            .all(|r| matches!(r, Routed::Capability { replied: true })));
    }
}
