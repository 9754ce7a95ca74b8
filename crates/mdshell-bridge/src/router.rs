//! Routing of messages posted by the UI context.
//!
//! A message whose kind names a capability goes to the
//! [`CapabilityDispatcher`]. A message on a known channel goes to the
//! [`ChannelHub`]: as an emit when it carries no request id, as an invoke
//! answered on [`channels::CAPABILITY_RESPONSE`] when it does. Anything else
//! is dropped with a warning.

use mdshell_common::{channels, BridgeError, EndpointId};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::dispatch::{is_capability_kind, CapabilityDispatcher};
use crate::hub::ChannelHub;
use crate::ipc::IpcMessage;
use crate::marshal::Arg;
use crate::relay::{EndpointSource, MessageRelay};

/// A message posted by one endpoint.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender: EndpointId,
    pub message: IpcMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// A capability call ran; `replied` tells whether the answer was delivered.
    Capability { replied: bool },
    /// A channel emit; `handled` tells whether any listener ran.
    Emitted { handled: bool },
    /// A channel invoke; `replied` tells whether the answer was delivered.
    Invoked { replied: bool },
    Rejected,
}

/// Wire arguments as hub arguments: strings stay wire text for marshalled
/// listeners to decode, everything else is already structured.
fn hub_args(values: Vec<Value>) -> Vec<Arg> {
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Arg::Text(s),
            other => Arg::Value(other),
        })
        .collect()
}

pub async fn route_inbound<S: EndpointSource>(
    inbound: InboundMessage,
    dispatcher: &CapabilityDispatcher,
    hub: &ChannelHub,
    relay: &MessageRelay<S>,
) -> Routed {
    let InboundMessage { sender, message } = inbound;
    let reply_to = relay.source().endpoint(sender);

    if is_capability_kind(&message.kind) {
        let replied = dispatcher.reply(relay, reply_to.as_deref(), message).await;
        return Routed::Capability { replied };
    }

    let Some(channel) = channels::find(&message.kind) else {
        warn!(endpoint = %sender, kind = %message.kind, "IPC message rejected: unknown kind");
        return Routed::Rejected;
    };

    let args = hub_args(message.payload.into_args());
    match message.req_id {
        None => {
            let handled = hub.emit_from(Some(sender), channel, &args);
            debug!(endpoint = %sender, channel = %channel, handled, "inbound emit");
            Routed::Emitted { handled }
        }
        Some(req_id) => {
            let payload = match hub.invoke(Some(sender), channel, args) {
                Ok(result) => json!({ "_reqId": req_id, "result": result.to_wire() }),
                Err(e) => {
                    if matches!(e, BridgeError::NoHandler(_)) {
                        warn!(endpoint = %sender, channel = %channel, "invoke without handler");
                    }
                    json!({ "_reqId": req_id, "error": e.to_string() })
                }
            };
            let replied =
                relay.send_to(reply_to.as_deref(), channels::CAPABILITY_RESPONSE, &payload);
            Routed::Invoked { replied }
        }
    }
}
