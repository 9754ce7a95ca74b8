//! Wire format between the host and the UI context.
//!
//! Messages flow in both directions:
//! - **UI -> host**: the UI calls `window.ipc.postMessage(JSON.stringify({...}))`
//!   with an [`IpcMessage`].
//! - **host -> UI**: the host evaluates a `window.__mdshell._dispatch(...)`
//!   call built by [`js_dispatch_message`].

use mdshell_common::{Channel, TransportError};
use serde::{Deserialize, Serialize};

/// A typed IPC message from the UI context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// Channel name or `<capability>::<operation>` for capability calls.
    pub kind: String,
    /// The message payload (arbitrary JSON).
    #[serde(default = "IpcPayload::none")]
    pub payload: IpcPayload,
    /// Request id echoed back in responses to capability calls.
    #[serde(rename = "_reqId", default, skip_serializing_if = "Option::is_none")]
    pub req_id: Option<u64>,
}

/// Payload of an IPC message, either a simple string or structured JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
    None,
}

impl IpcPayload {
    fn none() -> Self {
        Self::None
    }

    /// Positional arguments carried by the payload.
    ///
    /// An array is spread into its elements; any other value is a single
    /// argument; no payload means no arguments.
    pub fn into_args(self) -> Vec<serde_json::Value> {
        match self {
            Self::Json(serde_json::Value::Array(items)) => items,
            Self::Json(serde_json::Value::Null) | Self::None => Vec::new(),
            Self::Json(v) => vec![v],
            Self::Text(s) => vec![serde_json::Value::String(s)],
        }
    }
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string (from JS postMessage).
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Create a simple text message.
    pub fn text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: IpcPayload::Text(text.into()),
            req_id: None,
        }
    }

    /// Create a JSON message.
    pub fn json(kind: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload: IpcPayload::Json(value),
            req_id: None,
        }
    }

    pub fn with_req_id(mut self, req_id: u64) -> Self {
        self.req_id = Some(req_id);
        self
    }
}

/// UI-side half of the bridge, installed before any page script runs.
///
/// Every outbound argument is stringified on its own and every inbound
/// argument is parsed on its own; a value that fails either step is passed
/// through untouched.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    function encode(arg) {
        try { var s = JSON.stringify(arg); return s === undefined ? arg : s; }
        catch (e) { return arg; }
    }
    function decode(arg) {
        if (typeof arg !== 'string') { return arg; }
        try { return JSON.parse(arg); } catch (e) { return arg; }
    }
    var listeners = {};
    var pending = {};
    var nextReqId = 1;
    var bridge = {
        send: function(channel) {
            var args = Array.prototype.slice.call(arguments, 1).map(encode);
            window.ipc.postMessage(JSON.stringify({ kind: channel, payload: args }));
        },
        invoke: function(kind, args) {
            var reqId = nextReqId++;
            return new Promise(function(resolve, reject) {
                pending[reqId] = { resolve: resolve, reject: reject };
                window.ipc.postMessage(JSON.stringify({
                    kind: kind,
                    payload: (args || []).map(encode),
                    _reqId: reqId
                }));
            });
        },
        on: function(channel, callback) {
            (listeners[channel] = listeners[channel] || []).push({ cb: callback, once: false });
        },
        once: function(channel, callback) {
            (listeners[channel] = listeners[channel] || []).push({ cb: callback, once: true });
        },
        removeListener: function(channel, callback) {
            var list = listeners[channel] || [];
            listeners[channel] = list.filter(function(l) { return l.cb !== callback; });
        },
        removeAllListeners: function(channel) {
            delete listeners[channel];
        },
        _dispatch: function(channel, payload) {
            if (channel === 'mt::capability-response' && payload && pending[payload._reqId]) {
                var p = pending[payload._reqId];
                delete pending[payload._reqId];
                if (payload.error !== undefined) { p.reject(new Error(payload.error)); }
                else { p.resolve(decode(payload.result)); }
                return;
            }
            var args = Array.isArray(payload) ? payload.map(decode) : [decode(payload)];
            var list = listeners[channel] || [];
            listeners[channel] = list.filter(function(l) { return !l.once; });
            list.forEach(function(l) { l.cb.apply(null, [{ channel: channel }].concat(args)); });
        }
    };
    Object.defineProperty(window, '__mdshell', { value: bridge, writable: false, configurable: false });
})();
"#;

/// Generate a JS snippet that dispatches a message to the UI-side listeners.
pub fn js_dispatch_message(
    channel: Channel,
    payload: &serde_json::Value,
) -> Result<String, TransportError> {
    let payload_json = serde_json::to_string(payload)?;
    let channel_json = serde_json::to_string(channel.as_str())?;
    Ok(format!(
        "window.__mdshell._dispatch({channel_json}, {payload_json});"
    ))
}
