//! Messaging bridge between the editor host and its UI contexts.
//!
//! - [`relay`] delivers host messages to one, all, or the primary endpoint
//!   and never fails louder than a `false` and a log line.
//! - [`marshal`] encodes and decodes call arguments one at a time.
//! - [`expose`] hands the fixed [`CapabilitySet`] to the UI, through the
//!   isolation bridge or by global assignment.
//! - [`dispatch`] and [`router`] run what the UI sends back.
//!
//! With the `webview` feature, [`webview`] provides `wry` webviews as relay
//! endpoints.

pub mod capability;
pub mod dispatch;
pub mod expose;
pub mod hub;
pub mod ipc;
pub mod marshal;
pub mod relay;
pub mod router;

#[cfg(feature = "webview")]
pub mod webview;

pub use capability::{Capability, CapabilitySet, HostApi, RendererLog};
pub use dispatch::CapabilityDispatcher;
pub use expose::{
    select_strategy, ExposeCapabilities, ExposureMode, ExposureReport, GlobalExposer,
    IsolatedExposer, MemoryContext, ScriptContext, UiContext,
};
pub use hub::{ChannelHub, IpcEvent, ListenerId, Marshalling};
pub use ipc::{IpcMessage, IpcPayload};
pub use marshal::{Arg, Marshalled, NotDecodable, NotSerializable, Opaque};
pub use relay::{Endpoint, EndpointSource, MemoryEndpoint, MemoryEndpoints, MessageRelay};
pub use router::{route_inbound, InboundMessage, Routed};
