//! `wry` webviews as relay endpoints.
//!
//! Each webview gets the IPC shim plus the capability stubs as its
//! initialization script. Host-to-UI messages are delivered with
//! `evaluate_script`; UI-to-host messages land in a shared inbox that the
//! event loop drains and feeds to [`crate::router::route_inbound`].

mod endpoint;
mod handlers;
mod registry;
mod types;

pub use endpoint::WebViewEndpoint;
pub use handlers::is_navigation_allowed;
pub use registry::WebViewRegistry;
pub use types::WebViewConfig;
