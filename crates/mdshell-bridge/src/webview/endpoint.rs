use std::cell::Cell;

use mdshell_common::{Channel, EndpointId, TransportError};
use serde_json::Value;
use wry::WebView;

use crate::ipc::js_dispatch_message;
use crate::relay::Endpoint;

/// One editor webview.
pub struct WebViewEndpoint {
    pub(super) webview: WebView,
    pub(super) id: EndpointId,
    pub(super) destroyed: Cell<bool>,
    pub(super) focused: Cell<bool>,
}

impl WebViewEndpoint {
    pub fn load_url(&self, url: &str) -> Result<(), wry::Error> {
        self.webview.load_url(url)
    }

    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), wry::Error> {
        self.webview.set_visible(visible)
    }

    pub fn focus(&self) -> Result<(), wry::Error> {
        self.webview.focus()?;
        self.focused.set(true);
        Ok(())
    }

    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }

    pub fn inner(&self) -> &WebView {
        &self.webview
    }
}

impl Endpoint for WebViewEndpoint {
    fn id(&self) -> EndpointId {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    fn is_focused(&self) -> bool {
        self.focused.get()
    }

    fn deliver(&self, channel: Channel, payload: &Value) -> Result<(), TransportError> {
        let script = js_dispatch_message(channel, payload)?;
        self.webview
            .evaluate_script(&script)
            .map_err(|e| TransportError::Script(e.to_string()))
    }
}
