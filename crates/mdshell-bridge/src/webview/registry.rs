use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use mdshell_common::EndpointId;
use tracing::debug;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::relay::{Endpoint, EndpointSource};
use crate::router::InboundMessage;

use super::endpoint::WebViewEndpoint;
use super::handlers::{attach_ipc_handler, attach_navigation_handler, lock_inbox};
use super::types::WebViewConfig;

/// Owns the editor webviews and hands their messages to the event loop.
#[derive(Default)]
pub struct WebViewRegistry {
    next_id: Cell<u32>,
    endpoints: RefCell<Vec<Rc<WebViewEndpoint>>>,
    inbox: Arc<Mutex<Vec<InboundMessage>>>,
}

impl WebViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a webview as a child of `window` and register it.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
    ) -> Result<Rc<WebViewEndpoint>, wry::Error> {
        let id = EndpointId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_devtools(config.devtools)
            .with_focused(false)
            .with_initialization_script(&config.init_script);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = attach_ipc_handler(builder, Arc::clone(&self.inbox), id);
        builder = attach_navigation_handler(builder, id);

        builder = match (&config.url, &config.html) {
            (Some(url), _) => builder.with_url(url),
            (None, Some(html)) => builder.with_html(html),
            (None, None) => builder.with_html("<html><body></body></html>"),
        };

        let webview = builder.build_as_child(window)?;
        debug!(endpoint = %id, "webview created");

        let endpoint = Rc::new(WebViewEndpoint {
            webview,
            id,
            destroyed: Cell::new(false),
            focused: Cell::new(false),
        });
        self.endpoints.borrow_mut().push(Rc::clone(&endpoint));
        Ok(endpoint)
    }

    /// Mark the webview destroyed and drop the registry's handle to it.
    ///
    /// Clones held elsewhere stay valid but report `is_destroyed`.
    pub fn destroy(&self, id: EndpointId) -> bool {
        let mut endpoints = self.endpoints.borrow_mut();
        let Some(pos) = endpoints.iter().position(|e| e.id() == id) else {
            return false;
        };
        let endpoint = endpoints.remove(pos);
        endpoint.destroyed.set(true);
        debug!(endpoint = %id, "webview destroyed");
        true
    }

    pub fn destroy_all(&self) {
        let ids: Vec<_> = self.endpoints.borrow().iter().map(|e| e.id()).collect();
        for id in ids {
            self.destroy(id);
        }
    }

    /// Record which webview has focus, as reported by the window system.
    pub fn set_focused(&self, id: Option<EndpointId>) {
        for endpoint in self.endpoints.borrow().iter() {
            endpoint.focused.set(Some(endpoint.id()) == id);
        }
    }

    /// Take every message posted since the last call.
    pub fn drain_inbound(&self) -> Vec<InboundMessage> {
        std::mem::take(&mut *lock_inbox(&self.inbox))
    }

    pub fn count(&self) -> usize {
        self.endpoints.borrow().len()
    }
}

impl EndpointSource for WebViewRegistry {
    type Endpoint = WebViewEndpoint;

    fn all_endpoints(&self) -> Vec<Rc<WebViewEndpoint>> {
        self.endpoints.borrow().clone()
    }
}
