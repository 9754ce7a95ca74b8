use std::sync::{Arc, Mutex, MutexGuard};

use mdshell_common::EndpointId;
use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::ipc::IpcMessage;
use crate::router::InboundMessage;

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// URL prefixes an editor webview may navigate to.
///
/// External links go through `bridge.shell.openExternal` instead.
pub const ALLOWED_NAV_PREFIXES: &[&str] = &[
    "mdshell://",
    // WebView2 rewrites custom protocols: mdshell://localhost/... -> http://mdshell.localhost/...
    "http://mdshell.localhost",
    "about:blank",
    "file://",
];

pub fn is_navigation_allowed(url: &str) -> bool {
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

// =============================================================================
// INBOX
// =============================================================================

/// Lock the inbox, recovering the queue when a previous holder panicked.
pub(super) fn lock_inbox(
    inbox: &Mutex<Vec<InboundMessage>>,
) -> MutexGuard<'_, Vec<InboundMessage>> {
    inbox.lock().unwrap_or_else(|poisoned| {
        warn!("IPC inbox lock poisoned, recovering queued messages");
        poisoned.into_inner()
    })
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

pub(super) fn attach_ipc_handler<'a>(
    builder: WebViewBuilder<'a>,
    inbox: Arc<Mutex<Vec<InboundMessage>>>,
    id: EndpointId,
) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body();
        let Some(message) = IpcMessage::from_json(body) else {
            warn!(
                endpoint = %id,
                body_len = body.len(),
                "IPC message rejected: invalid JSON"
            );
            return;
        };

        debug!(endpoint = %id, kind = %message.kind, "IPC message from UI");
        lock_inbox(&inbox).push(InboundMessage {
            sender: id,
            message,
        });
    })
}

pub(super) fn attach_navigation_handler(
    builder: WebViewBuilder<'_>,
    id: EndpointId,
) -> WebViewBuilder<'_> {
    builder.with_navigation_handler(move |url| {
        if !is_navigation_allowed(&url) {
            warn!(endpoint = %id, url = %url, "navigation blocked: URL not in allowlist");
            return false;
        }
        debug!(endpoint = %id, url = %url, "navigation allowed");
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_bundled_and_local_pages() {
        assert!(is_navigation_allowed("mdshell://localhost/index.html"));
        assert!(is_navigation_allowed("http://mdshell.localhost/index.html"));
        assert!(is_navigation_allowed("about:blank"));
        assert!(is_navigation_allowed("file:///home/me/notes/readme.md"));
    }

    #[test]
    fn blocks_remote_pages() {
        assert!(!is_navigation_allowed("https://example.com"));
        assert!(!is_navigation_allowed("javascript:alert(1)"));
        assert!(!is_navigation_allowed("data:text/html,<script></script>"));
    }

    #[test]
    fn poisoned_inbox_still_accepts_messages() {
        let inbox = Arc::new(Mutex::new(Vec::new()));
        let held = Arc::clone(&inbox);
        let _ = std::thread::spawn(move || {
            let _guard = held.lock().unwrap();
            panic!("handler panicked while holding the inbox");
        })
        .join();
        assert!(inbox.is_poisoned());

        lock_inbox(&inbox).push(InboundMessage {
            sender: EndpointId(3),
            message: IpcMessage::json("mt::ping", serde_json::json!([])),
        });
        assert_eq!(lock_inbox(&inbox).len(), 1);
    }
}
