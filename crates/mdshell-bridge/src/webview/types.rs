/// Configuration for creating an editor webview.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Initial URL to load (mutually exclusive with `html`).
    pub url: Option<String>,
    /// Initial HTML content (mutually exclusive with `url`).
    pub html: Option<String>,
    /// Script installed before any page script runs.
    pub init_script: String,
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    pub user_agent: Option<String>,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            url: None,
            html: None,
            init_script: crate::ipc::IPC_INIT_SCRIPT.to_string(),
            devtools: cfg!(debug_assertions),
            user_agent: Some(concat!("mdshell/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl WebViewConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Default::default()
        }
    }

    /// Replace the init script, usually with [`crate::expose::ScriptContext::into_script`].
    pub fn init_script(mut self, script: String) -> Self {
        self.init_script = script;
        self
    }
}
