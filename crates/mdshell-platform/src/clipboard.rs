use mdshell_common::PlatformError;

/// System clipboard backed by `arboard`.
///
/// The handle is opened per call so that a missing display server only
/// fails the operation that needed it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clipboard;

impl Clipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<arboard::Clipboard, PlatformError> {
        arboard::Clipboard::new().map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }

    /// Reads text from the system clipboard.
    pub fn read_text(&self) -> Result<String, PlatformError> {
        Self::open()?
            .get_text()
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }

    /// Writes text to the system clipboard.
    pub fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        Self::open()?
            .set_text(text.to_owned())
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }
}
