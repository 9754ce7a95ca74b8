use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("clipboard error: {0}")]
    ClipboardError(String),

    #[error("path error: {0}")]
    PathError(String),

    #[error("file error: {path}: {source}")]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shell error: {0}")]
    ShellError(String),
}

impl PlatformError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileError {
            path: path.into(),
            source,
        }
    }
}

/// Failure while handing a message to an endpoint's transport.
///
/// Broken-pipe class failures mean the peer went away between the liveness
/// check and the write. Everything else is unexpected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("broken pipe: {0}")]
    BrokenPipe(String),

    #[error("endpoint closed: {0}")]
    Closed(String),

    #[error("payload serialization failed: {0}")]
    Serialization(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether the failure belongs to the "peer went away" class.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::BrokenPipe(_) | Self::Closed(_))
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => Self::BrokenPipe(e.to_string()),
            _ => Self::Other(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("context bridge unavailable")]
    BridgeUnavailable,

    #[error("global name already exposed: {0}")]
    NameCollision(String),

    #[error("invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("no handler registered for channel {0}")]
    NoHandler(String),

    #[error("handler already registered for channel {0}")]
    HandlerExists(String),

    #[error("unknown capability operation: {0}")]
    UnknownOperation(String),

    #[error("invalid arguments for {op}: {reason}")]
    InvalidArguments { op: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[derive(Debug, thiserror::Error)]
pub enum MdshellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("unknown capability 'foo'".into());
        assert_eq!(
            err.to_string(),
            "config validation error: unknown capability 'foo'"
        );
    }

    #[test]
    fn platform_file_error_carries_path() {
        let err = PlatformError::file(
            "/tmp/notes.md",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "file error: /tmp/notes.md: no such file");
    }

    #[test]
    fn broken_pipe_class() {
        assert!(TransportError::BrokenPipe("EPIPE".into()).is_broken_pipe());
        assert!(TransportError::Closed("window gone".into()).is_broken_pipe());
        assert!(!TransportError::Script("ReferenceError".into()).is_broken_pipe());
        assert!(!TransportError::Other("boom".into()).is_broken_pipe());
        assert!(!TransportError::Serialization("bad".into()).is_broken_pipe());
    }

    #[test]
    fn io_errors_classify_into_transport_errors() {
        let err: TransportError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(err.is_broken_pipe());

        let err: TransportError = io::Error::new(io::ErrorKind::ConnectionReset, "reset").into();
        assert!(err.is_broken_pipe());

        let err: TransportError = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(!err.is_broken_pipe());
        assert_eq!(err, TransportError::Other("nope".into()));
    }

    #[test]
    fn bridge_error_from_transport() {
        let err: BridgeError = TransportError::Closed("gone".into()).into();
        assert!(matches!(err, BridgeError::Transport(_)));
        assert_eq!(err.to_string(), "endpoint closed: gone");
    }

    #[test]
    fn mdshell_error_from_parts() {
        let err: MdshellError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, MdshellError::Config(_)));
        assert!(err.to_string().contains("bad toml"));

        let err: MdshellError = BridgeError::BridgeUnavailable.into();
        assert_eq!(err.to_string(), "context bridge unavailable");

        let err: MdshellError = io::Error::new(io::ErrorKind::NotFound, "file missing").into();
        assert!(matches!(err, MdshellError::Io(_)));

        let err = MdshellError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
