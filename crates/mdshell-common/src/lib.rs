pub mod capability;
pub mod channel;
pub mod errors;
pub mod id;

pub use capability::CapabilityName;
pub use channel::{channels, Channel};
pub use errors::{BridgeError, ConfigError, MdshellError, PlatformError, TransportError};
pub use id::{new_correlation_id, EndpointId};

pub type Result<T> = std::result::Result<T, MdshellError>;
