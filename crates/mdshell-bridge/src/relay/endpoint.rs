use std::rc::Rc;

use mdshell_common::{Channel, EndpointId, TransportError};
use serde_json::Value;

/// One UI surface the host can deliver messages to.
///
/// The host owns endpoints; the relay only queries and writes to them.
pub trait Endpoint {
    fn id(&self) -> EndpointId;

    fn is_destroyed(&self) -> bool;

    fn is_focused(&self) -> bool;

    /// Hand a message to the transport. Success means "written", not "handled".
    fn deliver(&self, channel: Channel, payload: &Value) -> Result<(), TransportError>;
}

/// Read-only view of the host's endpoint list.
pub trait EndpointSource {
    type Endpoint: Endpoint;

    /// Snapshot of every endpoint the host knows about, destroyed ones included.
    fn all_endpoints(&self) -> Vec<Rc<Self::Endpoint>>;

    fn endpoint(&self, id: EndpointId) -> Option<Rc<Self::Endpoint>> {
        self.all_endpoints().into_iter().find(|e| e.id() == id)
    }

    fn focused_endpoint(&self) -> Option<Rc<Self::Endpoint>> {
        self.all_endpoints()
            .into_iter()
            .find(|e| !e.is_destroyed() && e.is_focused())
    }
}

/// Whether `endpoint` exists and has not been destroyed.
pub fn is_live<E: Endpoint + ?Sized>(endpoint: Option<&E>) -> bool {
    endpoint.is_some_and(|e| !e.is_destroyed())
}
