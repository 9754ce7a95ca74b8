//! In-memory endpoints for headless runs and tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mdshell_common::{Channel, EndpointId, TransportError};
use serde_json::Value;

use super::endpoint::{Endpoint, EndpointSource};

/// An endpoint that records what it receives.
#[derive(Debug)]
pub struct MemoryEndpoint {
    id: EndpointId,
    destroyed: Cell<bool>,
    focused: Cell<bool>,
    failure: RefCell<Option<TransportError>>,
    attempts: Cell<usize>,
    received: RefCell<Vec<(Channel, Value)>>,
    closes_on_delivery: RefCell<Option<Rc<MemoryEndpoint>>>,
}

impl MemoryEndpoint {
    pub fn new(id: u32) -> Self {
        Self {
            id: EndpointId(id),
            destroyed: Cell::new(false),
            focused: Cell::new(false),
            failure: RefCell::new(None),
            attempts: Cell::new(0),
            received: RefCell::new(Vec::new()),
            closes_on_delivery: RefCell::new(None),
        }
    }

    pub fn focused(self) -> Self {
        self.focused.set(true);
        self
    }

    pub fn destroyed(self) -> Self {
        self.destroyed.set(true);
        self
    }

    pub fn destroy(&self) {
        self.destroyed.set(true);
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
    }

    /// Make every following delivery fail with `error`.
    pub fn fail_with(&self, error: TransportError) {
        *self.failure.borrow_mut() = Some(error);
    }

    /// Destroy `other` once this endpoint accepts a message, the way a window
    /// can close another in response to a broadcast.
    pub fn close_on_delivery(&self, other: Rc<MemoryEndpoint>) {
        *self.closes_on_delivery.borrow_mut() = Some(other);
    }

    /// Number of times the transport was asked to deliver, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }

    pub fn received(&self) -> Vec<(Channel, Value)> {
        self.received.borrow().clone()
    }
}

impl Endpoint for MemoryEndpoint {
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
        self.attempts.set(self.attempts.get() + 1);
        if let Some(err) = self.failure.borrow().clone() {
            return Err(err);
        }
        self.received.borrow_mut().push((channel, payload.clone()));
        if let Some(other) = self.closes_on_delivery.borrow_mut().take() {
            other.destroy();
        }
        Ok(())
    }
}

/// A host-owned list of [`MemoryEndpoint`]s.
#[derive(Debug, Default)]
pub struct MemoryEndpoints {
    endpoints: RefCell<Vec<Rc<MemoryEndpoint>>>,
}

impl MemoryEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, endpoint: MemoryEndpoint) -> Rc<MemoryEndpoint> {
        let endpoint = Rc::new(endpoint);
        self.endpoints.borrow_mut().push(Rc::clone(&endpoint));
        endpoint
    }

    /// Drop an endpoint from the list, as the host does once a window is gone.
    pub fn remove(&self, id: EndpointId) -> bool {
        let mut endpoints = self.endpoints.borrow_mut();
        let before = endpoints.len();
        endpoints.retain(|e| e.id() != id);
        before != endpoints.len()
    }
}

impl EndpointSource for MemoryEndpoints {
    type Endpoint = MemoryEndpoint;

    fn all_endpoints(&self) -> Vec<Rc<MemoryEndpoint>> {
        self.endpoints.borrow().clone()
    }
}
