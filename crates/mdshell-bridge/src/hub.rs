//! In-process named-channel hub on the host side.
//!
//! `on`/`once`/`emit` carry one-way notifications; `handle`/`invoke` carry
//! request/response calls with at most one handler per channel.
//! [`ChannelHub::marshalled`] wraps the same operations with per-argument
//! encoding and decoding.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use mdshell_common::{BridgeError, Channel, EndpointId};
use tracing::{debug, trace};

use crate::marshal::{decode, decode_all, encode, encode_all, Arg};

/// Context passed to every listener and handler ahead of the arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcEvent {
    pub channel: Channel,
    /// Endpoint that sent the message, `None` for host-originated emits.
    pub sender: Option<EndpointId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&IpcEvent, &[Arg])>;
type Handler = Rc<dyn Fn(&IpcEvent, Vec<Arg>) -> Arg>;

struct Registration {
    id: ListenerId,
    once: bool,
    listener: Listener,
}

#[derive(Default)]
pub struct ChannelHub {
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<Channel, Vec<Registration>>>,
    handlers: RefCell<HashMap<Channel, Handler>>,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// View of this hub that encodes outbound and decodes inbound arguments.
    pub fn marshalled(&self) -> Marshalling<'_> {
        Marshalling { hub: self }
    }

    pub fn on(
        &self,
        channel: Channel,
        listener: impl Fn(&IpcEvent, &[Arg]) + 'static,
    ) -> ListenerId {
        self.register(channel, false, Rc::new(listener))
    }

    /// Register a listener that is removed after its first call.
    pub fn once(
        &self,
        channel: Channel,
        listener: impl Fn(&IpcEvent, &[Arg]) + 'static,
    ) -> ListenerId {
        self.register(channel, true, Rc::new(listener))
    }

    fn register(&self, channel: Channel, once: bool, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .entry(channel)
            .or_default()
            .push(Registration { id, once, listener });
        trace!(channel = %channel, once, "listener registered");
        id
    }

    pub fn remove_listener(&self, channel: Channel, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&channel) else {
            return false;
        };
        let before = list.len();
        list.retain(|r| r.id != id);
        before != list.len()
    }

    pub fn remove_all_listeners(&self, channel: Channel) {
        self.listeners.borrow_mut().remove(&channel);
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        self.listeners
            .borrow()
            .get(&channel)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Emit a host-originated message. Returns whether any listener ran.
    pub fn emit(&self, channel: Channel, args: &[Arg]) -> bool {
        self.emit_from(None, channel, args)
    }

    /// Emit on behalf of `sender`. Returns whether any listener ran.
    pub fn emit_from(&self, sender: Option<EndpointId>, channel: Channel, args: &[Arg]) -> bool {
        // Snapshot first so listeners may register or remove listeners.
        let to_call: Vec<Listener> = {
            let mut listeners = self.listeners.borrow_mut();
            let Some(list) = listeners.get_mut(&channel) else {
                trace!(channel = %channel, "emit with no listeners");
                return false;
            };
            let snapshot = list.iter().map(|r| Rc::clone(&r.listener)).collect();
            list.retain(|r| !r.once);
            snapshot
        };

        if to_call.is_empty() {
            return false;
        }

        let event = IpcEvent { channel, sender };
        debug!(channel = %channel, listeners = to_call.len(), args = args.len(), "emit");
        for listener in &to_call {
            listener(&event, args);
        }
        true
    }

    /// Register the single request handler for `channel`.
    pub fn handle(
        &self,
        channel: Channel,
        handler: impl Fn(&IpcEvent, Vec<Arg>) -> Arg + 'static,
    ) -> Result<(), BridgeError> {
        let mut handlers = self.handlers.borrow_mut();
        if handlers.contains_key(&channel) {
            return Err(BridgeError::HandlerExists(channel.to_string()));
        }
        handlers.insert(channel, Rc::new(handler));
        Ok(())
    }

    pub fn remove_handler(&self, channel: Channel) -> bool {
        self.handlers.borrow_mut().remove(&channel).is_some()
    }

    /// Call the handler for `channel` and return its result.
    pub fn invoke(
        &self,
        sender: Option<EndpointId>,
        channel: Channel,
        args: Vec<Arg>,
    ) -> Result<Arg, BridgeError> {
        let handler = self
            .handlers
            .borrow()
            .get(&channel)
            .cloned()
            .ok_or_else(|| BridgeError::NoHandler(channel.to_string()))?;
        debug!(channel = %channel, args = args.len(), "invoke");
        Ok(handler(&IpcEvent { channel, sender }, args))
    }
}

/// Marshalling view over a [`ChannelHub`].
pub struct Marshalling<'a> {
    hub: &'a ChannelHub,
}

impl Marshalling<'_> {
    /// Listener receives every argument decoded independently.
    pub fn on(
        &self,
        channel: Channel,
        listener: impl Fn(&IpcEvent, Vec<Arg>) + 'static,
    ) -> ListenerId {
        self.hub.on(channel, move |event, args| {
            listener(event, decode_all(args.iter().cloned()))
        })
    }

    pub fn once(
        &self,
        channel: Channel,
        listener: impl Fn(&IpcEvent, Vec<Arg>) + 'static,
    ) -> ListenerId {
        self.hub.once(channel, move |event, args| {
            listener(event, decode_all(args.iter().cloned()))
        })
    }

    /// Encode every argument independently, then emit.
    pub fn emit(&self, channel: Channel, args: Vec<Arg>) -> bool {
        self.hub.emit(channel, &encode_all(args))
    }

    /// Handler receives decoded arguments; its result is encoded before it is returned.
    pub fn handle(
        &self,
        channel: Channel,
        handler: impl Fn(&IpcEvent, Vec<Arg>) -> Arg + 'static,
    ) -> Result<(), BridgeError> {
        self.hub.handle(channel, move |event, args| {
            encode(handler(event, decode_all(args)))
        })
    }

    /// Caller side of `handle`: encode arguments, decode the result.
    pub fn invoke(
        &self,
        sender: Option<EndpointId>,
        channel: Channel,
        args: Vec<Arg>,
    ) -> Result<Arg, BridgeError> {
        self.hub
            .invoke(sender, channel, encode_all(args))
            .map(decode)
    }
}
