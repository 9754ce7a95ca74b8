//! Named IPC channels.
//!
//! A channel is a `<namespace>::<event-name>` string shared by convention
//! between sender and receiver. Channels are built from `'static` strings
//! only, so a channel name can never come from data received at runtime.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::errors::BridgeError;

static CHANNEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*::[a-z][a-z0-9-]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(&'static str);

impl Channel {
    /// Build a channel without checking the naming convention.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Build a channel, rejecting names that don't follow `<namespace>::<event-name>`.
    pub fn parse(name: &'static str) -> Result<Self, BridgeError> {
        let channel = Self(name);
        if channel.is_well_formed() {
            Ok(channel)
        } else {
            Err(BridgeError::InvalidChannel(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_well_formed(&self) -> bool {
        CHANNEL_RE.is_match(self.0)
    }

    pub fn namespace(&self) -> Option<&'static str> {
        self.0.split_once("::").map(|(ns, _)| ns)
    }

    pub fn event(&self) -> Option<&'static str> {
        self.0.split_once("::").map(|(_, ev)| ev)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Channels the editor host and UI agree on.
pub mod channels {
    use super::Channel;

    pub const PING: Channel = Channel::new("mt::ping");
    pub const BOOTSTRAP_EDITOR: Channel = Channel::new("mt::bootstrap-editor");
    pub const EXECUTE_COMMAND_BY_ID: Channel = Channel::new("mt::execute-command-by-id");
    pub const EDITOR_FORMAT_ACTION: Channel = Channel::new("mt::editor-format-action");
    pub const EDITOR_PARAGRAPH_ACTION: Channel = Channel::new("mt::editor-paragraph-action");
    pub const EDITOR_EDIT_ACTION: Channel = Channel::new("mt::editor-edit-action");
    pub const SHOW_NOTIFICATION: Channel = Channel::new("mt::show-notification");
    pub const WINDOW_ACTIVE_STATUS: Channel = Channel::new("mt::window-active-status");
    pub const OPEN_NEW_TAB: Channel = Channel::new("mt::open-new-tab");
    pub const RESPONSE_FILE_SAVE: Channel = Channel::new("mt::response-file-save");

    /// Replies to capability calls made from the UI context.
    pub const CAPABILITY_RESPONSE: Channel = Channel::new("mt::capability-response");

    pub const ALL: &[Channel] = &[
        PING,
        BOOTSTRAP_EDITOR,
        EXECUTE_COMMAND_BY_ID,
        EDITOR_FORMAT_ACTION,
        EDITOR_PARAGRAPH_ACTION,
        EDITOR_EDIT_ACTION,
        SHOW_NOTIFICATION,
        WINDOW_ACTIVE_STATUS,
        OPEN_NEW_TAB,
        RESPONSE_FILE_SAVE,
        CAPABILITY_RESPONSE,
    ];

    /// The known channel called `name`, if any.
    pub fn find(name: &str) -> Option<Channel> {
        ALL.iter().copied().find(|ch| ch.as_str() == name)
    }
}
