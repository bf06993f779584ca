//! Entities: live sessions and chat log events.

use super::value_object::{ConnectionId, MessageId};

/// Informational client metadata reported after connect (OS, battery).
///
/// Stored for operator listing and debug logging only; no behavior reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMeta {
    pub os: String,
    pub battery_level: String,
    pub charging: bool,
}

/// Server-side state for one live connection.
///
/// Created on connect with no display name; the name (and admin flag) are set
/// when the participant joins. Destroyed on disconnect.
#[derive(Debug, Clone)]
pub struct Session {
    pub conn_id: ConnectionId,
    pub remote_addr: String,
    /// Display name; `None` until the participant has joined.
    pub name: Option<String>,
    pub is_admin: bool,
    /// Unix timestamp (milliseconds) of the connection
    pub connected_at: i64,
    pub meta: Option<ClientMeta>,
}

impl Session {
    /// Create a fresh anonymous session
    pub fn new(conn_id: ConnectionId, remote_addr: String, connected_at: i64) -> Self {
        Self {
            conn_id,
            remote_addr,
            name: None,
            is_admin: false,
            connected_at,
            meta: None,
        }
    }
}

/// One immutable entry in the message log.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Text {
        id: MessageId,
        author: String,
        body: String,
        is_admin: bool,
    },
    File {
        id: MessageId,
        author: String,
        /// Public reference to the stored blob (e.g. `/uploads/alice_17.jpg`)
        file_ref: String,
        mime_type: String,
        is_admin: bool,
    },
    System {
        id: MessageId,
        text: String,
    },
}

impl ChatEvent {
    pub fn id(&self) -> MessageId {
        match self {
            ChatEvent::Text { id, .. } | ChatEvent::File { id, .. } | ChatEvent::System { id, .. } => {
                *id
            }
        }
    }
}

/// A log entry before the id counter has stamped it.
///
/// Only `MessageLog::append` turns a draft into a `ChatEvent`; nothing else
/// assigns ids.
#[derive(Debug, Clone)]
pub enum EventDraft {
    Text {
        author: String,
        body: String,
        is_admin: bool,
    },
    File {
        author: String,
        file_ref: String,
        mime_type: String,
        is_admin: bool,
    },
    System {
        text: String,
    },
}

impl EventDraft {
    pub(crate) fn into_event(self, id: MessageId) -> ChatEvent {
        match self {
            EventDraft::Text {
                author,
                body,
                is_admin,
            } => ChatEvent::Text {
                id,
                author,
                body,
                is_admin,
            },
            EventDraft::File {
                author,
                file_ref,
                mime_type,
                is_admin,
            } => ChatEvent::File {
                id,
                author,
                file_ref,
                mime_type,
                is_admin,
            },
            EventDraft::System { text } => ChatEvent::System { id, text },
        }
    }
}

/// One row of the presence broadcast: a joined participant and its admin flag.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceEntry {
    pub name: String,
    pub is_admin: bool,
}
