//! WebSocket frame DTOs.
//!
//! Frames are JSON objects tagged by a `type` field, one closed set per
//! direction. Unknown or malformed inbound frames are rejected at parse time.

use serde::{Deserialize, Serialize};

/// Inbound frame from a connected client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Informational client metadata (OS, battery)
    ClientInfo {
        #[serde(default)]
        os: Option<String>,
        #[serde(default)]
        battery_level: Option<String>,
        #[serde(default)]
        charging: Option<bool>,
    },
    /// Enter the room under a display name
    Join {
        name: String,
        #[serde(default)]
        is_admin: bool,
    },
    /// A text chat message
    Chat { message: String },
    /// A file payload as a data URI plus its declared MIME type
    File {
        file_data: String,
        file_type: String,
    },
    /// Delete a log entry by id (admins only)
    Delete { id: String },
    /// A moderation command line (e.g. `pass <secret>`, `kick <name>`)
    Command { command: String },
}

/// One log event on the wire; also the persisted history record.
///
/// Text and system events carry `message`, file events carry
/// `file_path`/`file_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceEntryDto {
    pub name: String,
    pub is_admin: bool,
}

/// Outbound frame to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Full log replay for a newly joined session
    History { events: Vec<EventDto> },
    /// A text message appended to the log
    Chat(EventDto),
    /// A file message appended to the log
    File(EventDto),
    /// A transient notice; carries no id and is never logged
    System { message: String },
    /// A log entry was deleted
    Delete { id: String },
    /// The whole log was cleared
    Clearchat,
    /// Current list of joined participants
    Presence { users: Vec<PresenceEntryDto> },
    /// The receiving (or, broadcast, some) session's admin status changed
    AuthStatus { is_admin: bool },
    /// Join refused: the name is banned for another `remaining_secs`
    Banned { remaining_secs: u64 },
}

impl ServerFrame {
    /// Serialize for the wire. The frame types contain nothing that can fail
    /// to serialize.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerFrame serializes to JSON")
    }
}
