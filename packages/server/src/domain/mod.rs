//! Core chat-room domain: sessions, message log, bans and delivery interfaces.
//!
//! Each stateful component guards itself with a single exclusive
//! `tokio::sync::Mutex`. When a flow has to hold more than one lock at a
//! time, the acquisition order is: session registry → message log → ban list.

pub mod ban_list;
pub mod entity;
pub mod filename;
pub mod message_log;
pub mod pusher;
pub mod session_registry;
pub mod store;
pub mod value_object;

pub use ban_list::{BAN_DURATION_SECS, BanEntry, BanList};
pub use entity::{ChatEvent, ClientMeta, EventDraft, PresenceEntry, Session};
pub use message_log::MessageLog;
pub use pusher::{EventPusher, OutboundFrame, PusherChannel};
pub use session_registry::{JoinOutcome, SessionRegistry};
pub use store::{BlobStore, BlobStoreError, HistoryStore, HistoryStoreError};
pub use value_object::{ConnectionId, MessageId};
