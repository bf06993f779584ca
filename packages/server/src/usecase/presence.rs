//! Presence broadcast helper.
//!
//! Called after every event that changes a name, an admin flag or
//! connectivity, so every client always holds the latest participant list.

use crate::domain::{EventPusher, SessionRegistry};
use crate::infrastructure::dto::websocket::{PresenceEntryDto, ServerFrame};

/// Snapshot the registry and fan the participant list out to every session
pub async fn broadcast_presence(registry: &SessionRegistry, pusher: &dyn EventPusher) {
    let users: Vec<PresenceEntryDto> = registry
        .snapshot()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    let frame = ServerFrame::Presence { users };
    pusher.broadcast(&frame.to_json()).await;
}
