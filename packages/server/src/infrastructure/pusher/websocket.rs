//! WebSocket-backed EventPusher implementation.
//!
//! ## Responsibilities
//!
//! - Own the map of live connections to their outbound channels
//! - Deliver serialized frames to one or all sessions (push_to, broadcast)
//! - Relay the close signal that tears a kicked/banned connection down
//!
//! Socket creation happens in the UI layer (`ui/handler/websocket.rs`); this
//! implementation only holds the channel senders the socket tasks drain.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, OutboundFrame, PusherChannel};

pub struct WebSocketEventPusher {
    /// Live connections and their outbound channel senders
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketEventPusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register_client(&self, conn_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(conn_id.clone(), sender);
        tracing::debug!("client '{}' registered to pusher", conn_id);
    }

    async fn unregister_client(&self, conn_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(conn_id);
        tracing::debug!("client '{}' unregistered from pusher", conn_id);
    }

    async fn push_to(&self, conn_id: &ConnectionId, content: &str) {
        let clients = self.clients.lock().await;
        match clients.get(conn_id) {
            Some(sender) => {
                if sender
                    .send(OutboundFrame::Text(content.to_string()))
                    .is_err()
                {
                    tracing::debug!("client '{}' channel closed, frame dropped", conn_id);
                }
            }
            // expected race between a disconnect and an in-flight send
            None => tracing::debug!("client '{}' not connected, frame dropped", conn_id),
        }
    }

    async fn broadcast(&self, content: &str) {
        let clients = self.clients.lock().await;
        for (conn_id, sender) in clients.iter() {
            if sender
                .send(OutboundFrame::Text(content.to_string()))
                .is_err()
            {
                tracing::warn!("failed to push frame to client '{}'", conn_id);
            }
        }
    }

    async fn close(&self, conn_id: &ConnectionId) {
        let clients = self.clients.lock().await;
        if let Some(sender) = clients.get(conn_id) {
            let _ = sender.send(OutboundFrame::Close);
        }
    }
}
