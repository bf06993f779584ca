//! UseCase: session connect and client metadata.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{ClientMeta, ConnectionId, EventPusher, PusherChannel, SessionRegistry};

pub struct ConnectSessionUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn EventPusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectSessionUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        pusher: Arc<dyn EventPusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            clock,
        }
    }

    /// Register a new anonymous session and its outbound channel.
    ///
    /// # Arguments
    ///
    /// * `remote_addr` - Peer address of the connection, for operator listing
    /// * `sender` - Channel the socket task drains toward this client
    ///
    /// # Returns
    ///
    /// The freshly generated connection id.
    pub async fn execute(&self, remote_addr: String, sender: PusherChannel) -> ConnectionId {
        let conn_id = ConnectionId::generate();
        self.registry
            .register(
                conn_id.clone(),
                remote_addr,
                self.clock.now_unix_millis(),
            )
            .await;
        self.pusher.register_client(conn_id.clone(), sender).await;
        conn_id
    }

    /// Attach informational client metadata; unknown sessions are a no-op
    pub async fn record_client_info(&self, conn_id: &ConnectionId, meta: ClientMeta) {
        tracing::debug!(
            "client info for '{}': os={}, battery={}% (charging: {})",
            conn_id,
            meta.os,
            meta.battery_level,
            meta.charging
        );
        self.registry.set_client_info(conn_id, meta).await;
    }
}
