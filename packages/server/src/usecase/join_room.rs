//! UseCase: joining the room.
//!
//! Order on success: replay the log to the joiner, announce the join to
//! everyone, broadcast presence — each exactly once. A banned name gets a
//! personal banned frame and no name is registered.

use std::sync::Arc;

use crate::domain::{BanList, ConnectionId, EventPusher, JoinOutcome, MessageLog, SessionRegistry};
use crate::infrastructure::dto::websocket::{EventDto, ServerFrame};

use super::presence::broadcast_presence;

pub struct JoinRoomUseCase {
    registry: Arc<SessionRegistry>,
    ban_list: Arc<BanList>,
    log: Arc<MessageLog>,
    pusher: Arc<dyn EventPusher>,
}

impl JoinRoomUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        ban_list: Arc<BanList>,
        log: Arc<MessageLog>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            registry,
            ban_list,
            log,
            pusher,
        }
    }

    /// Handle a join request from a connected session
    pub async fn execute(&self, conn_id: &ConnectionId, requested_name: &str, admin_hint: bool) {
        match self
            .registry
            .join(conn_id, requested_name, admin_hint, &self.ban_list)
            .await
        {
            None => {
                tracing::warn!("join from unknown session '{}'", conn_id);
            }
            Some(JoinOutcome::Banned { remaining_secs }) => {
                tracing::info!(
                    "join refused for banned name '{}' ({}s remaining)",
                    requested_name,
                    remaining_secs
                );
                self.pusher
                    .push_to(conn_id, &ServerFrame::Banned { remaining_secs }.to_json())
                    .await;
            }
            Some(JoinOutcome::Joined { name }) => {
                let events: Vec<EventDto> =
                    self.log.all().await.into_iter().map(Into::into).collect();
                self.pusher
                    .push_to(conn_id, &ServerFrame::History { events }.to_json())
                    .await;
                self.pusher
                    .broadcast(
                        &ServerFrame::System {
                            message: format!("**{name}** joined the room"),
                        }
                        .to_json(),
                    )
                    .await;
                broadcast_presence(&self.registry, self.pusher.as_ref()).await;
                tracing::info!("session '{}' joined as '{}'", conn_id, name);
            }
        }
    }
}
