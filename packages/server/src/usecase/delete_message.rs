//! UseCase: deleting a single log entry (admins only).

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPusher, MessageId, MessageLog, SessionRegistry};
use crate::infrastructure::dto::websocket::ServerFrame;

pub struct DeleteMessageUseCase {
    registry: Arc<SessionRegistry>,
    log: Arc<MessageLog>,
    pusher: Arc<dyn EventPusher>,
}

impl DeleteMessageUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        log: Arc<MessageLog>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            registry,
            log,
            pusher,
        }
    }

    /// Delete the log entry with the given id and confirm to everyone.
    ///
    /// Non-admin issuers get a personal notice. Deleting an id that is
    /// already gone is silent — two admins racing to delete the same message
    /// is normal.
    pub async fn execute(&self, conn_id: &ConnectionId, raw_id: &str) {
        let Some(session) = self.registry.get(conn_id).await else {
            return;
        };
        if !session.is_admin {
            self.pusher
                .push_to(
                    conn_id,
                    &ServerFrame::System {
                        message: "Only admins can delete messages.".to_string(),
                    }
                    .to_json(),
                )
                .await;
            return;
        }
        let Ok(id) = raw_id.parse::<MessageId>() else {
            self.pusher
                .push_to(
                    conn_id,
                    &ServerFrame::System {
                        message: format!("Invalid message id '{raw_id}'."),
                    }
                    .to_json(),
                )
                .await;
            return;
        };
        if self.log.delete_by_id(id).await {
            tracing::info!(
                "admin '{}' deleted message {}",
                session.name.as_deref().unwrap_or("unnamed"),
                id
            );
            self.pusher
                .broadcast(&ServerFrame::Delete { id: id.to_string() }.to_json())
                .await;
        } else {
            tracing::debug!("delete for unknown message id {}", id);
        }
    }
}
