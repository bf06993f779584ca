//! UseCase: session disconnect.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPusher, SessionRegistry};
use crate::infrastructure::dto::websocket::ServerFrame;

use super::presence::broadcast_presence;

pub struct DisconnectSessionUseCase {
    registry: Arc<SessionRegistry>,
    pusher: Arc<dyn EventPusher>,
}

impl DisconnectSessionUseCase {
    pub fn new(registry: Arc<SessionRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// Remove the session and announce the departure if it had joined.
    ///
    /// Removal happens exactly once: a second call for the same connection
    /// (e.g. a disconnect racing an in-flight kick) is a no-op.
    pub async fn execute(&self, conn_id: &ConnectionId, reason: &str) {
        self.pusher.unregister_client(conn_id).await;
        let Some(session) = self.registry.remove(conn_id).await else {
            return;
        };
        if let Some(name) = &session.name {
            tracing::info!(
                "[{}] '{}' disconnected: {}",
                if session.is_admin { "admin" } else { "user" },
                name,
                reason
            );
            self.pusher
                .broadcast(
                    &ServerFrame::System {
                        message: format!("**{name}** left the room"),
                    }
                    .to_json(),
                )
                .await;
        }
        broadcast_presence(&self.registry, self.pusher.as_ref()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BanList, OutboundFrame};
    use crate::infrastructure::pusher::WebSocketEventPusher;
    use hiroba_shared::time::ManualClock;
    use tokio::sync::mpsc;

    struct TestRoom {
        usecase: DisconnectSessionUseCase,
        registry: Arc<SessionRegistry>,
        ban_list: Arc<BanList>,
        pusher: Arc<WebSocketEventPusher>,
    }

    async fn create_test_room() -> TestRoom {
        let registry = Arc::new(SessionRegistry::new("sesame".to_string()));
        let ban_list = Arc::new(BanList::new(Arc::new(ManualClock::new(0))));
        let pusher = Arc::new(WebSocketEventPusher::new());
        let usecase = DisconnectSessionUseCase::new(registry.clone(), pusher.clone());
        TestRoom {
            usecase,
            registry,
            ban_list,
            pusher,
        }
    }

    async fn connect(
        room: &TestRoom,
        raw_id: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<OutboundFrame>) {
        let conn_id = ConnectionId::fixed(raw_id);
        let (tx, rx) = mpsc::unbounded_channel();
        room.registry
            .register(conn_id.clone(), "127.0.0.1:9".to_string(), 1_000)
            .await;
        room.pusher.register_client(conn_id.clone(), tx).await;
        (conn_id, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<OutboundFrame>) -> Vec<ServerFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            if let OutboundFrame::Text(json) = frame {
                frames.push(serde_json::from_str(&json).unwrap());
            }
        }
        frames
    }

    #[tokio::test]
    async fn test_disconnect_announces_and_drops_from_presence() {
        // テスト項目: 参加済みセッションの切断で退出通知と presence 更新が届く
        // given (前提条件): alice と bob が参加済み
        let room = create_test_room().await;
        let (alice, _alice_rx) = connect(&room, "conn-1").await;
        let (bob, mut bob_rx) = connect(&room, "conn-2").await;
        room.registry
            .join(&alice, "alice", false, &room.ban_list)
            .await;
        room.registry.join(&bob, "bob", false, &room.ban_list).await;

        // when (操作):
        room.usecase.execute(&alice, "socket closed").await;

        // then (期待する結果):
        assert!(room.registry.get(&alice).await.is_none());
        let frames = drain(&mut bob_rx);
        assert_eq!(
            frames[0],
            ServerFrame::System {
                message: "**alice** left the room".to_string()
            }
        );
        match &frames[1] {
            ServerFrame::Presence { users } => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].name, "bob");
            }
            other => panic!("expected presence frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unjoined_disconnect_is_quiet() {
        // テスト項目: join していないセッションの切断は退出通知を出さない
        // given (前提条件):
        let room = create_test_room().await;
        let (anon, _anon_rx) = connect(&room, "conn-1").await;
        let (bob, mut bob_rx) = connect(&room, "conn-2").await;
        room.registry.join(&bob, "bob", false, &room.ban_list).await;

        // when (操作):
        room.usecase.execute(&anon, "socket closed").await;

        // then (期待する結果): presence 更新だけが届く
        let frames = drain(&mut bob_rx);
        assert_eq!(frames.len(), 1);
        assert!(matches!(frames[0], ServerFrame::Presence { .. }));
    }

    #[tokio::test]
    async fn test_second_disconnect_is_noop() {
        // テスト項目: 同じ接続の二重切断は何もしない
        // given (前提条件):
        let room = create_test_room().await;
        let (alice, _alice_rx) = connect(&room, "conn-1").await;
        let (bob, mut bob_rx) = connect(&room, "conn-2").await;
        room.registry
            .join(&alice, "alice", false, &room.ban_list)
            .await;
        room.registry.join(&bob, "bob", false, &room.ban_list).await;
        room.usecase.execute(&alice, "socket closed").await;
        drain(&mut bob_rx);

        // when (操作):
        room.usecase.execute(&alice, "socket closed").await;

        // then (期待する結果): 追加のフレームは届かない
        assert!(drain(&mut bob_rx).is_empty());
    }
}
