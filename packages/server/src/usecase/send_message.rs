//! UseCase: text chat messages.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventDraft, EventPusher, MessageLog, SessionRegistry};
use crate::infrastructure::dto::websocket::ServerFrame;

pub struct SendMessageUseCase {
    registry: Arc<SessionRegistry>,
    log: Arc<MessageLog>,
    pusher: Arc<dyn EventPusher>,
}

impl SendMessageUseCase {
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

    /// Append a text message to the log and fan it out to everyone.
    ///
    /// Messages from sessions that have not joined (no display name yet) are
    /// dropped silently.
    pub async fn execute(&self, conn_id: &ConnectionId, text: String) {
        let Some(session) = self.registry.get(conn_id).await else {
            return;
        };
        let Some(author) = session.name else {
            tracing::debug!("dropping message from unjoined session '{}'", conn_id);
            return;
        };
        let event = self
            .log
            .append(EventDraft::Text {
                author,
                body: text,
                is_admin: session.is_admin,
            })
            .await;
        self.pusher
            .broadcast(&ServerFrame::Chat(event.into()).to_json())
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BanList, ChatEvent, HistoryStore, HistoryStoreError, OutboundFrame};
    use crate::infrastructure::pusher::WebSocketEventPusher;
    use async_trait::async_trait;
    use hiroba_shared::time::ManualClock;
    use tokio::sync::mpsc;

    struct NullHistoryStore;

    #[async_trait]
    impl HistoryStore for NullHistoryStore {
        async fn load(&self) -> Result<Vec<ChatEvent>, HistoryStoreError> {
            Ok(Vec::new())
        }

        async fn save(&self, _events: &[ChatEvent]) -> Result<(), HistoryStoreError> {
            Ok(())
        }
    }

    struct TestRoom {
        usecase: SendMessageUseCase,
        registry: Arc<SessionRegistry>,
        ban_list: Arc<BanList>,
        log: Arc<MessageLog>,
        pusher: Arc<WebSocketEventPusher>,
    }

    async fn create_test_room() -> TestRoom {
        let registry = Arc::new(SessionRegistry::new("sesame".to_string()));
        let ban_list = Arc::new(BanList::new(Arc::new(ManualClock::new(0))));
        let log = Arc::new(MessageLog::load(Arc::new(NullHistoryStore)).await);
        let pusher = Arc::new(WebSocketEventPusher::new());
        let usecase = SendMessageUseCase::new(registry.clone(), log.clone(), pusher.clone());
        TestRoom {
            usecase,
            registry,
            ban_list,
            log,
            pusher,
        }
    }

    async fn join(
        room: &TestRoom,
        raw_id: &str,
        name: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<OutboundFrame>) {
        let conn_id = ConnectionId::fixed(raw_id);
        let (tx, rx) = mpsc::unbounded_channel();
        room.registry
            .register(conn_id.clone(), "127.0.0.1:9".to_string(), 1_000)
            .await;
        room.pusher.register_client(conn_id.clone(), tx).await;
        room.registry
            .join(&conn_id, name, false, &room.ban_list)
            .await;
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
    async fn test_first_message_in_fresh_log_has_id_zero() {
        // テスト項目: 新しいログへの最初のメッセージは id "0" で全員に届く
        // given (前提条件):
        let room = create_test_room().await;
        let (alice, mut alice_rx) = join(&room, "conn-1", "alice").await;
        let (_bob, mut bob_rx) = join(&room, "conn-2", "bob").await;

        // when (操作):
        room.usecase.execute(&alice, "hi".to_string()).await;

        // then (期待する結果): 送信者含む全員が同じフレームを受け取る
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 1);
            match &frames[0] {
                ServerFrame::Chat(event) => {
                    assert_eq!(event.id, "0");
                    assert_eq!(event.name, "alice");
                    assert_eq!(event.message.as_deref(), Some("hi"));
                    assert!(!event.is_admin);
                }
                other => panic!("expected chat frame, got {other:?}"),
            }
        }
        assert_eq!(room.log.len().await, 1);
    }

    #[tokio::test]
    async fn test_unjoined_session_message_is_dropped() {
        // テスト項目: join 前のセッションのメッセージはログにも配送にも現れない
        // given (前提条件): register のみで join していないセッション
        let room = create_test_room().await;
        let conn_id = ConnectionId::fixed("conn-1");
        let (tx, mut rx) = mpsc::unbounded_channel();
        room.registry
            .register(conn_id.clone(), "127.0.0.1:9".to_string(), 1_000)
            .await;
        room.pusher.register_client(conn_id.clone(), tx).await;

        // when (操作):
        room.usecase.execute(&conn_id, "sneaky".to_string()).await;

        // then (期待する結果):
        assert!(drain(&mut rx).is_empty());
        assert_eq!(room.log.len().await, 0);
    }

    #[tokio::test]
    async fn test_admin_flag_is_stamped_on_message() {
        // テスト項目: admin セッションのメッセージは is_admin 付きで記録される
        // given (前提条件):
        let room = create_test_room().await;
        let (alice, mut rx) = join(&room, "conn-1", "alice").await;
        room.registry.authenticate(&alice, "sesame").await;

        // when (操作):
        room.usecase.execute(&alice, "order".to_string()).await;

        // then (期待する結果):
        let frames = drain(&mut rx);
        match &frames[0] {
            ServerFrame::Chat(event) => assert!(event.is_admin),
            other => panic!("expected chat frame, got {other:?}"),
        }
    }
}
