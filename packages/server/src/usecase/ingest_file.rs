//! UseCase: inbound file payloads.
//!
//! Payloads arrive as data URIs (`<header>,<base64 body>`). The decoded size
//! is checked against the configured limit before anything touches disk; a
//! rejected or failed upload leaves the log untouched and the issuer gets a
//! personal notice.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use hiroba_shared::time::Clock;

use crate::domain::filename::{extension_for_mime, sanitize_token};
use crate::domain::{
    BlobStore, ChatEvent, ConnectionId, EventDraft, EventPusher, MessageLog, SessionRegistry,
};
use crate::infrastructure::dto::websocket::ServerFrame;

use super::error::FileIngestError;

pub struct IngestFileUseCase {
    registry: Arc<SessionRegistry>,
    log: Arc<MessageLog>,
    pusher: Arc<dyn EventPusher>,
    blob_store: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    max_file_bytes: usize,
}

impl IngestFileUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        log: Arc<MessageLog>,
        pusher: Arc<dyn EventPusher>,
        blob_store: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
        max_file_bytes: usize,
    ) -> Self {
        Self {
            registry,
            log,
            pusher,
            blob_store,
            clock,
            max_file_bytes,
        }
    }

    /// Handle a file upload from a joined session.
    ///
    /// On success the stored file becomes a log entry broadcast to everyone;
    /// on any failure the issuer gets a personal notice and nothing else
    /// happens.
    pub async fn execute(&self, conn_id: &ConnectionId, data_uri: &str, mime_type: &str) {
        let Some(session) = self.registry.get(conn_id).await else {
            return;
        };
        let Some(author) = session.name else {
            tracing::debug!("dropping file from unjoined session '{}'", conn_id);
            return;
        };
        match self
            .ingest(&author, session.is_admin, data_uri, mime_type)
            .await
        {
            Ok(event) => {
                self.pusher
                    .broadcast(&ServerFrame::File(event.into()).to_json())
                    .await;
            }
            Err(e) => {
                tracing::warn!("file upload from '{}' failed: {}", author, e);
                self.pusher
                    .push_to(
                        conn_id,
                        &ServerFrame::System {
                            message: format!("Upload failed: {e}"),
                        }
                        .to_json(),
                    )
                    .await;
            }
        }
    }

    async fn ingest(
        &self,
        author: &str,
        is_admin: bool,
        data_uri: &str,
        mime_type: &str,
    ) -> Result<ChatEvent, FileIngestError> {
        let (_header, encoded) = data_uri
            .split_once(',')
            .ok_or(FileIngestError::MalformedPayload)?;
        let bytes = BASE64_STANDARD.decode(encoded.trim())?;
        if bytes.len() > self.max_file_bytes {
            return Err(FileIngestError::TooLarge {
                limit_bytes: self.max_file_bytes,
            });
        }

        let unix_secs = self.clock.now_unix_millis() / 1000;
        let ext = extension_for_mime(mime_type);
        let filename = format!("{}.{}", sanitize_token(&format!("{author}_{unix_secs}")), ext);
        let file_ref = self.blob_store.put(&filename, &bytes).await?;

        Ok(self
            .log
            .append(EventDraft::File {
                author: author.to_string(),
                file_ref,
                mime_type: mime_type.to_string(),
                is_admin,
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::MockBlobStore;
    use crate::domain::{BanList, HistoryStore, HistoryStoreError, OutboundFrame};
    use crate::infrastructure::pusher::WebSocketEventPusher;
    use async_trait::async_trait;
    use base64::Engine as _;
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

    const LIMIT: usize = 16;

    struct TestRoom {
        usecase: IngestFileUseCase,
        registry: Arc<SessionRegistry>,
        log: Arc<MessageLog>,
        pusher: Arc<WebSocketEventPusher>,
    }

    /// Build the usecase around a mocked blob store and a tiny size limit
    async fn create_test_room(blob_store: MockBlobStore) -> TestRoom {
        let registry = Arc::new(SessionRegistry::new("sesame".to_string()));
        let log = Arc::new(MessageLog::load(Arc::new(NullHistoryStore)).await);
        let pusher = Arc::new(WebSocketEventPusher::new());
        let usecase = IngestFileUseCase::new(
            registry.clone(),
            log.clone(),
            pusher.clone(),
            Arc::new(blob_store),
            Arc::new(ManualClock::new(1_700_000_000_000)),
            LIMIT,
        );
        TestRoom {
            usecase,
            registry,
            log,
            pusher,
        }
    }

    async fn join(
        room: &TestRoom,
        raw_id: &str,
        name: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<OutboundFrame>) {
        let ban_list = BanList::new(Arc::new(ManualClock::new(0)));
        let conn_id = ConnectionId::fixed(raw_id);
        let (tx, rx) = mpsc::unbounded_channel();
        room.registry
            .register(conn_id.clone(), "127.0.0.1:9".to_string(), 1_000)
            .await;
        room.pusher.register_client(conn_id.clone(), tx).await;
        room.registry.join(&conn_id, name, false, &ban_list).await;
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

    fn data_uri(bytes: &[u8]) -> String {
        format!(
            "data:application/octet-stream;base64,{}",
            BASE64_STANDARD.encode(bytes)
        )
    }

    #[tokio::test]
    async fn test_upload_stores_blob_and_appends_file_event() {
        // テスト項目: アップロード成功で blob 書き込み・ログ追記・全員配送が起きる
        // given (前提条件):
        let mut blob_store = MockBlobStore::new();
        blob_store
            .expect_put()
            .withf(|filename, bytes| filename == "alice_1700000000.png" && bytes == b"fake png")
            .times(1)
            .returning(|filename, _| Ok(format!("/uploads/{filename}")));
        let room = create_test_room(blob_store).await;
        let (alice, mut rx) = join(&room, "conn-1", "alice").await;

        // when (操作):
        room.usecase
            .execute(&alice, &data_uri(b"fake png"), "image/png")
            .await;

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        match &frames[0] {
            ServerFrame::File(event) => {
                assert_eq!(event.id, "0");
                assert_eq!(event.name, "alice");
                assert_eq!(
                    event.file_path.as_deref(),
                    Some("/uploads/alice_1700000000.png")
                );
                assert_eq!(event.file_type.as_deref(), Some("image/png"));
            }
            other => panic!("expected file frame, got {other:?}"),
        }
        assert_eq!(room.log.len().await, 1);
    }

    #[tokio::test]
    async fn test_upload_at_exact_limit_succeeds() {
        // テスト項目: 上限ちょうどのサイズは受理される
        // given (前提条件):
        let mut blob_store = MockBlobStore::new();
        blob_store
            .expect_put()
            .times(1)
            .returning(|filename, _| Ok(format!("/uploads/{filename}")));
        let room = create_test_room(blob_store).await;
        let (alice, mut rx) = join(&room, "conn-1", "alice").await;

        // when (操作):
        room.usecase
            .execute(&alice, &data_uri(&vec![0u8; LIMIT]), "application/pdf")
            .await;

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert!(matches!(frames[0], ServerFrame::File(_)));
        assert_eq!(room.log.len().await, 1);
    }

    #[tokio::test]
    async fn test_upload_one_byte_over_limit_is_rejected() {
        // テスト項目: 上限 +1 バイトは拒否され、ログは変化しない
        // given (前提条件): blob ストアは呼ばれないはず
        let mut blob_store = MockBlobStore::new();
        blob_store.expect_put().times(0);
        let room = create_test_room(blob_store).await;
        let (alice, mut rx) = join(&room, "conn-1", "alice").await;

        // when (操作):
        room.usecase
            .execute(&alice, &data_uri(&vec![0u8; LIMIT + 1]), "application/pdf")
            .await;

        // then (期待する結果): issuer だけに失敗通知が届く
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert!(matches!(
            &frames[0],
            ServerFrame::System { message } if message.starts_with("Upload failed:")
        ));
        assert_eq!(room.log.len().await, 0);
    }

    #[tokio::test]
    async fn test_payload_without_comma_is_rejected() {
        // テスト項目: data URI の形をしていないペイロードは拒否される
        // given (前提条件):
        let mut blob_store = MockBlobStore::new();
        blob_store.expect_put().times(0);
        let room = create_test_room(blob_store).await;
        let (alice, mut rx) = join(&room, "conn-1", "alice").await;

        // when (操作):
        room.usecase
            .execute(&alice, "definitely-not-a-data-uri", "image/png")
            .await;

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert!(matches!(&frames[0], ServerFrame::System { .. }));
        assert_eq!(room.log.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_base64_is_rejected() {
        // テスト項目: base64 として壊れた本文は拒否される
        // given (前提条件):
        let mut blob_store = MockBlobStore::new();
        blob_store.expect_put().times(0);
        let room = create_test_room(blob_store).await;
        let (alice, mut rx) = join(&room, "conn-1", "alice").await;

        // when (操作):
        room.usecase
            .execute(&alice, "data:image/png;base64,!!!not-base64!!!", "image/png")
            .await;

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert!(matches!(&frames[0], ServerFrame::System { .. }));
        assert_eq!(room.log.len().await, 0);
    }

    #[tokio::test]
    async fn test_jpeg_mime_maps_to_jpg_filename() {
        // テスト項目: image/jpeg の拡張子が jpg にリマップされる
        // given (前提条件):
        let mut blob_store = MockBlobStore::new();
        blob_store
            .expect_put()
            .withf(|filename, _| filename.ends_with(".jpg"))
            .times(1)
            .returning(|filename, _| Ok(format!("/uploads/{filename}")));
        let room = create_test_room(blob_store).await;
        let (alice, _rx) = join(&room, "conn-1", "alice").await;

        // when (操作):
        room.usecase
            .execute(&alice, &data_uri(b"jpg"), "image/jpeg")
            .await;

        // then (期待する結果): expect_put の withf が検証する
    }
}
