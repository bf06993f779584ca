//! Shared application state for the request handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectSessionUseCase, DeleteMessageUseCase, DisconnectSessionUseCase, IngestFileUseCase,
    JoinRoomUseCase, ModerationUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub ingest_file_usecase: Arc<IngestFileUseCase>,
    pub delete_message_usecase: Arc<DeleteMessageUseCase>,
    pub moderation_usecase: Arc<ModerationUseCase>,
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
}
