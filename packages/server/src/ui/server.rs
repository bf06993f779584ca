//! Server execution logic.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectSessionUseCase, DeleteMessageUseCase, DisconnectSessionUseCase, IngestFileUseCase,
    JoinRoomUseCase, ModerationUseCase, SendMessageUseCase,
};

use super::{
    handler::{http::health_check, websocket::websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat room server.
///
/// Owns the wired use cases and exposes them on `/ws` plus a health endpoint.
pub struct Server {
    connect_session_usecase: Arc<ConnectSessionUseCase>,
    join_room_usecase: Arc<JoinRoomUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    ingest_file_usecase: Arc<IngestFileUseCase>,
    delete_message_usecase: Arc<DeleteMessageUseCase>,
    moderation_usecase: Arc<ModerationUseCase>,
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
}

impl Server {
    pub fn new(
        connect_session_usecase: Arc<ConnectSessionUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        ingest_file_usecase: Arc<IngestFileUseCase>,
        delete_message_usecase: Arc<DeleteMessageUseCase>,
        moderation_usecase: Arc<ModerationUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    ) -> Self {
        Self {
            connect_session_usecase,
            join_room_usecase,
            send_message_usecase,
            ingest_file_usecase,
            delete_message_usecase,
            moderation_usecase,
            disconnect_session_usecase,
        }
    }

    /// Bind to `host:port` and serve until a shutdown signal arrives
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&bind_addr).await?;
        self.run_with_listener(listener).await
    }

    /// Serve on an already-bound listener (lets tests bind port 0)
    pub async fn run_with_listener(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_session_usecase: self.connect_session_usecase,
            join_room_usecase: self.join_room_usecase,
            send_message_usecase: self.send_message_usecase,
            ingest_file_usecase: self.ingest_file_usecase,
            delete_message_usecase: self.delete_message_usecase,
            moderation_usecase: self.moderation_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
        });

        let app = Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let local_addr = listener.local_addr()?;
        tracing::info!("chat server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
