//! WebSocket connection handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ClientMeta, ConnectionId, OutboundFrame};
use crate::infrastructure::dto::websocket::ClientFrame;
use crate::ui::state::AppState;

/// Normal closure, sent when a moderator removes the connection
const CLOSE_NORMAL: u16 = 1000;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, addr))
}

/// Spawns a task that drains the session's outbound channel into the socket.
///
/// A `Close` signal (kick/ban) sends a WebSocket Close frame and ends the
/// task, which tears the whole connection down via the select below.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close => {
                    let _ = sender
                        .send(Message::Close(Some(CloseFrame {
                            code: CLOSE_NORMAL,
                            reason: "removed by moderator".into(),
                        })))
                        .await;
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, addr: SocketAddr) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let conn_id = state
        .connect_session_usecase
        .execute(addr.to_string(), tx)
        .await;
    tracing::info!("session '{}' connected from {}", conn_id, addr);

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let conn_id_clone = conn_id.clone();
    // Receive frames from this client and route them to the use cases
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("websocket error on '{}': {}", conn_id_clone, e);
                    break;
                }
            };
            match msg {
                Message::Text(text) => {
                    dispatch_frame(&state_clone, &conn_id_clone, text.as_str()).await;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("session '{}' requested close", conn_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If either side finishes (client went away, or we pushed a Close), stop
    // the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_session_usecase
        .execute(&conn_id, "socket closed")
        .await;
}

/// Parse one inbound text frame and route it. A frame that does not parse is
/// logged and dropped; it must never affect other sessions.
async fn dispatch_frame(state: &Arc<AppState>, conn_id: &ConnectionId, raw: &str) {
    let frame = match serde_json::from_str::<ClientFrame>(raw) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("session '{}' sent an unparseable frame: {}", conn_id, e);
            return;
        }
    };
    match frame {
        ClientFrame::ClientInfo {
            os,
            battery_level,
            charging,
        } => {
            let meta = ClientMeta {
                os: os.unwrap_or_else(|| "N/A".to_string()),
                battery_level: battery_level.unwrap_or_else(|| "N/A".to_string()),
                charging: charging.unwrap_or(false),
            };
            state
                .connect_session_usecase
                .record_client_info(conn_id, meta)
                .await;
        }
        ClientFrame::Join { name, is_admin } => {
            state
                .join_room_usecase
                .execute(conn_id, &name, is_admin)
                .await;
        }
        ClientFrame::Chat { message } => {
            state.send_message_usecase.execute(conn_id, message).await;
        }
        ClientFrame::File {
            file_data,
            file_type,
        } => {
            state
                .ingest_file_usecase
                .execute(conn_id, &file_data, &file_type)
                .await;
        }
        ClientFrame::Delete { id } => {
            state.delete_message_usecase.execute(conn_id, &id).await;
        }
        ClientFrame::Command { command } => {
            // failures already turn into personal notices inside the use case
            let _ = state.moderation_usecase.execute(conn_id, &command).await;
        }
    }
}
