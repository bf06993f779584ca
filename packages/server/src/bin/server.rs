//! Chat room server binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 5000
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hiroba_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};
use hiroba_server::{
    domain::{BanList, MessageLog, SessionRegistry},
    infrastructure::{
        blob::FsBlobStore, history::JsonFileHistoryStore, pusher::WebSocketEventPusher,
    },
    ui::{Server, console::spawn_console},
    usecase::{
        ConnectSessionUseCase, DeleteMessageUseCase, DisconnectSessionUseCase, IngestFileUseCase,
        JoinRoomUseCase, ModerationUseCase, OperatorUseCase, SendMessageUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket chat room server with moderation", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Path of the persisted message history
    #[arg(long, default_value = "chat_history.json")]
    history_file: PathBuf,

    /// Directory uploaded files are written to
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Maximum decoded upload size in bytes (default 100 MiB)
    #[arg(long, default_value_t = 100 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Shared admin secret for the `pass` command
    #[arg(long, env = "HIROBA_ADMIN_SECRET", default_value = "open-sesame")]
    admin_secret: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Stores
    // 2. Core components (log, registry, ban list, pusher)
    // 3. UseCases
    // 4. Console
    // 5. Server

    // 1. Stores
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let history_store = Arc::new(JsonFileHistoryStore::new(&args.history_file));
    let blob_store = Arc::new(FsBlobStore::new(&args.upload_dir));

    // 2. Core components
    let log = Arc::new(MessageLog::load(history_store).await);
    let registry = Arc::new(SessionRegistry::new(args.admin_secret.clone()));
    let ban_list = Arc::new(BanList::new(clock.clone()));
    let pusher = Arc::new(WebSocketEventPusher::new());

    // 3. UseCases
    let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        ban_list.clone(),
        log.clone(),
        pusher.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        log.clone(),
        pusher.clone(),
    ));
    let ingest_file_usecase = Arc::new(IngestFileUseCase::new(
        registry.clone(),
        log.clone(),
        pusher.clone(),
        blob_store,
        clock.clone(),
        args.max_upload_bytes,
    ));
    let delete_message_usecase = Arc::new(DeleteMessageUseCase::new(
        registry.clone(),
        log.clone(),
        pusher.clone(),
    ));
    let moderation_usecase = Arc::new(ModerationUseCase::new(
        registry.clone(),
        ban_list.clone(),
        log.clone(),
        pusher.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        registry.clone(),
        pusher.clone(),
    ));

    // 4. Operator console on stdin
    let operator_usecase = Arc::new(OperatorUseCase::new(
        registry,
        ban_list,
        moderation_usecase.clone(),
    ));
    spawn_console(operator_usecase);

    // 5. Run the server
    let server = Server::new(
        connect_session_usecase,
        join_room_usecase,
        send_message_usecase,
        ingest_file_usecase,
        delete_message_usecase,
        moderation_usecase,
        disconnect_session_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
