//! UseCase layer: one use case per inbound event, plus the operator console.
//!
//! Use cases orchestrate the domain components and scope every side effect:
//! personal notices go only to the issuer, target notify/close pairs go only
//! to the target, log mutations and presence updates go to everyone.

pub mod connect_session;
pub mod delete_message;
pub mod disconnect_session;
pub mod error;
pub mod ingest_file;
pub mod join_room;
pub mod moderation;
pub mod operator;
pub mod presence;
pub mod send_message;

pub use connect_session::ConnectSessionUseCase;
pub use delete_message::DeleteMessageUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{CommandError, FileIngestError};
pub use ingest_file::IngestFileUseCase;
pub use join_room::JoinRoomUseCase;
pub use moderation::ModerationUseCase;
pub use operator::OperatorUseCase;
pub use send_message::SendMessageUseCase;
