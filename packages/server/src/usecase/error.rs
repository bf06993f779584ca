//! UseCase error types.
//!
//! The `Display` text of these errors is what the issuing session sees as a
//! notice, so the messages are written for participants, not operators.

use thiserror::Error;

use crate::domain::BlobStoreError;

/// A moderation command that could not be carried out.
///
/// None of these change any state; the issuer gets the message, nobody else
/// sees anything.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Empty command.")]
    Empty,
    #[error("Unknown admin command: /{0}")]
    Unknown(String),
    #[error("Invalid command: /{0}. Only admins can do that.")]
    NotAdmin(String),
    #[error("Usage: /{cmd} <name>")]
    MissingArgument { cmd: &'static str },
    #[error("No user named '{0}' is online.")]
    TargetNotFound(String),
    #[error("You cannot demote yourself.")]
    SelfDemotion,
    #[error("Wrong admin secret.")]
    SecretMismatch,
}

/// A file upload that was rejected or failed before reaching the log
#[derive(Debug, Error)]
pub enum FileIngestError {
    #[error("malformed file payload (expected a data URI)")]
    MalformedPayload,
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("file too large (limit {limit_bytes} bytes)")]
    TooLarge { limit_bytes: usize },
    #[error(transparent)]
    Store(#[from] BlobStoreError),
}
