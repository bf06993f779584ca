//! Storage interfaces the domain requires from the infrastructure layer.
//!
//! The domain defines what it needs; concrete implementations (JSON file,
//! filesystem blob directory) live in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

use super::entity::ChatEvent;

#[derive(Debug, Error)]
pub enum HistoryStoreError {
    #[error("failed to read history: {0}")]
    Read(String),
    #[error("failed to write history: {0}")]
    Write(String),
    #[error("history is not valid JSON: {0}")]
    Malformed(String),
}

/// Durable snapshot storage for the message log.
///
/// Saving rewrites the whole log; loading returns the full ordered sequence.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> Result<Vec<ChatEvent>, HistoryStoreError>;

    async fn save(&self, events: &[ChatEvent]) -> Result<(), HistoryStoreError>;
}

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("failed to write blob '{name}': {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },
}

/// Opaque blob storage for uploaded file payloads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `filename` and return the public reference path
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, BlobStoreError>;
}
