//! JSON file HistoryStore: the whole log is rewritten on every save.
//!
//! The on-disk format is a pretty-printed JSON array of event records in
//! append order (`EventDto`). A missing file is an empty log; a file that is
//! not valid JSON is reported as malformed so the caller can fall back to an
//! empty log. Individual records that fail conversion are skipped with a
//! warning rather than discarding the rest of the history.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{ChatEvent, HistoryStore, HistoryStoreError};
use crate::infrastructure::dto::websocket::EventDto;

pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn load(&self) -> Result<Vec<ChatEvent>, HistoryStoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryStoreError::Read(e.to_string())),
        };
        let records: Vec<EventDto> =
            serde_json::from_str(&raw).map_err(|e| HistoryStoreError::Malformed(e.to_string()))?;
        let mut events = Vec::with_capacity(records.len());
        for record in records {
            match ChatEvent::try_from(record) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!("skipping malformed history record: {e}"),
            }
        }
        Ok(events)
    }

    async fn save(&self, events: &[ChatEvent]) -> Result<(), HistoryStoreError> {
        let records: Vec<EventDto> = events.iter().cloned().map(Into::into).collect();
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| HistoryStoreError::Write(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| HistoryStoreError::Write(e.to_string()))
    }
}
