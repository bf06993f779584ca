//! Conversion logic between DTOs and domain entities.

use thiserror::Error;

use crate::domain::{ChatEvent, MessageId, PresenceEntry};

use super::websocket::{EventDto, PresenceEntryDto};

/// Author name under which system events are persisted
pub const SYSTEM_NAME: &str = "System";

#[derive(Debug, Error)]
pub enum DtoError {
    #[error("invalid message id '{0}'")]
    InvalidId(String),
    #[error("record '{0}' has neither message nor file fields")]
    MissingBody(String),
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatEvent> for EventDto {
    fn from(event: ChatEvent) -> Self {
        match event {
            ChatEvent::Text {
                id,
                author,
                body,
                is_admin,
            } => Self {
                id: id.to_string(),
                name: author,
                message: Some(body),
                file_path: None,
                file_type: None,
                is_admin,
            },
            ChatEvent::File {
                id,
                author,
                file_ref,
                mime_type,
                is_admin,
            } => Self {
                id: id.to_string(),
                name: author,
                message: None,
                file_path: Some(file_ref),
                file_type: Some(mime_type),
                is_admin,
            },
            ChatEvent::System { id, text } => Self {
                id: id.to_string(),
                name: SYSTEM_NAME.to_string(),
                message: Some(text),
                file_path: None,
                file_type: None,
                is_admin: false,
            },
        }
    }
}

impl From<PresenceEntry> for PresenceEntryDto {
    fn from(entry: PresenceEntry) -> Self {
        Self {
            name: entry.name,
            is_admin: entry.is_admin,
        }
    }
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<EventDto> for ChatEvent {
    type Error = DtoError;

    fn try_from(dto: EventDto) -> Result<Self, Self::Error> {
        let EventDto {
            id,
            name,
            message,
            file_path,
            file_type,
            is_admin,
        } = dto;
        let id: MessageId = id.parse().map_err(|_| DtoError::InvalidId(id.clone()))?;
        match (message, file_path, file_type) {
            (Some(text), _, _) if name == SYSTEM_NAME => Ok(ChatEvent::System { id, text }),
            (Some(body), _, _) => Ok(ChatEvent::Text {
                id,
                author: name,
                body,
                is_admin,
            }),
            (None, Some(file_ref), Some(mime_type)) => Ok(ChatEvent::File {
                id,
                author: name,
                file_ref,
                mime_type,
                is_admin,
            }),
            _ => Err(DtoError::MissingBody(id.to_string())),
        }
    }
}
