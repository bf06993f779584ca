//! Data Transfer Objects (DTOs) for the chat server.
//!
//! - `websocket`: inbound/outbound WebSocket frames
//! - `conversion`: conversions between DTOs and domain entities
//!
//! `EventDto` doubles as the persisted history record: the on-disk log is a
//! JSON array of the same shape the wire uses.

pub mod conversion;
pub mod websocket;

pub use conversion::SYSTEM_NAME;
