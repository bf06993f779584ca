//! Infrastructure layer: concrete storage and delivery implementations plus
//! the DTOs for the wire protocol and the persisted history format.

pub mod blob;
pub mod dto;
pub mod history;
pub mod pusher;
