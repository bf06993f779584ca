//! UI layer: the Axum WebSocket/HTTP surface and the operator console.

pub mod console;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
