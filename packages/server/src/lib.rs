//! Chat room server library.
//!
//! Provides the session registry, ordered message log, ban list, broadcast
//! fan-out and moderation command handling behind an Axum WebSocket surface.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
