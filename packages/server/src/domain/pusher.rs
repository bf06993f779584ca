//! Outbound event delivery interface: the fan-out point every component
//! funnels through.
//!
//! The domain only knows about serialized frames and connection ids; the
//! WebSocket plumbing lives in the infrastructure layer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// One item on a session's outbound channel.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    /// A serialized server frame to deliver as a text message
    Text(String),
    /// Tear the connection down (kick/ban enforcement)
    Close,
}

/// Sender half of a session's outbound channel
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// Delivers frames to one or all live sessions.
///
/// Delivery is at-most-once and best-effort: a send that races a disconnect
/// is dropped silently. Frames pushed to one live session from a single task
/// arrive in the order they were pushed.
#[async_trait]
pub trait EventPusher: Send + Sync {
    async fn register_client(&self, conn_id: ConnectionId, sender: PusherChannel);

    async fn unregister_client(&self, conn_id: &ConnectionId);

    /// Deliver to exactly one session; a no-op if the session is gone
    async fn push_to(&self, conn_id: &ConnectionId, content: &str);

    /// Deliver to every live session
    async fn broadcast(&self, content: &str);

    /// Ask the session's socket task to close the connection
    async fn close(&self, conn_id: &ConnectionId);
}
