//! Append-only ordered message log with monotonic ids.
//!
//! The id counter lives inside the log and only advances on `append`; it is
//! seeded from the persisted history at startup and never rewinds, not even
//! after `clear`. Every mutation rewrites the durable snapshot before
//! returning; a failed write is logged and the in-memory log stays
//! authoritative.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::entity::{ChatEvent, EventDraft};
use super::store::HistoryStore;
use super::value_object::MessageId;

pub struct MessageLog {
    store: Arc<dyn HistoryStore>,
    inner: Mutex<LogInner>,
}

struct LogInner {
    events: Vec<ChatEvent>,
    next_id: u64,
}

impl MessageLog {
    /// Load the persisted log and seed the id counter above the largest id
    /// seen. A missing or malformed history yields an empty log (warned, not
    /// fatal).
    pub async fn load(store: Arc<dyn HistoryStore>) -> Self {
        let events = match store.load().await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("failed to load message history, starting empty: {e}");
                Vec::new()
            }
        };
        let next_id = events
            .iter()
            .map(|event| event.id().value() + 1)
            .max()
            .unwrap_or(0);
        tracing::info!("loaded {} message(s), next id {}", events.len(), next_id);
        Self {
            store,
            inner: Mutex::new(LogInner { events, next_id }),
        }
    }

    /// Stamp `draft` with the next id, append it and snapshot the log.
    /// Returns the stored event.
    pub async fn append(&self, draft: EventDraft) -> ChatEvent {
        let mut inner = self.inner.lock().await;
        let event = draft.into_event(MessageId::new(inner.next_id));
        inner.next_id += 1;
        inner.events.push(event.clone());
        self.persist(&inner.events).await;
        event
    }

    /// Remove the first event with the given id; returns whether one existed
    pub async fn delete_by_id(&self, id: MessageId) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(pos) = inner.events.iter().position(|event| event.id() == id) else {
            return false;
        };
        inner.events.remove(pos);
        self.persist(&inner.events).await;
        true
    }

    /// Empty the log. The id counter is untouched.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.events.clear();
        self.persist(&inner.events).await;
    }

    /// The full log in append order, for replay to newly joined sessions
    pub async fn all(&self) -> Vec<ChatEvent> {
        self.inner.lock().await.events.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.events.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn persist(&self, events: &[ChatEvent]) {
        if let Err(e) = self.store.save(events).await {
            tracing::warn!("failed to persist message history: {e}");
        }
    }
}
