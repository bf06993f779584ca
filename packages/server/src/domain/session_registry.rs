//! Concurrency-safe registry of live sessions.
//!
//! Keyed by connection id; display names are not required to be unique, so
//! name lookups return an arbitrary matching session when names collide.
//! That ambiguity is inherited by everything targeting users by name
//! (kick/ban/promote/demote).

use std::collections::HashMap;

use tokio::sync::Mutex;

use super::ban_list::BanList;
use super::entity::{ClientMeta, PresenceEntry, Session};
use super::value_object::ConnectionId;

/// Outcome of a join attempt
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Joined { name: String },
    Banned { remaining_secs: u64 },
}

pub struct SessionRegistry {
    sessions: Mutex<HashMap<ConnectionId, Session>>,
    admin_secret: String,
}

impl SessionRegistry {
    pub fn new(admin_secret: String) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            admin_secret,
        }
    }

    /// Create an anonymous session for a new connection
    pub async fn register(&self, conn_id: ConnectionId, remote_addr: String, connected_at: i64) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            conn_id.clone(),
            Session::new(conn_id, remote_addr, connected_at),
        );
    }

    /// Attach informational client metadata; a no-op for unknown connections
    pub async fn set_client_info(&self, conn_id: &ConnectionId, meta: ClientMeta) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(conn_id) {
            session.meta = Some(meta);
        }
    }

    /// Try to join with `requested_name` (empty requests get a placeholder
    /// derived from the connection id). Consults the ban list before
    /// registering the name. Returns `None` for unknown connections.
    pub async fn join(
        &self,
        conn_id: &ConnectionId,
        requested_name: &str,
        admin_hint: bool,
        ban_list: &BanList,
    ) -> Option<JoinOutcome> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(conn_id)?;

        let assigned = if requested_name.is_empty() {
            format!("guest-{}", conn_id.short())
        } else {
            requested_name.to_string()
        };

        // lock order: registry → ban list
        if let Some(remaining_secs) = ban_list.is_banned(&assigned).await {
            return Some(JoinOutcome::Banned { remaining_secs });
        }

        session.name = Some(assigned.clone());
        session.is_admin = admin_hint;
        Some(JoinOutcome::Joined { name: assigned })
    }

    /// Compare `supplied` against the shared admin secret; promote on match
    pub async fn authenticate(&self, conn_id: &ConnectionId, supplied: &str) -> bool {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get_mut(conn_id) else {
            return false;
        };
        if supplied == self.admin_secret {
            session.is_admin = true;
            true
        } else {
            false
        }
    }

    /// Set the admin flag directly (promote/demote); false for unknown ids
    pub async fn set_admin(&self, conn_id: &ConnectionId, is_admin: bool) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(conn_id) {
            Some(session) => {
                session.is_admin = is_admin;
                true
            }
            None => false,
        }
    }

    /// First live session with the given display name, if any
    pub async fn find_by_name(&self, name: &str) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .find(|session| session.name.as_deref() == Some(name))
            .cloned()
    }

    pub async fn get(&self, conn_id: &ConnectionId) -> Option<Session> {
        let sessions = self.sessions.lock().await;
        sessions.get(conn_id).cloned()
    }

    /// Detach and return the session, for the disconnect notification.
    /// A second call for the same connection returns `None`.
    pub async fn remove(&self, conn_id: &ConnectionId) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(conn_id)
    }

    /// Presence snapshot: joined (named) sessions only
    pub async fn snapshot(&self) -> Vec<PresenceEntry> {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .filter_map(|session| {
                session.name.as_ref().map(|name| PresenceEntry {
                    name: name.clone(),
                    is_admin: session.is_admin,
                })
            })
            .collect()
    }

    /// All live sessions (named or not), for the operator listing
    pub async fn list_all(&self) -> Vec<Session> {
        let sessions = self.sessions.lock().await;
        let mut all: Vec<Session> = sessions.values().cloned().collect();
        all.sort_by(|a, b| a.connected_at.cmp(&b.connected_at));
        all
    }
}
