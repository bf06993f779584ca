//! UseCase: trusted operator console commands.
//!
//! The console is out-of-band from the chat protocol but carries the same
//! authority as in-band moderation, so bans are delegated to
//! `ModerationUseCase::ban_by_name` rather than duplicating the semantics.

use std::sync::Arc;

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{BanList, SessionRegistry};

use super::moderation::ModerationUseCase;

pub struct OperatorUseCase {
    registry: Arc<SessionRegistry>,
    ban_list: Arc<BanList>,
    moderation: Arc<ModerationUseCase>,
}

impl OperatorUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        ban_list: Arc<BanList>,
        moderation: Arc<ModerationUseCase>,
    ) -> Self {
        Self {
            registry,
            ban_list,
            moderation,
        }
    }

    /// Run one console command line and return the printable response
    pub async fn dispatch(&self, line: &str) -> String {
        let mut tokens = line.split_whitespace();
        let Some(cmd) = tokens.next() else {
            return String::new();
        };
        let arg = tokens.next();
        match cmd.to_lowercase().as_str() {
            "list" => self.list().await,
            "ban" => self.ban(arg).await,
            "unban" => self.unban(arg).await,
            "bannedlist" => self.banned_list().await,
            other => format!("Unknown command: {other} (valid: list, ban, unban, bannedlist)"),
        }
    }

    /// Live sessions, one line each, including the never-broadcast details
    /// (address, client metadata)
    async fn list(&self) -> String {
        let sessions = self.registry.list_all().await;
        if sessions.is_empty() {
            return "No connected sessions.".to_string();
        }
        let mut lines = vec!["Connected sessions:".to_string()];
        for session in sessions {
            let name = match &session.name {
                Some(name) => name.clone(),
                None => format!("unnamed ({})", session.conn_id.short()),
            };
            let admin_tag = if session.is_admin { " [admin]" } else { "" };
            let meta = match &session.meta {
                Some(meta) => format!(
                    "os: {}, battery: {}% ({})",
                    meta.os,
                    meta.battery_level,
                    if meta.charging {
                        "charging"
                    } else {
                        "not charging"
                    }
                ),
                None => "no client info".to_string(),
            };
            lines.push(format!(
                "- {}{} | addr: {} | connected: {} | {}",
                name,
                admin_tag,
                session.remote_addr,
                timestamp_to_rfc3339(session.connected_at),
                meta
            ));
        }
        lines.join("\n")
    }

    async fn ban(&self, name: Option<&str>) -> String {
        let Some(name) = name else {
            return "Usage: ban <name>".to_string();
        };
        let was_online = self.moderation.ban_by_name(name).await;
        if was_online {
            format!("Banned **{name}** for 1 hour (disconnected).")
        } else {
            format!("Banned **{name}** for 1 hour.")
        }
    }

    async fn unban(&self, name: Option<&str>) -> String {
        let Some(name) = name else {
            return "Usage: unban <name>".to_string();
        };
        if self.ban_list.unban(name).await {
            format!("Unbanned **{name}**.")
        } else {
            format!("**{name}** is not banned.")
        }
    }

    async fn banned_list(&self) -> String {
        let active = self.ban_list.active_bans().await;
        if active.is_empty() {
            return "No active bans.".to_string();
        }
        let mut lines = vec!["Active bans:".to_string()];
        for entry in active {
            lines.push(format!(
                "- {} ({:.1} minutes left)",
                entry.name,
                entry.remaining_secs as f64 / 60.0
            ));
        }
        lines.join("\n")
    }
}
