//! UseCase: moderation commands.
//!
//! Command lines are whitespace-tokenized; the first token (case-insensitive,
//! optional leading `/`) selects the command, the rest are positional
//! arguments. `pass <secret>` is the only command available to non-admins —
//! it is the self-service path to promotion. Everything else requires the
//! issuer's admin flag.
//!
//! Side effects are always scoped: command outcomes go only to the issuer,
//! notify/close pairs go only to the target, log mutations and presence
//! updates go to everyone.

use std::sync::Arc;

use crate::domain::{BanList, ConnectionId, EventPusher, MessageLog, SessionRegistry};
use crate::infrastructure::dto::websocket::ServerFrame;

use super::error::CommandError;
use super::presence::broadcast_presence;

pub struct ModerationUseCase {
    registry: Arc<SessionRegistry>,
    ban_list: Arc<BanList>,
    log: Arc<MessageLog>,
    pusher: Arc<dyn EventPusher>,
}

impl ModerationUseCase {
    pub fn new(
        registry: Arc<SessionRegistry>,
        ban_list: Arc<BanList>,
        log: Arc<MessageLog>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            registry,
            ban_list,
            log,
            pusher,
        }
    }

    /// Parse and run one command line from a session.
    ///
    /// A failed command changes no state; the issuer is told why it failed.
    /// The result is also returned for callers that care (tests, console).
    pub async fn execute(&self, conn_id: &ConnectionId, raw: &str) -> Result<(), CommandError> {
        let result = self.run(conn_id, raw).await;
        if let Err(e) = &result {
            self.notify(conn_id, &e.to_string()).await;
        }
        result
    }

    async fn run(&self, conn_id: &ConnectionId, raw: &str) -> Result<(), CommandError> {
        let mut tokens = raw.split_whitespace();
        let Some(first) = tokens.next() else {
            return Err(CommandError::Empty);
        };
        let cmd = first.trim_start_matches('/').to_lowercase();
        let arg = tokens.next();

        if cmd == "pass" {
            return self.pass(conn_id, arg).await;
        }

        let is_admin = self
            .registry
            .get(conn_id)
            .await
            .map(|session| session.is_admin)
            .unwrap_or(false);
        if !is_admin {
            return Err(CommandError::NotAdmin(cmd));
        }

        match cmd.as_str() {
            "kick" => self.kick(conn_id, arg).await,
            "ban" => self.ban(conn_id, arg).await,
            "promote" => self.promote(conn_id, arg).await,
            "demote" => self.demote(conn_id, arg).await,
            "clearchat" => self.clearchat(conn_id).await,
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// `pass <secret>`: self-service promotion against the shared secret
    async fn pass(&self, conn_id: &ConnectionId, secret: Option<&str>) -> Result<(), CommandError> {
        let supplied = secret.unwrap_or("");
        if !self.registry.authenticate(conn_id, supplied).await {
            return Err(CommandError::SecretMismatch);
        }
        self.notify(conn_id, "Welcome, admin.").await;
        self.pusher
            .broadcast(&ServerFrame::AuthStatus { is_admin: true }.to_json())
            .await;
        broadcast_presence(&self.registry, self.pusher.as_ref()).await;
        Ok(())
    }

    /// `kick <name>`: notify the target, then force its connection closed
    async fn kick(&self, conn_id: &ConnectionId, target: Option<&str>) -> Result<(), CommandError> {
        let name = target.ok_or(CommandError::MissingArgument { cmd: "kick" })?;
        let target = self
            .registry
            .find_by_name(name)
            .await
            .ok_or_else(|| CommandError::TargetNotFound(name.to_string()))?;
        self.notify(&target.conn_id, "You have been kicked from the room.")
            .await;
        self.pusher.close(&target.conn_id).await;
        self.notify(conn_id, &format!("Kicked **{name}** from the room."))
            .await;
        Ok(())
    }

    /// `ban <name>`: always records the ban; enforcement only if online
    async fn ban(&self, conn_id: &ConnectionId, target: Option<&str>) -> Result<(), CommandError> {
        let name = target.ok_or(CommandError::MissingArgument { cmd: "ban" })?;
        self.ban_by_name(name).await;
        self.notify(conn_id, &format!("Banned **{name}** for 1 hour."))
            .await;
        Ok(())
    }

    /// Record a ban for `name` and disconnect any matching live session.
    ///
    /// The ban list is keyed by display name and decoupled from presence, so
    /// this works for names that are not currently online. Shared by the
    /// in-band `ban` command and the operator console; returns whether a live
    /// session was disconnected.
    pub async fn ban_by_name(&self, name: &str) -> bool {
        self.ban_list.ban(name).await;
        tracing::info!("banned '{}' for 1 hour", name);
        match self.registry.find_by_name(name).await {
            Some(target) => {
                self.notify(&target.conn_id, "You have been banned for 1 hour.")
                    .await;
                self.pusher.close(&target.conn_id).await;
                true
            }
            None => false,
        }
    }

    /// `promote <name>`: grant the admin flag to an online target
    async fn promote(
        &self,
        conn_id: &ConnectionId,
        target: Option<&str>,
    ) -> Result<(), CommandError> {
        let name = target.ok_or(CommandError::MissingArgument { cmd: "promote" })?;
        let target = self
            .registry
            .find_by_name(name)
            .await
            .ok_or_else(|| CommandError::TargetNotFound(name.to_string()))?;
        self.registry.set_admin(&target.conn_id, true).await;
        self.notify(&target.conn_id, "You have been promoted to admin.")
            .await;
        self.pusher
            .push_to(
                &target.conn_id,
                &ServerFrame::AuthStatus { is_admin: true }.to_json(),
            )
            .await;
        broadcast_presence(&self.registry, self.pusher.as_ref()).await;
        self.notify(conn_id, &format!("Promoted **{name}** to admin."))
            .await;
        Ok(())
    }

    /// `demote <name>`: revoke the admin flag; self-demotion is refused
    async fn demote(
        &self,
        conn_id: &ConnectionId,
        target: Option<&str>,
    ) -> Result<(), CommandError> {
        let name = target.ok_or(CommandError::MissingArgument { cmd: "demote" })?;
        let target = self
            .registry
            .find_by_name(name)
            .await
            .ok_or_else(|| CommandError::TargetNotFound(name.to_string()))?;
        if &target.conn_id == conn_id {
            return Err(CommandError::SelfDemotion);
        }
        self.registry.set_admin(&target.conn_id, false).await;
        self.notify(&target.conn_id, "You have been demoted.").await;
        self.pusher
            .push_to(
                &target.conn_id,
                &ServerFrame::AuthStatus { is_admin: false }.to_json(),
            )
            .await;
        broadcast_presence(&self.registry, self.pusher.as_ref()).await;
        self.notify(conn_id, &format!("Demoted **{name}**.")).await;
        Ok(())
    }

    /// `clearchat`: empty the log; ids keep increasing afterwards
    async fn clearchat(&self, conn_id: &ConnectionId) -> Result<(), CommandError> {
        self.log.clear().await;
        self.pusher
            .broadcast(&ServerFrame::Clearchat.to_json())
            .await;
        self.notify(conn_id, "Chat history cleared.").await;
        Ok(())
    }

    async fn notify(&self, conn_id: &ConnectionId, text: &str) {
        self.pusher
            .push_to(
                conn_id,
                &ServerFrame::System {
                    message: text.to_string(),
                }
                .to_json(),
            )
            .await;
    }
}
