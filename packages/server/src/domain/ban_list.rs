//! Time-windowed denylist of display names.
//!
//! A ban is keyed by display name (not by connection), so it applies to
//! participants that are not currently online. Expiry is a lazy time
//! comparison; nothing is scheduled.

use std::collections::HashMap;
use std::sync::Arc;

use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

/// How long a ban stays active
pub const BAN_DURATION_SECS: u64 = 3600;

const BAN_DURATION_MILLIS: i64 = BAN_DURATION_SECS as i64 * 1000;

/// One active ban, for operator listing
#[derive(Debug, Clone, PartialEq)]
pub struct BanEntry {
    pub name: String,
    pub remaining_secs: u64,
}

/// Display name → ban start timestamp (Unix milliseconds).
pub struct BanList {
    clock: Arc<dyn Clock>,
    bans: Mutex<HashMap<String, i64>>,
}

impl BanList {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            bans: Mutex::new(HashMap::new()),
        }
    }

    /// Record a ban starting now, overwriting any prior record for `name`
    pub async fn ban(&self, name: &str) {
        let mut bans = self.bans.lock().await;
        bans.insert(name.to_string(), self.clock.now_unix_millis());
    }

    /// Remove a ban record; returns whether one existed
    pub async fn unban(&self, name: &str) -> bool {
        let mut bans = self.bans.lock().await;
        bans.remove(name).is_some()
    }

    /// Remaining ban time in seconds, or `None` if `name` is not actively
    /// banned. Expired records are left in place (lazy expiry).
    pub async fn is_banned(&self, name: &str) -> Option<u64> {
        let bans = self.bans.lock().await;
        let banned_at = bans.get(name)?;
        remaining_secs(*banned_at, self.clock.now_unix_millis())
    }

    /// All active bans; purges expired records as a side effect
    pub async fn active_bans(&self) -> Vec<BanEntry> {
        let now = self.clock.now_unix_millis();
        let mut bans = self.bans.lock().await;
        bans.retain(|_, banned_at| remaining_secs(*banned_at, now).is_some());
        let mut entries: Vec<BanEntry> = bans
            .iter()
            .map(|(name, banned_at)| BanEntry {
                name: name.clone(),
                // retain above guarantees the record is still active
                remaining_secs: remaining_secs(*banned_at, now).unwrap_or(0),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

fn remaining_secs(banned_at: i64, now: i64) -> Option<u64> {
    let elapsed = now - banned_at;
    if elapsed < BAN_DURATION_MILLIS {
        // round up so a just-issued ban reports the full window
        Some(((BAN_DURATION_MILLIS - elapsed) as u64).div_ceil(1000))
    } else {
        None
    }
}
