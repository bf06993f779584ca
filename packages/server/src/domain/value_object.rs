//! Value objects for the chat domain.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Opaque handle identifying one live connection.
///
/// Generated server-side (UUID v4); never reused within a process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh connection id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short leading fragment, used in placeholder display names
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl ConnectionId {
    /// Build a connection id from a fixed string (tests only)
    pub fn fixed(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Monotonic message id, string-encoded on the wire and on disk.
///
/// Ids are unique and strictly increasing but may have gaps after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
