//! Transaction history entries.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Where money came from or went to.  Serialised externally tagged, the way
/// the backend emits it: `"Bank"`, `{"User": 12}`, `{"AutoTransfer": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Bank,
    User(i64),
    AutoTransfer(i64),
}

impl Source {
    /// Account id behind this source (`None` for the bank itself).
    pub fn id(&self) -> Option<i64> {
        match self {
            Source::Bank => None,
            Source::User(id) | Source::AutoTransfer(id) => Some(*id),
        }
    }
}

/// Direction of a transaction relative to one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Incoming => "↓",
            Direction::Outgoing => "↑",
        }
    }

    pub fn preposition(self) -> &'static str {
        match self {
            Direction::Incoming => "from",
            Direction::Outgoing => "to",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Amount moved (always positive).
    pub balance: f64,
    pub origin: Source,
    pub destination: Source,
    pub state: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl Transaction {
    pub fn direction(&self, account_id: i64) -> Direction {
        if self.destination.id() == Some(account_id) {
            Direction::Incoming
        } else {
            Direction::Outgoing
        }
    }

    /// The other side of the transaction as seen from `account_id`.
    pub fn counterparty(&self, account_id: i64) -> Option<i64> {
        match self.direction(account_id) {
            Direction::Incoming => self.origin.id(),
            Direction::Outgoing => self.destination.id(),
        }
    }

    pub fn touches(&self, account_id: i64) -> bool {
        self.origin.id() == Some(account_id) || self.destination.id() == Some(account_id)
    }

    /// Created by a scheduled auto-transfer rather than by hand.
    pub fn is_automatic(&self) -> bool {
        matches!(self.origin, Source::AutoTransfer(_))
    }

    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn timestamp_local(&self) -> String {
        match self.timestamp_utc() {
            Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => "unknown time".into(),
        }
    }
}
