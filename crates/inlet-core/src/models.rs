//! Message entity, read-path parameters, and aggregate results.
//!
//! Sender and recipient travel under three names: `from`/`to` on the wire,
//! `sender`/`recipient` in Rust, and `from_msisdn`/`to_msisdn` in the
//! database. The constants in [`wire`] and [`columns`] name each side of the
//! mapping, and serde/sqlx attributes perform it at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Field names used in JSON payloads and query strings.
pub mod wire {
    /// Sender field.
    pub const FROM: &str = "from";
    /// Recipient field.
    pub const TO: &str = "to";
}

/// Column names in the `messages` table.
pub mod columns {
    /// Idempotency key, primary key of the table.
    pub const MESSAGE_ID: &str = "message_id";
    /// Sender column.
    pub const FROM: &str = "from_msisdn";
    /// Recipient column.
    pub const TO: &str = "to_msisdn";
    /// Sender-supplied timestamp.
    pub const TS: &str = "ts";
    /// Optional message body.
    pub const TEXT: &str = "text";
}

/// Default page size for message listings.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;

/// Number of senders reported in [`MessageStats::top_senders`].
pub const TOP_SENDERS: i64 = 10;

/// Inbound message as delivered by the upstream sender.
///
/// `message_id` is assigned upstream and is the idempotency key; it is never
/// regenerated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Sender-assigned unique identifier
    pub message_id: String,
    /// Sender identifier (wire name `from`)
    #[serde(rename = "from")]
    pub sender: String,
    /// Recipient identifier (wire name `to`)
    #[serde(rename = "to")]
    pub recipient: String,
    /// Sender-supplied timestamp, compared as a string
    pub ts: String,
    /// Optional message body
    #[serde(default)]
    pub text: Option<String>,
}

/// Stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Message {
    /// Sender-assigned unique identifier
    pub message_id: String,
    /// Sender identifier
    #[serde(rename = "from")]
    #[sqlx(rename = "from_msisdn")]
    pub sender: String,
    /// Recipient identifier
    #[serde(rename = "to")]
    #[sqlx(rename = "to_msisdn")]
    pub recipient: String,
    /// Sender-supplied timestamp
    pub ts: String,
    /// Optional message body
    pub text: Option<String>,
    /// Ingestion time, set once at insert and never exposed on the wire
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// A row with the same `message_id` already existed.
    Duplicate,
}

impl InsertOutcome {
    /// Returns true when the message had already been stored.
    pub const fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Validated page window.
///
/// Only constructible through [`Pagination::new`], so the store never sees
/// an out-of-range limit or offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Pagination {
    /// Validates a page window.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `limit` is outside `1..=100` or
    /// `offset` is negative. Values are rejected, never clamped.
    pub fn new(limit: i64, offset: i64) -> Result<Self> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CoreError::InvalidInput(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {limit}"
            )));
        }

        if offset < 0 {
            return Err(CoreError::InvalidInput(format!(
                "offset must be greater than or equal to 0, got {offset}"
            )));
        }

        Ok(Self { limit, offset })
    }

    /// Maximum number of rows in the page.
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of matching rows skipped before the page.
    pub const fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, offset: 0 }
    }
}

/// Conjunctive filters for message listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Exact match on the sender
    pub sender: Option<String>,
    /// Inclusive lower bound on `ts`, compared lexicographically
    pub since: Option<String>,
    /// Substring the message text must contain
    pub text_contains: Option<String>,
}

impl MessageFilter {
    /// Filters on the sender.
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Filters on `ts >= since`.
    #[must_use]
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Filters on text containing `needle`.
    #[must_use]
    pub fn text_contains(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self
    }
}

/// One page of messages plus the number of rows matching the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    /// Messages ordered by `ts`, then `message_id`
    pub messages: Vec<Message>,
    /// Rows matching the filters before pagination
    pub total: i64,
}

/// Message count for one sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SenderCount {
    /// Sender identifier
    #[serde(rename = "from")]
    #[sqlx(rename = "from_msisdn")]
    pub sender: String,
    /// Number of stored messages from this sender
    pub count: i64,
}

/// Aggregate statistics over every stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    /// Number of stored messages
    pub total_messages: i64,
    /// Number of distinct senders
    #[serde(rename = "senders_count")]
    pub distinct_senders: i64,
    /// Up to ten senders with the most messages, busiest first
    #[serde(rename = "messages_per_sender")]
    pub top_senders: Vec<SenderCount>,
    /// Smallest `ts`, if any message exists
    #[serde(rename = "first_message_ts")]
    pub first_ts: Option<String>,
    /// Largest `ts`, if any message exists
    #[serde(rename = "last_message_ts")]
    pub last_ts: Option<String>,
}
