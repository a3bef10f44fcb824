//! Repository for message persistence and the read path.
//!
//! Inserts rely on the `message_id` primary key: the write is attempted and a
//! uniqueness violation is reported as a duplicate. There is no read before
//! the write, so concurrent deliveries of the same message cannot both
//! succeed.

use std::sync::Arc;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::{
    error::{CoreError, Result},
    models::{
        columns, InsertOutcome, Message, MessageFilter, MessagePage, MessageStats, NewMessage,
        Pagination, SenderCount, TOP_SENDERS,
    },
    time::Clock,
};

const SELECT_MESSAGE: &str =
    "SELECT message_id, from_msisdn, to_msisdn, ts, text, created_at FROM messages";

/// Repository for message database operations.
pub struct Repository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Stores a message unless one with the same `message_id` exists.
    ///
    /// `created_at` is taken from the clock at this point and never changes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` on any failure other than a uniqueness
    /// violation.
    pub async fn insert(&self, message: &NewMessage) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r"
            INSERT INTO messages (message_id, from_msisdn, to_msisdn, ts, text, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&message.message_id)
        .bind(&message.sender)
        .bind(&message.recipient)
        .bind(&message.ts)
        .bind(&message.text)
        .bind(self.clock.now_utc())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(err) => {
                let err = CoreError::from(err);
                if err.is_constraint_violation() {
                    debug!(message_id = %message.message_id, "Message already stored");
                    Ok(InsertOutcome::Duplicate)
                } else {
                    Err(err)
                }
            },
        }
    }

    /// Returns one page of messages matching `filter`, plus the total number
    /// of matching rows.
    ///
    /// Rows are ordered by `ts` then `message_id`, so pages are stable even
    /// when timestamps repeat. The count and the page are read in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if either query fails.
    pub async fn query(&self, filter: &MessageFilter, page: Pagination) -> Result<MessagePage> {
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM messages");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&mut *tx).await?;

        let mut select = QueryBuilder::<Sqlite>::new(SELECT_MESSAGE);
        push_filters(&mut select, filter);
        select
            .push(format_args!(" ORDER BY {} ASC, {} ASC", columns::TS, columns::MESSAGE_ID))
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let messages = select.build_query_as::<Message>().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        Ok(MessagePage { messages, total })
    }

    /// Aggregates statistics over every stored message.
    ///
    /// Recomputed on every call.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if either aggregate query fails.
    pub async fn stats(&self) -> Result<MessageStats> {
        let mut tx = self.pool.begin().await?;

        let (total_messages, distinct_senders, first_ts, last_ts): (
            i64,
            i64,
            Option<String>,
            Option<String>,
        ) = sqlx::query_as(
            r"
            SELECT COUNT(*), COUNT(DISTINCT from_msisdn), MIN(ts), MAX(ts)
            FROM messages
            ",
        )
        .fetch_one(&mut *tx)
        .await?;

        let top_senders = sqlx::query_as::<_, SenderCount>(
            r"
            SELECT from_msisdn, COUNT(*) AS count
            FROM messages
            GROUP BY from_msisdn
            ORDER BY count DESC, from_msisdn ASC
            LIMIT ?
            ",
        )
        .bind(TOP_SENDERS)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MessageStats { total_messages, distinct_senders, top_senders, first_ts, last_ts })
    }

    /// Finds a message by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the query fails.
    pub async fn find_by_id(&self, message_id: &str) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "{SELECT_MESSAGE} WHERE {} = ?",
            columns::MESSAGE_ID
        ))
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Counts every stored message.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages").fetch_one(&self.pool).await?;

        Ok(total)
    }
}

/// Appends the conjunctive `WHERE` clause for `filter`.
///
/// Text matching uses `instr` over `lower()` on both sides: the needle is
/// matched literally (`%` and `_` carry no special meaning) and ASCII letters
/// match regardless of case, like SQLite's `LIKE`.
fn push_filters<'args>(builder: &mut QueryBuilder<'args, Sqlite>, filter: &'args MessageFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(sender) = &filter.sender {
        builder.push(format_args!(" AND {} = ", columns::FROM)).push_bind(sender.as_str());
    }

    if let Some(since) = &filter.since {
        builder.push(format_args!(" AND {} >= ", columns::TS)).push_bind(since.as_str());
    }

    if let Some(needle) = &filter.text_contains {
        builder
            .push(format_args!(" AND instr(lower({}), lower(", columns::TEXT))
            .push_bind(needle.as_str())
            .push(")) > 0");
    }
}
