//! Database access layer for the message store.
//!
//! The repository layer translates between domain models and the SQLite
//! schema. All SQL lives in this module; handlers only call repository
//! methods.

use std::{sync::Arc, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    SqlitePool,
};
use tracing::debug;

pub mod messages;

use crate::{error::Result, time::Clock};

const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS messages (
        message_id TEXT NOT NULL PRIMARY KEY,
        from_msisdn TEXT NOT NULL,
        to_msisdn TEXT NOT NULL,
        ts TEXT NOT NULL,
        text TEXT,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_messages_ts ON messages (ts, message_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_from ON messages (from_msisdn)",
];

/// Builds connection options from a database URL.
///
/// Accepts `sqlite:///relative.db`, `sqlite:////absolute.db`,
/// `sqlite://path`, `sqlite:path`, or a bare file path. The file is created
/// if missing and opened in WAL mode so readers never block the writer.
pub fn connect_options(database_url: &str) -> SqliteConnectOptions {
    let path = ["sqlite:///", "sqlite://", "sqlite:"]
        .iter()
        .find_map(|prefix| database_url.strip_prefix(prefix))
        .unwrap_or(database_url);

    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
}

/// Entry point for all database operations.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct Storage {
    /// Repository for message operations.
    pub messages: Arc<messages::Repository>,

    pool: SqlitePool,
}

impl Storage {
    /// Creates a storage instance over the given pool.
    ///
    /// The clock stamps `created_at` on inserted messages.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { messages: Arc::new(messages::Repository::new(pool.clone(), clock)), pool }
    }

    /// Creates the `messages` table and its indexes if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if any statement fails.
    pub async fn initialize(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        debug!("Message schema ready");
        Ok(())
    }

    /// Performs a health check on the database connection.
    ///
    /// Executes a trivial query to verify the store is reachable. Used by
    /// the `/health/ready` endpoint.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if no connection can be acquired or
    /// the query fails.
    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;

        Ok(())
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every connection. Subsequent operations fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_options_strip_url_schemes() {
        for (url, expected) in [
            ("sqlite:///app.db", "app.db"),
            ("sqlite:////data/app.db", "/data/app.db"),
            ("sqlite://app.db", "app.db"),
            ("sqlite:app.db", "app.db"),
            ("/var/lib/inlet/app.db", "/var/lib/inlet/app.db"),
        ] {
            let options = connect_options(url);
            assert_eq!(options.get_filename(), std::path::Path::new(expected), "url: {url}");
        }
    }
}
