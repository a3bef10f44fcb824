//! Test infrastructure for inlet.
//!
//! Each [`TestEnv`] owns a fresh SQLite database in a temporary directory, a
//! controllable clock, and an empty metrics register. Nothing is shared
//! between environments, so tests can run in parallel.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result};
use inlet_core::{
    storage::connect_options, Clock, InsertOutcome, Metrics, Storage, TestClock,
};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

pub mod fixtures;

pub use fixtures::MessageBuilder;

/// Shared secret used to sign test deliveries.
pub const TEST_SECRET: &str = "test-webhook-secret";

/// Start time of every test clock: 2025-01-01T00:00:00Z.
pub const TEST_EPOCH_SECS: u64 = 1_735_689_600;

/// Isolated store, clock, and metrics for one test.
pub struct TestEnv {
    /// Deterministic clock shared with the store
    pub clock: TestClock,
    /// Metrics register for routers built from this environment
    pub metrics: Arc<Metrics>,
    storage: Storage,
    _dir: TempDir,
}

impl TestEnv {
    /// Creates an environment with an initialized, empty message table.
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let path = dir.path().join("inlet-test.db");

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(connect_options(&path.to_string_lossy()))
            .await
            .context("open test database")?;

        let clock = TestClock::with_start_time(
            SystemTime::UNIX_EPOCH + Duration::from_secs(TEST_EPOCH_SECS),
        );
        let storage = Storage::new(pool, Arc::new(clock.clone()));
        storage.initialize().await.context("create schema")?;

        Ok(Self { clock, metrics: Arc::new(Metrics::new()), storage, _dir: dir })
    }

    /// Storage over this environment's database.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The test clock as a trait object, for wiring into application state.
    pub fn clock_handle(&self) -> Arc<dyn Clock> {
        Arc::new(self.clock.clone())
    }

    /// Inserts a message directly through the repository.
    pub async fn insert(&self, message: &MessageBuilder) -> Result<InsertOutcome> {
        Ok(self.storage.messages.insert(&message.build()).await?)
    }

    /// Inserts `(message_id, sender, ts, text)` tuples in order.
    pub async fn seed(&self, rows: &[(&str, &str, &str, Option<&str>)]) -> Result<()> {
        for (message_id, sender, ts, text) in rows {
            let mut message = MessageBuilder::new(*message_id).from(*sender).ts(*ts);
            message = match text {
                Some(text) => message.text(*text),
                None => message.no_text(),
            };
            self.insert(&message).await?;
        }
        Ok(())
    }

    /// Number of stored messages.
    pub async fn message_count(&self) -> Result<i64> {
        Ok(self.storage.messages.count().await?)
    }
}
