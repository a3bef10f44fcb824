//! HTTP request handlers.
//!
//! - `ingest` - signed webhook delivery
//! - `messages` - paginated, filtered listing
//! - `stats` - aggregate analytics
//! - `health` - liveness and readiness probes
//! - `metrics` - counter exposition

pub mod health;
pub mod ingest;
pub mod messages;
pub mod metrics;
pub mod stats;

pub use health::{liveness_check, readiness_check};
pub use ingest::ingest_webhook;
pub use messages::list_messages;
pub use metrics::render_metrics;
pub use stats::get_stats;
