//! inlet HTTP API.
//!
//! Signed webhook ingestion plus read endpoints for listing messages,
//! aggregate statistics, health probes, and counter exposition.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use server::{create_router, create_router_with_timeout, start_server};
pub use state::AppState;
