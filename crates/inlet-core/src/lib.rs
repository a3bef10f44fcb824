//! Core domain types, message storage, and metrics for the inlet webhook
//! sink.
//!
//! Everything that touches persistent or shared state lives here: the
//! idempotent message store, the read path over it, and the process-wide
//! counter register. The HTTP crate only translates requests into calls on
//! these types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod metrics;
pub mod models;
pub mod storage;
pub mod time;

pub use error::{CoreError, Result};
pub use metrics::Metrics;
pub use models::{
    InsertOutcome, Message, MessageFilter, MessagePage, MessageStats, NewMessage, Pagination,
    SenderCount,
};
pub use storage::Storage;
pub use time::{Clock, RealClock, TestClock};
