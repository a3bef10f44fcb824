//! HTTP middleware.
//!
//! Request observation: request IDs, per-route counters, and the access log.
pub mod observe;

pub use observe::{observe_request, RequestId, REQUEST_ID_HEADER};
