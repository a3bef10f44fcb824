//! Shared application state handed to every handler.

use std::sync::Arc;

use inlet_core::{Clock, Metrics, Storage};

use crate::crypto::SigningSecret;

/// State shared by all requests.
///
/// Cloned per request by axum; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Message store
    pub storage: Storage,
    /// Process-wide counters, empty at startup
    pub metrics: Arc<Metrics>,
    /// Time source for latency measurement
    pub clock: Arc<dyn Clock>,
    /// Shared secret for delivery signatures
    pub secret: Arc<SigningSecret>,
}

impl AppState {
    /// Bundles the collaborators into application state.
    pub fn new(
        storage: Storage,
        metrics: Arc<Metrics>,
        clock: Arc<dyn Clock>,
        secret: SigningSecret,
    ) -> Self {
        Self { storage, metrics, clock, secret: Arc::new(secret) }
    }
}
