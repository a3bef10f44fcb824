//! HTTP server configuration and request routing.
//!
//! Requests flow through middleware in order:
//! 1. Tracing span (`TraceLayer`)
//! 2. Observation: request ID, `http_requests_total`, access log
//! 3. Timeout enforcement (30s default)
//! 4. Handler execution
//!
//! # Graceful Shutdown
//!
//! On SIGINT or SIGTERM the server stops accepting connections and waits for
//! in-flight requests before returning.

use std::{future::Future, io, net::SocketAddr, time::Duration};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{handlers, middleware::observe_request, state::AppState};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates the router with the default request timeout.
pub fn create_router(state: AppState) -> Router {
    create_router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

/// Creates the router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use inlet_api::{create_router_with_timeout, AppState};
///
/// fn build(state: AppState) -> axum::Router {
///     create_router_with_timeout(state, Duration::from_secs(10))
/// }
/// ```
pub fn create_router_with_timeout(state: AppState, timeout: Duration) -> Router {
    let health_routes = Router::new()
        .route("/health/live", get(handlers::liveness_check))
        .route("/health/ready", get(handlers::readiness_check));

    let api_routes = Router::new()
        .route("/webhook", post(handlers::ingest_webhook))
        .route("/messages", get(handlers::list_messages))
        .route("/stats", get(handlers::get_stats))
        .route("/metrics", get(handlers::render_metrics));

    #[allow(deprecated)]
    let timeout_layer = TimeoutLayer::new(timeout);

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(timeout_layer)
        .layer(middleware::from_fn_with_state(state.clone(), observe_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server with graceful shutdown support.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound or the server
/// fails while serving.
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    timeout: Duration,
) -> Result<(), std::io::Error> {
    let app = create_router_with_timeout(state, timeout);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for CTRL+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = on_signal("Ctrl+C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = on_signal("SIGTERM", async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        signal.recv().await;
        Ok::<(), io::Error>(())
    });

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Draining in-flight requests");
}

/// Resolves when `signal` fires. A handler that fails to install never
/// resolves, so the other source can still trigger shutdown.
async fn on_signal<F>(name: &str, signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to install {} handler: {}", name, e);
        std::future::pending::<()>().await;
    }
}
