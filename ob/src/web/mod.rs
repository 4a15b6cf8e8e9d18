//! HTTP front end
//!
//! A small JSON API over [`PlanService`]. Paths match what the existing
//! browser client calls.

mod routes;
mod state;

use axum::Router;
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub use routes::api_router;
pub use state::AppState;

use crate::service::PlanService;

/// Build the full application router
pub fn router(service: PlanService) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(service))
}

/// Serve the API until Ctrl-C, then stop the store actor
pub async fn serve(bind: &str, port: u16, service: PlanService) -> Result<()> {
    debug!(%bind, %port, "serve: called");
    let listener = bind_listener(bind, port).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "listening");

    let state = service.state().clone();
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    if let Err(e) = state.shutdown().await {
        warn!(error = %e, "serve: state manager already stopped");
    }
    Ok(())
}

/// Bind the listener; `bind` may be a host name or an IP literal
async fn bind_listener(bind: &str, port: u16) -> Result<TcpListener> {
    debug!(%bind, %port, "bind_listener: called");
    TcpListener::bind((bind, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind, port))
}

async fn shutdown_signal() {
    debug!("shutdown_signal: waiting for ctrl_c");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, shutting down");
}
