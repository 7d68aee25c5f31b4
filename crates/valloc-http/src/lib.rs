//! HTTP surface for the vehicle allocation service
//!
//! ```text
//! handlers (axum)  ->  FleetService (valloc-app)  ->  rules (valloc-domain)  ->  FleetStore
//! ```

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::create_router;
pub use state::AppState;

use tracing::info;
use valloc_types::Result;

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(state: AppState, addr: &str, prefix: &str) -> Result<()> {
    let app = create_router(state, prefix);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, prefix, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler; run until the process is killed
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
