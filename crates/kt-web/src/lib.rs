//! HTTP reporting surface for keytally.
//!
//! Serves one bar chart per view (today, yesterday, all time) plus a JSON
//! endpoint with the same counts. Every request opens its own store
//! connection on a blocking thread.

pub mod chart;
pub mod error;
pub mod handlers;
pub mod report;
pub mod routes;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kt_core::Clock;
use kt_db::Store;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use chart::{ChartRenderer, ECHARTS_CDN, EchartsRenderer, Series};
pub use error::HttpError;
pub use report::{Report, ReportFilter};
pub use routes::build_router;

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub renderer: Arc<dyn ChartRenderer>,
    pub clock: Arc<dyn Clock>,
    /// Filter used when a request does not override it.
    pub filter: ReportFilter,
}

/// Serves the reporting routes on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    request_timeout: Duration,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http());
    info!(addr = %listener.local_addr()?, "reporting server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
