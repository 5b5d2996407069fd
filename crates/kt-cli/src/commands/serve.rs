//! Serve command: capture input and serve charts from one process.

use std::sync::Arc;

use anyhow::{Context, Result};
use kt_core::SystemClock;
use kt_db::Store;
use kt_web::{AppState, EchartsRenderer};
use tokio::net::TcpListener;
use tracing::info;

use crate::Config;
use crate::commands::capture;

pub fn run(config: &Config, store: Store, with_capture: bool) -> Result<()> {
    // Listener threads are detached; they end with the process.
    let listeners = if with_capture {
        capture::start(&store, &config.capture_config())?
    } else {
        info!("input capture disabled");
        Vec::new()
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("kt-web")
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(serve_reports(config, store))?;

    info!(listeners = listeners.len(), "shutting down");
    Ok(())
}

pub fn app_state(config: &Config, store: Store) -> AppState {
    AppState {
        store,
        renderer: Arc::new(EchartsRenderer::with_script_src(&config.chart_script)),
        clock: Arc::new(SystemClock),
        filter: config.report,
    }
}

async fn serve_reports(config: &Config, store: Store) -> Result<()> {
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    kt_web::serve(
        listener,
        app_state(config, store),
        config.request_timeout(),
        kt_web::shutdown_signal(),
    )
    .await
    .context("reporting server failed")
}

#[cfg(test)]
mod tests {
    use kt_core::EventKind;
    use kt_db::StoreOptions;

    use super::*;

    #[test]
    fn app_state_uses_configured_filter() {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::open(temp.path().join("kt.db"), StoreOptions::default()).unwrap();
        let mut config = Config::default();
        config.report.kind = EventKind::Mouse;

        let state = app_state(&config, store);

        assert_eq!(state.filter.kind, EventKind::Mouse);
        assert_eq!(state.store.path(), temp.path().join("kt.db"));
    }

    #[test]
    fn app_state_loads_the_configured_chart_script() {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::open(temp.path().join("kt.db"), StoreOptions::default()).unwrap();
        let config = Config {
            chart_script: "/assets/echarts.js".to_string(),
            ..Config::default()
        };

        let state = app_state(&config, store);
        let html = state.renderer.render("Today", &kt_web::Series::default());

        assert!(html.contains(r#"<script src="/assets/echarts.js"></script>"#));
    }

    #[test]
    fn bind_failure_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::open(temp.path().join("kt.db"), StoreOptions::default()).unwrap();
        let config = Config {
            bind: "not an address".to_string(),
            ..Config::default()
        };

        let err = run(&config, store, false).unwrap_err();
        assert!(err.to_string().contains("failed to bind not an address"));
    }
}
