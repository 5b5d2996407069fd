use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use kt_core::{Action, EventKind, View};
use serde::Deserialize;
use tracing::{debug, error};

use crate::AppState;
use crate::chart::Series;
use crate::error::HttpError;
use crate::report::Report;

/// Per-request overrides of the configured report filter.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct FilterParams {
    pub kind: Option<EventKind>,
    pub action: Option<Action>,
}

pub async fn today(State(state): State<AppState>, Query(params): Query<FilterParams>) -> Response {
    chart(&state, View::Today, params).await
}

pub async fn yesterday(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Response {
    chart(&state, View::Yesterday, params).await
}

pub async fn all_time(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Response {
    chart(&state, View::AllTime, params).await
}

pub async fn counts(
    State(state): State<AppState>,
    Path(view): Path<View>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Report>, HttpError> {
    let report = load_report(&state, view, params).await?;
    Ok(Json(report))
}

pub async fn healthz() -> &'static str {
    "ok"
}

async fn chart(state: &AppState, view: View, params: FilterParams) -> Response {
    match load_report(state, view, params).await {
        Ok(report) => {
            let series = Series::from_counts(&report.counts);
            Html(state.renderer.render(&report.title(), &series)).into_response()
        }
        Err(err) => {
            error!(%view, error = %err, "failed to load report");
            let page = state.renderer.render_error(view.title(), &err.to_string());
            (err.status(), Html(page)).into_response()
        }
    }
}

/// Runs the report query on a blocking thread with its own connection.
///
/// Day boundaries are taken once, so a request that straddles midnight still
/// sees a consistent window.
async fn load_report(
    state: &AppState,
    view: View,
    params: FilterParams,
) -> Result<Report, HttpError> {
    let bounds = state.clock.boundaries();
    let filter = state.filter.with_overrides(params.kind, params.action);
    let store = state.store.clone();
    let report = tokio::task::spawn_blocking(move || {
        let db = store.connect()?;
        Report::build(&db, view, filter, &bounds)
    })
    .await??;
    debug!(%view, buttons = report.counts.len(), total = report.total, "report loaded");
    Ok(report)
}
