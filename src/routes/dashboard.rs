//! Dashboard endpoints
//!
//! Search and report calls run on their own task so a client that drops the
//! connection cannot leave a slot stuck in `loading`.

use std::convert::Infallible;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::catalog::{RnaCategory, TUMOR_TYPES};
use crate::dashboard::DashboardView;
use crate::export::ExportArtifact;
use crate::models::{AppState, CatalogResponse, ReportRequest, SearchRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/catalog", get(catalog))
        .route("/api/search", post(search))
        .route("/api/report", post(report))
        .route("/api/dashboard", get(view))
        .route("/api/export/candidates", get(export_candidates))
        .route("/api/export/samples", get(export_samples))
        .route("/api/events", get(events))
        .with_state(state)
}

async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        tumor_types: TUMOR_TYPES,
        rna_categories: RnaCategory::ALL.to_vec(),
    })
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<DashboardView>> {
    info!(tumor = %request.tumor_code, category = %request.rna_category, "Received search request");

    let dashboard = state.dashboard.clone();
    tokio::spawn(async move {
        dashboard
            .run_search(&request.tumor_code, &request.rna_category)
            .await
    })
    .await
    .map_err(|e| AppError::Internal(format!("search task failed: {}", e)))??;

    Ok(Json(state.dashboard.view().await))
}

async fn report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> AppResult<Json<DashboardView>> {
    info!(symbol = %request.symbol, "Received report request");

    let dashboard = state.dashboard.clone();
    tokio::spawn(async move { dashboard.select_candidate(&request.symbol).await })
        .await
        .map_err(|e| AppError::Internal(format!("report task failed: {}", e)))??;

    Ok(Json(state.dashboard.view().await))
}

async fn view(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view().await)
}

async fn export_candidates(State(state): State<AppState>) -> AppResult<Response> {
    Ok(attachment(state.dashboard.export_current_search().await?))
}

async fn export_samples(State(state): State<AppState>) -> AppResult<Response> {
    Ok(attachment(state.dashboard.export_current_samples().await?))
}

/// Nothing to export is not an error: 204 with no body
fn attachment(artifact: Option<ExportArtifact>) -> Response {
    match artifact {
        Some(artifact) => (
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.filename),
                ),
            ],
            artifact.body,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.dashboard.subscribe();

    let stream = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match Event::default().event("focus").json_data(&event) {
                    Ok(sse) => return Some((Ok::<_, Infallible>(sse), receiver)),
                    Err(e) => debug!(error = %e, "Skipping unencodable event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
