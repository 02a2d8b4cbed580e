//! API Routes
//!
//! - `/api/health` - Health check
//! - `/api/catalog` - Tumor types and RNA categories
//! - `/api/search`, `/api/report`, `/api/dashboard` - Dashboard flow
//! - `/api/export/*` - CSV downloads
//! - `/api/events` - Focus intents as server-sent events
//! - `/` - Static file serving (frontend)

pub mod dashboard;
pub mod health;
pub mod static_files;

use std::path::Path;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::middleware::cors_layer;
use crate::models::{AppState, ErrorResponse};
use crate::types::AppError;

/// Create the main application router
///
/// API routes take precedence; everything else falls through to the
/// static frontend.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);
    let static_dir = state.config.server.static_dir.clone();

    let api_router = Router::new()
        .merge(dashboard::router(state.clone()))
        .merge(health::router(state));

    Router::new()
        .merge(api_router)
        .merge(static_files::router(Path::new(&static_dir)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DataUnavailable(_) | AppError::LLMApi(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
