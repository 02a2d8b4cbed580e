//! Static File Serving
//!
//! Serves the built dashboard frontend. Unknown paths fall back to
//! `index.html` so client-side routing keeps working.

use std::path::Path;

use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

pub fn router(static_dir: &Path) -> Router {
    if !static_dir.is_dir() {
        warn!(path = %static_dir.display(), "Static files directory not found, frontend may not be built");
        return Router::new().route("/", get(serve_placeholder));
    }

    info!(path = %static_dir.display(), "Serving frontend");
    let serve_dir = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new().fallback_service(serve_dir)
}

async fn serve_placeholder() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(PLACEHOLDER_HTML),
    )
}

const PLACEHOLDER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>GlycoAtlas - API Server</title>
</head>
<body>
    <h1>GlycoAtlas</h1>
    <p>The API is running but the dashboard frontend has not been built.</p>
    <ul>
        <li><code>GET /api/health</code></li>
        <li><code>GET /api/catalog</code></li>
        <li><code>POST /api/search</code> with <code>{"tumorCode": "BRCA", "rnaCategory": "YRNA"}</code></li>
        <li><code>POST /api/report</code> with <code>{"symbol": "RNY1"}</code></li>
        <li><code>GET /api/dashboard</code></li>
        <li><code>GET /api/export/candidates</code>, <code>GET /api/export/samples</code></li>
        <li><code>GET /api/events</code></li>
    </ul>
</body>
</html>"#;
