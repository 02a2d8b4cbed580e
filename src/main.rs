use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use glyco_atlas::{
    config::Config, gateway::GenerativeGateway, utils::init_logger, AppState, Dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);
    if config.llm.google_api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; every search will fail with data unavailable");
    }

    let gateway = GenerativeGateway::from_config(&config.llm)?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "Data gateway ready");

    let state = AppState {
        dashboard: Arc::new(Dashboard::new(Arc::new(gateway))),
        config: config.clone(),
    };
    let app = glyco_atlas::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
