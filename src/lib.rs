// GlycoAtlas - analysis orchestration for a glycosylated-RNA tumor dashboard

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod gateway;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod survival;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use dashboard::Dashboard;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
