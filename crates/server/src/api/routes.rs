use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::{downloads, export, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Metadata resolution
        .route("/video-info", post(downloads::video_info))
        // Downloads
        .route("/download", post(downloads::create_download))
        .route("/download/{id}", get(downloads::get_download))
        .route("/downloads", get(downloads::list_downloads))
        .route("/download-file/{id}", get(downloads::fetch_artifact))
        // Analytics export
        .route("/export", post(export::export_analytics))
        .with_state(Arc::clone(&state));

    // Artifacts are also served directly; each job's downloadUrl points here
    let artifacts = ServeDir::new(state.downloads_dir());

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/download-file", artifacts)
        .layer(TraceLayer::new_for_http())
        // The browser UI is served from a different origin
        .layer(CorsLayer::permissive())
}
