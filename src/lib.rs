pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use logic::EvolutionChainResolver;

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::{AppState, ImageStorage};
use crate::config::UploadConfig;

/// Full application router: API routes, uploaded image serving, CORS and the upload body limit
pub fn build_app<S: Store + 'static>(store: Arc<S>, uploads: &UploadConfig) -> Router {
    let images = ImageStorage::new(&uploads.directory);
    let image_dir = images.dir().to_path_buf();

    api::routes::create_router::<S>()
        .nest_service("/imagenes", ServeDir::new(image_dir))
        .layer(DefaultBodyLimit::max(uploads.max_bytes))
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(store, images))
}

/// Serve `app` on an already bound listener until the process stops
pub async fn run_server(listener: tokio::net::TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}
