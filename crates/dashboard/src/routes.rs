use axum::{routing::get, Router};
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{self, AppState};

/// Build the dashboard's router.
///
/// Every response allows any origin, since the display front-end is
/// usually served from somewhere else.
pub fn create_app(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::get_snapshot_html))
        .route("/json", get(handlers::get_snapshot_json))
        .route("/status", get(handlers::get_refresh_status))
        .route("/health", get(handlers::health_check))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
