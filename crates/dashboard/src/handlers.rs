use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use family_types::{FamilySnapshot, RefreshReport};
use std::sync::Arc;

use crate::publisher::SnapshotReader;
use crate::render::render_html;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotReader,
    /// Href of the stylesheet linked from the HTML view
    pub stylesheet_href: Arc<str>,
}

impl AppState {
    pub fn new(snapshots: SnapshotReader, stylesheet: &str) -> Self {
        let stylesheet_href = format!("/static/{}", stylesheet.trim_start_matches('/'));
        Self {
            snapshots,
            stylesheet_href: stylesheet_href.into(),
        }
    }
}

/// The current week as JSON, for the polling front-end.
pub async fn get_snapshot_json(State(state): State<AppState>) -> Json<Arc<FamilySnapshot>> {
    Json(state.snapshots.current())
}

/// The current week as a standalone HTML page.
pub async fn get_snapshot_html(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshots.current();
    Html(render_html(&snapshot, &state.stylesheet_href))
}

/// How the refresh behind the current snapshot went.
pub async fn get_refresh_status(State(state): State<AppState>) -> Json<Arc<RefreshReport>> {
    Json(state.snapshots.report())
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
