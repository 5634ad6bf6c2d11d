// ABOUTME: Route definitions for the slidecast overlay server.
// ABOUTME: Serves the latest rendered overlay document at / and a health probe at /health.

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::app_state::SharedState;

/// Build the Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(overlay))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the latest rendered overlay document. Browser sources poll this;
/// before anything has been rendered it holds the placeholder page.
async fn overlay(State(state): State<SharedState>) -> Html<String> {
    let html = match state.latest.read() {
        Ok(slot) => slot.clone(),
        Err(e) => {
            tracing::error!("overlay slot poisoned: {}", e);
            slidecast_core::render::placeholder_document()
        }
    };
    Html(html)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
