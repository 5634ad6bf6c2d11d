// ABOUTME: HTTP server for slidecast: the overlay document endpoint plus a health probe.
// ABOUTME: Uses Axum with shared actor state; rendering happens upstream, this crate only serves it.

pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, SlidecastConfig};
pub use routes::create_router;
