// ABOUTME: Shared application state for the slidecast HTTP server.
// ABOUTME: Carries the deck actor handle and the shared overlay document slot.

use std::sync::{Arc, RwLock};

use slidecast_store::DeckHandle;

/// Shared state accessible by all Axum handlers: the deck actor handle and
/// the overlay slot the output synchronizer writes into.
pub struct AppState {
    pub deck: DeckHandle,
    pub latest: Arc<RwLock<String>>,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(deck: DeckHandle, latest: Arc<RwLock<String>>) -> Self {
        Self { deck, latest }
    }
}
