// ABOUTME: Persistence and orchestration for slidecast: per-container JSON records plus the deck actor.
// ABOUTME: The actor is the single writer; everything else observes through the handle.

pub mod actor;
pub mod interchange;
pub mod record;

pub use actor::{Command, DeckError, DeckHandle, Outcome, spawn};
pub use interchange::{DOCUMENT_VERSION, ItemDocument, ItemEntry};
pub use record::{RecordStore, StoreError};
