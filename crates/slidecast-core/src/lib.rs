// ABOUTME: Core library for slidecast: containers, items, selection, deck state, rendering, output sync.
// ABOUTME: This crate holds the pure domain logic shared by the store, server, and binary.

pub mod container;
pub mod event;
pub mod item;
pub mod output;
pub mod render;
pub mod selection;
pub mod sink;
pub mod state;

pub use container::Container;
pub use event::DeckEvent;
pub use item::{Item, ItemStyle};
pub use output::OutputSync;
pub use sink::{FileSinkDirectory, MemorySinkDirectory, SinkDirectory};
pub use state::DeckState;
