// ABOUTME: Defines DeckEvent, the change notifications broadcast after a mutation has been applied.
// ABOUTME: Events are emitted only once the mutation and its persistence side effect have completed.

use ulid::Ulid;

/// Change notification fanned out to observers over a broadcast channel.
/// Replaces the signal/slot wiring of a GUI host with an explicit event
/// stream; an event for a mutation is sent after the affected container's
/// durable record has been written.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent {
    /// A container was created, deleted, duplicated, or had its metadata
    /// changed.
    ContainersChanged,
    /// The item list of the given container changed (add/remove/move/
    /// update/clear/import).
    ItemsChanged { container_id: Ulid },
    /// The current container or current item changed.
    SelectionChanged {
        container_id: Option<Ulid>,
        item_index: Option<usize>,
    },
    /// The output sink was retargeted, renamed, or lost.
    SinkChanged { name: Option<String> },
}
