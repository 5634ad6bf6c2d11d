// ABOUTME: Single-writer deck actor: every mutation, autosave tick, and sink liveness check runs on one task.
// ABOUTME: Commands arrive over mpsc with oneshot replies; events broadcast only after persistence completes.

use std::sync::Arc;

use slidecast_core::{DeckEvent, DeckState, Item, OutputSync};
use thiserror::Error;
use tokio::sync::{RwLock, broadcast, mpsc, oneshot};
use ulid::Ulid;

use crate::interchange::ItemDocument;
use crate::record::RecordStore;

/// Errors surfaced to command callers. Out-of-range indices are not errors:
/// those operations report `false` instead, per the store contract.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("container not found: {0}")]
    ContainerNotFound(Ulid),

    #[error("malformed import document: {0}")]
    MalformedImport(#[from] serde_json::Error),

    #[error("actor channel closed")]
    ChannelClosed,
}

/// Commands processed sequentially by the deck actor. Timer ticks travel
/// through the same channel as operator mutations, so they can never
/// overlap one.
#[derive(Debug)]
pub enum Command {
    CreateContainer { name: String, date: String, theme: String },
    UpdateContainer { id: Ulid, name: String, date: String, theme: String },
    DeleteContainer { id: Ulid },
    DuplicateContainer { id: Ulid, new_name: String },
    AddItem { container_id: Ulid, item: Item },
    AddItemAt { container_id: Ulid, index: usize, item: Item },
    UpdateItem { container_id: Ulid, index: usize, item: Item },
    RemoveItem { container_id: Ulid, index: usize },
    MoveItem { container_id: Ulid, from: usize, to: usize },
    DuplicateItem { container_id: Ulid, index: usize },
    ClearItems { container_id: Ulid },
    ReplaceItems { container_id: Ulid, items: Vec<Item> },
    ExportItems { container_id: Ulid },
    SetCurrentContainer { id: Option<Ulid> },
    SetCurrentItem { index: Option<usize> },
    NextItem,
    PreviousItem,
    SetSinkName { name: Option<String> },
    SinkRenamed { old_name: String, new_name: String },
    SinkRemoved { name: String },
    Refresh,
    AutosaveTick,
    SinkCheckTick,
    SaveAll,
}

/// What a command produced. Each handle method unwraps the variant its
/// command is defined to return.
#[derive(Debug)]
pub enum Outcome {
    Unit,
    ContainerId(Ulid),
    ItemId(Ulid),
    Applied(bool),
    Document(ItemDocument),
}

type CommandMessage = (Command, oneshot::Sender<Result<Outcome, DeckError>>);

/// Public handle for the deck actor: send commands, subscribe to change
/// events, read state. Cheap to clone; constructed once at startup and
/// passed to every consumer.
#[derive(Clone)]
pub struct DeckHandle {
    cmd_tx: mpsc::Sender<CommandMessage>,
    event_tx: broadcast::Sender<DeckEvent>,
    state: Arc<RwLock<DeckState>>,
}

impl DeckHandle {
    pub async fn send(&self, cmd: Command) -> Result<Outcome, DeckError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send((cmd, tx))
            .await
            .map_err(|_| DeckError::ChannelClosed)?;
        rx.await.map_err(|_| DeckError::ChannelClosed)?
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.event_tx.subscribe()
    }

    pub async fn read_state(&self) -> tokio::sync::RwLockReadGuard<'_, DeckState> {
        self.state.read().await
    }

    // --- typed command wrappers ---

    pub async fn create_container(
        &self,
        name: &str,
        date: &str,
        theme: &str,
    ) -> Result<Ulid, DeckError> {
        match self
            .send(Command::CreateContainer {
                name: name.to_string(),
                date: date.to_string(),
                theme: theme.to_string(),
            })
            .await?
        {
            Outcome::ContainerId(id) => Ok(id),
            other => unreachable!("unexpected outcome for CreateContainer: {other:?}"),
        }
    }

    pub async fn duplicate_container(
        &self,
        id: Ulid,
        new_name: &str,
    ) -> Result<Ulid, DeckError> {
        match self
            .send(Command::DuplicateContainer {
                id,
                new_name: new_name.to_string(),
            })
            .await?
        {
            Outcome::ContainerId(id) => Ok(id),
            other => unreachable!("unexpected outcome for DuplicateContainer: {other:?}"),
        }
    }

    pub async fn delete_container(&self, id: Ulid) -> Result<bool, DeckError> {
        self.applied(Command::DeleteContainer { id }).await
    }

    pub async fn update_container(
        &self,
        id: Ulid,
        name: &str,
        date: &str,
        theme: &str,
    ) -> Result<bool, DeckError> {
        self.applied(Command::UpdateContainer {
            id,
            name: name.to_string(),
            date: date.to_string(),
            theme: theme.to_string(),
        })
        .await
    }

    pub async fn add_item(&self, container_id: Ulid, item: Item) -> Result<Ulid, DeckError> {
        match self.send(Command::AddItem { container_id, item }).await? {
            Outcome::ItemId(id) => Ok(id),
            other => unreachable!("unexpected outcome for AddItem: {other:?}"),
        }
    }

    pub async fn add_item_at(
        &self,
        container_id: Ulid,
        index: usize,
        item: Item,
    ) -> Result<Ulid, DeckError> {
        match self
            .send(Command::AddItemAt {
                container_id,
                index,
                item,
            })
            .await?
        {
            Outcome::ItemId(id) => Ok(id),
            other => unreachable!("unexpected outcome for AddItemAt: {other:?}"),
        }
    }

    pub async fn update_item(
        &self,
        container_id: Ulid,
        index: usize,
        item: Item,
    ) -> Result<bool, DeckError> {
        self.applied(Command::UpdateItem {
            container_id,
            index,
            item,
        })
        .await
    }

    pub async fn remove_item(&self, container_id: Ulid, index: usize) -> Result<bool, DeckError> {
        self.applied(Command::RemoveItem {
            container_id,
            index,
        })
        .await
    }

    pub async fn move_item(
        &self,
        container_id: Ulid,
        from: usize,
        to: usize,
    ) -> Result<bool, DeckError> {
        self.applied(Command::MoveItem {
            container_id,
            from,
            to,
        })
        .await
    }

    pub async fn duplicate_item(
        &self,
        container_id: Ulid,
        index: usize,
    ) -> Result<bool, DeckError> {
        self.applied(Command::DuplicateItem {
            container_id,
            index,
        })
        .await
    }

    pub async fn clear_items(&self, container_id: Ulid) -> Result<bool, DeckError> {
        self.applied(Command::ClearItems { container_id }).await
    }

    pub async fn set_current_container(&self, id: Option<Ulid>) -> Result<bool, DeckError> {
        self.applied(Command::SetCurrentContainer { id }).await
    }

    pub async fn set_current_item(&self, index: Option<usize>) -> Result<bool, DeckError> {
        self.applied(Command::SetCurrentItem { index }).await
    }

    pub async fn next_item(&self) -> Result<bool, DeckError> {
        self.applied(Command::NextItem).await
    }

    pub async fn previous_item(&self) -> Result<bool, DeckError> {
        self.applied(Command::PreviousItem).await
    }

    pub async fn set_sink_name(&self, name: Option<String>) -> Result<(), DeckError> {
        self.send(Command::SetSinkName { name }).await?;
        Ok(())
    }

    pub async fn refresh(&self) -> Result<(), DeckError> {
        self.send(Command::Refresh).await?;
        Ok(())
    }

    pub async fn save_all(&self) -> Result<(), DeckError> {
        self.send(Command::SaveAll).await?;
        Ok(())
    }

    /// Parse and apply an interchange document. The document is validated
    /// in full before any state changes; a malformed document leaves the
    /// container untouched.
    pub async fn import_items(&self, container_id: Ulid, json: &str) -> Result<bool, DeckError> {
        let doc = ItemDocument::parse(json)?;
        self.applied(Command::ReplaceItems {
            container_id,
            items: doc.into_items(),
        })
        .await
    }

    pub async fn export_items(&self, container_id: Ulid) -> Result<ItemDocument, DeckError> {
        match self.send(Command::ExportItems { container_id }).await? {
            Outcome::Document(doc) => Ok(doc),
            other => unreachable!("unexpected outcome for ExportItems: {other:?}"),
        }
    }

    async fn applied(&self, cmd: Command) -> Result<bool, DeckError> {
        match self.send(cmd).await? {
            Outcome::Applied(applied) => Ok(applied),
            other => unreachable!("expected Applied outcome, got: {other:?}"),
        }
    }
}

/// Spawn the deck actor task. The caller keeps the `OutputSync`'s shared
/// overlay slot (via `latest_handle`) before handing the synchronizer over.
pub fn spawn(state: DeckState, store: RecordStore, output: OutputSync) -> DeckHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<CommandMessage>(64);
    let (event_tx, _) = broadcast::channel::<DeckEvent>(256);
    let state = Arc::new(RwLock::new(state));

    let handle = DeckHandle {
        cmd_tx,
        event_tx: event_tx.clone(),
        state: Arc::clone(&state),
    };

    let actor = DeckActor {
        state,
        store,
        output,
        cmd_rx,
        event_tx,
    };

    tokio::spawn(actor.run());

    handle
}

struct DeckActor {
    state: Arc<RwLock<DeckState>>,
    store: RecordStore,
    output: OutputSync,
    cmd_rx: mpsc::Receiver<CommandMessage>,
    event_tx: broadcast::Sender<DeckEvent>,
}

impl DeckActor {
    async fn run(mut self) {
        while let Some((cmd, reply_tx)) = self.cmd_rx.recv().await {
            let result = self.process(cmd).await;
            // The caller may have dropped its receiver.
            let _ = reply_tx.send(result);
        }
    }

    /// Persist one container's record. A write failure is logged and does
    /// not roll back the in-memory mutation.
    fn persist(&self, state: &DeckState, id: Ulid) {
        if let Some(container) = state.containers.get(&id)
            && let Err(e) = self.store.save(container)
        {
            tracing::warn!("failed to persist container {}: {}", id, e);
        }
    }

    fn broadcast(&self, event: DeckEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }

    fn selection_event(state: &DeckState) -> DeckEvent {
        DeckEvent::SelectionChanged {
            container_id: state.current_container,
            item_index: state.current_index,
        }
    }

    async fn process(&mut self, cmd: Command) -> Result<Outcome, DeckError> {
        match cmd {
            Command::CreateContainer { name, date, theme } => {
                let mut state = self.state.write().await;
                let id = state.create_container(name, date, theme);
                self.persist(&state, id);
                drop(state);
                self.broadcast(DeckEvent::ContainersChanged);
                Ok(Outcome::ContainerId(id))
            }

            Command::UpdateContainer {
                id,
                name,
                date,
                theme,
            } => {
                let mut state = self.state.write().await;
                let applied = state.update_container(id, name, date, theme);
                if applied {
                    self.persist(&state, id);
                    drop(state);
                    self.broadcast(DeckEvent::ContainersChanged);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::DeleteContainer { id } => {
                let mut state = self.state.write().await;
                let was_current = state.current_container == Some(id);
                let applied = state.delete_container(id);
                if applied {
                    if let Err(e) = self.store.delete(id) {
                        tracing::warn!("failed to delete record for {}: {}", id, e);
                    }
                    if was_current {
                        self.output.refresh(state.current_item());
                    }
                    drop(state);
                    self.broadcast(DeckEvent::ContainersChanged);
                    if was_current {
                        self.broadcast(DeckEvent::SelectionChanged {
                            container_id: None,
                            item_index: None,
                        });
                    }
                }
                Ok(Outcome::Applied(applied))
            }

            Command::DuplicateContainer { id, new_name } => {
                let mut state = self.state.write().await;
                let Some(new_id) = state.duplicate_container(id, new_name) else {
                    return Err(DeckError::ContainerNotFound(id));
                };
                self.persist(&state, new_id);
                drop(state);
                self.broadcast(DeckEvent::ContainersChanged);
                Ok(Outcome::ContainerId(new_id))
            }

            Command::AddItem { container_id, item } => {
                let mut state = self.state.write().await;
                let Some(item_id) = state.add_item(container_id, item) else {
                    return Err(DeckError::ContainerNotFound(container_id));
                };
                self.persist(&state, container_id);
                drop(state);
                self.broadcast(DeckEvent::ItemsChanged { container_id });
                Ok(Outcome::ItemId(item_id))
            }

            Command::AddItemAt {
                container_id,
                index,
                item,
            } => {
                let mut state = self.state.write().await;
                let before = state.current_index;
                let Some(item_id) = state.add_item_at(container_id, index, item) else {
                    return Err(DeckError::ContainerNotFound(container_id));
                };
                self.persist(&state, container_id);
                Self::finish_item_mutation(&mut self.output, &self.event_tx, &state, container_id, before);
                Ok(Outcome::ItemId(item_id))
            }

            Command::UpdateItem {
                container_id,
                index,
                item,
            } => {
                let mut state = self.state.write().await;
                let applied = state.update_item(container_id, index, item);
                if applied {
                    self.persist(&state, container_id);
                    // Re-push immediately when the live item was edited.
                    if state.current_container == Some(container_id)
                        && state.current_index == Some(index)
                    {
                        self.output.refresh(state.current_item());
                    }
                    drop(state);
                    self.broadcast(DeckEvent::ItemsChanged { container_id });
                }
                Ok(Outcome::Applied(applied))
            }

            Command::RemoveItem {
                container_id,
                index,
            } => {
                let mut state = self.state.write().await;
                let before = state.current_index;
                let applied = state.remove_item(container_id, index);
                if applied {
                    self.persist(&state, container_id);
                    Self::finish_item_mutation(&mut self.output, &self.event_tx, &state, container_id, before);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::MoveItem {
                container_id,
                from,
                to,
            } => {
                let mut state = self.state.write().await;
                let before = state.current_index;
                let applied = state.move_item(container_id, from, to);
                if applied {
                    self.persist(&state, container_id);
                    Self::finish_item_mutation(&mut self.output, &self.event_tx, &state, container_id, before);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::DuplicateItem {
                container_id,
                index,
            } => {
                let mut state = self.state.write().await;
                let before = state.current_index;
                let applied = state.duplicate_item(container_id, index);
                if applied {
                    self.persist(&state, container_id);
                    Self::finish_item_mutation(&mut self.output, &self.event_tx, &state, container_id, before);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::ClearItems { container_id } => {
                let mut state = self.state.write().await;
                let before = state.current_index;
                let applied = state.clear_items(container_id);
                if applied {
                    self.persist(&state, container_id);
                    Self::finish_item_mutation(&mut self.output, &self.event_tx, &state, container_id, before);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::ReplaceItems {
                container_id,
                items,
            } => {
                let mut state = self.state.write().await;
                let before = state.current_index;
                let applied = state.replace_items(container_id, items);
                if applied {
                    self.persist(&state, container_id);
                    Self::finish_item_mutation(&mut self.output, &self.event_tx, &state, container_id, before);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::ExportItems { container_id } => {
                let state = self.state.read().await;
                let Some(container) = state.get_container(container_id) else {
                    return Err(DeckError::ContainerNotFound(container_id));
                };
                Ok(Outcome::Document(ItemDocument::from_items(&container.items)))
            }

            Command::SetCurrentContainer { id } => {
                let mut state = self.state.write().await;
                // Autosave the outgoing container before switching away.
                if let Some(prev) = state.current_container
                    && id != Some(prev)
                {
                    self.persist(&state, prev);
                }
                let applied = state.set_current_container(id);
                if applied {
                    self.output.refresh(state.current_item());
                    let event = Self::selection_event(&state);
                    drop(state);
                    self.broadcast(event);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::SetCurrentItem { index } => {
                let mut state = self.state.write().await;
                let applied = state.set_current_item(index);
                if applied {
                    // Write-through: the remembered index is part of the record.
                    if let Some(id) = state.current_container {
                        self.persist(&state, id);
                    }
                    self.output.refresh(state.current_item());
                    let event = Self::selection_event(&state);
                    drop(state);
                    self.broadcast(event);
                }
                Ok(Outcome::Applied(applied))
            }

            Command::NextItem => {
                let mut state = self.state.write().await;
                let moved = state.next_item().is_some();
                if moved {
                    if let Some(id) = state.current_container {
                        self.persist(&state, id);
                    }
                    self.output.refresh(state.current_item());
                    let event = Self::selection_event(&state);
                    drop(state);
                    self.broadcast(event);
                }
                Ok(Outcome::Applied(moved))
            }

            Command::PreviousItem => {
                let mut state = self.state.write().await;
                let moved = state.previous_item().is_some();
                if moved {
                    if let Some(id) = state.current_container {
                        self.persist(&state, id);
                    }
                    self.output.refresh(state.current_item());
                    let event = Self::selection_event(&state);
                    drop(state);
                    self.broadcast(event);
                }
                Ok(Outcome::Applied(moved))
            }

            Command::SetSinkName { name } => {
                let state = self.state.read().await;
                self.output.set_sink_name(name.clone());
                self.output.refresh(state.current_item());
                drop(state);
                self.broadcast(DeckEvent::SinkChanged { name });
                Ok(Outcome::Unit)
            }

            Command::SinkRenamed { old_name, new_name } => {
                if self.output.on_sink_renamed(&old_name, &new_name) {
                    self.broadcast(DeckEvent::SinkChanged {
                        name: Some(new_name),
                    });
                }
                Ok(Outcome::Unit)
            }

            Command::SinkRemoved { name } => {
                if self.output.on_sink_removed(&name) {
                    self.broadcast(DeckEvent::SinkChanged { name: None });
                }
                Ok(Outcome::Unit)
            }

            Command::Refresh => {
                let state = self.state.read().await;
                self.output.refresh(state.current_item());
                Ok(Outcome::Unit)
            }

            Command::AutosaveTick => {
                let state = self.state.read().await;
                if let Some(id) = state.current_container {
                    self.persist(&state, id);
                }
                Ok(Outcome::Unit)
            }

            Command::SinkCheckTick => {
                if let Some(present) = self.output.check_sink() {
                    if present {
                        // Catch the reappeared sink up with current content.
                        let state = self.state.read().await;
                        self.output.refresh(state.current_item());
                    }
                    self.broadcast(DeckEvent::SinkChanged {
                        name: self.output.sink_name().map(str::to_string),
                    });
                }
                Ok(Outcome::Unit)
            }

            Command::SaveAll => {
                let state = self.state.read().await;
                for container in state.containers.values() {
                    if let Err(e) = self.store.save(container) {
                        tracing::warn!("failed to persist container {}: {}", container.id, e);
                    }
                }
                Ok(Outcome::Unit)
            }
        }
    }

    /// Shared tail for structural item mutations: refresh output when the
    /// mutated container is live, then notify, including a selection event
    /// when the index was dragged along. Takes the fields it needs rather
    /// than the whole actor, since callers still hold the state guard.
    fn finish_item_mutation(
        output: &mut OutputSync,
        event_tx: &broadcast::Sender<DeckEvent>,
        state: &DeckState,
        container_id: Ulid,
        index_before: Option<usize>,
    ) {
        if state.current_container == Some(container_id) {
            output.refresh(state.current_item());
        }
        let selection_moved =
            state.current_container == Some(container_id) && state.current_index != index_before;
        let _ = event_tx.send(DeckEvent::ItemsChanged { container_id });
        if selection_moved {
            let _ = event_tx.send(Self::selection_event(state));
        }
    }
}
