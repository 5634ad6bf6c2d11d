// ABOUTME: Defines DeckState, the in-memory entity store plus the current-selection pointer.
// ABOUTME: All mutations keep the selection invariant: the item index is in bounds or unset, never stale.

use std::collections::BTreeMap;

use ulid::Ulid;

use crate::container::Container;
use crate::item::Item;
use crate::selection;

/// The full in-memory state: every container keyed by id, the explicit
/// creation sequence, and the selection pointer. The sequence is kept
/// separately because ULIDs created within the same millisecond do not
/// sort in creation order.
///
/// Invariant: when `current_container` is set, `current_index` mirrors that
/// container's own `current_item_index`, and both are in bounds or unset.
#[derive(Debug, Default)]
pub struct DeckState {
    pub containers: BTreeMap<Ulid, Container>,
    order: Vec<Ulid>,
    pub current_container: Option<Ulid>,
    pub current_index: Option<usize>,
}

impl DeckState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from recovered records, ordered by creation timestamp
    /// (id as tiebreaker). Persisted selections that no longer fit their
    /// item lists are reset rather than left dangling.
    pub fn from_containers(mut containers: Vec<Container>) -> Self {
        containers.sort_by_key(|c| (c.created_at, c.id));
        let mut map = BTreeMap::new();
        let mut order = Vec::with_capacity(containers.len());
        for mut c in containers {
            c.clamp_index();
            order.push(c.id);
            map.insert(c.id, c);
        }
        Self {
            containers: map,
            order,
            current_container: None,
            current_index: None,
        }
    }

    // --- container operations ---

    /// Create a container seeded with a single default item, which starts
    /// as the container's remembered selection.
    pub fn create_container(
        &mut self,
        name: impl Into<String>,
        date: impl Into<String>,
        theme: impl Into<String>,
    ) -> Ulid {
        let mut container = Container::new(name, date, theme);
        container.items.push(Item::new("Slide 1", ""));
        container.current_item_index = Some(0);
        let id = container.id;
        self.order.push(id);
        self.containers.insert(id, container);
        id
    }

    pub fn update_container(
        &mut self,
        id: Ulid,
        name: impl Into<String>,
        date: impl Into<String>,
        theme: impl Into<String>,
    ) -> bool {
        let Some(container) = self.containers.get_mut(&id) else {
            return false;
        };
        container.name = name.into();
        container.date = date.into();
        container.theme = theme.into();
        container.touch();
        true
    }

    /// Delete a container and everything it owns. Deleting the current
    /// container clears the selection as part of the same operation.
    pub fn delete_container(&mut self, id: Ulid) -> bool {
        if self.containers.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|&existing| existing != id);
        if self.current_container == Some(id) {
            self.current_container = None;
            self.current_index = None;
        }
        true
    }

    /// Clone a container under a fresh id and name with fresh timestamps.
    pub fn duplicate_container(&mut self, id: Ulid, new_name: impl Into<String>) -> Option<Ulid> {
        let original = self.containers.get(&id)?;
        let mut copy = original.clone();
        copy.id = Ulid::new();
        copy.name = new_name.into();
        let now = chrono::Utc::now();
        copy.created_at = now;
        copy.modified_at = now;
        let new_id = copy.id;
        self.order.push(new_id);
        self.containers.insert(new_id, copy);
        Some(new_id)
    }

    pub fn get_container(&self, id: Ulid) -> Option<&Container> {
        self.containers.get(&id)
    }

    /// Containers in creation order.
    pub fn list_containers(&self) -> Vec<&Container> {
        self.order
            .iter()
            .filter_map(|id| self.containers.get(id))
            .collect()
    }

    pub fn current_container(&self) -> Option<&Container> {
        self.containers.get(&self.current_container?)
    }

    /// The item the output should show right now, if any.
    pub fn current_item(&self) -> Option<&Item> {
        self.current_container()?.items.get(self.current_index?)
    }

    // --- item operations ---

    pub fn add_item(&mut self, container_id: Ulid, item: Item) -> Option<Ulid> {
        let container = self.containers.get_mut(&container_id)?;
        let item_id = item.id;
        container.items.push(item);
        container.touch();
        Some(item_id)
    }

    /// Insert at `index`, clamped into `0..=len`. Inserting at or before
    /// the remembered selection pushes it right.
    pub fn add_item_at(&mut self, container_id: Ulid, index: usize, item: Item) -> Option<Ulid> {
        let container = self.containers.get_mut(&container_id)?;
        let index = index.min(container.items.len());
        let item_id = item.id;
        container.items.insert(index, item);
        container.current_item_index = selection::after_insert(container.current_item_index, index);
        container.touch();
        self.sync_selection(container_id);
        Some(item_id)
    }

    /// Replace the item at `index`, keeping the stored item's identity.
    pub fn update_item(&mut self, container_id: Ulid, index: usize, item: Item) -> bool {
        let Some(container) = self.containers.get_mut(&container_id) else {
            return false;
        };
        let Some(slot) = container.items.get_mut(index) else {
            return false;
        };
        let id = slot.id;
        *slot = item;
        slot.id = id;
        container.touch();
        true
    }

    pub fn remove_item(&mut self, container_id: Ulid, index: usize) -> bool {
        let Some(container) = self.containers.get_mut(&container_id) else {
            return false;
        };
        if index >= container.items.len() {
            return false;
        }
        container.items.remove(index);
        container.current_item_index = selection::after_remove(container.current_item_index, index);
        container.touch();
        self.sync_selection(container_id);
        true
    }

    pub fn move_item(&mut self, container_id: Ulid, from: usize, to: usize) -> bool {
        let Some(container) = self.containers.get_mut(&container_id) else {
            return false;
        };
        let len = container.items.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let item = container.items.remove(from);
            container.items.insert(to, item);
            container.current_item_index =
                selection::after_move(container.current_item_index, from, to);
            container.touch();
            self.sync_selection(container_id);
        }
        true
    }

    /// Insert a copy of the item at `index` directly after it.
    pub fn duplicate_item(&mut self, container_id: Ulid, index: usize) -> bool {
        let Some(container) = self.containers.get_mut(&container_id) else {
            return false;
        };
        let Some(item) = container.items.get(index) else {
            return false;
        };
        let copy = item.duplicate();
        container.items.insert(index + 1, copy);
        container.current_item_index =
            selection::after_insert(container.current_item_index, index + 1);
        container.touch();
        self.sync_selection(container_id);
        true
    }

    pub fn clear_items(&mut self, container_id: Ulid) -> bool {
        let Some(container) = self.containers.get_mut(&container_id) else {
            return false;
        };
        container.items.clear();
        container.current_item_index = None;
        container.touch();
        self.sync_selection(container_id);
        true
    }

    /// Swap in a whole new item list (import). Resets the selection for
    /// that container.
    pub fn replace_items(&mut self, container_id: Ulid, items: Vec<Item>) -> bool {
        let Some(container) = self.containers.get_mut(&container_id) else {
            return false;
        };
        container.items = items;
        container.current_item_index = None;
        container.touch();
        self.sync_selection(container_id);
        true
    }

    // --- selection operations ---

    /// Switch the current container, restoring that container's remembered
    /// item selection. Passing None unselects everything. Returns false if
    /// the target container does not exist.
    pub fn set_current_container(&mut self, id: Option<Ulid>) -> bool {
        match id {
            Some(id) => {
                let Some(container) = self.containers.get_mut(&id) else {
                    return false;
                };
                container.clamp_index();
                self.current_index = container.current_item_index;
                self.current_container = Some(id);
                true
            }
            None => {
                self.current_container = None;
                self.current_index = None;
                true
            }
        }
    }

    /// Point at an item in the current container, or None to show nothing.
    /// Out-of-range indices are a no-op, not a clamp.
    pub fn set_current_item(&mut self, index: Option<usize>) -> bool {
        let Some(container_id) = self.current_container else {
            return false;
        };
        let Some(container) = self.containers.get_mut(&container_id) else {
            return false;
        };
        if let Some(idx) = index
            && idx >= container.items.len()
        {
            return false;
        }
        container.current_item_index = index;
        self.current_index = index;
        true
    }

    /// Advance to the next item, wrapping to the start. No-op without a
    /// container or with an empty item list.
    pub fn next_item(&mut self) -> Option<usize> {
        let len = self.current_container()?.items.len();
        if len == 0 {
            return None;
        }
        let next = selection::next(self.current_index, len);
        self.set_current_item(next);
        next
    }

    /// Step to the previous item, wrapping to the end.
    pub fn previous_item(&mut self) -> Option<usize> {
        let len = self.current_container()?.items.len();
        if len == 0 {
            return None;
        }
        let prev = selection::previous(self.current_index, len);
        self.set_current_item(prev);
        prev
    }

    /// Mirror a container's remembered index into the live selection when
    /// that container is the current one.
    fn sync_selection(&mut self, container_id: Ulid) {
        if self.current_container == Some(container_id) {
            self.current_index = self
                .containers
                .get(&container_id)
                .and_then(|c| c.current_item_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_with_three_items() -> (DeckState, Ulid) {
        let mut deck = DeckState::new();
        let id = deck.create_container("Sunday", "2024-01-01", "Grace");
        deck.clear_items(id);
        deck.add_item(id, Item::new("A", "alpha"));
        deck.add_item(id, Item::new("B", "bravo"));
        deck.add_item(id, Item::new("C", "charlie"));
        deck.set_current_container(Some(id));
        (deck, id)
    }

    fn titles(deck: &DeckState, id: Ulid) -> Vec<String> {
        deck.get_container(id)
            .unwrap()
            .items
            .iter()
            .map(|i| i.title.clone())
            .collect()
    }

    #[test]
    fn create_container_seeds_default_item() {
        let mut deck = DeckState::new();
        let id = deck.create_container("Deck", "", "");

        let container = deck.get_container(id).unwrap();
        assert_eq!(container.items.len(), 1);
        assert_eq!(container.current_item_index, Some(0));
    }

    #[test]
    fn add_item_appends_and_grows_by_one() {
        let (mut deck, id) = deck_with_three_items();
        let before = deck.get_container(id).unwrap().items.len();

        let item = Item::new("D", "delta");
        let item_id = deck.add_item(id, item).expect("add should succeed");

        let container = deck.get_container(id).unwrap();
        assert_eq!(container.items.len(), before + 1);
        assert_eq!(container.items.last().unwrap().id, item_id);
        assert_eq!(container.items.last().unwrap().title, "D");
    }

    #[test]
    fn add_item_at_clamps_an_out_of_range_index_to_the_tail() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(1));

        let item_id = deck
            .add_item_at(id, 99, Item::new("Z", "zulu"))
            .expect("insert should succeed");

        assert_eq!(titles(&deck, id), vec!["A", "B", "C", "Z"]);
        assert_eq!(deck.get_container(id).unwrap().items[3].id, item_id);
        // Appending after the selection leaves it in place.
        assert_eq!(deck.current_index, Some(1));
    }

    #[test]
    fn add_item_at_before_selection_shifts_it_right() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(1));

        deck.add_item_at(id, 0, Item::new("pre", "")).unwrap();

        assert_eq!(titles(&deck, id), vec!["pre", "A", "B", "C"]);
        assert_eq!(deck.current_index, Some(2));
        assert_eq!(deck.current_item().unwrap().title, "B");
    }

    #[test]
    fn remove_item_drops_exactly_that_item() {
        let (mut deck, id) = deck_with_three_items();
        let removed_id = deck.get_container(id).unwrap().items[1].id;

        assert!(deck.remove_item(id, 1));

        let container = deck.get_container(id).unwrap();
        assert_eq!(container.items.len(), 2);
        assert!(container.items.iter().all(|i| i.id != removed_id));
    }

    #[test]
    fn remove_item_out_of_range_returns_false() {
        let (mut deck, id) = deck_with_three_items();
        assert!(!deck.remove_item(id, 3));
        assert_eq!(deck.get_container(id).unwrap().items.len(), 3);
    }

    #[test]
    fn ops_on_missing_container_return_false() {
        let mut deck = DeckState::new();
        let ghost = Ulid::new();

        assert!(deck.add_item(ghost, Item::new("x", "")).is_none());
        assert!(!deck.remove_item(ghost, 0));
        assert!(!deck.move_item(ghost, 0, 1));
        assert!(!deck.update_container(ghost, "n", "", ""));
        assert!(!deck.delete_container(ghost));
        assert!(deck.get_container(ghost).is_none());
    }

    #[test]
    fn removing_item_before_selection_shifts_it_left() {
        // create "2024-01-01 | Grace", items A/B/C, select 1, remove 0:
        // selection follows B to index 0 and the list is [B, C].
        let (mut deck, id) = deck_with_three_items();
        assert!(deck.set_current_item(Some(1)));

        assert!(deck.remove_item(id, 0));

        assert_eq!(deck.current_index, Some(0));
        assert_eq!(titles(&deck, id), vec!["B", "C"]);
        assert_eq!(deck.current_item().unwrap().title, "B");
    }

    #[test]
    fn removing_selected_item_unselects() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(1));

        assert!(deck.remove_item(id, 1));

        assert_eq!(deck.current_index, None);
        assert!(deck.current_item().is_none());
    }

    #[test]
    fn selection_stays_in_bounds_under_mutation_storm() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(2));

        deck.add_item_at(id, 0, Item::new("pre", ""));
        deck.move_item(id, 0, 3);
        deck.remove_item(id, 1);
        deck.duplicate_item(id, 0);
        deck.remove_item(id, 0);

        let len = deck.get_container(id).unwrap().items.len();
        if let Some(idx) = deck.current_index {
            assert!(idx < len, "index {idx} out of bounds for len {len}");
        }
        assert_eq!(
            deck.current_index,
            deck.get_container(id).unwrap().current_item_index
        );
    }

    #[test]
    fn move_item_carries_selection_with_it() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(0));

        assert!(deck.move_item(id, 0, 2));

        assert_eq!(titles(&deck, id), vec!["B", "C", "A"]);
        assert_eq!(deck.current_index, Some(2));
        assert_eq!(deck.current_item().unwrap().title, "A");
    }

    #[test]
    fn move_item_out_of_range_returns_false() {
        let (mut deck, id) = deck_with_three_items();
        assert!(!deck.move_item(id, 0, 3));
        assert!(!deck.move_item(id, 3, 0));
        assert_eq!(titles(&deck, id), vec!["A", "B", "C"]);
    }

    #[test]
    fn update_item_preserves_identity() {
        let (mut deck, id) = deck_with_three_items();
        let original_id = deck.get_container(id).unwrap().items[1].id;

        let mut replacement = Item::new("B2", "rewritten");
        replacement.enabled = false;
        assert!(deck.update_item(id, 1, replacement));

        let item = &deck.get_container(id).unwrap().items[1];
        assert_eq!(item.id, original_id);
        assert_eq!(item.title, "B2");
        assert!(!item.enabled);
    }

    #[test]
    fn set_current_item_rejects_out_of_range() {
        let (mut deck, _) = deck_with_three_items();

        assert!(!deck.set_current_item(Some(3)));
        assert_eq!(deck.current_index, None);

        assert!(deck.set_current_item(Some(2)));
        assert_eq!(deck.current_index, Some(2));

        assert!(deck.set_current_item(None));
        assert_eq!(deck.current_index, None);
    }

    #[test]
    fn cycling_wraps_both_directions() {
        let (mut deck, _) = deck_with_three_items();
        deck.set_current_item(Some(2));

        assert_eq!(deck.next_item(), Some(0));
        assert_eq!(deck.previous_item(), Some(2));
        assert_eq!(deck.previous_item(), Some(1));
    }

    #[test]
    fn cycling_without_items_is_a_no_op() {
        let (mut deck, id) = deck_with_three_items();
        deck.clear_items(id);

        assert_eq!(deck.next_item(), None);
        assert_eq!(deck.previous_item(), None);
        assert_eq!(deck.current_index, None);
    }

    #[test]
    fn deleting_current_container_clears_selection() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(1));

        assert!(deck.delete_container(id));

        assert_eq!(deck.current_container, None);
        assert_eq!(deck.current_index, None);
        assert!(deck.current_item().is_none());
    }

    #[test]
    fn switching_containers_restores_remembered_index() {
        let (mut deck, first) = deck_with_three_items();
        deck.set_current_item(Some(2));

        let second = deck.create_container("Other", "", "");
        assert!(deck.set_current_container(Some(second)));
        assert_eq!(deck.current_index, Some(0)); // seeded default selection

        assert!(deck.set_current_container(Some(first)));
        assert_eq!(deck.current_index, Some(2));
    }

    #[test]
    fn switching_to_unknown_container_fails_without_change() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(1));

        assert!(!deck.set_current_container(Some(Ulid::new())));

        assert_eq!(deck.current_container, Some(id));
        assert_eq!(deck.current_index, Some(1));
    }

    #[test]
    fn duplicate_container_copies_items_under_new_id() {
        let (mut deck, id) = deck_with_three_items();

        let copy_id = deck
            .duplicate_container(id, "Copy of Sunday")
            .expect("duplicate should succeed");

        assert_ne!(copy_id, id);
        let copy = deck.get_container(copy_id).unwrap();
        assert_eq!(copy.name, "Copy of Sunday");
        assert_eq!(copy.items.len(), 3);
        assert_eq!(deck.list_containers().len(), 2);
    }

    #[test]
    fn list_containers_is_in_creation_order() {
        // Create rapidly so several ids share a millisecond; order must not
        // depend on how their random suffixes happen to sort.
        let mut deck = DeckState::new();
        let ids: Vec<Ulid> = (0..50)
            .map(|n| deck.create_container(format!("deck {n}"), "", ""))
            .collect();

        let listed: Vec<Ulid> = deck.list_containers().iter().map(|c| c.id).collect();
        assert_eq!(listed, ids);

        deck.delete_container(ids[10]);
        let copy = deck.duplicate_container(ids[0], "copy").unwrap();
        let listed: Vec<Ulid> = deck.list_containers().iter().map(|c| c.id).collect();
        assert!(!listed.contains(&ids[10]));
        assert_eq!(listed.last(), Some(&copy));
        assert_eq!(listed[0], ids[0]);
    }

    #[test]
    fn recovery_orders_containers_by_creation_timestamp() {
        let mut oldest = Container::new("oldest", "", "");
        oldest.created_at = chrono::Utc::now() - chrono::Duration::hours(2);
        let mut middle = Container::new("middle", "", "");
        middle.created_at = chrono::Utc::now() - chrono::Duration::hours(1);
        let newest = Container::new("newest", "", "");
        let expected = vec![oldest.id, middle.id, newest.id];

        let deck = DeckState::from_containers(vec![newest, oldest, middle]);

        let listed: Vec<Ulid> = deck.list_containers().iter().map(|c| c.id).collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn replace_items_resets_selection() {
        let (mut deck, id) = deck_with_three_items();
        deck.set_current_item(Some(2));

        assert!(deck.replace_items(id, vec![Item::new("X", ""), Item::new("Y", "")]));

        assert_eq!(deck.current_index, None);
        assert_eq!(titles(&deck, id), vec!["X", "Y"]);
    }
}
