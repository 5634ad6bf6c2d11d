// ABOUTME: Pure index-adjustment rules keeping the current-item selection valid across structural edits.
// ABOUTME: Covers remove/insert/move shifts and wrap-around cycling, independent of any container state.

/// Selection after removing the item at `removed`. Removing the selected
/// item itself clears the selection; removing an earlier item pulls the
/// selection one slot left.
pub fn after_remove(selected: Option<usize>, removed: usize) -> Option<usize> {
    match selected {
        Some(sel) if sel == removed => None,
        Some(sel) if sel > removed => Some(sel - 1),
        other => other,
    }
}

/// Selection after inserting an item at `inserted`. Inserting at or before
/// the selected slot pushes the selection one slot right.
pub fn after_insert(selected: Option<usize>, inserted: usize) -> Option<usize> {
    match selected {
        Some(sel) if inserted <= sel => Some(sel + 1),
        other => other,
    }
}

/// Selection after moving the item at `from` to `to`. The selected item
/// travels with itself; a move that crosses the selection shifts it by one
/// in the opposite direction.
pub fn after_move(selected: Option<usize>, from: usize, to: usize) -> Option<usize> {
    match selected {
        Some(sel) if sel == from => Some(to),
        Some(sel) if from < sel && to >= sel => Some(sel - 1),
        Some(sel) if from > sel && to <= sel => Some(sel + 1),
        other => other,
    }
}

/// Next index with wrap-around. From no selection the first item is next.
/// Returns the input unchanged when the list is empty.
pub fn next(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return selected;
    }
    match selected {
        Some(sel) if sel + 1 < len => Some(sel + 1),
        _ => Some(0),
    }
}

/// Previous index with wrap-around. From no selection the last item is
/// previous. Returns the input unchanged when the list is empty.
pub fn previous(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return selected;
    }
    match selected {
        Some(sel) if sel > 0 => Some(sel - 1),
        _ => Some(len - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_selected_clears_selection() {
        assert_eq!(after_remove(Some(1), 1), None);
    }

    #[test]
    fn remove_before_selected_decrements() {
        assert_eq!(after_remove(Some(2), 0), Some(1));
    }

    #[test]
    fn remove_after_selected_is_neutral() {
        assert_eq!(after_remove(Some(0), 2), Some(0));
        assert_eq!(after_remove(None, 0), None);
    }

    #[test]
    fn insert_at_or_before_selected_increments() {
        assert_eq!(after_insert(Some(1), 0), Some(2));
        assert_eq!(after_insert(Some(1), 1), Some(2));
        assert_eq!(after_insert(Some(1), 2), Some(1));
        assert_eq!(after_insert(None, 0), None);
    }

    #[test]
    fn moving_selected_item_follows_it() {
        assert_eq!(after_move(Some(0), 0, 2), Some(2));
        assert_eq!(after_move(Some(2), 2, 0), Some(0));
    }

    #[test]
    fn move_crossing_selection_shifts_by_one() {
        // Item ahead of the selection lands at or past it: selection slides left.
        assert_eq!(after_move(Some(1), 0, 2), Some(0));
        // Item past the selection lands at or before it: selection slides right.
        assert_eq!(after_move(Some(1), 2, 0), Some(2));
    }

    #[test]
    fn move_outside_selection_is_neutral() {
        assert_eq!(after_move(Some(0), 1, 2), Some(0));
        assert_eq!(after_move(Some(2), 0, 1), Some(2));
        assert_eq!(after_move(None, 0, 1), None);
    }

    #[test]
    fn next_wraps_past_the_end() {
        assert_eq!(next(Some(2), 3), Some(0));
        assert_eq!(next(Some(0), 3), Some(1));
        assert_eq!(next(None, 3), Some(0));
    }

    #[test]
    fn previous_wraps_before_the_start() {
        assert_eq!(previous(Some(0), 3), Some(2));
        assert_eq!(previous(Some(2), 3), Some(1));
        assert_eq!(previous(None, 3), Some(2));
    }

    #[test]
    fn cycling_empty_list_is_a_no_op() {
        assert_eq!(next(None, 0), None);
        assert_eq!(previous(None, 0), None);
        assert_eq!(next(Some(1), 0), Some(1));
    }
}
