// The user's in-progress seat picks. The requested count caps how many
// seats may be selected at once; range validation against [1,7] happens at
// submission time in the coordinator, not here.
//
// Availability is deliberately not checked at this boundary: the rendering
// layer does not offer the toggle affordance for unavailable seats.

use parking_lot::RwLock;

use crate::api::SeatIndex;

#[derive(Default)]
pub struct SelectionManager {
    requested_count: RwLock<i64>,
    selected: RwLock<Vec<SeatIndex>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the desired seat count as entered, without validating the
    /// range. Lowering the ceiling drops the latest picks so the selection
    /// never exceeds it.
    pub fn set_requested_count(&self, count: i64) {
        let mut selected = self.selected.write();
        selected.truncate(count.max(0) as usize);
        *self.requested_count.write() = count;
    }

    pub fn requested_count(&self) -> i64 {
        *self.requested_count.read()
    }

    /// Removes the seat if selected (always allowed); otherwise adds it,
    /// unless the selection has already reached the requested count, in
    /// which case the toggle is a silent no-op.
    pub fn toggle(&self, seat: SeatIndex) {
        let mut selected = self.selected.write();
        if let Some(pos) = selected.iter().position(|&s| s == seat) {
            selected.remove(pos);
        } else if (selected.len() as i64) < *self.requested_count.read() {
            selected.push(seat);
        }
    }

    pub fn is_selected(&self, seat: SeatIndex) -> bool {
        self.selected.read().contains(&seat)
    }

    /// Current picks in toggle order.
    pub fn selected(&self) -> Vec<SeatIndex> {
        self.selected.read().clone()
    }

    pub fn len(&self) -> usize {
        self.selected.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.read().is_empty()
    }

    pub fn clear(&self) {
        self.selected.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_until_requested_count_then_ignores() {
        let selection = SelectionManager::new();
        selection.set_requested_count(2);

        selection.toggle(3);
        selection.toggle(5);
        selection.toggle(7); // ceiling reached, silently ignored
        assert_eq!(selection.selected(), vec![3, 5]);
        assert!(!selection.is_selected(7));
    }

    #[test]
    fn toggle_pairs_are_idempotent() {
        let selection = SelectionManager::new();
        selection.set_requested_count(4);
        selection.toggle(1);
        selection.toggle(2);

        selection.toggle(1);
        selection.toggle(1);
        assert_eq!(selection.selected(), vec![2, 1]);
    }

    #[test]
    fn untoggle_frees_a_slot_for_another_seat() {
        let selection = SelectionManager::new();
        selection.set_requested_count(3);

        selection.toggle(2);
        selection.toggle(4);
        selection.toggle(6);
        assert_eq!(selection.selected(), vec![2, 4, 6]);

        selection.toggle(9); // no-op, ceiling reached
        assert_eq!(selection.len(), 3);

        selection.toggle(4); // remove always allowed
        selection.toggle(9);
        assert_eq!(selection.selected(), vec![2, 6, 9]);
    }

    #[test]
    fn removal_is_allowed_even_with_zero_requested_count() {
        let selection = SelectionManager::new();
        selection.set_requested_count(1);
        selection.toggle(5);

        selection.set_requested_count(0);
        assert!(selection.is_empty());

        selection.toggle(5); // cannot add back
        assert!(!selection.is_selected(5));
    }

    #[test]
    fn non_positive_requested_count_blocks_all_additions() {
        let selection = SelectionManager::new();
        selection.set_requested_count(-3);
        selection.toggle(0);
        selection.toggle(1);
        assert!(selection.is_empty());
    }

    #[test]
    fn lowering_requested_count_keeps_the_earliest_picks() {
        let selection = SelectionManager::new();
        selection.set_requested_count(4);
        for seat in [10, 11, 12, 13] {
            selection.toggle(seat);
        }

        selection.set_requested_count(2);
        assert_eq!(selection.selected(), vec![10, 11]);
    }

    #[test]
    fn selection_never_exceeds_requested_count() {
        let selection = SelectionManager::new();
        for count in [0i64, 3, 7, 1, 5] {
            selection.set_requested_count(count);
            for seat in 0..20 {
                selection.toggle(seat);
                assert!(selection.len() as i64 <= count.max(0));
            }
            selection.clear();
        }
    }
}
