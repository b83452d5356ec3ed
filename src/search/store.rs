//! Search-result state machine.
//!
//! Owns the groups and navigable highlights from the latest rewrite
//! plus the selection cursor. Mutating operations return transition
//! records describing what changed; the façade applies the DOM side
//! effects and notifies listeners, keeping this type free of
//! callbacks.

use super::highlight::{Highlight, HighlightGroup};

/// Result of installing a new search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Searched {
    /// Index selected right away, if there is anything to select.
    pub initial: Option<usize>,
    pub total: usize,
}

/// Cursor movement produced by forward/backward navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: usize,
    pub next: usize,
    pub total: usize,
}

/// Everything evicted by a clear, handed back so the caller can
/// restore the DOM.
#[derive(Debug)]
pub struct Cleared {
    pub groups: Vec<HighlightGroup>,
    pub highlights: Vec<Highlight>,
    /// Cursor position at the moment of clearing.
    pub selected: Option<usize>,
}

/// `Empty ⇄ Populated` store behind the page searcher.
#[derive(Debug, Default)]
pub struct HighlightStore {
    groups: Vec<HighlightGroup>,
    highlights: Vec<Highlight>,
    selected: Option<usize>,
}

impl HighlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole state. The cursor lands on the first
    /// highlight when there is one.
    pub fn set_search_result(
        &mut self,
        groups: Vec<HighlightGroup>,
        highlights: Vec<Highlight>,
    ) -> Searched {
        self.groups = groups;
        self.highlights = highlights;
        self.selected = if self.highlights.is_empty() {
            None
        } else {
            Some(0)
        };
        Searched {
            initial: self.selected,
            total: self.highlights.len(),
        }
    }

    /// Empty the store, handing the evicted state back.
    pub fn clear(&mut self) -> Cleared {
        Cleared {
            groups: std::mem::take(&mut self.groups),
            highlights: std::mem::take(&mut self.highlights),
            selected: self.selected.take(),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.groups.is_empty() && self.highlights.is_empty() && self.selected.is_none()
    }

    /// Advance the cursor, wrapping past the end. `None` when there is
    /// nothing to navigate.
    pub fn forward(&mut self) -> Option<SelectionChange> {
        let total = self.highlights.len();
        let current = self.selected?;
        let next = (current + 1) % total;
        self.selected = Some(next);
        Some(SelectionChange {
            previous: current,
            next,
            total,
        })
    }

    /// Move the cursor back, wrapping before the start.
    pub fn backward(&mut self) -> Option<SelectionChange> {
        let total = self.highlights.len();
        let current = self.selected?;
        let next = if current == 0 { total - 1 } else { current - 1 };
        self.selected = Some(next);
        Some(SelectionChange {
            previous: current,
            next,
            total,
        })
    }

    pub fn highlight(&self, index: usize) -> Option<&Highlight> {
        self.highlights.get(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn total(&self) -> usize {
        self.highlights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(n: usize) -> HighlightStore {
        let mut store = HighlightStore::new();
        let highlights = (0..n).map(|i| Highlight::new(vec![i])).collect();
        store.set_search_result(Vec::new(), highlights);
        store
    }

    #[test]
    fn empty_store_has_no_cursor() {
        let mut store = HighlightStore::new();
        let searched = store.set_search_result(Vec::new(), Vec::new());
        assert_eq!(searched, Searched { initial: None, total: 0 });
        assert!(store.is_cleared());
        assert_eq!(store.forward(), None);
        assert_eq!(store.backward(), None);
    }

    #[test]
    fn search_result_selects_first() {
        let store = populated(3);
        assert_eq!(store.selected(), Some(0));
        assert_eq!(store.total(), 3);
        assert!(!store.is_cleared());
    }

    #[test]
    fn forward_wraps_after_total_steps() {
        let mut store = populated(3);
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(store.forward().unwrap().next);
        }
        assert_eq!(seen, vec![1, 2, 0]);
        assert_eq!(store.selected(), Some(0));
    }

    #[test]
    fn backward_wraps_to_last() {
        let mut store = populated(3);
        let change = store.backward().unwrap();
        assert_eq!(change.previous, 0);
        assert_eq!(change.next, 2);
        assert_eq!(store.backward().unwrap().next, 1);
    }

    #[test]
    fn single_highlight_wraps_onto_itself() {
        let mut store = populated(1);
        let change = store.forward().unwrap();
        assert_eq!(change.previous, 0);
        assert_eq!(change.next, 0);
    }

    #[test]
    fn clear_empties_and_hands_back_state() {
        let mut store = populated(2);
        store.forward();
        let cleared = store.clear();
        assert_eq!(cleared.highlights.len(), 2);
        assert_eq!(cleared.selected, Some(1));
        assert!(store.is_cleared());

        // Clearing again yields nothing
        let again = store.clear();
        assert!(again.highlights.is_empty());
        assert_eq!(again.selected, None);
    }
}
