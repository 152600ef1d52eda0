//! Page-scoped row selection.

use std::collections::BTreeSet;

use crate::Row;

/// Tracks selected rows by their index in the current page's view.
///
/// Indices are only meaningful until the view is recomputed; the table
/// clears the tracker whenever the page contents change.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: BTreeSet<usize>,
}

impl SelectionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `index`.
    pub fn toggle(&mut self, index: usize) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Select every row of a view of `view_len` rows, or clear the selection
    /// if all of them are already selected.
    pub fn toggle_all(&mut self, view_len: usize) {
        if self.all_selected(view_len) {
            self.selected.clear();
        } else {
            self.selected.extend(0..view_len);
        }
    }

    /// `true` when the selection covers a non-empty view exactly.
    pub fn all_selected(&self, view_len: usize) -> bool {
        view_len > 0 && self.selected.len() == view_len
    }

    /// Check if an index is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Clear all selections. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Materialize the selected rows from `view`. Indices outside the view
    /// are skipped.
    pub fn selected_rows(&self, view: &[Row]) -> Vec<Row> {
        self.selected
            .iter()
            .filter_map(|&index| view.get(index).cloned())
            .collect()
    }
}
