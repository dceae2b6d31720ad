//! Batch selection for moderation tables.

use std::collections::BTreeSet;

use crate::models::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Select every row of the filtered list, or clear when all of them
    /// are already selected.
    pub fn toggle_all<T: Record>(&mut self, filtered: &[T]) {
        if self.all_selected(filtered) {
            self.clear();
        } else {
            self.select_all(filtered);
        }
    }

    /// Add every filtered row; rows selected earlier stay selected
    pub fn select_all<T: Record>(&mut self, filtered: &[T]) {
        self.ids.extend(filtered.iter().map(|item| item.id().to_string()));
    }

    pub fn all_selected<T: Record>(&self, filtered: &[T]) -> bool {
        !filtered.is_empty() && filtered.iter().all(|item| self.ids.contains(item.id()))
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::message;

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        selection.toggle("b");
        selection.toggle("a");
        assert_eq!(selection.ids(), vec!["b"]);
    }

    #[test]
    fn test_select_all_adds_filtered_rows_to_selection() {
        let filtered = vec![message("a", false, false), message("c", false, false)];
        let mut selection = SelectionSet::new();
        selection.toggle("z");
        selection.select_all(&filtered);
        assert_eq!(selection.ids(), vec!["a", "c", "z"]);
        assert!(selection.all_selected(&filtered));

        // unticking select-all drops everything, hidden rows included
        selection.toggle_all(&filtered);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_twice_clears() {
        let filtered = vec![message("a", false, false), message("b", true, false)];
        let mut selection = SelectionSet::new();
        selection.toggle_all(&filtered);
        assert_eq!(selection.len(), 2);
        selection.toggle_all(&filtered);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_empty_list_is_never_all_selected() {
        let selection = SelectionSet::new();
        assert!(!selection.all_selected::<crate::models::GuestbookMessage>(&[]));
    }
}
