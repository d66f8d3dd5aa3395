use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct SelectionTracker<Id> {
    selected: BTreeSet<Id>,
}

impl<Id> Default for SelectionTracker<Id> {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }
}

impl<Id: Copy + Ord> SelectionTracker<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: Id) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: Id) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The sole selected id, if exactly one is selected.
    pub fn single(&self) -> Option<Id> {
        if self.selected.len() == 1 {
            self.selected.first().copied()
        } else {
            None
        }
    }

    pub fn ids(&self) -> &BTreeSet<Id> {
        &self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_removes_id() {
        let mut selection = SelectionTracker::new();
        selection.toggle(3);
        assert!(selection.contains(3));
        selection.toggle(3);
        assert!(!selection.contains(3));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_order_does_not_matter() {
        let mut forward = SelectionTracker::new();
        for id in [1, 2, 3, 2, 4] {
            forward.toggle(id);
        }
        let mut backward = SelectionTracker::new();
        for id in [4, 2, 3, 2, 1] {
            backward.toggle(id);
        }

        assert_eq!(forward.ids(), backward.ids());
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn single_requires_exactly_one() {
        let mut selection = SelectionTracker::new();
        assert_eq!(selection.single(), None);
        selection.toggle(7);
        assert_eq!(selection.single(), Some(7));
        selection.toggle(8);
        assert_eq!(selection.single(), None);
        selection.clear();
        assert!(selection.is_empty());
    }
}
