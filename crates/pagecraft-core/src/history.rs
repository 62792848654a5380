//! Bounded undo/redo history of whole-document snapshots.

/// Default number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Undo/redo stacks of snapshots.
///
/// The caller owns the current state; the history only stores the states
/// around it. Every commit clears the redo stack.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: Vec<T>,
    redo_stack: Vec<T>,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history keeping at most `limit` undo states (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state that existed before a change.
    pub fn commit(&mut self, prior: T) {
        self.undo_stack.push(prior);

        self.redo_stack.clear();

        // Oldest state goes first
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. Takes the current state (moved onto the redo stack) and
    /// returns the state to restore, or `None` with nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new();
        let before = vec![1];
        let after = vec![1, 2];

        history.commit(before.clone());
        assert!(history.can_undo());

        let restored = history.undo(after.clone()).unwrap();
        assert_eq!(restored, before);
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again, after);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history = History::new();
        history.commit(0);
        assert_eq!(history.undo(1), Some(0));
        assert!(history.can_redo());

        history.commit(0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks() {
        let mut history: History<u32> = History::new();
        assert!(!history.can_undo());
        assert_eq!(history.undo(7), None);
        assert!(!history.can_redo());
        assert_eq!(history.redo(7), None);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut history = History::new();
        for snapshot in 1..=51 {
            history.commit(snapshot);
        }
        assert_eq!(history.undo_len(), DEFAULT_HISTORY_LIMIT);

        let mut current = 52;
        for _ in 0..50 {
            current = history.undo(current).unwrap();
        }
        // Snapshot #1 was evicted, not #51.
        assert_eq!(current, 2);
        assert_eq!(history.undo(current), None);
    }

    #[test]
    fn test_custom_limit() {
        let mut history = History::with_limit(2);
        history.commit('a');
        history.commit('b');
        history.commit('c');
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo('d'), Some('c'));
        assert_eq!(history.undo('c'), Some('b'));
        assert_eq!(history.undo('b'), None);
        assert_eq!(History::<u8>::with_limit(0).limit(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.commit(1);
        history.undo(2);
        history.commit(3);
        history.clear();
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 0);
    }
}
