// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Linear undo/redo history.
//!
//! The history is a list of [`HistoryEntry`]s plus a pointer to the most recently applied
//! one. Undoing applies the inverse patch at the pointer and steps back; redoing applies the
//! patch after the pointer and steps forward. Recording a new entry first discards every
//! entry after the pointer.
//!
//! ```text
//! record x3        entries: [e0, e1, e2]   pointer: 2
//! undo x2          entries: [e0, e1, e2]   pointer: 0
//! record e3        entries: [e0, e3]       pointer: 1
//! ```
use crate::Patch;
use std::collections::VecDeque;
use tracing::debug;

/// Configuration for the history of a [`Store`](crate::Store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of entries to keep. The oldest entries are evicted first.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Keeps every entry.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// One recorded update.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Re-applies the update.
    pub patch: Patch,
    /// Reverts the update.
    pub inverse: Patch,
}

/// The history state shared by a store and all of its views.
///
/// `applied` counts the entries (from the front) whose patches are reflected in the current
/// snapshot, so the pointer is `applied - 1`, with `None` for "before the first entry".
#[derive(Debug, Default)]
pub(crate) struct History {
    entries: VecDeque<HistoryEntry>,
    applied: usize,
    config: HistoryConfig,
}

impl History {
    pub(crate) fn new(config: HistoryConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            applied: 0,
            config,
        }
    }

    /// Appends `entry` after the pointer, discarding any entries that could have been redone.
    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        let stale = self.entries.len() - self.applied;
        if stale > 0 {
            debug!(stale, "discarding redo entries");
            self.entries.truncate(self.applied);
        }
        self.entries.push_back(entry);
        self.applied += 1;
        self.enforce_depth();
    }

    fn enforce_depth(&mut self) {
        while self.entries.len() > self.config.max_depth {
            self.entries.pop_front();
            self.applied = self.applied.saturating_sub(1);
            debug!(max_depth = self.config.max_depth, "evicted oldest history entry");
        }
    }

    /// The entry that undo would revert.
    pub(crate) fn next_undo(&self) -> Option<&HistoryEntry> {
        self.pointer().and_then(|index| self.entries.get(index))
    }

    /// The entry that redo would re-apply.
    pub(crate) fn next_redo(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.applied)
    }

    pub(crate) fn step_back(&mut self) {
        self.applied = self.applied.saturating_sub(1);
    }

    pub(crate) fn step_forward(&mut self) {
        if self.applied < self.entries.len() {
            self.applied += 1;
        }
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Index of the most recently applied entry.
    pub(crate) fn pointer(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PatchOp, path};

    fn entry(n: i64) -> HistoryEntry {
        HistoryEntry {
            patch: Patch::from(vec![PatchOp::Set {
                path: path!["n"],
                value: n.into(),
            }]),
            inverse: Patch::default(),
        }
    }

    #[test]
    fn pointer_tracks_undo_and_redo() {
        let mut history = History::default();
        assert_eq!(history.pointer(), None);
        assert!(!history.can_undo());

        history.record(entry(1));
        history.record(entry(2));
        assert_eq!(history.pointer(), Some(1));
        assert_eq!(history.next_undo(), Some(&entry(2)));
        assert_eq!(history.next_redo(), None);

        history.step_back();
        assert_eq!(history.pointer(), Some(0));
        assert_eq!(history.next_redo(), Some(&entry(2)));
        assert!(history.can_undo() && history.can_redo());

        history.step_back();
        history.step_back();
        assert_eq!(history.pointer(), None);
        assert_eq!(history.next_undo(), None);

        history.step_forward();
        history.step_forward();
        history.step_forward();
        assert_eq!(history.pointer(), Some(1));
    }

    #[test]
    fn recording_after_undo_truncates() {
        let mut history = History::default();
        for n in 0..3 {
            history.record(entry(n));
        }
        history.step_back();
        history.step_back();
        history.record(entry(9));

        assert_eq!(history.len(), 2);
        assert_eq!(history.pointer(), Some(1));
        assert!(!history.can_redo());
        assert_eq!(
            history.entries().cloned().collect::<Vec<_>>(),
            vec![entry(0), entry(9)]
        );
    }

    #[test]
    fn depth_limit_evicts_oldest() {
        let mut history = History::new(HistoryConfig::new(2));
        for n in 0..5 {
            history.record(entry(n));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.pointer(), Some(1));
        assert_eq!(history.next_undo(), Some(&entry(4)));

        history.step_back();
        history.step_back();
        assert!(!history.can_undo());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut history = History::default();
        history.record(entry(1));
        history.clear();
        assert_eq!(history.len(), 0);
        assert_eq!(history.pointer(), None);
        assert!(!history.can_undo() && !history.can_redo());
    }

    #[quickcheck]
    fn length_never_falls_below_pointer(steps: Vec<u8>, max_depth: u8) -> bool {
        let mut history = History::new(HistoryConfig::new(usize::from(max_depth.max(1))));
        steps.into_iter().enumerate().all(|(i, step)| {
            match step % 4 {
                0 | 1 => history.record(entry(i as i64)),
                2 => history.step_back(),
                _ => history.step_forward(),
            }
            history.len() <= history.config.max_depth
                && history.pointer().map_or(0, |p| p + 1) <= history.len()
        })
    }
}
