/// The history sequence and its bounded position pointer.
///
/// `HistoryStore` is the only owner of the `(actions, position)` pair.
/// Every method that moves the pointer goes through `Position`, whose
/// constructors keep `0 <= position < actions.len()`; `actions` is never
/// empty.
use anyhow::{bail, Result};

use crate::operation::EditAction;
use crate::snapshot::HistorySnapshot;

/// Index into a non-empty action sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position(usize);

impl Position {
    /// Clamps `index` into `0..len`. `len` must be at least 1.
    fn clamped(index: usize, len: usize) -> Self {
        Self(index.min(len.saturating_sub(1)))
    }

    /// The raw index.
    pub fn get(self) -> usize {
        self.0
    }
}

/// Owns the ordered edit records and the current pointer.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    actions: Vec<EditAction>,
    position: Position,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    /// A store holding only the synthesized anchor.
    pub fn new() -> Self {
        Self {
            actions: vec![EditAction::anchor()],
            position: Position(0),
        }
    }

    /// Builds a store from existing records, clamping `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `actions` is empty.
    pub fn from_actions(actions: Vec<EditAction>, index: usize) -> Result<Self> {
        let mut store = Self::new();
        store.replace_state(actions, index)?;
        Ok(store)
    }

    /// The record at the current position.
    pub fn current(&self) -> &EditAction {
        &self.actions[self.position.get()]
    }

    pub(crate) fn current_mut(&mut self) -> &mut EditAction {
        &mut self.actions[self.position.get()]
    }

    pub fn actions(&self) -> &[EditAction] {
        &self.actions
    }

    pub fn position(&self) -> usize {
        self.position.get()
    }

    /// The pointer as a bounded index.
    pub fn pointer(&self) -> Position {
        self.position
    }

    pub fn can_undo(&self) -> bool {
        self.position.get() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position.get() + 1 < self.actions.len()
    }

    /// Steps back one record. No-op at index 0.
    pub fn move_back(&mut self) -> &EditAction {
        if self.can_undo() {
            self.position = Position(self.position.get() - 1);
        }
        self.current()
    }

    /// Steps forward one record. No-op at the last index.
    pub fn move_forward(&mut self) -> &EditAction {
        if self.can_redo() {
            self.position = Position(self.position.get() + 1);
        }
        self.current()
    }

    /// Replaces the whole sequence and pointer. An out-of-range `index`
    /// is clamped to the last record.
    ///
    /// # Errors
    ///
    /// Returns an error if `actions` is empty; the store is left untouched.
    pub fn replace_state(&mut self, actions: Vec<EditAction>, index: usize) -> Result<()> {
        if actions.is_empty() {
            bail!("Cannot restore an empty history: at least one record is required");
        }
        self.position = Position::clamped(index, actions.len());
        self.actions = actions;
        Ok(())
    }

    /// Collapses history to a single anchor at position 0.
    pub fn reset(&mut self) {
        self.actions.clear();
        self.actions.push(EditAction::anchor());
        self.position = Position(0);
    }

    /// Writes `action` as the new current record and drops everything after it.
    ///
    /// With `evict_oldest`, the pointer stays put: the first record is
    /// dropped, the new first slot is overwritten with a blank anchor, and
    /// the new record lands at the same index. Otherwise the pointer
    /// advances by one. Eviction is ignored at position 0 so the first
    /// record always survives.
    pub(crate) fn commit(&mut self, action: EditAction, evict_oldest: bool) {
        let index = if evict_oldest && self.can_undo() {
            self.actions.remove(0);
            match self.actions.first_mut() {
                Some(first) => *first = EditAction::anchor(),
                None => self.actions.push(EditAction::anchor()),
            }
            self.position.get()
        } else {
            self.position.get() + 1
        };

        self.actions.truncate(index);
        self.actions.push(action);
        self.position = Position::clamped(index, self.actions.len());
        debug_assert_eq!(self.position.get(), self.actions.len() - 1);
    }

    /// Detached copy of the sequence and pointer.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            actions: self.actions.clone(),
            position: self.position.get(),
        }
    }
}
