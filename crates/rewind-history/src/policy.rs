/// Coalesce-or-commit decisions and capacity eviction.
use crate::operation::{EditAction, IncomingEdit};
use crate::store::HistoryStore;

/// What `MergePolicy::apply` did with an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Folded into the current record; length and position unchanged.
    Coalesced,
    /// Written as a new record after the current one.
    Committed,
    /// Written as a new record; the oldest record was evicted to make room.
    CommittedWithEviction,
}

/// Decides whether an incoming edit extends the current record or starts
/// a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    merge_window_ms: u64,
    max_size: Option<usize>,
}

impl MergePolicy {
    pub fn new(merge_window_ms: u64, max_size: Option<usize>) -> Self {
        Self {
            merge_window_ms,
            max_size,
        }
    }

    pub fn merge_window_ms(&self) -> u64 {
        self.merge_window_ms
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Whether `edit` would be folded into `last`.
    ///
    /// Same kind and strictly inside the window. A clock that runs
    /// backwards yields a negative delta, which counts as inside.
    pub fn should_coalesce(&self, last: &EditAction, edit: &IncomingEdit) -> bool {
        let window = i64::try_from(self.merge_window_ms).unwrap_or(i64::MAX);
        last.kind == edit.kind && edit.timestamp.saturating_sub(last.timestamp) < window
    }

    /// Whether committing at `position` must evict the oldest record.
    ///
    /// Never at position 0: the first record is the rollback point and a
    /// commit there only appends.
    pub fn must_evict(&self, position: usize) -> bool {
        position > 0 && self.max_size.is_some_and(|max| position + 1 >= max)
    }

    /// Applies `edit` to `store`.
    pub fn apply(&self, store: &mut HistoryStore, edit: IncomingEdit) -> MergeOutcome {
        if self.should_coalesce(store.current(), &edit) {
            let position = store.position();
            let last = store.current_mut();
            last.value = edit.value;
            last.selection_end = edit.selection_end;
            last.timestamp = edit.timestamp;
            tracing::debug!(kind = %last.kind, position, "Coalesced edit into current record");
            return MergeOutcome::Coalesced;
        }

        let selection_start = derive_selection_start(store.current(), &edit);
        let evict = self.must_evict(store.position());
        let action = EditAction {
            kind: edit.kind,
            value: edit.value,
            timestamp: edit.timestamp,
            selection_start,
            selection_end: edit.selection_end,
        };
        store.commit(action, evict);

        tracing::debug!(
            position = store.position(),
            len = store.actions().len(),
            evicted = evict,
            "Committed new history record"
        );
        if evict {
            MergeOutcome::CommittedWithEviction
        } else {
            MergeOutcome::Committed
        }
    }
}

/// `selection_end - (len(new) - len(last))`, saturating at 0.
///
/// For an insertion this walks the caret back over the inserted text; for a
/// deletion the delta is negative and the start lies after the caret.
fn derive_selection_start(last: &EditAction, edit: &IncomingEdit) -> usize {
    let new_len = edit.value.chars().count();
    let last_len = last.char_len();
    if new_len >= last_len {
        edit.selection_end.saturating_sub(new_len - last_len)
    } else {
        edit.selection_end.saturating_add(last_len - new_len)
    }
}
