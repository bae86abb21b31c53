/// The history engine: store, merge policy, and notification bus wired
/// together behind the public edit/undo/redo API.
///
/// Every mutating call runs to completion, observers included, before it
/// returns. Nothing is queued or deferred.
use anyhow::{Context, Result};

use crate::config::HistoryConfig;
use crate::notify::{NotificationBus, SubscriptionId};
use crate::operation::{EditAction, IncomingEdit, Render, INSERT_TEXT_KIND};
use crate::persistence::PersistenceLayer;
use crate::policy::{MergeOutcome, MergePolicy};
use crate::snapshot::HistorySnapshot;
use crate::store::HistoryStore;

/// Linear undo/redo history for a single text buffer.
pub struct HistoryEngine {
    store: HistoryStore,
    policy: MergePolicy,
    bus: NotificationBus,
}

impl std::fmt::Debug for HistoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryEngine")
            .field("len", &self.store.actions().len())
            .field("position", &self.store.position())
            .field("policy", &self.policy)
            .field("observers", &self.bus.len())
            .finish()
    }
}

impl Default for HistoryEngine {
    fn default() -> Self {
        Self::new(HistoryConfig::new())
    }
}

impl HistoryEngine {
    /// Creates an engine from `config`.
    ///
    /// With `initial_actions`, history resumes from those records at
    /// `initial_index` (clamped, defaulting to the last record). An empty
    /// `initial_actions` is replaced by a fresh anchor. Otherwise the anchor
    /// is synthesized and a non-empty `initial_value` is committed on top of
    /// it as an `"insertText"` record.
    pub fn new(config: HistoryConfig) -> Self {
        let policy = MergePolicy::new(config.merge_window_ms, config.max_size);

        let store = match config.initial_actions {
            Some(actions) => {
                let index = config.initial_index.unwrap_or(usize::MAX);
                HistoryStore::from_actions(actions, index).unwrap_or_else(|e| {
                    tracing::warn!("Ignoring initial history, starting from anchor: {e}");
                    HistoryStore::new()
                })
            }
            None => {
                let mut store = HistoryStore::new();
                if !config.initial_value.is_empty() {
                    let caret = config.initial_value.chars().count();
                    let seed = IncomingEdit::new(INSERT_TEXT_KIND, config.initial_value, 0, caret);
                    policy.apply(&mut store, seed);
                }
                store
            }
        };

        Self {
            store,
            policy,
            bus: NotificationBus::new(),
        }
    }

    /// Loads the stored history for `doc_id`, or creates a fresh engine.
    ///
    /// A stored snapshot takes precedence over `config.initial_actions` and
    /// `config.initial_value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence layer fails to read.
    pub fn load_or_new(
        doc_id: &str,
        mut config: HistoryConfig,
        persistence: &PersistenceLayer,
    ) -> Result<Self> {
        let stored = persistence
            .load(doc_id)
            .with_context(|| format!("Failed to load history for document {doc_id}"))?;

        if let Some(snapshot) = stored {
            tracing::debug!(
                doc_id,
                len = snapshot.actions.len(),
                position = snapshot.position,
                "Resuming stored history"
            );
            config.initial_actions = Some(snapshot.actions);
            config.initial_index = Some(snapshot.position);
        }
        Ok(Self::new(config))
    }

    /// Writes the current history for `doc_id` to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk write fails.
    pub fn flush(&self, doc_id: &str, persistence: &PersistenceLayer) -> Result<()> {
        persistence
            .save(doc_id, &self.store.snapshot())
            .with_context(|| format!("Failed to flush history for document {doc_id}"))
    }

    /// Records an edit observed by the adapter.
    ///
    /// Coalesces into the current record or commits a new one (discarding
    /// any redo records). Returns the value and caret to render, which is the
    /// current record's `selection_end`.
    pub fn record(&mut self, edit: IncomingEdit) -> Render {
        self.record_with_outcome(edit).0
    }

    /// Like `record`, also reporting whether the edit was coalesced.
    pub fn record_with_outcome(&mut self, edit: IncomingEdit) -> (Render, MergeOutcome) {
        let outcome = self.policy.apply(&mut self.store, edit);
        self.notify();
        (self.render(), outcome)
    }

    /// Steps back one record.
    ///
    /// The caret goes to where the undone edit began. At the first record
    /// this is a no-op that still notifies observers.
    pub fn undo(&mut self) -> Render {
        let undone_start = self
            .store
            .can_undo()
            .then(|| self.store.current().selection_start);
        let current = self.store.move_back();
        let render = Render {
            value: current.value.clone(),
            caret: undone_start.unwrap_or(current.selection_start),
        };
        tracing::debug!(position = self.store.position(), "Undo");
        self.notify();
        render
    }

    /// Steps forward one record, placing the caret at its `selection_end`.
    ///
    /// At the last record this is a no-op that still notifies observers.
    pub fn redo(&mut self) -> Render {
        self.store.move_forward();
        tracing::debug!(position = self.store.position(), "Redo");
        self.notify();
        self.render()
    }

    /// A detached copy of `(actions, position)`.
    pub fn history(&self) -> HistorySnapshot {
        self.store.snapshot()
    }

    /// Replaces the whole history. An out-of-range `position` is clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if `actions` is empty; history is left untouched and
    /// no notification is sent.
    pub fn set_history(&mut self, actions: Vec<EditAction>, position: usize) -> Result<()> {
        self.store.replace_state(actions, position)?;
        tracing::debug!(
            len = self.store.actions().len(),
            position = self.store.position(),
            "History replaced"
        );
        self.notify();
        Ok(())
    }

    /// Restores a snapshot previously taken with `history`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot holds no records.
    pub fn restore(&mut self, snapshot: HistorySnapshot) -> Result<()> {
        self.set_history(snapshot.actions, snapshot.position)
    }

    /// Collapses history to a single anchor record.
    pub fn reset(&mut self) {
        self.store.reset();
        tracing::debug!("History reset");
        self.notify();
    }

    /// Registers an observer called after every state change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&HistorySnapshot) + 'static,
    {
        self.bus.subscribe(observer)
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// The record at the current position.
    pub fn current(&self) -> &EditAction {
        self.store.current()
    }

    pub fn position(&self) -> usize {
        self.store.position()
    }

    pub fn actions(&self) -> &[EditAction] {
        self.store.actions()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// The current record's value with the caret at its `selection_end`.
    pub fn render(&self) -> Render {
        let current = self.store.current();
        Render {
            value: current.value.clone(),
            caret: current.selection_end,
        }
    }

    fn notify(&mut self) {
        if self.bus.is_empty() {
            return;
        }
        let snapshot = self.store.snapshot();
        self.bus.dispatch(&snapshot);
    }
}
