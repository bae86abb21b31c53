/// Construction-time configuration for a history engine.
use rewind_config::AppConfig;

use crate::operation::EditAction;

/// Time window in milliseconds for coalescing consecutive same-kind edits
/// into a single undo step.
const DEFAULT_MERGE_WINDOW_MS: u64 = 300;

/// Configuration for a `HistoryEngine`. Immutable once the engine is built.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Seed text committed on top of the anchor. Ignored when
    /// `initial_actions` is supplied.
    pub initial_value: String,
    /// Coalescing window in milliseconds.
    pub merge_window_ms: u64,
    /// Max records kept. `None` = unbounded.
    pub max_size: Option<usize>,
    /// Pre-existing history to resume from instead of synthesizing an anchor.
    pub initial_actions: Option<Vec<EditAction>>,
    /// Pointer into `initial_actions`. Clamped; defaults to the last record.
    pub initial_index: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            initial_value: String::new(),
            merge_window_ms: DEFAULT_MERGE_WINDOW_MS,
            max_size: None,
            initial_actions: None,
            initial_index: None,
        }
    }
}

impl HistoryConfig {
    /// Unbounded configuration with the default merge window.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    pub fn with_merge_window(mut self, merge_window_ms: u64) -> Self {
        self.merge_window_ms = merge_window_ms;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Resume from an existing `(actions, index)` pair.
    pub fn with_history(mut self, actions: Vec<EditAction>, index: usize) -> Self {
        self.initial_actions = Some(actions);
        self.initial_index = Some(index);
        self
    }
}

impl From<&AppConfig> for HistoryConfig {
    fn from(app: &AppConfig) -> Self {
        Self {
            initial_value: app.initial_value.clone(),
            merge_window_ms: app.merge_window_ms,
            max_size: app.max_size,
            initial_actions: None,
            initial_index: None,
        }
    }
}
