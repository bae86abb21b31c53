/// Core record types: committed edit actions, incoming edits, render targets.
use serde::{Deserialize, Serialize};

/// Kind tag of the synthesized anchor record at index 0.
pub const ANCHOR_KIND: &str = "initialText";

/// Kind tag of the record committed for a configured initial value.
pub const INSERT_TEXT_KIND: &str = "insertText";

/// One snapshot in the history sequence.
///
/// Holds the full buffer content at commit time, never a delta.
/// Serialized with camelCase field names so exported history matches the
/// `{kind, value, timestamp, selectionStart, selectionEnd}` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditAction {
    /// Classifies the edit ("insertText", "deleteContentBackward", ...).
    pub kind: String,
    /// Full buffer content after this edit.
    pub value: String,
    /// Commit time in milliseconds. Only compared against the merge window.
    pub timestamp: i64,
    /// Caret offset (in chars) where this edit began.
    pub selection_start: usize,
    /// Caret offset (in chars) after this edit.
    pub selection_end: usize,
}

impl EditAction {
    /// The blank `"initialText"` record representing the pristine buffer.
    pub fn anchor() -> Self {
        Self {
            kind: ANCHOR_KIND.to_string(),
            value: String::new(),
            timestamp: 0,
            selection_start: 0,
            selection_end: 0,
        }
    }

    /// Whether this record carries the anchor kind tag.
    pub fn is_anchor(&self) -> bool {
        self.kind == ANCHOR_KIND
    }

    /// Length of `value` in chars, the unit all offsets are measured in.
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// An edit as reported by an input adapter, before the engine commits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEdit {
    pub kind: String,
    /// Full buffer content after the edit.
    pub value: String,
    /// Observation time in milliseconds.
    pub timestamp: i64,
    /// Caret offset (in chars) reported by the adapter after the edit.
    pub selection_end: usize,
}

impl IncomingEdit {
    pub fn new(
        kind: impl Into<String>,
        value: impl Into<String>,
        timestamp: i64,
        selection_end: usize,
    ) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            timestamp,
            selection_end,
        }
    }
}

/// What an adapter should write back into its input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    /// Buffer content to display.
    pub value: String,
    /// Offset (in chars) the caret should move to.
    pub caret: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_shape() {
        let anchor = EditAction::anchor();
        assert!(anchor.is_anchor());
        assert_eq!(anchor.kind, "initialText");
        assert!(anchor.value.is_empty());
        assert_eq!(anchor.selection_start, 0);
        assert_eq!(anchor.selection_end, 0);
    }

    #[test]
    fn test_char_len_counts_chars_not_bytes() {
        let action = EditAction {
            value: "héllo 🌍".to_string(),
            ..EditAction::anchor()
        };
        assert_eq!(action.char_len(), 7);
        assert!(action.value.len() > 7);
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let action = EditAction {
            kind: "insertText".to_string(),
            value: "ab".to_string(),
            timestamp: 1200,
            selection_start: 0,
            selection_end: 2,
        };
        let json = serde_json::to_value(&action).expect("serialize");
        assert_eq!(json["selectionStart"], 0);
        assert_eq!(json["selectionEnd"], 2);
        assert_eq!(json["timestamp"], 1200);
        assert!(json.get("selection_start").is_none());
    }

    #[test]
    fn test_bincode_roundtrip_preserves_unicode() {
        let action = EditAction {
            kind: "insertFromPaste".to_string(),
            value: "tab\tnewline\n\u{0}nul ✓".to_string(),
            timestamp: -5,
            selection_start: 3,
            selection_end: 9,
        };
        let bytes = bincode::serialize(&action).expect("serialize");
        let decoded: EditAction = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded, action);
    }
}
