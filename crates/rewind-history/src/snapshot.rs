/// Detached `(actions, position)` pairs for observers and save/restore.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::operation::EditAction;

/// A copy of the history, independent of the live engine state.
///
/// This is exactly the persisted layout: restoring it through
/// `HistoryEngine::set_history` reproduces the records bit for bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub actions: Vec<EditAction>,
    pub position: usize,
}

impl HistorySnapshot {
    /// The record the snapshot points at, if the position is in range.
    pub fn current(&self) -> Option<&EditAction> {
        self.actions.get(self.position)
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize history snapshot")
    }

    /// Parses a snapshot from JSON. The position is not validated here;
    /// `set_history` clamps it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or misses a field.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse history snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HistorySnapshot {
        HistorySnapshot {
            actions: vec![
                EditAction::anchor(),
                EditAction {
                    kind: "insertText".to_string(),
                    value: "say \"hi\"\n".to_string(),
                    timestamp: 1_700_000_000_000,
                    selection_start: 0,
                    selection_end: 9,
                },
            ],
            position: 1,
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let snap = sample();
        let json = snap.to_json().expect("to json");
        let decoded = HistorySnapshot::from_json(&json).expect("from json");
        assert_eq!(decoded, snap);
    }

    #[test]
    fn test_json_layout() {
        let json = sample().to_json().expect("to json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["position"], 1);
        assert_eq!(value["actions"][0]["kind"], "initialText");
        assert_eq!(value["actions"][1]["selectionEnd"], 9);
    }

    #[test]
    fn test_from_json_accepts_out_of_range_position() {
        let json = r#"{"actions":[{"kind":"initialText","value":"","timestamp":0,"selectionStart":0,"selectionEnd":0}],"position":12}"#;
        let snap = HistorySnapshot::from_json(json).expect("parse");
        assert_eq!(snap.position, 12);
        assert!(snap.current().is_none());
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        let err = HistorySnapshot::from_json(r#"{"actions":[{"kind":"x"}],"position":0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_current() {
        let snap = sample();
        assert_eq!(snap.current().map(|a| a.value.as_str()), Some("say \"hi\"\n"));
    }
}
