/// Snapshot-based undo/redo history for a single text buffer.
///
/// Provides a `HistoryEngine` that keeps a linear sequence of full-buffer
/// snapshots, coalesces bursts of same-kind edits inside a merge window,
/// drops the redo branch when a new edit commits, and notifies observers
/// after every change. Histories can be saved per document to an embedded
/// key-value store (redb) or exported as JSON.
pub mod config;
pub mod manager;
pub mod notify;
pub mod operation;
pub mod persistence;
pub mod policy;
pub mod snapshot;
pub mod store;

pub use config::HistoryConfig;
pub use manager::HistoryEngine;
pub use notify::{NotificationBus, SubscriptionId};
pub use operation::{EditAction, IncomingEdit, Render, ANCHOR_KIND, INSERT_TEXT_KIND};
pub use persistence::PersistenceLayer;
pub use policy::{MergeOutcome, MergePolicy};
pub use snapshot::HistorySnapshot;
pub use store::{HistoryStore, Position};
