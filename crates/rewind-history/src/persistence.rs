/// Disk persistence layer backed by redb.
///
/// Uses a single redb database file with one table:
/// - `snapshots`: stores a bincode-serialized `HistorySnapshot` per `doc_id`
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::snapshot::HistorySnapshot;

/// Snapshot table: doc_id → bincode-serialized HistorySnapshot.
const SNAPSHOT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// File name of the database inside the data directory.
const DB_FILE: &str = "history.redb";

/// Persistence layer for history snapshots backed by redb.
///
/// Thread-safe: redb supports concurrent readers and serialized writers.
/// Shared across documents via `Arc<PersistenceLayer>`.
pub struct PersistenceLayer {
    db: Database,
}

impl std::fmt::Debug for PersistenceLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceLayer").finish()
    }
}

impl PersistenceLayer {
    /// Opens or creates the history database in the given directory.
    ///
    /// Creates the directory and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open(data_dir: &Path) -> Result<Arc<Self>> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join(DB_FILE);
        let db = Database::create(&db_path)
            .with_context(|| format!("Failed to open history database: {}", db_path.display()))?;

        // Ensure the table exists
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to create snapshots table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        tracing::debug!("Opened history database at {}", db_path.display());
        Ok(Arc::new(Self { db }))
    }

    /// Stores the snapshot for a document, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write transaction fails.
    pub fn save(&self, doc_id: &str, snapshot: &HistorySnapshot) -> Result<()> {
        let bytes = bincode::serialize(snapshot).context("Failed to serialize history snapshot")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to open snapshots table")?;
            table
                .insert(doc_id, bytes.as_slice())
                .context("Failed to insert history snapshot")?;
        }
        write_txn
            .commit()
            .context("Failed to commit write transaction")?;
        Ok(())
    }

    /// Loads the snapshot for a document.
    ///
    /// Returns `None` if no history exists for this document.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction or deserialization fails.
    pub fn load(&self, doc_id: &str) -> Result<Option<HistorySnapshot>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SNAPSHOT_TABLE)
            .context("Failed to open snapshots table")?;

        match table.get(doc_id).context("Failed to read history snapshot")? {
            Some(guard) => {
                let snapshot: HistorySnapshot = bincode::deserialize(guard.value())
                    .context("Failed to deserialize history snapshot")?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Removes the stored history for a document.
    ///
    /// Returns `true` if something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write transaction fails.
    pub fn delete(&self, doc_id: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        let removed = {
            let mut table = write_txn
                .open_table(SNAPSHOT_TABLE)
                .context("Failed to open snapshots table")?;
            let removed = table
                .remove(doc_id)
                .context("Failed to remove history snapshot")?;
            removed.is_some()
        };
        write_txn.commit().context("Failed to commit deletion")?;
        Ok(removed)
    }

    /// Lists all document IDs that have stored history, in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn list_documents(&self) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SNAPSHOT_TABLE)
            .context("Failed to open snapshots table")?;

        let mut doc_ids = Vec::new();
        for entry in table.iter().context("Failed to iterate snapshots table")? {
            let (key_guard, _) = entry.context("Failed to read snapshot entry")?;
            doc_ids.push(key_guard.value().to_string());
        }
        Ok(doc_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::EditAction;
    use tempfile::TempDir;

    fn make_snapshot(values: &[&str], position: usize) -> HistorySnapshot {
        let mut actions = vec![EditAction::anchor()];
        for (i, v) in values.iter().enumerate() {
            actions.push(EditAction {
                kind: "insert".to_string(),
                value: v.to_string(),
                timestamp: i as i64,
                selection_start: 0,
                selection_end: v.chars().count(),
            });
        }
        HistorySnapshot { actions, position }
    }

    fn open_test_db() -> (Arc<PersistenceLayer>, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let pl = PersistenceLayer::open(dir.path()).expect("open db");
        (pl, dir)
    }

    #[test]
    fn test_open_creates_database() {
        let (pl, dir) = open_test_db();
        assert!(dir.path().join(DB_FILE).exists());
        let docs = pl.list_documents().expect("list docs");
        assert!(docs.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (pl, _dir) = open_test_db();
        let snap = make_snapshot(&["a", "ab", "abc"], 2);
        pl.save("doc", &snap).expect("save");

        let loaded = pl.load("doc").expect("load").expect("exists");
        assert_eq!(loaded, snap);
    }

    #[test]
    fn test_load_missing_document() {
        let (pl, _dir) = open_test_db();
        assert!(pl.load("nope").expect("load").is_none());
    }

    #[test]
    fn test_save_overwrites_existing() {
        let (pl, _dir) = open_test_db();
        pl.save("doc", &make_snapshot(&["original"], 1))
            .expect("save");
        pl.save("doc", &make_snapshot(&["updated", "again"], 1))
            .expect("overwrite");

        let loaded = pl.load("doc").expect("load").expect("exists");
        assert_eq!(loaded.actions.len(), 3);
        assert_eq!(loaded.actions[1].value, "updated");
        assert_eq!(loaded.position, 1);
    }

    #[test]
    fn test_delete() {
        let (pl, _dir) = open_test_db();
        pl.save("doc", &make_snapshot(&["a"], 1)).expect("save");

        assert!(pl.delete("doc").expect("delete"));
        assert!(!pl.delete("doc").expect("delete again"));
        assert!(pl.load("doc").expect("load").is_none());
    }

    #[test]
    fn test_multi_document_isolation() {
        let (pl, _dir) = open_test_db();
        pl.save("doc-a", &make_snapshot(&["a1", "a2"], 2))
            .expect("save a");
        pl.save("doc-b", &make_snapshot(&["b1"], 1)).expect("save b");

        pl.delete("doc-a").expect("delete a");
        assert!(pl.load("doc-a").expect("load a").is_none());
        let b = pl.load("doc-b").expect("load b").expect("exists");
        assert_eq!(b.actions[1].value, "b1");
    }

    #[test]
    fn test_list_documents() {
        let (pl, _dir) = open_test_db();
        pl.save("doc-y", &make_snapshot(&[], 0)).expect("save");
        pl.save("doc-x", &make_snapshot(&[], 0)).expect("save");

        let docs = pl.list_documents().expect("list");
        assert_eq!(docs, vec!["doc-x", "doc-y"]);
    }

    #[test]
    fn test_reopen_database_preserves_data() {
        let dir = TempDir::new().expect("create temp dir");
        let snap = make_snapshot(&["persistent", "données ✓"], 1);

        {
            let pl = PersistenceLayer::open(dir.path()).expect("open");
            pl.save("doc", &snap).expect("save");
        }

        {
            let pl = PersistenceLayer::open(dir.path()).expect("reopen");
            let loaded = pl.load("doc").expect("load").expect("exists");
            assert_eq!(loaded, snap);
        }
    }
}
