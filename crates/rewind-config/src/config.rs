/// Application configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides every other data directory source.
pub const DATA_DIR_ENV: &str = "REWIND_DATA_DIR";

/// Upper bound for the merge window. Anything longer would fold unrelated
/// bursts of typing into a single undo step.
const MAX_MERGE_WINDOW_MS: u64 = 60_000;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Max milliseconds between two same-kind edits for them to coalesce.
    pub merge_window_ms: u64,
    /// Max records kept per document. `None` = unbounded.
    pub max_size: Option<usize>,
    /// Text committed on top of the anchor when a document starts fresh.
    pub initial_value: String,
    /// Directory holding the history database. Empty = platform default.
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            merge_window_ms: 300,
            max_size: Some(100),
            initial_value: String::new(),
            data_dir: String::new(),
        }
    }
}

impl AppConfig {
    /// Returns the config file path: exe directory + `rewind.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("rewind.json")))
            .unwrap_or_else(|| PathBuf::from("rewind.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Return defaults on error (don't overwrite broken file)
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Resolves the directory holding the history database.
    ///
    /// Resolution order:
    /// 1. `REWIND_DATA_DIR` environment variable
    /// 2. `data_dir` from this config (if non-empty)
    /// 3. Platform data directory + `rewind`
    /// 4. `.data/` directory next to the executable
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        if !self.data_dir.is_empty() {
            return PathBuf::from(&self.data_dir);
        }
        if let Some(dir) = dirs::data_dir() {
            return dir.join("rewind");
        }
        let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
        exe.parent().unwrap_or(Path::new(".")).join(".data")
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.merge_window_ms = self.merge_window_ms.min(MAX_MERGE_WINDOW_MS);
        if self.max_size == Some(0) {
            self.max_size = Some(1);
        }
    }
}
