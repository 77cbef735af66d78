//! Saved enhancement results.
//!
//! The history is a single JSON array on disk, newest entry first and capped
//! at [`HISTORY_LIMIT`] entries. Each entry stores the generated prompt next to
//! the record that produced it so a result can be traced back to its inputs.
//!
//! A missing or unreadable file is treated as an empty history; a corrupt one
//! is logged and replaced on the next write.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::enhance::GeneratedPrompt;
use crate::params::CharacterParams;

/// Maximum number of entries kept.
pub const HISTORY_LIMIT: usize = 20;

/// One saved result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub output: GeneratedPrompt,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub model_params: CharacterParams,
}

/// File-backed history.
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
}

impl HistoryStore {
    /// Open the history at `path`. Nothing is read until [`list`](Self::list).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limit: HISTORY_LIMIT,
        }
    }

    /// Override the entry cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&json) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring corrupt history {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Prepend a result and trim to the cap.
    pub fn add(
        &self,
        output: GeneratedPrompt,
        params: &CharacterParams,
    ) -> Result<HistoryEntry, String> {
        let entry = HistoryEntry {
            output,
            timestamp: chrono::Utc::now().timestamp_millis(),
            model_params: params.clone(),
        };
        let mut entries = self.list();
        entries.insert(0, entry.clone());
        entries.truncate(self.limit);
        self.save(&entries)?;
        debug!(
            "Saved history entry ({} total) to {}",
            entries.len(),
            self.path.display()
        );
        Ok(entry)
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<(), String> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleared history {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("failed to clear history: {e}")),
        }
    }

    /// Write atomically via a sibling temp file.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create history dir: {e}"))?;
        }
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "history.json".to_string());
        let tmp_path = self.path.with_file_name(format!(".{file_name}.tmp"));

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| format!("failed to serialize history: {e}"))?;
        std::fs::write(&tmp_path, json)
            .map_err(|e| format!("failed to write temp history: {e}"))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| format!("failed to rename history: {e}"))?;
        Ok(())
    }
}
