//! JSON snapshot files for the in-memory store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Section, Station};

use super::error::StoreError;

/// Everything the in-memory store holds, in a serializable form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Next id to hand out for a station.
    pub next_station_id: u64,
    /// Next id to hand out for a line.
    pub next_line_id: u64,
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
    /// Sections of all lines, each tagged with its line id.
    pub sections: Vec<Section>,
}

/// A snapshot file on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot.
    ///
    /// Returns `None` if the file doesn't exist yet. A file that exists but
    /// can't be parsed is an error, so a damaged snapshot is never silently
    /// replaced by an empty one.
    pub fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Snapshot {
                    message: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };

        let snapshot = serde_json::from_str(&contents).map_err(|e| StoreError::Snapshot {
            message: format!("failed to parse {}: {}", self.path.display(), e),
        })?;
        Ok(Some(snapshot))
    }

    /// Write the snapshot.
    ///
    /// Creates parent directories if they don't exist. The data is written
    /// to a sibling temporary file first and renamed into place.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Snapshot {
                message: format!("failed to create snapshot directory: {}", e),
            })?;
        }

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| StoreError::Snapshot {
            message: format!("failed to serialize snapshot: {}", e),
        })?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| StoreError::Snapshot {
            message: format!("failed to write snapshot file: {}", e),
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Snapshot {
            message: format!("failed to replace snapshot file: {}", e),
        })?;

        Ok(())
    }
}
