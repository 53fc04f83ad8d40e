//! The snapshot document and its file on disk.
//!
//! A snapshot is a JSON object keyed by table name, in discovery order:
//!
//! ```json
//! {
//!   "books": {
//!     "columns": ["id", "title", "price"],
//!     "data": [[1, "Dune", "12.50"]]
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::value::SqlValue;
use crate::error::{Result, SnapshotError};

/// Timestamp layout embedded in snapshot file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// One table's columns and normalized rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    /// Column names in ordinal order.
    pub columns: Vec<String>,

    /// Rows, each positionally aligned with `columns`.
    pub data: Vec<Vec<Value>>,
}

impl TableSnapshot {
    /// Normalize raw rows into their JSON encoding.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        let data = rows
            .iter()
            .map(|row| row.iter().map(SqlValue::to_json).collect())
            .collect();
        Self { columns, data }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}

/// The complete output of one backup run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    tables: Vec<(String, TableSnapshot)>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table. Tables keep the order they were added in.
    pub fn insert(&mut self, name: impl Into<String>, table: TableSnapshot) {
        self.tables.push((name.into(), table));
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// Table names in insertion order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(n, _)| n.as_str())
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the snapshot has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, t)| t.row_count()).sum()
    }

    /// Serialize as 2-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the snapshot into `dir` as `<label>.backup.<timestamp>.json`.
    ///
    /// The document is serialized in memory, written next to its final path
    /// and renamed into place, so the final path never holds a partial
    /// snapshot. A failed write removes the temporary file.
    pub fn write_to_dir(&self, dir: &Path, label: &str, timestamp: NaiveDateTime) -> Result<PathBuf> {
        let path = dir.join(backup_file_name(label, timestamp));
        let temp_path = path.with_extension("json.tmp");

        let content = serde_json::to_vec_pretty(self)?;

        if let Err(e) = std::fs::write(&temp_path, &content) {
            discard_temp_file(&temp_path);
            return Err(SnapshotError::filesystem(&temp_path, e));
        }
        if let Err(e) = std::fs::rename(&temp_path, &path) {
            discard_temp_file(&temp_path);
            return Err(SnapshotError::filesystem(&path, e));
        }

        info!(
            "Wrote snapshot of {} tables ({} rows) to {}",
            self.len(),
            self.total_rows(),
            path.display()
        );
        Ok(path)
    }
}

fn discard_temp_file(temp_path: &Path) {
    if let Err(e) = std::fs::remove_file(temp_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove {}: {}", temp_path.display(), e);
        }
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (name, table) in &self.tables {
            map.serialize_entry(name, table)?;
        }
        map.end()
    }
}

/// File name for a snapshot taken at `timestamp`.
pub fn backup_file_name(label: &str, timestamp: NaiveDateTime) -> String {
    format!("{}.backup.{}.json", label, timestamp.format(TIMESTAMP_FORMAT))
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| SnapshotError::filesystem(dir, e))?;
    debug!("Output directory ready: {}", dir.display());
    Ok(())
}
