use crate::core::record::ConversionRecord;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Append-only conversion history mirrored to a JSON file.
///
/// The file is read once on [`HistoryStore::open`] and rewritten in full after
/// every mutation. When writing fails the in-memory records stay authoritative
/// for the rest of the session.
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<ConversionRecord>,
}

impl HistoryStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let mut store = Self {
            path: path.into(),
            records: Vec::new(),
        };
        store.records = store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted history. A missing file is an empty history; any
    /// other failure is logged and also treated as empty.
    pub fn load(&self) -> Vec<ConversionRecord> {
        match read_records(&self.path) {
            Ok(records) => {
                debug!(count = records.len(), path = %self.path.display(), "Loaded history");
                records
            }
            Err(e) => {
                error!(path = %self.path.display(), "Error loading history: {e:#}");
                Vec::new()
            }
        }
    }

    /// Overwrites the history file with `records`. Failures are logged only.
    pub fn save(&self, records: &[ConversionRecord]) {
        if let Err(e) = write_records(&self.path, records) {
            error!(path = %self.path.display(), "Error saving history: {e:#}");
        }
    }

    pub fn append(&mut self, record: ConversionRecord) {
        self.records.push(record);
        self.save(&self.records);
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.save(&self.records);
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    /// Up to `limit` records, most recent first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter().rev().take(limit)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_records(path: &Path) -> Result<Vec<ConversionRecord>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_records(path: &Path, records: &[ConversionRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // serde_json leaves non-ASCII text unescaped
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(count = records.len(), "Saved history");
    Ok(())
}
