use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::types::ObservationRecord;

/// Append-only JSON-array log. Each append reads the whole file back and
/// rewrites it, which is fine at a few dozen records a day; only one process
/// may write at a time.
pub struct ObservationLog {
    path: PathBuf,
}

impl ObservationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty log.
    pub fn read_all(&self) -> Result<Vec<ObservationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read log file: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Log file is not a JSON record array: {}", self.path.display()))
    }

    pub fn append(&self, record: &ObservationRecord) -> Result<()> {
        let mut records = self.read_all()?;
        records.push(record.clone());

        let serialized = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write log file: {}", self.path.display()))?;
        Ok(())
    }
}
