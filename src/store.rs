//! Locates station export files in a data directory.
//!
//! Each logical table is looked up as `<table>.parquet`, `<table>.ndjson` or
//! `<table>.csv`. The store also remembers file modification times so a
//! re-export by the back office can be detected and views rebuilt.

use crate::config;
use crate::error::{ReportError, Result};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Resolves table names to export files inside a data directory.
pub struct DataStore {
    /// Directory holding the exported tables.
    pub data_dir: PathBuf,
    seen: HashMap<PathBuf, SystemTime>,
}

impl DataStore {
    /// Open a store over `data_dir`, or the platform default when `None`.
    ///
    /// The directory must already exist.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(config::default_data_dir);
        if !dir.is_dir() {
            return Err(ReportError::NotFound(format!(
                "Data directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self {
            data_dir: dir,
            seen: HashMap::new(),
        })
    }

    /// Find the export file backing `table`.
    pub fn table_path(&mut self, table: &str) -> Result<PathBuf> {
        if !config::TABLES.contains(&table) {
            return Err(ReportError::NotFound(format!("Unknown table: {}", table)));
        }

        let path = self.find_file(table).ok_or_else(|| {
            ReportError::NotFound(format!(
                "No export for table {} in {}",
                table,
                self.data_dir.display()
            ))
        })?;

        if let Some(modified) = modified_at(&path) {
            self.seen.insert(path.clone(), modified);
        }
        Ok(path)
    }

    /// Tables that have an export file present, in registration order.
    pub fn available_tables(&self) -> Vec<&'static str> {
        config::TABLES
            .iter()
            .copied()
            .filter(|t| self.find_file(t).is_some())
            .collect()
    }

    /// Check whether any file handed out so far was rewritten or removed.
    pub fn is_stale(&self) -> bool {
        self.seen
            .iter()
            .any(|(path, seen_at)| modified_at(path).map_or(true, |m| m != *seen_at))
    }

    /// Forget recorded modification times.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Load the station metadata document (`station.json`, optionally gzipped).
    ///
    /// Returns `Value::Null` when the station has no metadata file.
    pub fn load_meta(&self) -> Result<serde_json::Value> {
        let plain = self.data_dir.join(config::STATION_META);
        let gz = self.data_dir.join(format!("{}.gz", config::STATION_META));

        let contents = if plain.exists() {
            fs::read_to_string(&plain)?
        } else if gz.exists() {
            let file = fs::File::open(&gz)?;
            let mut reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
            let mut contents = String::new();
            reader.read_to_string(&mut contents)?;
            contents
        } else {
            return Ok(serde_json::Value::Null);
        };

        Ok(serde_json::from_str(&contents)?)
    }

    fn find_file(&self, table: &str) -> Option<PathBuf> {
        config::TABLE_EXTENSIONS
            .iter()
            .map(|ext| self.data_dir.join(format!("{}.{}", table, ext)))
            .find(|p| p.is_file())
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
