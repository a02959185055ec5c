use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::types::MatchRecord;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Whole contents of the CSV store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Add one row, widening the schema with any column the table lacks.
    /// New columns are appended in row order and back-filled with empty cells.
    fn push_row(&mut self, row: &[(String, String)]) {
        for (name, _) in row {
            if !self.headers.iter().any(|h| h == name) {
                self.headers.push(name.clone());
            }
        }
        let width = self.headers.len();
        for existing in &mut self.rows {
            existing.resize(width, String::new());
        }

        let mut cells = vec![String::new(); width];
        for (name, value) in row {
            if let Some(idx) = self.headers.iter().position(|h| h == name) {
                cells[idx] = value.clone();
            }
        }
        self.rows.push(cells);
    }
}

/// Load the store, or an empty table when the file does not exist yet.
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Ok(Table::default());
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }
    Ok(Table { headers, rows })
}

/// Rewrite the whole store through a temp file in the same directory. The temp
/// file is removed on every failure path, including a failed rename.
fn write_table(path: &Path, table: &Table) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read, add one row, write everything back. Returns the new row count.
fn append_row(path: &Path, row: &[(String, String)]) -> Result<usize> {
    let mut table = load_table(path)?;
    table.push_row(row);
    write_table(path, &table)?;
    Ok(table.rows.len())
}

// ---------------------------------------------------------------------------
// CsvStore
// ---------------------------------------------------------------------------

/// The one resource shared by all workers. Every append is a full
/// read-modify-write under a single lock, so appends never interleave.
pub struct CsvStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as one row. The file is created on the first append.
    pub async fn append(&self, record: &MatchRecord) -> Result<usize> {
        let row = record.to_row();
        let path = self.path.clone();
        // Held until the blocking write has finished, whichever way it ends.
        let _guard = self.lock.lock().await;
        tokio::task::spawn_blocking(move || append_row(&path, &row)).await?
    }
}
