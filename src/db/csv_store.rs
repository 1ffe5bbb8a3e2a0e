use crate::db::models::{Expense, ExpenseRow};
use crate::db::schema::HEADERS;
use crate::error::GastosError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// The tabular file acting as the system of record.
///
/// Every call reads or writes the whole file; nothing is cached here.
#[derive(Debug, Clone)]
pub struct ExpenseFile {
    path: PathBuf,
}

impl ExpenseFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record, degrading to an empty set when the file is
    /// missing or cannot be parsed. Parse failures are logged, not returned.
    pub fn load(&self) -> Vec<Expense> {
        match self.try_load() {
            Ok(expenses) => expenses,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to load expenses; treating store as empty");
                Vec::new()
            }
        }
    }

    /// Load every record. A missing file is an empty store; a malformed one
    /// is `CorruptStore`.
    pub fn try_load(&self) -> Result<Vec<Expense>, GastosError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "expense file not found; empty store");
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        read_expenses(BufReader::new(file)).map_err(|e| GastosError::CorruptStore {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Replace the file with a header row plus one row per record, in order.
    ///
    /// Written to a sibling temp file first and renamed into place, so a
    /// crash leaves either the previous or the new content.
    pub fn save(&self, expenses: &[Expense]) -> Result<(), GastosError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        write_expenses(&mut writer, expenses)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        fs::rename(&temp_path, &self.path).inspect_err(|_| {
            let _ = fs::remove_file(&temp_path);
        })?;
        debug!(path = %self.path.display(), count = expenses.len(), "expenses saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Decode a header row followed by expense rows. Rows with an empty first
/// column are blank trailing rows and are skipped.
pub(crate) fn read_expenses<R: Read>(reader: R) -> Result<Vec<Expense>, GastosError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut expenses = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.get(0).is_none_or(|id| id.trim().is_empty()) {
            continue;
        }
        let row: ExpenseRow = record.deserialize(None)?;
        expenses.push(Expense::try_from(row)?);
    }
    Ok(expenses)
}

pub(crate) fn write_expenses<W: Write>(writer: W, expenses: &[Expense]) -> Result<(), GastosError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADERS)?;
    for expense in expenses {
        wtr.serialize(ExpenseRow::from(expense.clone()))?;
    }
    wtr.flush()?;
    Ok(())
}
