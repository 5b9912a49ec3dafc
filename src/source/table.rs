use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::errors::{PipelineError, PipelineResult};
use crate::types::TableName;
use crate::utils::normalize_label;

/// Header plus string rows, as read from a delimited file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    name: TableName,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Resolved positions of a table's columns, matched case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct Columns {
    positions: HashMap<String, usize>,
}

impl Columns {
    /// Trimmed cell for `column`; empty when the column or cell is absent.
    pub fn cell<'a>(&self, row: &'a [String], column: &str) -> &'a str {
        self.positions
            .get(&normalize_label(column))
            .and_then(|idx| row.get(*idx))
            .map(|value| value.trim())
            .unwrap_or_default()
    }

    /// True when the header exists.
    pub fn has(&self, column: &str) -> bool {
        self.positions.contains_key(&normalize_label(column))
    }
}

impl Table {
    /// Table from already-split cells.
    pub fn new(name: impl Into<TableName>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Logical table name used in errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header cells as read.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validate the table is non-empty and carries every `required` column.
    ///
    /// Header matching ignores case and surrounding whitespace. Extra columns
    /// are kept and reachable through the returned [`Columns`].
    pub fn columns(&self, required: &[&str]) -> PipelineResult<Columns> {
        if self.rows.is_empty() {
            return Err(PipelineError::EmptyInput {
                table: self.name.clone(),
            });
        }
        let mut positions = HashMap::new();
        for (idx, header) in self.headers.iter().enumerate() {
            positions.entry(normalize_label(header)).or_insert(idx);
        }
        let missing: Vec<String> = required
            .iter()
            .filter(|column| !positions.contains_key(&normalize_label(column)))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns {
                table: self.name.clone(),
                columns: missing,
            });
        }
        Ok(Columns { positions })
    }
}

fn delimiter_for(path: &Path) -> PipelineResult<u8> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => Ok(b','),
        Some("tsv") | Some("txt") => Ok(b'\t'),
        _ => Err(PipelineError::UnsupportedFileType {
            path: path.to_path_buf(),
        }),
    }
}

/// Read a `.csv` (comma) or `.tsv`/`.txt` (tab) file into a [`Table`].
pub fn read_table(path: impl AsRef<Path>, name: impl Into<TableName>) -> PipelineResult<Table> {
    let path = path.as_ref();
    let delimiter = delimiter_for(path)?;
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table::new(name, headers, rows))
}
