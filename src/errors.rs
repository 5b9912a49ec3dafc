use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::TableName;

/// Result alias used across the pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Structural failures that abort a run.
///
/// Business-rule findings (disqualification mismatches, mapping gaps, ordering
/// violations) are never reported through this type; they travel as columns and
/// side tables in [`crate::pipeline::PipelineOutput`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A table lacks required headers.
    #[error("table '{table}' is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Table name.
        table: TableName,
        /// Every missing header.
        columns: Vec<String>,
    },
    /// A table has no data rows.
    #[error("table '{table}' is empty")]
    EmptyInput {
        /// Table name.
        table: TableName,
    },
    /// A creation time matches no accepted format.
    #[error("row {row}: unparseable creation time '{value}'")]
    TimestampParse {
        /// 1-based data row.
        row: usize,
        /// Cell as read.
        value: String,
    },
    /// A lookup cell cannot be converted.
    #[error("table '{table}' row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        /// Table name.
        table: TableName,
        /// Column header.
        column: String,
        /// 1-based data row.
        row: usize,
        /// Cell as read.
        value: String,
    },
    /// Input is not a `.csv`, `.tsv` or `.txt` file.
    #[error("unsupported file type: {}", path.display())]
    UnsupportedFileType {
        /// Offending path.
        path: PathBuf,
    },
    /// No file matched an input's prefix.
    #[error("no input file for '{table}' found under {}", dir.display())]
    InputNotFound {
        /// Table name.
        table: TableName,
        /// Directory searched.
        dir: PathBuf,
    },
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Delimited-file read or write failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Config or summary JSON failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Rejected configuration override.
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_column() {
        let err = PipelineError::MissingColumns {
            table: "activity_report".to_string(),
            columns: vec!["Candidate".to_string(), "Job".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("activity_report"));
        assert!(text.contains("Candidate, Job"));
    }

    #[test]
    fn timestamp_error_reports_row_and_value() {
        let err = PipelineError::TimestampParse {
            row: 7,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "row 7: unparseable creation time 'yesterday'"
        );
    }

    #[test]
    fn unsupported_file_type_shows_path() {
        let err = PipelineError::UnsupportedFileType {
            path: PathBuf::from("input/report.xlsx"),
        };
        assert!(err.to_string().contains("report.xlsx"));
    }
}
