use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::constants::files::{
    ACTIVITY_DICTIONARY_PREFIX, ACTIVITY_REPORT_PREFIX, GOLDEN_SOURCE_STEM, HR_NAMES_PREFIX,
    MANUAL_REVIEW_STEM, MOVED_SEGMENT_FILE, NOT_MOVED_SEGMENT_FILE, OUTPUT_STAMP_FORMAT,
    PROCESS_STEP_PREFIX, RANKING_PREFIX, SUMMARY_STEM, TARGETS_PREFIX, UNMAPPED_STEM,
    UNRANKED_STEM,
};
use crate::constants::tables::{
    ACTIVITY_DICTIONARY, ACTIVITY_REPORT, HR_NAMES, PROCESS_STEPS, RANKING, TARGETS,
};
use crate::errors::{PipelineError, PipelineResult};
use crate::pipeline::PipelineOutput;
use crate::source::InputPaths;

const TABLE_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// True if the path has a readable table extension (case-insensitive).
pub fn is_table_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            TABLE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// First table file under `root` whose stem starts with `prefix` (case-insensitive).
///
/// Candidates are visited in sorted path order so discovery is repeatable.
pub fn discover_input(root: &Path, prefix: &str, table: &str) -> PipelineResult<PathBuf> {
    let prefix = prefix.to_ascii_lowercase();
    let mut candidates: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_table_file(path))
        .filter(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem.to_ascii_lowercase().starts_with(&prefix))
        })
        .collect();
    candidates.sort();
    let Some(found) = candidates.into_iter().next() else {
        return Err(PipelineError::InputNotFound {
            table: table.to_string(),
            dir: root.to_path_buf(),
        });
    };
    debug!("[golden_source:fs] {table} -> {}", found.display());
    Ok(found)
}

/// Explicit per-table paths; any `None` is discovered under the input directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputOverrides {
    /// Explicit activity report.
    pub activity_report: Option<PathBuf>,
    /// Explicit activity dictionary.
    pub activity_dictionary: Option<PathBuf>,
    /// Explicit HR name list.
    pub hr_names: Option<PathBuf>,
    /// Explicit process-step map.
    pub process_steps: Option<PathBuf>,
    /// Explicit targets.
    pub targets: Option<PathBuf>,
    /// Explicit rank dictionary.
    pub ranking: Option<PathBuf>,
}

/// Resolve every input path, preferring explicit overrides.
pub fn resolve_inputs(input_dir: &Path, overrides: InputOverrides) -> PipelineResult<InputPaths> {
    let pick = |explicit: Option<PathBuf>, prefix: &str, table: &str| match explicit {
        Some(path) => Ok(path),
        None => discover_input(input_dir, prefix, table),
    };
    Ok(InputPaths {
        activity_report: pick(overrides.activity_report, ACTIVITY_REPORT_PREFIX, ACTIVITY_REPORT)?,
        activity_dictionary: pick(
            overrides.activity_dictionary,
            ACTIVITY_DICTIONARY_PREFIX,
            ACTIVITY_DICTIONARY,
        )?,
        hr_names: pick(overrides.hr_names, HR_NAMES_PREFIX, HR_NAMES)?,
        process_steps: pick(overrides.process_steps, PROCESS_STEP_PREFIX, PROCESS_STEPS)?,
        targets: pick(overrides.targets, TARGETS_PREFIX, TARGETS)?,
        ranking: pick(overrides.ranking, RANKING_PREFIX, RANKING)?,
    })
}

/// Writes the output tables into one directory with a `_<dd-mm>` stamp.
pub struct OutputWriter {
    dir: PathBuf,
    stamp: String,
}

impl OutputWriter {
    /// Create `dir` if needed; `run_date` provides the file stamp.
    pub fn new(dir: impl Into<PathBuf>, run_date: NaiveDate) -> PipelineResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            stamp: run_date.format(OUTPUT_STAMP_FORMAT).to_string(),
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<stem>_<dd-mm>.<extension>`.
    pub fn stamped_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{stem}_{}.{extension}", self.stamp))
    }

    /// Serialize `rows` as CSV with a header row. Empty tables produce an empty file.
    pub fn write_csv<T: Serialize>(&self, path: &Path, rows: &[T]) -> PipelineResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        debug!(
            "[golden_source:fs] wrote {} rows to {}",
            rows.len(),
            path.display()
        );
        Ok(())
    }

    /// Pretty-printed JSON.
    pub fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> PipelineResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, value)?;
        Ok(())
    }

    /// Write every output table and return the paths written, in write order.
    pub fn write_output(
        &self,
        output: &PipelineOutput,
        export_segments: bool,
    ) -> PipelineResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        let golden = self.stamped_path(GOLDEN_SOURCE_STEM, "csv");
        self.write_csv(&golden, &output.golden_source)?;
        written.push(golden);

        let review = self.stamped_path(MANUAL_REVIEW_STEM, "csv");
        self.write_csv(&review, &output.manual_review)?;
        written.push(review);

        let unmapped = self.stamped_path(UNMAPPED_STEM, "csv");
        self.write_csv(&unmapped, &output.unmapped_steps)?;
        written.push(unmapped);

        let unranked = self.stamped_path(UNRANKED_STEM, "csv");
        self.write_csv(&unranked, &output.unranked_steps)?;
        written.push(unranked);

        let summary = self.stamped_path(SUMMARY_STEM, "json");
        self.write_json(&summary, &output.summary)?;
        written.push(summary);

        if export_segments {
            let moved = self.dir.join(MOVED_SEGMENT_FILE);
            self.write_csv(&moved, &output.segments.moved)?;
            written.push(moved);
            let not_moved = self.dir.join(NOT_MOVED_SEGMENT_FILE);
            self.write_csv(&not_moved, &output.segments.not_moved)?;
            written.push(not_moved);
        }

        info!(
            "[golden_source:fs] wrote {} files to {}",
            written.len(),
            self.dir.display()
        );
        Ok(written)
    }
}
