use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// `count` as a percentage of `total`; 0 when `total` is 0.
pub fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

/// Row count of one pipeline stage and its share of the source rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageShare {
    /// Rows leaving the stage.
    pub rows: usize,
    /// `rows` as a percentage of source rows.
    pub percent_of_source: f64,
}

/// Counts reported at the end of a run.
///
/// `stages` keeps insertion order so the summary reads top to bottom in
/// pipeline order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Rows in the activity report.
    pub source_rows: usize,
    /// Row count per stage, in execution order.
    pub stages: IndexMap<String, StageShare>,
    /// Rows that mapped to a process step.
    pub rows_with_process_step: usize,
    /// Rows routed to the unmapped table.
    pub rows_without_process_step: usize,
    /// Rows in the golden source.
    pub golden_rows: usize,
    /// Rows in the manual-review table.
    pub manual_review_rows: usize,
    /// Applications sent to manual review.
    pub manual_review_applications: usize,
    /// Rows in the unmapped table.
    pub unmapped_rows: usize,
    /// Golden rows without a rank.
    pub unranked_rows: usize,
    /// Applications in the golden source.
    pub applications: usize,
    /// Applications with out-of-order steps.
    pub red_flag_applications: usize,
    /// Order-sensitive hash of the golden-source rows.
    pub fingerprint: u64,
}

impl RunSummary {
    /// Empty summary for a report of `source_rows` rows.
    pub fn new(source_rows: usize) -> Self {
        Self {
            source_rows,
            ..Self::default()
        }
    }

    /// Record a stage's row count. Re-recording a stage overwrites it in place.
    pub fn record_stage(&mut self, stage: impl Into<String>, rows: usize) {
        let share = StageShare {
            rows,
            percent_of_source: percent_of(rows, self.source_rows),
        };
        self.stages.insert(stage.into(), share);
    }

    /// `count` as a percentage of source rows.
    pub fn share(&self, count: usize) -> f64 {
        percent_of(count, self.source_rows)
    }

    /// Emit the summary at `info`.
    pub fn log(&self) {
        info!("[golden_source:summary] source rows: {}", self.source_rows);
        for (stage, share) in &self.stages {
            info!(
                "[golden_source:summary] {stage}: {} rows ({:.2}%)",
                share.rows, share.percent_of_source
            );
        }
        info!(
            "[golden_source:summary] rows with a process step: {} ({:.2}%), without: {} ({:.2}%)",
            self.rows_with_process_step,
            self.share(self.rows_with_process_step),
            self.rows_without_process_step,
            self.share(self.rows_without_process_step)
        );
        info!(
            "[golden_source:summary] golden rows: {} ({:.2}%) across {} applications; {} red-flagged",
            self.golden_rows,
            self.share(self.golden_rows),
            self.applications,
            self.red_flag_applications
        );
        info!(
            "[golden_source:summary] manual review: {} rows ({:.2}%) in {} applications; unmapped: {}; unranked: {}",
            self.manual_review_rows,
            self.share(self.manual_review_rows),
            self.manual_review_applications,
            self.unmapped_rows,
            self.unranked_rows
        );
        info!("[golden_source:summary] fingerprint: {:016x}", self.fingerprint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_handles_empty_total() {
        assert_eq!(percent_of(3, 0), 0.0);
        assert!((percent_of(1, 4) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn stages_keep_pipeline_order() {
        let mut summary = RunSummary::new(200);
        summary.record_stage("enriched", 150);
        summary.record_stage("activities", 90);
        summary.record_stage("golden", 40);
        summary.record_stage("enriched", 120);

        let order: Vec<&str> = summary.stages.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["enriched", "activities", "golden"]);
        let enriched = &summary.stages["enriched"];
        assert_eq!(enriched.rows, 120);
        assert!((enriched.percent_of_source - 60.0).abs() < 1e-9);
    }

    #[test]
    fn summary_serializes_to_json() {
        let mut summary = RunSummary::new(10);
        summary.record_stage("enriched", 5);
        summary.golden_rows = 4;
        let text = serde_json::to_string(&summary).unwrap();
        assert!(text.contains("\"enriched\""));
        assert!(text.contains("\"golden_rows\":4"));
    }
}
