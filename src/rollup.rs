//! Job-label expansion, run collapsing and process-step mapping.

use tracing::info;

use crate::config::PipelineConfig;
use crate::data::{ActivityRow, ApplicationEvent, JobLabel, StepRow};
use crate::grouping::{ensure_sorted_by, group_ranges, run_last_mask};
use crate::lookups::ProcessStepMap;
use crate::metrics::percent_of;

/// Parse job labels and keep the last row of every run of repeated activities.
///
/// Runs are maximal stretches of equal activity within one application in
/// chronological order, so `a, a, b, a` keeps the second `a`, the `b` and the
/// final `a`.
pub fn rollup_activities(mut rows: Vec<ApplicationEvent>, config: &PipelineConfig) -> Vec<ActivityRow> {
    ensure_sorted_by(&mut rows, "rollup", |row| {
        (row.unique_id.clone(), row.created_at(), row.seq())
    });
    let input_rows = rows.len();

    let mut keep = Vec::with_capacity(rows.len());
    for range in group_ranges(&rows, |row| row.unique_id.clone()) {
        let activities: Vec<&str> = rows[range].iter().map(|row| row.activity()).collect();
        keep.extend(run_last_mask(&activities));
    }

    let activity_rows: Vec<ActivityRow> = rows
        .into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .map(|application| {
            let job = JobLabel::parse(&application.tracked.new_job);
            let country = config.country_for(&job.location);
            let department_bucket = config.department_bucket(&job.department);
            ActivityRow {
                application,
                job,
                country,
                department_bucket,
            }
        })
        .collect();

    info!(
        "[golden_source:rollup] activity rollup kept {} of {} rows ({:.2}%)",
        activity_rows.len(),
        input_rows,
        percent_of(activity_rows.len(), input_rows)
    );
    activity_rows
}

/// Outcome of manual-review routing and process-step mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepRouting {
    /// Mapped rows after the step rollup.
    pub mapped: Vec<StepRow>,
    /// Rows of applications that failed the disqualification check.
    pub manual_review: Vec<ActivityRow>,
    /// Rows with no process step for their department bucket.
    pub unmapped: Vec<ActivityRow>,
    /// Mapped rows before the step rollup.
    pub mapped_before_rollup: usize,
}

/// Route failed applications to review, map the rest to process steps and
/// collapse consecutive repeated steps.
pub fn route_and_map_steps(rows: Vec<ActivityRow>, steps: &ProcessStepMap) -> StepRouting {
    let total = rows.len();
    let (passing, manual_review): (Vec<ActivityRow>, Vec<ActivityRow>) = rows
        .into_iter()
        .partition(|row| row.application.audit.disqualified_ok);

    let mut mapped = Vec::with_capacity(passing.len());
    let mut unmapped = Vec::new();
    for row in passing {
        match steps.lookup(&row.department_bucket, row.activity()) {
            Some(step) if !step.trim().is_empty() => {
                let process_step = step.clone();
                mapped.push(StepRow {
                    activity: row,
                    process_step,
                });
            }
            _ => unmapped.push(row),
        }
    }
    let mapped_before_rollup = mapped.len();

    ensure_sorted_by(&mut mapped, "steps", |row| {
        (row.unique_id().to_string(), row.created_at(), row.seq())
    });
    let mut keep = Vec::with_capacity(mapped.len());
    for range in group_ranges(&mapped, |row| row.unique_id().to_string()) {
        let labels: Vec<&str> = mapped[range]
            .iter()
            .map(|row| row.process_step.as_str())
            .collect();
        keep.extend(run_last_mask(&labels));
    }
    let mapped: Vec<StepRow> = mapped
        .into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect();

    info!(
        "[golden_source:steps] manual review {} rows ({:.2}%), unmapped {} rows ({:.2}%)",
        manual_review.len(),
        percent_of(manual_review.len(), total),
        unmapped.len(),
        percent_of(unmapped.len(), total)
    );
    info!(
        "[golden_source:steps] step rollup kept {} of {} mapped rows",
        mapped.len(),
        mapped_before_rollup
    );
    StepRouting {
        mapped,
        manual_review,
        unmapped,
        mapped_before_rollup,
    }
}
