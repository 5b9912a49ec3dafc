//! End-to-end transform from activity report to golden source.

use std::collections::BTreeSet;

use tracing::info;

use crate::config::PipelineConfig;
use crate::constants::tables::ACTIVITY_REPORT;
use crate::data::RawEvent;
use crate::enrichment::enrich_events;
use crate::errors::{PipelineError, PipelineResult};
use crate::hash::table_fingerprint;
use crate::lookups::{ActivityDictionary, HrRoster, ProcessStepMap, RankDictionary, TargetTable};
use crate::metrics::RunSummary;
use crate::ranking::rank_and_validate;
use crate::records::{
    GoldenSourceRecord, ManualReviewRecord, SegmentRecord, UnmappedStepRecord, UnrankedStepRecord,
};
use crate::resolution::{resolve_moved, resolve_not_moved};
use crate::rollup::{rollup_activities, route_and_map_steps};
use crate::segmentation::segment_candidates;
use crate::timeline::build_timeline;

/// Everything one run reads.
#[derive(Clone, Debug, Default)]
pub struct PipelineInputs {
    /// Activity report rows.
    pub events: Vec<RawEvent>,
    /// Raw label to canonical activity.
    pub activity_dictionary: ActivityDictionary,
    /// Actor to HR flag.
    pub hr_roster: HrRoster,
    /// Activity to process step per bucket.
    pub process_steps: ProcessStepMap,
    /// Stage-advancement targets.
    pub targets: TargetTable,
    /// Step ranks per bucket and policy.
    pub ranks: RankDictionary,
}

/// Moved / not-moved event snapshot taken right after segmentation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentSnapshot {
    /// Candidates with a job transfer.
    pub moved: Vec<SegmentRecord>,
    /// Every other candidate.
    pub not_moved: Vec<SegmentRecord>,
}

/// Everything one run produces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineOutput {
    /// Golden source rows.
    pub golden_source: Vec<GoldenSourceRecord>,
    /// Rows of applications that failed the consistency check.
    pub manual_review: Vec<ManualReviewRecord>,
    /// Rows without a process step.
    pub unmapped_steps: Vec<UnmappedStepRecord>,
    /// Golden rows without a rank.
    pub unranked_steps: Vec<UnrankedStepRecord>,
    /// Moved / not-moved snapshot.
    pub segments: SegmentSnapshot,
    /// Counts and fingerprint of the run.
    pub summary: RunSummary,
}

/// Runs the stages in order over in-memory inputs.
///
/// The pipeline owns no I/O: loading inputs and writing outputs live in
/// [`crate::source`] and [`crate::transport`].
#[derive(Clone, Debug, Default)]
pub struct GoldenSourcePipeline {
    config: PipelineConfig,
}

impl GoldenSourcePipeline {
    /// Pipeline with explicit business constants.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Business constants in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage. Only structural problems are errors; business-rule
    /// findings come back as columns and side tables.
    pub fn run(&self, inputs: &PipelineInputs) -> PipelineResult<PipelineOutput> {
        if inputs.events.is_empty() {
            return Err(PipelineError::EmptyInput {
                table: ACTIVITY_REPORT.to_string(),
            });
        }
        let mut summary = RunSummary::new(inputs.events.len());

        let enriched = enrich_events(&inputs.events, &inputs.activity_dictionary, &inputs.hr_roster)?;
        summary.record_stage("enriched", enriched.len());

        let segments = segment_candidates(&enriched);
        summary.record_stage("moved_to_job", segments.moved.len());
        summary.record_stage("not_moved_to_job", segments.not_moved.len());
        let snapshot = SegmentSnapshot {
            moved: segments.moved.iter().map(SegmentRecord::from).collect(),
            not_moved: segments.not_moved.iter().map(SegmentRecord::from).collect(),
        };

        let mut applications = resolve_not_moved(segments.not_moved);
        let moved = resolve_moved(segments.moved);
        summary.record_stage("moved_first_touch", moved.first_touch.len());
        summary.record_stage("moved_mid_process", moved.mid_process.len());
        applications.extend(moved.into_rows());
        summary.record_stage("applications", applications.len());

        let activities = rollup_activities(applications, &self.config);
        summary.record_stage("activity_rollup", activities.len());

        let routing = route_and_map_steps(activities, &inputs.process_steps);
        summary.record_stage("manual_review", routing.manual_review.len());
        summary.record_stage("unmapped_steps", routing.unmapped.len());
        summary.record_stage("mapped_steps", routing.mapped_before_rollup);
        summary.record_stage("step_rollup", routing.mapped.len());

        let timeline = build_timeline(routing.mapped, &inputs.targets, &self.config);
        let ranking = rank_and_validate(timeline, &inputs.ranks, &self.config);

        let golden_source: Vec<GoldenSourceRecord> =
            ranking.rows.iter().map(GoldenSourceRecord::from).collect();
        let unranked_steps: Vec<UnrankedStepRecord> =
            ranking.unranked().map(UnrankedStepRecord::from).collect();
        let manual_review: Vec<ManualReviewRecord> =
            routing.manual_review.iter().map(ManualReviewRecord::from).collect();
        let unmapped_steps: Vec<UnmappedStepRecord> =
            routing.unmapped.iter().map(UnmappedStepRecord::from).collect();
        summary.record_stage("golden_source", golden_source.len());

        let manual_review_applications: BTreeSet<&str> = manual_review
            .iter()
            .map(|row| row.unique_id.as_str())
            .collect();
        let golden_applications: BTreeSet<&str> = golden_source
            .iter()
            .map(|row| row.unique_id.as_str())
            .collect();

        summary.rows_with_process_step = routing.mapped_before_rollup;
        summary.rows_without_process_step = unmapped_steps.len();
        summary.golden_rows = golden_source.len();
        summary.manual_review_rows = manual_review.len();
        summary.manual_review_applications = manual_review_applications.len();
        summary.unmapped_rows = unmapped_steps.len();
        summary.unranked_rows = unranked_steps.len();
        summary.applications = golden_applications.len();
        summary.red_flag_applications = ranking.red_flag_applications.len();
        summary.fingerprint = table_fingerprint(&golden_source)?;
        summary.log();

        info!(
            "[golden_source:pipeline] run complete: {} golden rows",
            golden_source.len()
        );
        Ok(PipelineOutput {
            golden_source,
            manual_review,
            unmapped_steps,
            unranked_steps,
            segments: snapshot,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookups::ActivityDefinition;

    fn raw(candidate: &str, activity: &str, at: &str) -> RawEvent {
        RawEvent {
            actor: "Recruiter".to_string(),
            activity: activity.to_string(),
            candidate: candidate.to_string(),
            job: "Data Analytics-Analyst-Cairo".to_string(),
            creation_time: at.to_string(),
        }
    }

    fn inputs(events: Vec<RawEvent>) -> PipelineInputs {
        let mut inputs = PipelineInputs {
            events,
            ..PipelineInputs::default()
        };
        for activity in ["Applied", "Hired"] {
            inputs.activity_dictionary.insert(
                activity,
                ActivityDefinition {
                    canonical: activity.to_string(),
                    is_step: Some(true),
                    explanation: None,
                },
            );
            inputs
                .process_steps
                .insert("Data Analytics", activity, activity);
        }
        inputs
    }

    #[test]
    fn empty_report_is_rejected() {
        let err = GoldenSourcePipeline::default()
            .run(&PipelineInputs::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput { .. }));
    }

    #[test]
    fn report_without_steps_yields_empty_golden_source() {
        let output = GoldenSourcePipeline::default()
            .run(&inputs(vec![raw("C1", "Viewed", "2022-01-01 09:00:00")]))
            .unwrap();
        assert!(output.golden_source.is_empty());
        assert_eq!(output.summary.source_rows, 1);
        assert_eq!(output.summary.stages["enriched"].rows, 0);
    }

    #[test]
    fn simple_hire_flows_to_golden_source() {
        let output = GoldenSourcePipeline::default()
            .run(&inputs(vec![
                raw("C1", "Applied", "2022-01-01 09:00:00"),
                raw("C1", "Hired", "2022-01-03 09:00:00"),
            ]))
            .unwrap();
        assert_eq!(output.golden_source.len(), 2);
        assert_eq!(output.summary.applications, 1);
        let last = &output.golden_source[1];
        assert_eq!(last.unique_id, "C1_Data Analytics-Analyst-Cairo_1");
        assert_eq!(last.id_is_hired, 1);
        assert_eq!(last.cumulative_time_diff_in_days, 2.0);
        assert_eq!(last.stage_advancement, "Applied ==> Hired");
        assert_eq!(output.unranked_steps.len(), 2);
        assert_eq!(output.segments.not_moved.len(), 2);
    }
}
