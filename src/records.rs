//! Flat, serializable rows written to the output tables.
//!
//! Boolean flags are written as `0`/`1` so the tables load the same way into
//! spreadsheets and BI tools.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::ranking::LAST_UPDATE_FORMAT;
use crate::data::{ActivityRow, PipelineStatus, RankedRow, SegmentKind, TrackedEvent};

fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// One row of the golden source: a kept process step of one application.
///
/// Working columns of the cleaning and audit stages (raw activity, original
/// job label, explanation, attempt counters, per-application activity counts,
/// first/last activity markers) are not part of this row; they stay on
/// [`ManualReviewRecord`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoldenSourceRecord {
    /// Application id `<candidate>_<new_job>_<attempt>`.
    pub unique_id: String,
    /// Candidate identifier.
    pub candidate: String,
    /// Person who performed the action.
    pub name: String,
    /// Actor is on the HR roster (`None` when the actor is not listed).
    pub name_is_hr_team: Option<u8>,
    /// Canonical activity.
    pub activity: String,
    /// Segment that produced the application.
    pub segment: SegmentKind,
    /// Candidate was referred.
    pub candidate_is_referred: u8,
    /// Candidate was moved between jobs.
    pub candidate_moved_to_job: u8,
    /// Job label after transfer resolution.
    pub new_job: String,
    /// Event timestamp.
    pub creation_time: NaiveDateTime,
    /// First job-label field.
    pub department: String,
    /// Second job-label field.
    pub job_position: String,
    /// Third job-label field.
    pub location: String,
    /// Fourth job-label field, `Core` when absent.
    pub specificities: String,
    /// Country of `location`.
    pub country: Option<String>,
    /// Department bucket used by the lookups.
    pub department_st: String,
    /// Process step of the row.
    pub process_step: String,
    /// Last step of the application.
    pub is_last_step: u8,
    /// Process step of the previous row.
    pub previous_process_step: Option<String>,
    /// Whole hours since the previous step.
    pub time_diff_in_hours: i64,
    /// Days since the previous step.
    pub time_diff_in_days: f64,
    /// Days since the first step.
    pub cumulative_time_diff_in_days: f64,
    /// Application belongs to the vanilla subset.
    pub id_is_vanilla: u8,
    /// Complement of `id_is_vanilla`.
    pub id_not_vanilla: u8,
    /// Days since the first automated test.
    pub cum_time_diff_from_autotest: f64,
    /// Days since the first HR interview.
    pub cum_time_diff_from_hr_interview: f64,
    /// Offer row of a vanilla application.
    pub autotest_subset_vanilla: u8,
    /// Offer row of a non-vanilla application.
    pub hr_interview_subset: u8,
    /// Application is still open.
    pub id_in_pipeline: u8,
    /// Application ended in a hire.
    pub id_is_hired: u8,
    /// Application ended out of process.
    pub id_is_out_of_process: u8,
    /// Timestamp of the first hire.
    pub id_hiring_date: Option<NaiveDateTime>,
    /// `<previous step> ==> <step>`.
    pub stage_advancement: String,
    /// Target name for the stage advancement.
    pub target_name: Option<String>,
    /// Target value for the stage advancement.
    pub target_value: Option<f64>,
    /// Row falls under the updated rank policy.
    pub updated: u8,
    /// Rank of the process step.
    pub rank: Option<f64>,
    /// Month the rank was last revised, as `%B-%Y`.
    pub last_update: Option<String>,
    /// Application starts with `Applied`.
    pub id_first_activity_applied: u8,
    /// Ordering verdict for the application.
    pub comment: String,
    /// Steps of the application are out of rank order.
    pub red_flag: u8,
}

impl From<&RankedRow> for GoldenSourceRecord {
    fn from(row: &RankedRow) -> Self {
        let timeline = &row.timeline;
        let activity_row = &timeline.step.activity;
        let application = &activity_row.application;
        let tracked = &application.tracked;
        let event = &tracked.event;
        let job = &activity_row.job;
        Self {
            unique_id: application.unique_id.clone(),
            candidate: event.candidate.clone(),
            name: event.actor.clone(),
            name_is_hr_team: event.is_hr.map(flag),
            activity: event.activity.clone(),
            segment: application.segment,
            candidate_is_referred: flag(tracked.candidate_is_referred),
            candidate_moved_to_job: flag(tracked.moved_to_job),
            new_job: tracked.new_job.clone(),
            creation_time: event.created_at,
            department: job.department.clone(),
            job_position: job.job_position.clone(),
            location: job.location.clone(),
            specificities: job.specificities_or_core().to_string(),
            country: activity_row.country.clone(),
            department_st: activity_row.department_bucket.clone(),
            process_step: timeline.step.process_step.clone(),
            is_last_step: flag(timeline.is_last_step),
            previous_process_step: timeline.previous_step.clone(),
            time_diff_in_hours: timeline.hours_since_previous,
            time_diff_in_days: timeline.days_since_previous,
            cumulative_time_diff_in_days: timeline.cumulative_days,
            id_is_vanilla: flag(timeline.is_vanilla),
            id_not_vanilla: flag(!timeline.is_vanilla),
            cum_time_diff_from_autotest: timeline.cum_days_from_autotest,
            cum_time_diff_from_hr_interview: timeline.cum_days_from_hr_interview,
            autotest_subset_vanilla: flag(timeline.autotest_subset_vanilla),
            hr_interview_subset: flag(timeline.hr_interview_subset),
            id_in_pipeline: flag(timeline.status == PipelineStatus::InPipeline),
            id_is_hired: flag(timeline.status == PipelineStatus::Hired),
            id_is_out_of_process: flag(timeline.status == PipelineStatus::OutOfProcess),
            id_hiring_date: timeline.hiring_date,
            stage_advancement: timeline.stage_advancement.clone(),
            target_name: timeline.target.as_ref().map(|target| target.name.clone()),
            target_value: timeline.target.as_ref().and_then(|target| target.value),
            updated: flag(row.updated),
            rank: row.rank,
            last_update: row
                .last_update
                .map(|date| date.format(LAST_UPDATE_FORMAT).to_string()),
            id_first_activity_applied: flag(row.first_step_applied),
            comment: row.comment.clone(),
            red_flag: flag(row.red_flag),
        }
    }
}

/// Row of an application that failed the disqualification consistency check.
///
/// Carries the cleaning and audit working columns so the mismatch can be traced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualReviewRecord {
    /// Application id.
    pub unique_id: String,
    /// Candidate identifier.
    pub candidate: String,
    /// Canonical activity.
    pub activity: String,
    /// Activity label as reported.
    pub raw_activity: String,
    /// Dictionary explanation of the activity.
    pub explanation: Option<String>,
    /// Event timestamp.
    pub creation_time: NaiveDateTime,
    /// Segment that produced the application.
    pub segment: SegmentKind,
    /// Job label as reported.
    pub job: String,
    /// Job label after transfer resolution.
    pub new_job: String,
    /// Department bucket.
    pub department_st: String,
    /// Another event of the group shares this timestamp.
    pub simultaneous_activity: u8,
    /// Running count of entrance activities.
    pub entrance_count: u32,
    /// `1 +` prior disqualifications.
    pub disqualify_count: u32,
    /// `entrance_count - disqualify_count`.
    pub app_count_delta: i64,
    /// Events in the application before the rollup.
    pub id_nb_act: usize,
    /// Distinct activities in the application.
    pub id_nb_distinct_act: usize,
    /// Occurrences of this activity in the application.
    pub act_replicate_count: usize,
}

impl From<&ActivityRow> for ManualReviewRecord {
    fn from(row: &ActivityRow) -> Self {
        let application = &row.application;
        let tracked = &application.tracked;
        Self {
            unique_id: application.unique_id.clone(),
            candidate: tracked.event.candidate.clone(),
            activity: tracked.event.activity.clone(),
            raw_activity: tracked.event.raw_activity.clone(),
            explanation: tracked.event.explanation.clone(),
            creation_time: tracked.event.created_at,
            segment: application.segment,
            job: tracked.event.job.clone(),
            new_job: tracked.new_job.clone(),
            department_st: row.department_bucket.clone(),
            simultaneous_activity: flag(tracked.counters.simultaneous),
            entrance_count: tracked.counters.entrance_count,
            disqualify_count: tracked.counters.disqualify_count,
            app_count_delta: tracked.counters.app_count_delta,
            id_nb_act: application.audit.activity_count,
            id_nb_distinct_act: application.audit.distinct_activity_count,
            act_replicate_count: application.audit.replicate_count,
        }
    }
}

/// Row whose activity has no process step for its department bucket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnmappedStepRecord {
    /// Application id.
    pub unique_id: String,
    /// Candidate identifier.
    pub candidate: String,
    /// Canonical activity with no step.
    pub activity: String,
    /// Activity label as reported.
    pub raw_activity: String,
    /// Department bucket searched.
    pub department_st: String,
    /// Event timestamp.
    pub creation_time: NaiveDateTime,
}

impl From<&ActivityRow> for UnmappedStepRecord {
    fn from(row: &ActivityRow) -> Self {
        let event = &row.application.tracked.event;
        Self {
            unique_id: row.application.unique_id.clone(),
            candidate: event.candidate.clone(),
            activity: event.activity.clone(),
            raw_activity: event.raw_activity.clone(),
            department_st: row.department_bucket.clone(),
            creation_time: event.created_at,
        }
    }
}

/// Golden-source row whose step has no rank for its department and policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnrankedStepRecord {
    /// Application id.
    pub unique_id: String,
    /// Department bucket searched.
    pub department_st: String,
    /// Step with no rank.
    pub process_step: String,
    /// Policy the lookup used.
    pub updated: u8,
    /// Step timestamp.
    pub creation_time: NaiveDateTime,
}

impl From<&RankedRow> for UnrankedStepRecord {
    fn from(row: &RankedRow) -> Self {
        Self {
            unique_id: row.unique_id().to_string(),
            department_st: row.timeline.department_bucket().to_string(),
            process_step: row.timeline.process_step().to_string(),
            updated: flag(row.updated),
            creation_time: row.timeline.created_at(),
        }
    }
}

/// Event snapshot of the moved / not-moved segments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Candidate identifier.
    pub candidate: String,
    /// Person who performed the action.
    pub name: String,
    /// Canonical activity.
    pub activity: String,
    /// Activity label as reported.
    pub raw_activity: String,
    /// Job label as reported.
    pub job: String,
    /// Event timestamp.
    pub creation_time: NaiveDateTime,
    /// `<candidate>_<job>`.
    pub temp_id: String,
    /// Candidate was referred.
    pub candidate_is_referred: u8,
    /// Candidate was moved between jobs.
    pub candidate_moved_to_job: u8,
}

impl From<&TrackedEvent> for SegmentRecord {
    fn from(row: &TrackedEvent) -> Self {
        Self {
            candidate: row.event.candidate.clone(),
            name: row.event.actor.clone(),
            activity: row.event.activity.clone(),
            raw_activity: row.event.raw_activity.clone(),
            job: row.event.job.clone(),
            creation_time: row.event.created_at,
            temp_id: row.temp_id.clone(),
            candidate_is_referred: flag(row.candidate_is_referred),
            candidate_moved_to_job: flag(row.moved_to_job),
        }
    }
}
