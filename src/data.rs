use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::job::{CORE_SPECIFICITIES, LABEL_DELIMITER};
use crate::lookups::StageTarget;
use crate::utils::non_blank;

pub use crate::types::{
    ActivityName, ApplicationId, CandidateId, Comment, DepartmentBucket, JobLabelText,
    ProcessStepName, StageAdvancement, TempId,
};

/// One activity-report row as loaded, before any parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Person who performed the action (`Name`).
    pub actor: String,
    /// Raw activity label (`Activity`).
    pub activity: String,
    /// Candidate identifier (`Candidate`).
    pub candidate: CandidateId,
    /// Job label (`Job`).
    pub job: JobLabelText,
    /// Unparsed creation time (`Creation time`).
    pub creation_time: String,
}

/// Activity-report row joined with the activity dictionary and HR roster.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedEvent {
    /// Zero-based position in the activity report; the final tie-breaker of every sort.
    pub seq: usize,
    /// Person who performed the action.
    pub actor: String,
    /// Activity label as reported.
    pub raw_activity: String,
    /// Candidate identifier.
    pub candidate: CandidateId,
    /// Job label as reported.
    pub job: JobLabelText,
    /// Parsed creation time.
    pub created_at: NaiveDateTime,
    /// Canonical activity (lowercase, trimmed; `nan` when the dictionary had no entry).
    pub activity: ActivityName,
    /// Dictionary step flag (`None` when the dictionary had no entry).
    pub is_step: Option<bool>,
    /// Dictionary explanation.
    pub explanation: Option<String>,
    /// Actor is on the HR roster (`None` when not listed).
    pub is_hr: Option<bool>,
}

/// Which moved-to-job segment produced an application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Candidate never moved between jobs.
    NotMoved,
    /// Candidate's first recorded event was their only transfer.
    MovedFirstTouch,
    /// Candidate transferred after their process had started.
    MovedMidProcess,
}

/// Counters computed by shared cleaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttemptCounters {
    /// Another event of the same group carries the same timestamp.
    pub simultaneous: bool,
    /// Running count of entrance activities, current row included.
    pub entrance_count: u32,
    /// `1 +` disqualifications strictly before the current row.
    pub disqualify_count: u32,
    /// `entrance_count - disqualify_count`.
    pub app_count_delta: i64,
}

/// Event carried through segmentation, cleaning and job resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedEvent {
    /// Underlying enriched event.
    pub event: EnrichedEvent,
    /// Candidate has a referral event anywhere in the report.
    pub candidate_is_referred: bool,
    /// Candidate has a `moved to job position` event anywhere in the report.
    pub moved_to_job: bool,
    /// `<candidate>_<job label>`.
    pub temp_id: TempId,
    /// Job label after transfer resolution (starts as the original label).
    pub new_job: JobLabelText,
    /// Attempt counters from shared cleaning.
    pub counters: AttemptCounters,
}

/// Per-application statistics computed once the application id exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplicationAudit {
    /// Outcome of the disqualification consistency check.
    pub disqualified_ok: bool,
    /// Events in the application.
    pub activity_count: usize,
    /// Distinct activities in the application.
    pub distinct_activity_count: usize,
    /// Occurrences of this row's activity within the application.
    pub replicate_count: usize,
    /// First event of the application.
    pub is_first_activity: bool,
    /// Last event of the application.
    pub is_last_activity: bool,
}

/// Event bound to a resolved application.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplicationEvent {
    /// Event with its attempt counters.
    pub tracked: TrackedEvent,
    /// `<candidate>_<new_job>_<disqualify_count>`.
    pub unique_id: ApplicationId,
    /// Segment that produced the application.
    pub segment: SegmentKind,
    /// Filled by [`crate::cleaning::audit_applications`].
    pub audit: ApplicationAudit,
}

impl ApplicationEvent {
    /// Bind an event to an application; the audit starts empty.
    pub fn new(tracked: TrackedEvent, unique_id: ApplicationId, segment: SegmentKind) -> Self {
        Self {
            tracked,
            unique_id,
            segment,
            audit: ApplicationAudit::default(),
        }
    }

    /// Canonical activity.
    pub fn activity(&self) -> &str {
        &self.tracked.event.activity
    }

    /// Event timestamp.
    pub fn created_at(&self) -> NaiveDateTime {
        self.tracked.event.created_at
    }

    /// Report position.
    pub fn seq(&self) -> usize {
        self.tracked.event.seq
    }
}

/// Parsed `<Department>-<JobPosition>-<Location>-<Specificities?>` label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLabel {
    /// Department.
    pub department: String,
    /// Job position.
    pub job_position: String,
    /// Location.
    pub location: String,
    /// `None` when the label carries no (or a blank) fourth field.
    pub specificities: Option<String>,
}

impl JobLabel {
    /// Split on the first three delimiters; the fourth field keeps any further `-`.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.splitn(4, LABEL_DELIMITER).map(str::trim);
        let department = parts.next().unwrap_or_default().to_string();
        let job_position = parts.next().unwrap_or_default().to_string();
        let location = parts.next().unwrap_or_default().to_string();
        let specificities = parts.next().and_then(non_blank);
        Self {
            department,
            job_position,
            location,
            specificities,
        }
    }

    /// Specificities, or `Core` when absent.
    pub fn specificities_or_core(&self) -> &str {
        self.specificities.as_deref().unwrap_or(CORE_SPECIFICITIES)
    }
}

/// Application event that survived the activity rollup, with its job label resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRow {
    /// Audited application event.
    pub application: ApplicationEvent,
    /// Parsed `new_job` label.
    pub job: JobLabel,
    /// Country of the label's location.
    pub country: Option<String>,
    /// Department bucket used by the lookups.
    pub department_bucket: DepartmentBucket,
}

impl ActivityRow {
    /// Application id.
    pub fn unique_id(&self) -> &str {
        &self.application.unique_id
    }

    /// Canonical activity.
    pub fn activity(&self) -> &str {
        self.application.activity()
    }

    /// Event timestamp.
    pub fn created_at(&self) -> NaiveDateTime {
        self.application.created_at()
    }

    /// Report position.
    pub fn seq(&self) -> usize {
        self.application.seq()
    }
}

/// Activity row mapped to a process step and kept by the step rollup.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRow {
    /// Activity row behind the step.
    pub activity: ActivityRow,
    /// Mapped process step.
    pub process_step: ProcessStepName,
}

impl StepRow {
    /// Application id.
    pub fn unique_id(&self) -> &str {
        self.activity.unique_id()
    }

    /// Event timestamp.
    pub fn created_at(&self) -> NaiveDateTime {
        self.activity.created_at()
    }

    /// Report position.
    pub fn seq(&self) -> usize {
        self.activity.seq()
    }
}

/// Terminal status of an application, read from its last step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// Last step is neither a hire nor an exit.
    InPipeline,
    /// Last step is `Hired`.
    Hired,
    /// Last step is `Out of Process`.
    OutOfProcess,
}

/// Step row with its elapsed-time metrics, status and target.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineRow {
    /// Step behind the row.
    pub step: StepRow,
    /// Positionally last step of the application.
    pub is_last_step: bool,
    /// Step of the previous row in the application.
    pub previous_step: Option<ProcessStepName>,
    /// Whole hours since the previous kept step (0 on the first row).
    pub hours_since_previous: i64,
    /// Days since the previous kept step, rounded to 2 decimals.
    pub days_since_previous: f64,
    /// Running sum of `days_since_previous`.
    pub cumulative_days: f64,
    /// Status read from the application's last step.
    pub status: PipelineStatus,
    /// Timestamp of the first `Hired` step.
    pub hiring_date: Option<NaiveDateTime>,
    /// `<previous step> ==> <step>`.
    pub stage_advancement: StageAdvancement,
    /// Target for `stage_advancement` in the row's bucket.
    pub target: Option<StageTarget>,
    /// Application belongs to the vanilla subset.
    pub is_vanilla: bool,
    /// Cumulative days minus those at the first automated test, floored at 0.
    pub cum_days_from_autotest: f64,
    /// Cumulative days minus those at the first HR interview, floored at 0.
    pub cum_days_from_hr_interview: f64,
    /// Offer row of a vanilla application.
    pub autotest_subset_vanilla: bool,
    /// Offer row of a non-vanilla application.
    pub hr_interview_subset: bool,
}

impl TimelineRow {
    /// Application id.
    pub fn unique_id(&self) -> &str {
        self.step.unique_id()
    }

    /// Process step.
    pub fn process_step(&self) -> &str {
        &self.step.process_step
    }

    /// Department bucket.
    pub fn department_bucket(&self) -> &str {
        &self.step.activity.department_bucket
    }

    /// Step timestamp.
    pub fn created_at(&self) -> NaiveDateTime {
        self.step.created_at()
    }
}

/// Timeline row after rank lookup and ordering validation.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedRow {
    /// Timeline row behind the rank.
    pub timeline: TimelineRow,
    /// Row falls after its department's policy cutover.
    pub updated: bool,
    /// Rank of the step under the row's policy (`None` when unranked).
    pub rank: Option<f64>,
    /// Date the rank entry was last revised.
    pub last_update: Option<NaiveDate>,
    /// Application's first step is `Applied`.
    pub first_step_applied: bool,
    /// Ordering verdict for the application.
    pub comment: Comment,
    /// Application steps are out of rank order.
    pub red_flag: bool,
}

impl RankedRow {
    /// Application id.
    pub fn unique_id(&self) -> &str {
        self.timeline.unique_id()
    }
}
