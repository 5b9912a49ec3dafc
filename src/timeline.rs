//! Per-application elapsed time, status, stage advancement and targets.

use tracing::info;

use crate::config::PipelineConfig;
use crate::constants::steps::{
    AUTOMATED_TEST, HIRED, HR_INTERVIEW, OFFER, OUT_OF_PROCESS, STAGE_ADVANCEMENT_SEPARATOR,
};
use crate::data::{PipelineStatus, StepRow, TimelineRow};
use crate::grouping::{ensure_sorted_by, group_ranges, lagged};
use crate::lookups::TargetTable;
use crate::utils::round_to;

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Status read from an application's last kept step.
pub fn status_from_last_step(step: &str) -> PipelineStatus {
    match step {
        HIRED => PipelineStatus::Hired,
        OUT_OF_PROCESS => PipelineStatus::OutOfProcess,
        _ => PipelineStatus::InPipeline,
    }
}

/// `<previous step> ==> <step>`; the previous side is empty on the first row.
pub fn stage_advancement(previous: Option<&str>, step: &str) -> String {
    format!(
        "{}{STAGE_ADVANCEMENT_SEPARATOR}{step}",
        previous.unwrap_or_default()
    )
}

/// Compute the timeline columns for every application.
///
/// Within an application rows are chronological; `days_since_previous` is
/// rounded to 2 decimals before accumulating, and both deltas are 0 on the
/// first row. Vanilla applications measure cumulative time from their first
/// `Automated test` step, others from their first `HR Interview` step.
pub fn build_timeline(
    mut rows: Vec<StepRow>,
    targets: &TargetTable,
    config: &PipelineConfig,
) -> Vec<TimelineRow> {
    ensure_sorted_by(&mut rows, "timeline", |row| {
        (row.unique_id().to_string(), row.created_at(), row.seq())
    });

    let ranges = group_ranges(&rows, |row| row.unique_id().to_string());
    let mut timeline = Vec::with_capacity(rows.len());
    let mut applications = 0usize;
    let mut targeted = 0usize;
    let mut rows = rows.into_iter();

    for range in ranges {
        applications += 1;
        let group: Vec<StepRow> = rows.by_ref().take(range.len()).collect();
        let steps: Vec<Option<String>> = group
            .iter()
            .map(|row| Some(row.process_step.clone()))
            .collect();
        let previous_steps = lagged(&steps, None);

        let mut hours = Vec::with_capacity(group.len());
        let mut days = Vec::with_capacity(group.len());
        let mut cumulative = Vec::with_capacity(group.len());
        let mut running = 0.0f64;
        for (idx, row) in group.iter().enumerate() {
            let (delta_hours, delta_days) = match idx.checked_sub(1).map(|prev| &group[prev]) {
                Some(previous) => {
                    let elapsed = row.created_at() - previous.created_at();
                    let seconds = elapsed.num_milliseconds() as f64 / 1_000.0;
                    (
                        elapsed.num_seconds().div_euclid(SECONDS_PER_HOUR),
                        round_to(seconds / SECONDS_PER_DAY, 2),
                    )
                }
                None => (0, 0.0),
            };
            running = round_to(running + delta_days, 2);
            hours.push(delta_hours);
            days.push(delta_days);
            cumulative.push(running);
        }

        let Some(last) = group.last() else {
            continue;
        };
        let status = status_from_last_step(&last.process_step);
        let hiring_date = group
            .iter()
            .find(|row| row.process_step == HIRED)
            .map(|row| row.created_at());

        let first = &group[0].activity;
        let is_vanilla = config.is_vanilla(
            &first.department_bucket,
            &first.job.job_position,
            first.job.specificities.as_deref(),
        );
        let anchor_step = if is_vanilla { AUTOMATED_TEST } else { HR_INTERVIEW };
        let anchor = group
            .iter()
            .position(|row| row.process_step == anchor_step)
            .map(|idx| cumulative[idx]);
        let last_idx = group.len() - 1;

        for (idx, row) in group.into_iter().enumerate() {
            let from_anchor = anchor
                .map(|start| round_to((cumulative[idx] - start).max(0.0), 2))
                .unwrap_or(0.0);
            let is_offer = row.process_step == OFFER;
            let previous_step = previous_steps[idx].clone();
            let advancement = stage_advancement(previous_step.as_deref(), &row.process_step);
            let target = targets
                .lookup(&row.activity.department_bucket, &advancement)
                .cloned();
            if target.is_some() {
                targeted += 1;
            }
            timeline.push(TimelineRow {
                is_last_step: idx == last_idx,
                previous_step,
                hours_since_previous: hours[idx],
                days_since_previous: days[idx],
                cumulative_days: cumulative[idx],
                status,
                hiring_date,
                stage_advancement: advancement,
                target,
                is_vanilla,
                cum_days_from_autotest: if is_vanilla { from_anchor } else { 0.0 },
                cum_days_from_hr_interview: if is_vanilla { 0.0 } else { from_anchor },
                autotest_subset_vanilla: is_vanilla && is_offer,
                hr_interview_subset: !is_vanilla && is_offer,
                step: row,
            });
        }
    }

    info!(
        "[golden_source:timeline] {} applications, {} rows, {} rows matched a target",
        applications,
        timeline.len(),
        targeted
    );
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        ActivityRow, ApplicationAudit, ApplicationEvent, AttemptCounters, EnrichedEvent, JobLabel,
        SegmentKind, TrackedEvent,
    };
    use crate::lookups::StageTarget;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 8, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn step_row(seq: usize, unique_id: &str, job: &str, step: &str, created_at: NaiveDateTime) -> StepRow {
        let config = PipelineConfig::default();
        let tracked = TrackedEvent {
            event: EnrichedEvent {
                seq,
                actor: "Recruiter".to_string(),
                raw_activity: step.to_lowercase(),
                candidate: "C1".to_string(),
                job: job.to_string(),
                created_at,
                activity: step.to_lowercase(),
                is_step: Some(true),
                explanation: None,
                is_hr: None,
            },
            candidate_is_referred: false,
            moved_to_job: false,
            temp_id: format!("C1_{job}"),
            new_job: job.to_string(),
            counters: AttemptCounters::default(),
        };
        let mut application = ApplicationEvent::new(tracked, unique_id.to_string(), SegmentKind::NotMoved);
        application.audit = ApplicationAudit {
            disqualified_ok: true,
            ..ApplicationAudit::default()
        };
        let label = JobLabel::parse(job);
        StepRow {
            activity: ActivityRow {
                country: config.country_for(&label.location),
                department_bucket: config.department_bucket(&label.department),
                job: label,
                application,
            },
            process_step: step.to_string(),
        }
    }

    #[test]
    fn vanilla_time_is_measured_from_automated_test() {
        let job = "Business Research-Research Analyst-Cairo";
        let rows = vec![
            step_row(0, "A", job, "Applied", at(1, 9)),
            step_row(1, "A", job, "Automated test", at(2, 9)),
            step_row(2, "A", job, "Offer", at(5, 9)),
        ];
        let timeline = build_timeline(rows, &TargetTable::new(), &PipelineConfig::default());

        let cumulative: Vec<f64> = timeline.iter().map(|row| row.cumulative_days).collect();
        assert_eq!(cumulative, vec![0.0, 1.0, 4.0]);
        let from_test: Vec<f64> = timeline.iter().map(|row| row.cum_days_from_autotest).collect();
        assert_eq!(from_test, vec![0.0, 0.0, 3.0]);
        assert!(timeline.iter().all(|row| row.is_vanilla));
        assert!(timeline[2].autotest_subset_vanilla);
        assert!(!timeline[1].autotest_subset_vanilla);
        assert!(timeline.iter().all(|row| row.cum_days_from_hr_interview == 0.0));
    }

    #[test]
    fn non_vanilla_time_is_measured_from_hr_interview() {
        let job = "Data Analytics-Analyst-Cairo";
        let rows = vec![
            step_row(0, "A", job, "Applied", at(1, 9)),
            step_row(1, "A", job, "HR Interview", at(3, 9)),
            step_row(2, "A", job, "Offer", at(4, 21)),
            step_row(3, "A", job, "Hired", at(6, 9)),
        ];
        let timeline = build_timeline(rows, &TargetTable::new(), &PipelineConfig::default());
        let from_hr: Vec<f64> = timeline
            .iter()
            .map(|row| row.cum_days_from_hr_interview)
            .collect();
        assert_eq!(from_hr, vec![0.0, 0.0, 1.5, 3.0]);
        assert!(timeline[2].hr_interview_subset);
        assert_eq!(timeline[2].hours_since_previous, 36);
        assert!(timeline.iter().all(|row| row.status == PipelineStatus::Hired));
        assert!(timeline.iter().all(|row| row.hiring_date == Some(at(6, 9))));
    }

    #[test]
    fn advancement_labels_and_targets() {
        let job = "Data Analytics-Analyst-Cairo";
        let mut targets = TargetTable::new();
        targets.insert(
            "Data Analytics",
            "applied ==> hr interview",
            StageTarget {
                name: "Screening".to_string(),
                value: Some(2.0),
            },
        );
        let rows = vec![
            step_row(0, "A", job, "Applied", at(1, 9)),
            step_row(1, "A", job, "HR Interview", at(3, 9)),
        ];
        let timeline = build_timeline(rows, &targets, &PipelineConfig::default());
        assert_eq!(timeline[0].stage_advancement, " ==> Applied");
        assert_eq!(timeline[0].previous_step, None);
        assert_eq!(timeline[1].stage_advancement, "Applied ==> HR Interview");
        assert_eq!(timeline[1].previous_step.as_deref(), Some("Applied"));
        assert_eq!(timeline[1].target.as_ref().map(|t| t.name.as_str()), Some("Screening"));
        assert!(timeline[0].target.is_none());
    }

    #[test]
    fn status_and_last_flag_per_application() {
        let job = "Data Analytics-Analyst-Cairo";
        let rows = vec![
            step_row(0, "A", job, "Applied", at(1, 9)),
            step_row(1, "A", job, "Out of Process", at(2, 9)),
            step_row(2, "B", job, "Applied", at(1, 9)),
        ];
        let timeline = build_timeline(rows, &TargetTable::new(), &PipelineConfig::default());
        assert_eq!(timeline[0].status, PipelineStatus::OutOfProcess);
        assert_eq!(timeline[2].status, PipelineStatus::InPipeline);
        let lasts: Vec<bool> = timeline.iter().map(|row| row.is_last_step).collect();
        assert_eq!(lasts, vec![false, true, true]);
        assert_eq!(timeline[0].hiring_date, None);
    }

    #[test]
    fn tied_timestamps_have_zero_delta() {
        let job = "Data Analytics-Analyst-Cairo";
        let rows = vec![
            step_row(0, "A", job, "Applied", at(1, 9)),
            step_row(1, "A", job, "HR Interview", at(1, 9)),
        ];
        let timeline = build_timeline(rows, &TargetTable::new(), &PipelineConfig::default());
        assert_eq!(timeline[1].days_since_previous, 0.0);
        assert_eq!(timeline[1].cumulative_days, 0.0);
    }
}
