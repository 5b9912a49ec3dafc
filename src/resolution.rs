//! Resolve each event to an application id.
//!
//! Not-moved candidates keep their job label. Moved candidates fall into two
//! cases: a transfer that is the candidate's very first event acts as an
//! application to the target job, while a transfer in the middle of a process
//! carries the whole attempt over to the job the attempt ended on.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::info;

use crate::cleaning::{CleaningKey, audit_applications, shared_cleaning};
use crate::constants::activities::{APPLIED_WITH_MOVED_TO_JOB_POSITION, MOVED_TO_JOB_POSITION};
use crate::data::{ApplicationEvent, SegmentKind, TrackedEvent};
use crate::grouping::{ensure_sorted_by, group_ranges};
use crate::types::ApplicationId;

/// `<candidate>_<resolved job>_<disqualify count>`.
pub fn application_id(candidate: &str, job: &str, disqualify_count: u32) -> ApplicationId {
    format!("{candidate}_{job}_{disqualify_count}")
}

/// Applications built from the moved segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovedResolution {
    /// Applications opened by a transfer.
    pub first_touch: Vec<ApplicationEvent>,
    /// Applications moved after they started.
    pub mid_process: Vec<ApplicationEvent>,
}

impl MovedResolution {
    /// Rows across both halves.
    pub fn len(&self) -> usize {
        self.first_touch.len() + self.mid_process.len()
    }

    /// True when neither half has rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First-touch rows followed by mid-process rows.
    pub fn into_rows(self) -> Vec<ApplicationEvent> {
        let mut rows = self.first_touch;
        rows.extend(self.mid_process);
        rows
    }
}

/// Counters keyed by `temp_id`; the job label is final.
pub fn resolve_not_moved(rows: Vec<TrackedEvent>) -> Vec<ApplicationEvent> {
    let applications: Vec<ApplicationEvent> = shared_cleaning(rows, CleaningKey::TempId)
        .into_iter()
        .map(|row| {
            let unique_id = application_id(
                &row.event.candidate,
                &row.new_job,
                row.counters.disqualify_count,
            );
            ApplicationEvent::new(row, unique_id, SegmentKind::NotMoved)
        })
        .collect();
    audit_applications(applications)
}

/// Split the moved segment into first-touch and mid-process candidates and
/// resolve each accordingly.
///
/// A candidate is first-touch when its single `moved to job position` event
/// is also its earliest event; that event is relabelled as an application.
pub fn resolve_moved(rows: Vec<TrackedEvent>) -> MovedResolution {
    let first_touch_candidates = first_touch_candidates(&rows);

    let (mut first_touch, mid_process): (Vec<TrackedEvent>, Vec<TrackedEvent>) = rows
        .into_iter()
        .partition(|row| first_touch_candidates.contains_key(&row.event.candidate));
    for row in first_touch.iter_mut() {
        if first_touch_candidates.get(&row.event.candidate) == Some(&row.event.seq) {
            row.event.activity = APPLIED_WITH_MOVED_TO_JOB_POSITION.to_string();
        }
    }

    let first_touch = resolve_first_touch(first_touch);
    let mid_process = resolve_mid_process(mid_process);
    info!(
        "[golden_source:resolution] moved rows: {} first-touch, {} mid-process",
        first_touch.len(),
        mid_process.len()
    );
    MovedResolution {
        first_touch,
        mid_process,
    }
}

/// Candidate to the report position of its first-touch transfer event.
fn first_touch_candidates(rows: &[TrackedEvent]) -> HashMap<String, usize> {
    let mut earliest: HashMap<&str, NaiveDateTime> = HashMap::new();
    let mut transfers: HashMap<&str, Vec<&TrackedEvent>> = HashMap::new();
    for row in rows {
        let candidate = row.event.candidate.as_str();
        earliest
            .entry(candidate)
            .and_modify(|min| *min = (*min).min(row.event.created_at))
            .or_insert(row.event.created_at);
        if row.event.activity == MOVED_TO_JOB_POSITION {
            transfers.entry(candidate).or_default().push(row);
        }
    }

    transfers
        .into_iter()
        .filter_map(|(candidate, events)| match events.as_slice() {
            [only] if earliest.get(candidate) == Some(&only.event.created_at) => {
                Some((candidate.to_string(), only.event.seq))
            }
            _ => None,
        })
        .collect()
}

fn resolve_first_touch(rows: Vec<TrackedEvent>) -> Vec<ApplicationEvent> {
    let applications: Vec<ApplicationEvent> = shared_cleaning(rows, CleaningKey::TempId)
        .into_iter()
        .map(|mut row| {
            row.new_job = row.event.job.clone();
            let unique_id = application_id(
                &row.event.candidate,
                &row.new_job,
                row.counters.disqualify_count,
            );
            ApplicationEvent::new(row, unique_id, SegmentKind::MovedFirstTouch)
        })
        .collect();
    audit_applications(applications)
}

/// Each `(candidate, disqualify count)` attempt takes the job of its last event.
fn resolve_mid_process(rows: Vec<TrackedEvent>) -> Vec<ApplicationEvent> {
    let mut cleaned = shared_cleaning(rows, CleaningKey::Candidate);
    ensure_sorted_by(&mut cleaned, "resolution", |row| {
        (row.event.candidate.clone(), row.event.created_at, row.event.seq)
    });

    let attempts = group_ranges(&cleaned, |row| {
        (row.event.candidate.clone(), row.counters.disqualify_count)
    });
    for range in attempts {
        let group = &mut cleaned[range];
        let Some(final_job) = group.last().map(|row| row.event.job.clone()) else {
            continue;
        };
        for row in group.iter_mut() {
            row.new_job = final_job.clone();
        }
    }

    let applications: Vec<ApplicationEvent> = cleaned
        .into_iter()
        .map(|row| {
            let unique_id = application_id(
                &row.event.candidate,
                &row.new_job,
                row.counters.disqualify_count,
            );
            ApplicationEvent::new(row, unique_id, SegmentKind::MovedMidProcess)
        })
        .collect();
    audit_applications(applications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AttemptCounters, EnrichedEvent};
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 6, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn tracked(seq: usize, candidate: &str, job: &str, activity: &str, day: u32) -> TrackedEvent {
        TrackedEvent {
            event: EnrichedEvent {
                seq,
                actor: "Recruiter".to_string(),
                raw_activity: activity.to_string(),
                candidate: candidate.to_string(),
                job: job.to_string(),
                created_at: at(day),
                activity: activity.to_string(),
                is_step: Some(true),
                explanation: None,
                is_hr: None,
            },
            candidate_is_referred: false,
            moved_to_job: true,
            temp_id: format!("{candidate}_{job}"),
            new_job: job.to_string(),
            counters: AttemptCounters::default(),
        }
    }

    #[test]
    fn application_id_uses_integer_count() {
        assert_eq!(application_id("C1", "IT-Dev-Cairo", 2), "C1_IT-Dev-Cairo_2");
    }

    #[test]
    fn not_moved_rows_split_on_disqualification() {
        let job = "IT-Developer-Cairo";
        let rows = vec![
            tracked(0, "C1", job, "applied", 1),
            tracked(1, "C1", job, "disqualified", 2),
            tracked(2, "C1", job, "applied", 3),
        ];
        let resolved = resolve_not_moved(rows);
        let ids: Vec<&str> = resolved.iter().map(|row| row.unique_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "C1_IT-Developer-Cairo_1",
                "C1_IT-Developer-Cairo_1",
                "C1_IT-Developer-Cairo_2",
            ]
        );
        assert!(resolved.iter().all(|row| row.segment == SegmentKind::NotMoved));
    }

    #[test]
    fn first_touch_transfer_becomes_application() {
        let rows = vec![
            tracked(0, "C1", "IT-Tester-Cairo", "moved to job position", 1),
            tracked(1, "C1", "IT-Tester-Cairo", "hired", 4),
        ];
        let resolution = resolve_moved(rows);
        assert!(resolution.mid_process.is_empty());
        assert_eq!(resolution.first_touch.len(), 2);
        assert_eq!(
            resolution.first_touch[0].activity(),
            "applied with moved to job position"
        );
        assert_eq!(resolution.first_touch[1].activity(), "hired");
        assert!(resolution
            .first_touch
            .iter()
            .all(|row| row.unique_id == "C1_IT-Tester-Cairo_1"));
    }

    #[test]
    fn mid_process_transfer_rewrites_earlier_job() {
        let rows = vec![
            tracked(0, "C1", "IT-Developer-Cairo", "applied", 1),
            tracked(1, "C1", "IT-Tester-Cairo", "moved to job position", 2),
            tracked(2, "C1", "IT-Tester-Cairo", "hired", 3),
        ];
        let resolution = resolve_moved(rows);
        assert!(resolution.first_touch.is_empty());
        assert_eq!(resolution.mid_process.len(), 3);
        for row in &resolution.mid_process {
            assert_eq!(row.tracked.new_job, "IT-Tester-Cairo");
            assert_eq!(row.unique_id, "C1_IT-Tester-Cairo_1");
            assert_eq!(row.segment, SegmentKind::MovedMidProcess);
        }
        assert_eq!(resolution.mid_process[1].activity(), "moved to job position");
    }

    #[test]
    fn repeated_transfers_are_mid_process() {
        let rows = vec![
            tracked(0, "C1", "IT-Tester-Cairo", "moved to job position", 1),
            tracked(1, "C1", "IT-Developer-Cairo", "moved to job position", 2),
        ];
        let resolution = resolve_moved(rows);
        assert!(resolution.first_touch.is_empty());
        assert_eq!(resolution.mid_process.len(), 2);
        assert!(resolution
            .mid_process
            .iter()
            .all(|row| row.unique_id == "C1_IT-Developer-Cairo_1"));
    }

    #[test]
    fn each_attempt_takes_its_own_final_job() {
        let rows = vec![
            tracked(0, "C1", "IT-Developer-Cairo", "applied", 1),
            tracked(1, "C1", "IT-Tester-Cairo", "moved to job position", 2),
            tracked(2, "C1", "IT-Tester-Cairo", "disqualified", 3),
            tracked(3, "C1", "IT-Support-Cairo", "applied", 4),
        ];
        let resolution = resolve_moved(rows);
        let ids: Vec<&str> = resolution
            .mid_process
            .iter()
            .map(|row| row.unique_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "C1_IT-Support-Cairo_2",
                "C1_IT-Tester-Cairo_1",
                "C1_IT-Tester-Cairo_1",
                "C1_IT-Tester-Cairo_1",
            ]
        );
    }

    #[test]
    fn empty_segment_resolves_to_nothing() {
        assert!(resolve_moved(Vec::new()).is_empty());
        assert!(resolve_not_moved(Vec::new()).is_empty());
    }
}
