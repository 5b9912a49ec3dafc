//! Candidate-level flags, revert correction and the moved / not-moved split.

use std::collections::HashSet;

use tracing::info;

use crate::constants::activities::{
    AUTO_DISQUALIFIED, DISQUALIFIED, MOVED_TO_JOB_POSITION, OUT_OF_PROCESS_AND_BACK,
    REFERRED_A_CANDIDATE, REVERTED,
};
use crate::data::{AttemptCounters, EnrichedEvent, TrackedEvent};
use crate::grouping::{ensure_sorted_by, group_ranges};
use crate::metrics::percent_of;

/// Enriched events split by whether the candidate ever moved between jobs.
///
/// Both halves are ordered by `(candidate, creation time)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segments {
    /// Events of candidates with a transfer.
    pub moved: Vec<TrackedEvent>,
    /// Events of every other candidate.
    pub not_moved: Vec<TrackedEvent>,
}

/// `<candidate>_<job label>`.
pub fn temp_id(candidate: &str, job: &str) -> String {
    format!("{candidate}_{job}")
}

/// Flag referrals, undo reverted disqualifications and split by job transfer.
///
/// Referral events only mark the candidate; they are removed from the stream.
/// A `reverted` event rewrites the immediately preceding event of the same
/// candidate to `out of process and back` when that event was a
/// disqualification. The `reverted` event itself stays.
pub fn segment_candidates(events: &[EnrichedEvent]) -> Segments {
    let referred: HashSet<&str> = events
        .iter()
        .filter(|event| event.activity == REFERRED_A_CANDIDATE)
        .map(|event| event.candidate.as_str())
        .collect();

    let mut kept: Vec<EnrichedEvent> = events
        .iter()
        .filter(|event| event.activity != REFERRED_A_CANDIDATE)
        .cloned()
        .collect();
    ensure_sorted_by(&mut kept, "segmentation", |event| {
        (event.candidate.clone(), event.created_at, event.seq)
    });

    for range in group_ranges(&kept, |event| event.candidate.clone()) {
        undo_reverted_disqualifications(&mut kept[range]);
    }

    let moved_candidates: HashSet<String> = kept
        .iter()
        .filter(|event| event.activity.contains(MOVED_TO_JOB_POSITION))
        .map(|event| event.candidate.clone())
        .collect();

    let mut segments = Segments::default();
    for event in kept {
        let moved_to_job = moved_candidates.contains(&event.candidate);
        let tracked = TrackedEvent {
            candidate_is_referred: referred.contains(event.candidate.as_str()),
            moved_to_job,
            temp_id: temp_id(&event.candidate, &event.job),
            new_job: event.job.clone(),
            counters: AttemptCounters::default(),
            event,
        };
        if moved_to_job {
            segments.moved.push(tracked);
        } else {
            segments.not_moved.push(tracked);
        }
    }

    let total = segments.moved.len() + segments.not_moved.len();
    info!(
        "[golden_source:segmentation] {} referred candidates; {} moved candidates",
        referred.len(),
        moved_candidates.len()
    );
    info!(
        "[golden_source:segmentation] moved rows {} ({:.2}%), not-moved rows {} ({:.2}%)",
        segments.moved.len(),
        percent_of(segments.moved.len(), total),
        segments.not_moved.len(),
        percent_of(segments.not_moved.len(), total)
    );
    segments
}

/// Left-to-right pass over one candidate's chronological events.
fn undo_reverted_disqualifications(group: &mut [EnrichedEvent]) {
    for idx in 1..group.len() {
        let previous_is_disqualification =
            group[idx - 1].activity == DISQUALIFIED || group[idx - 1].activity == AUTO_DISQUALIFIED;
        if group[idx].activity == REVERTED && previous_is_disqualification {
            group[idx - 1].activity = OUT_OF_PROCESS_AND_BACK.to_string();
        }
    }
}
