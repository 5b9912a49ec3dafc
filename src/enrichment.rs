//! Join raw activity-report rows with the activity dictionary and HR roster.

use tracing::info;

use crate::constants::activities::{UNMAPPED_ACTIVITY, UNSNOOZED, WOKEN_UP};
use crate::constants::enrichment::PLACEHOLDER_CANDIDATE;
use crate::data::{EnrichedEvent, RawEvent};
use crate::errors::{PipelineError, PipelineResult};
use crate::lookups::{ActivityDictionary, HrRoster};
use crate::metrics::percent_of;
use crate::utils::{normalize_label, parse_timestamp};

/// Enrich, filter and normalize the activity report.
///
/// Timestamps are parsed for every row before any filtering, so a malformed
/// creation time aborts the run even on rows that would later be dropped.
/// `TimestampParse` reports 1-based row numbers.
///
/// Kept rows are process steps (`Act_Is_Step == 1`) with a real candidate.
pub fn enrich_events(
    events: &[RawEvent],
    dictionary: &ActivityDictionary,
    roster: &HrRoster,
) -> PipelineResult<Vec<EnrichedEvent>> {
    let mut parsed = Vec::with_capacity(events.len());
    for (seq, raw) in events.iter().enumerate() {
        let created_at =
            parse_timestamp(&raw.creation_time).ok_or_else(|| PipelineError::TimestampParse {
                row: seq + 1,
                value: raw.creation_time.clone(),
            })?;
        parsed.push((seq, raw, created_at));
    }

    let mut step_rows = 0usize;
    let mut enriched = Vec::new();
    for (seq, raw, created_at) in parsed {
        let definition = dictionary.lookup(&raw.activity);
        if definition.and_then(|def| def.is_step) != Some(true) {
            continue;
        }
        step_rows += 1;
        if raw.candidate.is_empty() || raw.candidate == PLACEHOLDER_CANDIDATE {
            continue;
        }
        let mut activity = definition
            .map(|def| normalize_label(&def.canonical))
            .unwrap_or_else(|| UNMAPPED_ACTIVITY.to_string());
        if activity == WOKEN_UP {
            activity = UNSNOOZED.to_string();
        }
        enriched.push(EnrichedEvent {
            seq,
            actor: raw.actor.clone(),
            raw_activity: raw.activity.clone(),
            candidate: raw.candidate.clone(),
            job: raw.job.clone(),
            created_at,
            activity,
            is_step: definition.and_then(|def| def.is_step),
            explanation: definition.and_then(|def| def.explanation.clone()),
            is_hr: roster.is_hr(&raw.actor),
        });
    }

    info!(
        "[golden_source:enrichment] {} of {} rows are process steps ({:.2}%)",
        step_rows,
        events.len(),
        percent_of(step_rows, events.len())
    );
    info!(
        "[golden_source:enrichment] {} step rows carry a candidate ({:.2}%)",
        enriched.len(),
        percent_of(enriched.len(), events.len())
    );
    Ok(enriched)
}
