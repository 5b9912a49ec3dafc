//! Attempt counters and per-application audit statistics.

use std::collections::HashMap;

use crate::constants::activities::{DISQUALIFY_ACTIVITIES, ENTRANCE_ACTIVITIES};
use crate::data::{ApplicationEvent, TrackedEvent};
use crate::grouping::{cumulative_count, duplicated_mask, ensure_sorted_by, group_ranges, lagged};

/// Grouping used when computing attempt counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CleaningKey {
    /// One group per candidate and original job label.
    TempId,
    /// One group per candidate across all job labels.
    Candidate,
}

impl CleaningKey {
    fn of<'a>(&self, row: &'a TrackedEvent) -> &'a str {
        match self {
            CleaningKey::TempId => &row.temp_id,
            CleaningKey::Candidate => &row.event.candidate,
        }
    }
}

/// Compute attempt counters within each `key` group.
///
/// Output is ordered by `(group, creation time)`. Within a group:
/// - `simultaneous` marks every row sharing its timestamp with another row;
/// - `entrance_count` counts entrance activities up to and including the row;
/// - `disqualify_count` is `1 +` the disqualifications strictly before the row;
/// - `app_count_delta = entrance_count - disqualify_count`.
pub fn shared_cleaning(mut rows: Vec<TrackedEvent>, key: CleaningKey) -> Vec<TrackedEvent> {
    ensure_sorted_by(&mut rows, "cleaning", |row| {
        (key.of(row).to_string(), row.event.created_at, row.event.seq)
    });

    for range in group_ranges(&rows, |row| key.of(row).to_string()) {
        let group = &mut rows[range];
        let times: Vec<_> = group.iter().map(|row| row.event.created_at).collect();
        let simultaneous = duplicated_mask(&times);
        let entrances = cumulative_count(
            group
                .iter()
                .map(|row| ENTRANCE_ACTIVITIES.contains(&row.event.activity.as_str())),
        );
        let disqualifications = cumulative_count(
            group
                .iter()
                .map(|row| DISQUALIFY_ACTIVITIES.contains(&row.event.activity.as_str())),
        );
        let prior_disqualifications = lagged(&disqualifications, 0);

        for (idx, row) in group.iter_mut().enumerate() {
            let disqualify_count = 1 + prior_disqualifications[idx];
            row.counters.simultaneous = simultaneous[idx];
            row.counters.entrance_count = entrances[idx];
            row.counters.disqualify_count = disqualify_count;
            row.counters.app_count_delta = i64::from(entrances[idx]) - i64::from(disqualify_count);
        }
    }
    rows
}

/// Disqualification consistency check over one application.
///
/// When the summed deltas are non-zero, the summed disqualify counts must be
/// an exact multiple of them. A zero sum always passes.
pub fn disqualification_consistent(disqualify_sum: i64, delta_sum: i64) -> bool {
    delta_sum == 0 || disqualify_sum % delta_sum == 0
}

/// Fill the per-application audit for rows that already carry a `unique_id`.
///
/// Output is ordered by `(unique_id, creation time)`; each application gets
/// exactly one first row and one last row.
pub fn audit_applications(mut rows: Vec<ApplicationEvent>) -> Vec<ApplicationEvent> {
    ensure_sorted_by(&mut rows, "audit", |row| {
        (row.unique_id.clone(), row.created_at(), row.seq())
    });

    for range in group_ranges(&rows, |row| row.unique_id.clone()) {
        let group = &mut rows[range];
        let delta_sum: i64 = group
            .iter()
            .map(|row| row.tracked.counters.app_count_delta)
            .sum();
        let disqualify_sum: i64 = group
            .iter()
            .map(|row| i64::from(row.tracked.counters.disqualify_count))
            .sum();
        let disqualified_ok = disqualification_consistent(disqualify_sum, delta_sum);

        let mut replicates: HashMap<String, usize> = HashMap::new();
        for row in group.iter() {
            *replicates.entry(row.activity().to_string()).or_default() += 1;
        }
        let distinct_activity_count = replicates.len();
        let activity_count = group.len();
        let last = activity_count - 1;

        for (idx, row) in group.iter_mut().enumerate() {
            let replicate_count = replicates
                .get(row.activity())
                .copied()
                .unwrap_or_default();
            row.audit.disqualified_ok = disqualified_ok;
            row.audit.activity_count = activity_count;
            row.audit.distinct_activity_count = distinct_activity_count;
            row.audit.replicate_count = replicate_count;
            row.audit.is_first_activity = idx == 0;
            row.audit.is_last_activity = idx == last;
        }
    }
    rows
}
