//! Expected-order validation of each application's process steps.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::constants::ranking::{
    ACTIONS_NOT_IN_RIGHT_ORDER, FIRST_PROCESS_NOT_APPLIED, OK_MESSAGE,
};
use crate::constants::steps::APPLIED;
use crate::data::{RankedRow, TimelineRow};
use crate::grouping::{ensure_sorted_by, group_ranges};
use crate::lookups::RankDictionary;
use crate::utils::normalize_label;

/// Ranked rows plus the applications that failed validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankingOutcome {
    /// Ranked rows in golden order.
    pub rows: Vec<RankedRow>,
    /// Applications whose known ranks decrease at least once.
    pub red_flag_applications: BTreeSet<String>,
    /// Applications whose first kept step is not `Applied`.
    pub not_applied_first: BTreeSet<String>,
}

impl RankingOutcome {
    /// Rows whose step had no rank for their department and policy version.
    pub fn unranked(&self) -> impl Iterator<Item = &RankedRow> {
        self.rows.iter().filter(|row| row.rank.is_none())
    }
}

/// True when the known ranks never decrease. Missing ranks are skipped.
pub fn ranks_non_decreasing(ranks: &[Option<f64>]) -> bool {
    let known: Vec<f64> = ranks.iter().flatten().copied().collect();
    known.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Look up each step's rank and flag applications whose steps run out of order.
///
/// The rank policy version is chosen per row from the department cutover.
/// Every row of a failing application carries `red_flag` and the ordering
/// comment, unless its first step is not `Applied`, which takes precedence in
/// the comment.
pub fn rank_and_validate(
    mut rows: Vec<TimelineRow>,
    ranks: &RankDictionary,
    config: &PipelineConfig,
) -> RankingOutcome {
    ensure_sorted_by(&mut rows, "ranking", |row| {
        (row.unique_id().to_string(), row.created_at(), row.step.seq())
    });

    let ranges = group_ranges(&rows, |row| row.unique_id().to_string());
    let mut outcome = RankingOutcome::default();
    let mut rows = rows.into_iter();

    for range in ranges {
        let group: Vec<TimelineRow> = rows.by_ref().take(range.len()).collect();
        let Some(first) = group.first() else {
            continue;
        };
        let unique_id = first.unique_id().to_string();
        let first_step_applied = normalize_label(first.process_step()) == APPLIED;

        let lookups: Vec<(bool, Option<f64>, Option<NaiveDate>)> = group
            .iter()
            .map(|row| {
                let updated = config.policy_updated(row.department_bucket(), row.created_at());
                let entry = ranks.lookup(row.department_bucket(), row.process_step(), updated);
                (
                    updated,
                    entry.map(|entry| entry.rank),
                    entry.and_then(|entry| entry.last_update),
                )
            })
            .collect();
        let rank_values: Vec<Option<f64>> = lookups.iter().map(|(_, rank, _)| *rank).collect();
        let ordered = ranks_non_decreasing(&rank_values);

        let comment = if !first_step_applied {
            FIRST_PROCESS_NOT_APPLIED
        } else if !ordered {
            ACTIONS_NOT_IN_RIGHT_ORDER
        } else {
            OK_MESSAGE
        };
        if !ordered {
            outcome.red_flag_applications.insert(unique_id.clone());
        }
        if !first_step_applied {
            outcome.not_applied_first.insert(unique_id.clone());
        }

        for (timeline, (updated, rank, last_update)) in group.into_iter().zip(lookups) {
            outcome.rows.push(RankedRow {
                timeline,
                updated,
                rank,
                last_update,
                first_step_applied,
                comment: comment.to_string(),
                red_flag: !ordered,
            });
        }
    }

    let unranked = outcome.unranked().count();
    if unranked > 0 {
        warn!(
            "[golden_source:ranking] {} rows have no rank for their department and policy",
            unranked
        );
    }
    info!(
        "[golden_source:ranking] {} applications flagged out of order, {} not starting with Applied",
        outcome.red_flag_applications.len(),
        outcome.not_applied_first.len()
    );
    outcome
}
