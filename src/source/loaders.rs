//! Typed conversions from validated tables to pipeline inputs.

use tracing::info;

use crate::constants::tables::{
    ACTIVITY_DICTIONARY_COLS, ACTIVITY_REPORT_COLS, HR_NAMES_COLS, PROCESS_STEP_COLS,
    RANKING_COLS, RANKING_LAST_UPDATE_COL, TARGETS_COLS,
};
use crate::data::RawEvent;
use crate::errors::{PipelineError, PipelineResult};
use crate::lookups::{
    ActivityDefinition, ActivityDictionary, HrRoster, ProcessStepMap, RankDictionary, RankEntry,
    StageTarget, TargetTable,
};
use crate::utils::{non_blank, parse_flag, parse_timestamp};

use super::table::Table;

fn invalid(table: &Table, column: &str, row: usize, value: &str) -> PipelineError {
    PipelineError::InvalidValue {
        table: table.name().to_string(),
        column: column.to_string(),
        row: row + 1,
        value: value.to_string(),
    }
}

fn flag_cell(table: &Table, column: &str, row: usize, value: &str) -> PipelineResult<Option<bool>> {
    parse_flag(value).map_err(|bad| invalid(table, column, row, &bad))
}

fn number_cell(table: &Table, column: &str, row: usize, value: &str) -> PipelineResult<Option<f64>> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| invalid(table, column, row, value))
}

/// Activity report rows. Creation times stay unparsed until enrichment.
pub fn events_from_table(table: &Table) -> PipelineResult<Vec<RawEvent>> {
    let columns = table.columns(&ACTIVITY_REPORT_COLS)?;
    let [name, activity, candidate, job, creation_time] = ACTIVITY_REPORT_COLS;
    let events: Vec<RawEvent> = table
        .rows()
        .iter()
        .map(|row| RawEvent {
            actor: columns.cell(row, name).to_string(),
            activity: columns.cell(row, activity).to_string(),
            candidate: columns.cell(row, candidate).to_string(),
            job: columns.cell(row, job).to_string(),
            creation_time: columns.cell(row, creation_time).to_string(),
        })
        .collect();
    info!(
        "[golden_source:source] loaded {} activity report rows",
        events.len()
    );
    Ok(events)
}

/// Build the activity dictionary; `act_is_step` takes `1/0`, `1.0/0.0`, `true/false` or blank.
pub fn activity_dictionary_from_table(table: &Table) -> PipelineResult<ActivityDictionary> {
    let columns = table.columns(&ACTIVITY_DICTIONARY_COLS)?;
    let [raw, canonical, is_step, explanation] = ACTIVITY_DICTIONARY_COLS;
    let mut dictionary = ActivityDictionary::new();
    for (idx, row) in table.rows().iter().enumerate() {
        let definition = ActivityDefinition {
            canonical: columns.cell(row, canonical).to_string(),
            is_step: flag_cell(table, is_step, idx, columns.cell(row, is_step))?,
            explanation: non_blank(columns.cell(row, explanation)),
        };
        dictionary.insert(columns.cell(row, raw), definition);
    }
    Ok(dictionary)
}

/// Build the HR roster.
pub fn hr_roster_from_table(table: &Table) -> PipelineResult<HrRoster> {
    let columns = table.columns(&HR_NAMES_COLS)?;
    let [name, is_hr] = HR_NAMES_COLS;
    let mut roster = HrRoster::new();
    for (idx, row) in table.rows().iter().enumerate() {
        let flag = flag_cell(table, is_hr, idx, columns.cell(row, is_hr))?;
        roster.insert(columns.cell(row, name), flag);
    }
    Ok(roster)
}

/// Build the process-step map. Blank steps are kept and later routed as unmapped.
pub fn process_steps_from_table(table: &Table) -> PipelineResult<ProcessStepMap> {
    let columns = table.columns(&PROCESS_STEP_COLS)?;
    let [step, department, activity] = PROCESS_STEP_COLS;
    let mut steps = ProcessStepMap::new();
    for row in table.rows() {
        steps.insert(
            columns.cell(row, department),
            columns.cell(row, activity),
            columns.cell(row, step),
        );
    }
    Ok(steps)
}

/// Build the target table; `Target Value` must be numeric or blank.
pub fn targets_from_table(table: &Table) -> PipelineResult<TargetTable> {
    let columns = table.columns(&TARGETS_COLS)?;
    let [department, advancement, name, value] = TARGETS_COLS;
    let mut targets = TargetTable::new();
    for (idx, row) in table.rows().iter().enumerate() {
        let target = StageTarget {
            name: columns.cell(row, name).to_string(),
            value: number_cell(table, value, idx, columns.cell(row, value))?,
        };
        targets.insert(
            columns.cell(row, department),
            columns.cell(row, advancement),
            target,
        );
    }
    Ok(targets)
}

/// Rank rows need a policy flag and a numeric rank; `last_update` is optional.
pub fn ranks_from_table(table: &Table) -> PipelineResult<RankDictionary> {
    let columns = table.columns(&RANKING_COLS)?;
    let [department, step, updated, rank] = RANKING_COLS;
    let mut ranks = RankDictionary::new();
    for (idx, row) in table.rows().iter().enumerate() {
        let updated_raw = columns.cell(row, updated);
        let Some(updated_flag) = flag_cell(table, updated, idx, updated_raw)? else {
            return Err(invalid(table, updated, idx, updated_raw));
        };
        let rank_raw = columns.cell(row, rank);
        let Some(rank_value) = number_cell(table, rank, idx, rank_raw)? else {
            return Err(invalid(table, rank, idx, rank_raw));
        };
        let last_update = if columns.has(RANKING_LAST_UPDATE_COL) {
            let raw = columns.cell(row, RANKING_LAST_UPDATE_COL);
            if raw.is_empty() {
                None
            } else {
                let parsed = parse_timestamp(raw)
                    .ok_or_else(|| invalid(table, RANKING_LAST_UPDATE_COL, idx, raw))?;
                Some(parsed.date())
            }
        } else {
            None
        };
        ranks.insert(
            columns.cell(row, department),
            columns.cell(row, step),
            updated_flag,
            RankEntry {
                rank: rank_value,
                last_update,
            },
        );
    }
    Ok(ranks)
}
