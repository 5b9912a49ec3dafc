//! Input adapters: delimited files to validated tables to typed pipeline inputs.
//!
//! The core stages never touch the filesystem; everything they consume is
//! assembled here into a [`PipelineInputs`].

use std::path::PathBuf;

use crate::constants::tables::{
    ACTIVITY_DICTIONARY, ACTIVITY_REPORT, HR_NAMES, PROCESS_STEPS, RANKING, TARGETS,
};
use crate::errors::PipelineResult;
use crate::pipeline::PipelineInputs;

/// Typed conversions from tables.
pub mod loaders;
/// Delimited-file reading and header validation.
pub mod table;

pub use loaders::{
    activity_dictionary_from_table, events_from_table, hr_roster_from_table,
    process_steps_from_table, ranks_from_table, targets_from_table,
};
pub use table::{Columns, Table, read_table};

/// Location of every input table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputPaths {
    /// Activity report.
    pub activity_report: PathBuf,
    /// Activity dictionary.
    pub activity_dictionary: PathBuf,
    /// HR name list.
    pub hr_names: PathBuf,
    /// Process-step map.
    pub process_steps: PathBuf,
    /// Stage targets.
    pub targets: PathBuf,
    /// Rank dictionary.
    pub ranking: PathBuf,
}

/// Read and validate every input table.
pub fn load_inputs(paths: &InputPaths) -> PipelineResult<PipelineInputs> {
    let events = events_from_table(&read_table(&paths.activity_report, ACTIVITY_REPORT)?)?;
    let activity_dictionary =
        activity_dictionary_from_table(&read_table(&paths.activity_dictionary, ACTIVITY_DICTIONARY)?)?;
    let hr_roster = hr_roster_from_table(&read_table(&paths.hr_names, HR_NAMES)?)?;
    let process_steps = process_steps_from_table(&read_table(&paths.process_steps, PROCESS_STEPS)?)?;
    let targets = targets_from_table(&read_table(&paths.targets, TARGETS)?)?;
    let ranks = ranks_from_table(&read_table(&paths.ranking, RANKING)?)?;
    Ok(PipelineInputs {
        events,
        activity_dictionary,
        hr_roster,
        process_steps,
        targets,
        ranks,
    })
}
