/// Canonical activity names the pipeline reasons about.
pub mod activities {
    /// Meta-event marking that the candidate was referred; dropped after flagging.
    pub const REFERRED_A_CANDIDATE: &str = "referred a candidate";
    /// Manual disqualification.
    pub const DISQUALIFIED: &str = "disqualified";
    /// System disqualification.
    pub const AUTO_DISQUALIFIED: &str = "auto-disqualified";
    /// Undo of the previous disqualification.
    pub const REVERTED: &str = "reverted";
    /// Replacement label for a disqualification that was later reverted.
    pub const OUT_OF_PROCESS_AND_BACK: &str = "out of process and back";
    /// Job transfer marker (matched as a substring for the candidate-level flag).
    pub const MOVED_TO_JOB_POSITION: &str = "moved to job position";
    /// Replacement label when a transfer is the candidate's first touch.
    pub const APPLIED_WITH_MOVED_TO_JOB_POSITION: &str = "applied with moved to job position";
    /// Legacy synonym rewritten to [`UNSNOOZED`].
    pub const WOKEN_UP: &str = "woken up";
    /// Canonical form of [`WOKEN_UP`].
    pub const UNSNOOZED: &str = "unsnoozed";
    /// Canonical name given to raw activities missing from the dictionary.
    pub const UNMAPPED_ACTIVITY: &str = "nan";

    /// Activities that open an application attempt.
    pub const ENTRANCE_ACTIVITIES: [&str; 3] = ["applied", "sourced", "uploaded to job"];
    /// Activities that close an application attempt.
    pub const DISQUALIFY_ACTIVITIES: [&str; 2] = [DISQUALIFIED, AUTO_DISQUALIFIED];
}

/// Process-step labels with special meaning.
pub mod steps {
    /// Normalized label expected on the first step of every application.
    pub const APPLIED: &str = "applied";
    /// Anchor step of vanilla applications.
    pub const AUTOMATED_TEST: &str = "Automated test";
    /// Anchor step of non-vanilla applications.
    pub const HR_INTERVIEW: &str = "HR Interview";
    /// Step measured against the anchor.
    pub const OFFER: &str = "Offer";
    /// Terminal step: hired.
    pub const HIRED: &str = "Hired";
    /// Terminal step: left the process.
    pub const OUT_OF_PROCESS: &str = "Out of Process";
    /// Separator between the previous and current step in a stage advancement label.
    pub const STAGE_ADVANCEMENT_SEPARATOR: &str = " ==> ";
}

/// Job-label parsing and department bucketing.
pub mod job {
    /// Separator between job label fields.
    pub const LABEL_DELIMITER: char = '-';
    /// Rendered value for a job label with no specificities.
    pub const CORE_SPECIFICITIES: &str = "Core";
    /// Bucket name shared by support departments.
    pub const SERVICE_TEAM: &str = "Service Team";
    /// Departments collapsed into [`SERVICE_TEAM`].
    pub const SERVICE_TEAM_DEPARTMENTS: [&str; 4] = ["IT", "Marketing", "Finance", "Office Management"];
    /// Department whose allow-listed roles form the vanilla subset.
    pub const VANILLA_DEPARTMENT: &str = "Business Research";
    /// Job positions in the vanilla subset.
    pub const VANILLA_POSITIONS: [&str; 3] = [
        "Research Analyst",
        "Senior Research Analyst",
        "Research Associate",
    ];
    /// Default location to country mapping.
    pub const LOCATION_COUNTRIES: [(&str, &str); 4] = [
        ("Barcelona", "Spain"),
        ("Casablanca", "Morocco"),
        ("Mexico City", "Mexico"),
        ("Cairo", "Egypt"),
    ];
}

/// Enrichment filters.
pub mod enrichment {
    /// Placeholder candidate value treated as missing identity.
    pub const PLACEHOLDER_CANDIDATE: &str = "-";
}

/// Ranking comments and policy cutovers.
pub mod ranking {
    /// Application passed every ordering check.
    pub const OK_MESSAGE: &str = "OK";
    /// Ranks decrease somewhere in the application.
    pub const ACTIONS_NOT_IN_RIGHT_ORDER: &str = "Actions not in the right order";
    /// First step is not `Applied`.
    pub const FIRST_PROCESS_NOT_APPLIED: &str = "First Process not Applied";
    /// Default per-department policy cutovers as `(department, year, month, day)`.
    pub const POLICY_CUTOVERS: [(&str, i32, u32, u32); 3] = [
        ("Business Research", 2022, 5, 1),
        ("Data Analytics", 2022, 10, 1),
        ("Business Translation", 2023, 4, 1),
    ];
    /// Output format for the rank dictionary `last_update` column.
    pub const LAST_UPDATE_FORMAT: &str = "%B-%Y";
}

/// Logical table names and their required columns.
pub mod tables {
    /// Event log.
    pub const ACTIVITY_REPORT: &str = "activity_report";
    /// Raw label dictionary.
    pub const ACTIVITY_DICTIONARY: &str = "activity_dictionary";
    /// HR roster.
    pub const HR_NAMES: &str = "hr_names";
    /// Activity to step map.
    pub const PROCESS_STEPS: &str = "process_steps";
    /// Stage targets.
    pub const TARGETS: &str = "targets";
    /// Rank dictionary.
    pub const RANKING: &str = "ranking_dictionary";

    /// Required activity report columns.
    pub const ACTIVITY_REPORT_COLS: [&str; 5] =
        ["Name", "Activity", "Candidate", "Job", "Creation time"];
    /// Required dictionary columns.
    pub const ACTIVITY_DICTIONARY_COLS: [&str; 4] =
        ["Activity", "New_Activity", "Act_Is_Step", "Explanation"];
    /// Required roster columns.
    pub const HR_NAMES_COLS: [&str; 2] = ["Name", "Name_Is_HRTeam"];
    /// Required step map columns.
    pub const PROCESS_STEP_COLS: [&str; 3] = ["Process_Step", "Department_ST", "New_Activity"];
    /// Required target columns.
    pub const TARGETS_COLS: [&str; 4] = [
        "Department_ST",
        "Stage_advancement",
        "Target Name",
        "Target Value",
    ];
    /// Required rank dictionary columns.
    pub const RANKING_COLS: [&str; 4] = ["Department_ST", "Process_Step", "updated", "rank"];
    /// Optional ranking column carrying the date the rank policy was last revised.
    pub const RANKING_LAST_UPDATE_COL: &str = "last_update";
}

/// Input discovery and output file naming.
pub mod files {
    /// File-stem prefixes used to discover inputs under an input directory.
    pub const ACTIVITY_REPORT_PREFIX: &str = "activity_report";
    /// Activity dictionary prefix.
    pub const ACTIVITY_DICTIONARY_PREFIX: &str = "activity_dictionary";
    /// HR roster prefix.
    pub const HR_NAMES_PREFIX: &str = "hr_name_list";
    /// Step map prefix.
    pub const PROCESS_STEP_PREFIX: &str = "process_step";
    /// Targets prefix.
    pub const TARGETS_PREFIX: &str = "targets";
    /// Rank dictionary prefix.
    pub const RANKING_PREFIX: &str = "ranking";

    /// Date stamp appended to output files (day-month, as the reporting team expects).
    pub const OUTPUT_STAMP_FORMAT: &str = "%d-%m";
    /// Golden source file stem.
    pub const GOLDEN_SOURCE_STEM: &str = "golden_source";
    /// Manual review file stem.
    pub const MANUAL_REVIEW_STEM: &str = "manual_review";
    /// Unmapped steps file stem.
    pub const UNMAPPED_STEM: &str = "unmapped_steps";
    /// Unranked steps file stem.
    pub const UNRANKED_STEM: &str = "unranked_steps";
    /// Run summary file stem.
    pub const SUMMARY_STEM: &str = "run_summary";
    /// Moved segment export.
    pub const MOVED_SEGMENT_FILE: &str = "moved_to_job.csv";
    /// Not-moved segment export.
    pub const NOT_MOVED_SEGMENT_FILE: &str = "not_moved_to_job.csv";
    /// Default output directory.
    pub const DEFAULT_OUTPUT_DIR: &str = "output_data";
}
