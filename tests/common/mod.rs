#![allow(dead_code)]

use golden_source::{
    ActivityDefinition, GoldenSourceRecord, PipelineInputs, RankEntry, RawEvent, StageTarget,
};

pub const ANALYST: &str = "Business Research-Research Analyst-Cairo";
pub const DATA_ANALYST: &str = "Data Analytics-Analyst-Mexico City";
pub const DEVELOPER: &str = "IT-Developer-Barcelona";
pub const TESTER: &str = "IT-Tester-Barcelona";

pub fn event(candidate: &str, activity: &str, job: &str, at: &str) -> RawEvent {
    RawEvent {
        actor: "Ana".to_string(),
        activity: activity.to_string(),
        candidate: candidate.to_string(),
        job: job.to_string(),
        creation_time: at.to_string(),
    }
}

const DICTIONARY: [(&str, &str, bool); 13] = [
    ("Applied", "Applied", true),
    ("Sourced", "Sourced", true),
    ("Disqualified", "Disqualified", true),
    ("Auto-disqualified", "Auto-disqualified", true),
    ("Reverted", "Reverted", true),
    ("Moved to job position", "Moved to job position", true),
    ("Moved to assessment", "Moved to assessment", true),
    ("Moved to HR interview", "Moved to HR interview", true),
    ("Moved to offer", "Moved to offer", true),
    ("Hired", "Hired", true),
    ("Referred a candidate", "Referred a candidate", true),
    ("Woken up", "Woken up", true),
    ("Viewed profile", "Viewed profile", false),
];

const STEP_MAP: [(&str, &str); 10] = [
    ("applied", "Applied"),
    ("sourced", "Applied"),
    ("applied with moved to job position", "Applied"),
    ("moved to job position", "Applied"),
    ("moved to assessment", "Automated test"),
    ("moved to hr interview", "HR Interview"),
    ("moved to offer", "Offer"),
    ("hired", "Hired"),
    ("disqualified", "Out of Process"),
    ("auto-disqualified", "Out of Process"),
];

const RANKS: [(&str, f64); 6] = [
    ("Applied", 1.0),
    ("Automated test", 2.0),
    ("HR Interview", 3.0),
    ("Offer", 4.0),
    ("Hired", 5.0),
    ("Out of Process", 6.0),
];

/// Lookup tables covering three department buckets, wrapped around `events`.
pub fn fixture_inputs(events: Vec<RawEvent>) -> PipelineInputs {
    let mut inputs = PipelineInputs {
        events,
        ..PipelineInputs::default()
    };
    for (raw, canonical, is_step) in DICTIONARY {
        inputs.activity_dictionary.insert(
            raw,
            ActivityDefinition {
                canonical: canonical.to_string(),
                is_step: Some(is_step),
                explanation: None,
            },
        );
    }
    inputs.hr_roster.insert("Ana", Some(true));
    for department in ["Business Research", "Data Analytics", "Service Team"] {
        for (activity, step) in STEP_MAP {
            inputs.process_steps.insert(department, activity, step);
        }
        for (step, rank) in RANKS {
            for updated in [false, true] {
                inputs.ranks.insert(
                    department,
                    step,
                    updated,
                    RankEntry {
                        rank,
                        last_update: None,
                    },
                );
            }
        }
    }
    inputs.targets.insert(
        "Business Research",
        "Automated test ==> Offer",
        StageTarget {
            name: "Test to offer".to_string(),
            value: Some(5.0),
        },
    );
    inputs
}

/// Golden rows of one application, in output order.
pub fn rows_for<'a>(rows: &'a [GoldenSourceRecord], unique_id: &str) -> Vec<&'a GoldenSourceRecord> {
    rows.iter().filter(|row| row.unique_id == unique_id).collect()
}
