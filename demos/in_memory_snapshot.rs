use std::error::Error;

use golden_source::{
    ActivityDefinition, GoldenSourcePipeline, PipelineInputs, RankEntry, RawEvent, StageTarget,
};

fn event(actor: &str, activity: &str, candidate: &str, job: &str, at: &str) -> RawEvent {
    RawEvent {
        actor: actor.to_string(),
        activity: activity.to_string(),
        candidate: candidate.to_string(),
        job: job.to_string(),
        creation_time: at.to_string(),
    }
}

fn demo_inputs() -> PipelineInputs {
    let analyst = "Business Research-Research Analyst-Cairo";
    let developer = "IT-Developer-Barcelona";
    let tester = "IT-Tester-Barcelona";

    let mut inputs = PipelineInputs {
        events: vec![
            event("Ana", "Applied", "Jane Roe", analyst, "2022-03-01 09:00:00"),
            event("Bot", "Moved to assessment", "Jane Roe", analyst, "2022-03-02 09:00:00"),
            event("Ana", "Moved to offer", "Jane Roe", analyst, "2022-03-05 09:00:00"),
            event("Ana", "Hired", "Jane Roe", analyst, "2022-03-08 15:00:00"),
            event("Ana", "Applied", "Sam Poe", developer, "2022-03-01 10:00:00"),
            event("Bo", "Moved to job position", "Sam Poe", tester, "2022-03-03 10:00:00"),
            event("Bo", "Moved to HR interview", "Sam Poe", tester, "2022-03-04 10:00:00"),
            event("Bo", "Disqualified", "Sam Poe", tester, "2022-03-06 10:00:00"),
        ],
        ..PipelineInputs::default()
    };

    for (raw, canonical) in [
        ("Applied", "applied"),
        ("Moved to assessment", "moved to assessment"),
        ("Moved to offer", "moved to offer"),
        ("Moved to HR interview", "moved to hr interview"),
        ("Moved to job position", "moved to job position"),
        ("Hired", "hired"),
        ("Disqualified", "disqualified"),
    ] {
        inputs.activity_dictionary.insert(
            raw,
            ActivityDefinition {
                canonical: canonical.to_string(),
                is_step: Some(true),
                explanation: None,
            },
        );
    }
    inputs.hr_roster.insert("Ana", Some(true));
    inputs.hr_roster.insert("Bo", Some(true));
    inputs.hr_roster.insert("Bot", Some(false));

    for department in ["Business Research", "Service Team"] {
        for (activity, step, rank) in [
            ("applied", "Applied", 1.0),
            ("moved to job position", "Applied", 1.0),
            ("moved to assessment", "Automated test", 2.0),
            ("moved to hr interview", "HR Interview", 3.0),
            ("moved to offer", "Offer", 4.0),
            ("hired", "Hired", 5.0),
            ("disqualified", "Out of Process", 6.0),
        ] {
            inputs.process_steps.insert(department, activity, step);
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

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let output = GoldenSourcePipeline::default().run(&demo_inputs())?;
    for row in &output.golden_source {
        println!(
            "{:<45} {:<16} {:>6.2}d  {}",
            row.unique_id, row.process_step, row.cumulative_time_diff_in_days, row.comment
        );
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&output.summary)?);
    Ok(())
}
