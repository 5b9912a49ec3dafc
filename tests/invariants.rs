mod common;

use std::collections::BTreeMap;

use golden_source::{GoldenSourcePipeline, GoldenSourceRecord, PipelineOutput, RawEvent};

use common::{ANALYST, DATA_ANALYST, DEVELOPER, TESTER, event, fixture_inputs};

fn mixed_report() -> Vec<RawEvent> {
    vec![
        event("Jane", "Applied", ANALYST, "2022-03-01 09:00:00"),
        event("Jane", "Moved to assessment", ANALYST, "2022-03-02 09:00:00"),
        event("Jane", "Moved to assessment", ANALYST, "2022-03-02 18:00:00"),
        event("Jane", "Moved to offer", ANALYST, "2022-03-05 09:00:00"),
        event("Jane", "Hired", ANALYST, "2022-03-07 12:30:00"),
        event("Omar", "Sourced", DATA_ANALYST, "2022-11-01 09:00:00"),
        event("Omar", "Moved to HR interview", DATA_ANALYST, "2022-11-03 09:00:00"),
        event("Omar", "Auto-disqualified", DATA_ANALYST, "2022-11-04 09:00:00"),
        event("Omar", "Applied", DATA_ANALYST, "2023-01-10 09:00:00"),
        event("Omar", "Moved to HR interview", DATA_ANALYST, "2023-01-12 09:00:00"),
        event("Omar", "Moved to offer", DATA_ANALYST, "2023-01-15 15:00:00"),
        event("Lena", "Applied", DEVELOPER, "2022-04-01 09:00:00"),
        event("Lena", "Moved to job position", TESTER, "2022-04-03 09:00:00"),
        event("Lena", "Moved to HR interview", TESTER, "2022-04-04 09:00:00"),
        event("Lena", "Disqualified", TESTER, "2022-04-06 09:00:00"),
        event("Lena", "Reverted", TESTER, "2022-04-07 09:00:00"),
        event("Lena", "Moved to offer", TESTER, "2022-04-09 09:00:00"),
        event("Kai", "Moved to job position", TESTER, "2022-05-01 09:00:00"),
        event("Kai", "Moved to HR interview", TESTER, "2022-05-02 09:00:00"),
        event("Kai", "Woken up", TESTER, "2022-05-02 18:00:00"),
        event("Kai", "Moved to HR interview", TESTER, "2022-05-03 09:00:00"),
        event("Kai", "Hired", TESTER, "2022-05-06 09:00:00"),
    ]
}

fn run(events: Vec<RawEvent>) -> PipelineOutput {
    GoldenSourcePipeline::default()
        .run(&fixture_inputs(events))
        .unwrap()
}

fn by_application(rows: &[GoldenSourceRecord]) -> BTreeMap<&str, Vec<&GoldenSourceRecord>> {
    let mut grouped: BTreeMap<&str, Vec<&GoldenSourceRecord>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.unique_id.as_str()).or_default().push(row);
    }
    grouped
}

#[test]
fn no_application_repeats_a_step_consecutively() {
    let output = run(mixed_report());
    assert!(!output.golden_source.is_empty());
    for (unique_id, rows) in by_application(&output.golden_source) {
        for pair in rows.windows(2) {
            assert_ne!(
                pair[0].process_step, pair[1].process_step,
                "{unique_id} repeats {}",
                pair[0].process_step
            );
        }
    }
}

#[test]
fn cumulative_days_start_at_zero_and_never_decrease() {
    let output = run(mixed_report());
    for (unique_id, rows) in by_application(&output.golden_source) {
        assert_eq!(rows[0].cumulative_time_diff_in_days, 0.0, "{unique_id}");
        assert_eq!(rows[0].time_diff_in_days, 0.0, "{unique_id}");
        assert_eq!(rows[0].time_diff_in_hours, 0, "{unique_id}");
        for pair in rows.windows(2) {
            assert!(
                pair[1].cumulative_time_diff_in_days >= pair[0].cumulative_time_diff_in_days,
                "{unique_id}"
            );
            assert!(pair[1].creation_time >= pair[0].creation_time, "{unique_id}");
        }
    }
}

#[test]
fn exactly_one_last_step_per_application() {
    let output = run(mixed_report());
    for (unique_id, rows) in by_application(&output.golden_source) {
        let lasts = rows.iter().filter(|row| row.is_last_step == 1).count();
        assert_eq!(lasts, 1, "{unique_id}");
        assert_eq!(rows.last().map(|row| row.is_last_step), Some(1));
    }
}

#[test]
fn status_flags_are_exclusive() {
    let output = run(mixed_report());
    for row in &output.golden_source {
        assert_eq!(
            row.id_in_pipeline + row.id_is_hired + row.id_is_out_of_process,
            1,
            "{}",
            row.unique_id
        );
        assert_eq!(row.id_is_vanilla + row.id_not_vanilla, 1);
    }
}

#[test]
fn red_flag_is_uniform_within_an_application() {
    let output = run(mixed_report());
    for (unique_id, rows) in by_application(&output.golden_source) {
        let flags: Vec<u8> = rows.iter().map(|row| row.red_flag).collect();
        assert!(flags.windows(2).all(|pair| pair[0] == pair[1]), "{unique_id}");
    }
}

#[test]
fn repeated_runs_are_identical() {
    let first = run(mixed_report());
    let second = run(mixed_report());
    assert_eq!(first, second);
    assert_eq!(first.summary.fingerprint, second.summary.fingerprint);
}

#[test]
fn report_row_order_does_not_matter() {
    let mut reversed = mixed_report();
    reversed.reverse();
    let forward = run(mixed_report());
    let backward = run(reversed);
    assert_eq!(forward.golden_source, backward.golden_source);
    assert_eq!(forward.summary.fingerprint, backward.summary.fingerprint);
}

#[test]
fn attempts_split_on_disqualification() {
    let output = run(mixed_report());
    let ids: Vec<&str> = by_application(&output.golden_source).into_keys().collect();
    assert!(ids.contains(&format!("Omar_{DATA_ANALYST}_1").as_str()));
    assert!(ids.contains(&format!("Omar_{DATA_ANALYST}_2").as_str()));
    assert!(ids.contains(&format!("Lena_{TESTER}_1").as_str()));
}
