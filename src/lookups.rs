//! Reference tables joined onto the event stream.
//!
//! Each table is a plain key to value mapping built from an input table. When
//! an input repeats a key, the first row wins and the duplicate is logged.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{ActivityName, DepartmentBucket, ProcessStepName};
use crate::utils::normalize_label;

/// Dictionary row for one raw activity label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityDefinition {
    /// `New_Activity` exactly as written in the dictionary.
    pub canonical: String,
    /// `act_is_step`; `None` when blank.
    pub is_step: Option<bool>,
    /// Free-text explanation, when given.
    pub explanation: Option<String>,
}

/// Raw activity label to canonical definition. Keys match exactly.
#[derive(Clone, Debug, Default)]
pub struct ActivityDictionary {
    entries: HashMap<String, ActivityDefinition>,
}

impl ActivityDictionary {
    /// Empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `raw` was already defined (the earlier entry is kept).
    pub fn insert(&mut self, raw: impl Into<String>, definition: ActivityDefinition) -> bool {
        let raw = raw.into();
        if self.entries.contains_key(&raw) {
            warn!("[golden_source:lookups] duplicate activity dictionary entry '{raw}'; keeping the first");
            return false;
        }
        self.entries.insert(raw, definition);
        true
    }

    /// Exact match on the raw label.
    pub fn lookup(&self, raw: &str) -> Option<&ActivityDefinition> {
        self.entries.get(raw)
    }

    /// Number of raw labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Actor name to "is on the HR team".
#[derive(Clone, Debug, Default)]
pub struct HrRoster {
    members: HashMap<String, Option<bool>>,
}

impl HrRoster {
    /// Empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `name` is already listed.
    pub fn insert(&mut self, name: impl Into<String>, is_hr: Option<bool>) -> bool {
        let name = name.into();
        if self.members.contains_key(&name) {
            warn!("[golden_source:lookups] duplicate HR roster entry '{name}'; keeping the first");
            return false;
        }
        self.members.insert(name, is_hr);
        true
    }

    /// `None` both for unknown actors and for roster rows with a blank flag.
    pub fn is_hr(&self, name: &str) -> Option<bool> {
        self.members.get(name).copied().flatten()
    }

    /// Number of listed actors.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// (department bucket, normalized activity) to process step.
#[derive(Clone, Debug, Default)]
pub struct ProcessStepMap {
    steps: HashMap<(DepartmentBucket, ActivityName), ProcessStepName>,
}

impl ProcessStepMap {
    /// Empty step map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the key is already mapped.
    pub fn insert(
        &mut self,
        department_bucket: &str,
        activity: &str,
        step: impl Into<ProcessStepName>,
    ) -> bool {
        let key = (department_bucket.trim().to_string(), normalize_label(activity));
        if self.steps.contains_key(&key) {
            warn!(
                "[golden_source:lookups] duplicate process step mapping ({}, {}); keeping the first",
                key.0, key.1
            );
            return false;
        }
        self.steps.insert(key, step.into());
        true
    }

    /// Step for an activity; the activity is normalized before matching.
    pub fn lookup(&self, department_bucket: &str, activity: &str) -> Option<&ProcessStepName> {
        self.steps.get(&(
            department_bucket.trim().to_string(),
            normalize_label(activity),
        ))
    }

    /// Number of mapped keys.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Named target attached to a stage advancement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageTarget {
    /// `Target Name`.
    pub name: String,
    /// `Target Value`; `None` when blank.
    pub value: Option<f64>,
}

/// (department bucket, normalized stage advancement) to target.
#[derive(Clone, Debug, Default)]
pub struct TargetTable {
    targets: HashMap<(DepartmentBucket, String), StageTarget>,
}

impl TargetTable {
    /// Empty target table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the key already has a target.
    pub fn insert(&mut self, department_bucket: &str, advancement: &str, target: StageTarget) -> bool {
        let key = (department_bucket.trim().to_string(), normalize_label(advancement));
        if self.targets.contains_key(&key) {
            warn!(
                "[golden_source:lookups] duplicate target for ({}, {}); keeping the first",
                key.0, key.1
            );
            return false;
        }
        self.targets.insert(key, target);
        true
    }

    /// Target for a stage advancement; matched case-insensitively.
    pub fn lookup(&self, department_bucket: &str, advancement: &str) -> Option<&StageTarget> {
        self.targets.get(&(
            department_bucket.trim().to_string(),
            normalize_label(advancement),
        ))
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Expected position of a step in its department's process.
#[derive(Clone, Debug, PartialEq)]
pub struct RankEntry {
    /// Expected position.
    pub rank: f64,
    /// Date the rank policy row was last revised, when the dictionary carries it.
    pub last_update: Option<NaiveDate>,
}

/// (department bucket, normalized step, updated policy) to rank.
#[derive(Clone, Debug, Default)]
pub struct RankDictionary {
    ranks: HashMap<(DepartmentBucket, String, bool), RankEntry>,
}

impl RankDictionary {
    /// Empty rank dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the key already has a rank.
    pub fn insert(&mut self, department_bucket: &str, step: &str, updated: bool, entry: RankEntry) -> bool {
        let key = (department_bucket.trim().to_string(), normalize_label(step), updated);
        if self.ranks.contains_key(&key) {
            warn!(
                "[golden_source:lookups] duplicate rank for ({}, {}, updated={}); keeping the first",
                key.0, key.1, key.2
            );
            return false;
        }
        self.ranks.insert(key, entry);
        true
    }

    /// Rank of a step under one policy.
    pub fn lookup(&self, department_bucket: &str, step: &str, updated: bool) -> Option<&RankEntry> {
        self.ranks.get(&(
            department_bucket.trim().to_string(),
            normalize_label(step),
            updated,
        ))
    }

    /// Number of ranked keys.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_dictionary_keeps_first_definition() {
        let mut dictionary = ActivityDictionary::new();
        let first = ActivityDefinition {
            canonical: "Applied".to_string(),
            is_step: Some(true),
            explanation: None,
        };
        let second = ActivityDefinition {
            canonical: "Sourced".to_string(),
            is_step: Some(false),
            explanation: None,
        };
        assert!(dictionary.insert("Applied", first.clone()));
        assert!(!dictionary.insert("Applied", second));
        assert_eq!(dictionary.lookup("Applied"), Some(&first));
        assert_eq!(dictionary.lookup("applied"), None);
        assert_eq!(dictionary.len(), 1);
    }

    #[test]
    fn hr_roster_blank_flag_reads_as_unknown() {
        let mut roster = HrRoster::new();
        roster.insert("Ana", Some(true));
        roster.insert("Bo", None);
        assert_eq!(roster.is_hr("Ana"), Some(true));
        assert_eq!(roster.is_hr("Bo"), None);
        assert_eq!(roster.is_hr("Cy"), None);
    }

    #[test]
    fn process_step_lookup_normalizes_activity() {
        let mut steps = ProcessStepMap::new();
        steps.insert("Business Research", " Moved To Assessment ", "Automated test");
        assert_eq!(
            steps.lookup("Business Research", "moved to assessment").map(String::as_str),
            Some("Automated test")
        );
        assert_eq!(steps.lookup("Service Team", "moved to assessment"), None);
    }

    #[test]
    fn target_lookup_is_case_insensitive_on_advancement() {
        let mut targets = TargetTable::new();
        let target = StageTarget {
            name: "Time to test".to_string(),
            value: Some(3.0),
        };
        targets.insert("Business Research", "Applied ==> Automated test", target.clone());
        assert!(!targets.insert(
            "Business Research",
            "applied ==> automated TEST",
            StageTarget {
                name: "Other".to_string(),
                value: None,
            }
        ));
        assert_eq!(
            targets.lookup("Business Research", "APPLIED ==> automated test"),
            Some(&target)
        );
    }

    #[test]
    fn rank_lookup_distinguishes_policy_versions() {
        let mut ranks = RankDictionary::new();
        ranks.insert("Data Analytics", "Offer", false, RankEntry { rank: 4.0, last_update: None });
        ranks.insert("Data Analytics", "Offer", true, RankEntry { rank: 5.0, last_update: None });
        assert_eq!(ranks.lookup("Data Analytics", "offer", false).map(|e| e.rank), Some(4.0));
        assert_eq!(ranks.lookup("Data Analytics", "offer", true).map(|e| e.rank), Some(5.0));
        assert_eq!(ranks.len(), 2);
    }
}
