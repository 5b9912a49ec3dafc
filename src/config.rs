use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{job, ranking};
use crate::errors::{PipelineError, PipelineResult};
use crate::types::DepartmentBucket;

/// Role allow-list tracked through automated-test timing instead of HR-interview timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VanillaSubset {
    /// Department bucket the subset belongs to.
    pub department: DepartmentBucket,
    /// Job positions inside the subset.
    pub positions: Vec<String>,
}

impl Default for VanillaSubset {
    fn default() -> Self {
        Self {
            department: job::VANILLA_DEPARTMENT.to_string(),
            positions: job::VANILLA_POSITIONS
                .iter()
                .map(|position| position.to_string())
                .collect(),
        }
    }
}

/// Static business constants the transform needs besides the external lookup tables.
///
/// Every field has a production default; a JSON file may override any subset of
/// them (missing keys keep their defaults).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Location (third job-label field) to country.
    pub location_countries: BTreeMap<String, String>,
    /// Departments collapsed into `service_team_bucket`.
    pub service_team_departments: Vec<String>,
    /// Bucket name assigned to `service_team_departments`.
    pub service_team_bucket: DepartmentBucket,
    /// Vanilla subset definition.
    pub vanilla: VanillaSubset,
    /// Per-department date after which the updated rank policy applies.
    pub policy_cutovers: BTreeMap<DepartmentBucket, NaiveDate>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            location_countries: job::LOCATION_COUNTRIES
                .iter()
                .map(|(location, country)| (location.to_string(), country.to_string()))
                .collect(),
            service_team_departments: job::SERVICE_TEAM_DEPARTMENTS
                .iter()
                .map(|department| department.to_string())
                .collect(),
            service_team_bucket: job::SERVICE_TEAM.to_string(),
            vanilla: VanillaSubset::default(),
            policy_cutovers: ranking::POLICY_CUTOVERS
                .iter()
                .filter_map(|(department, year, month, day)| {
                    NaiveDate::from_ymd_opt(*year, *month, *day)
                        .map(|date| (department.to_string(), date))
                })
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Load overrides from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject overrides that would silently disable a rule.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.service_team_bucket.trim().is_empty() && !self.service_team_departments.is_empty() {
            return Err(PipelineError::Configuration(
                "service_team_bucket must not be blank".to_string(),
            ));
        }
        if self.vanilla.department.trim().is_empty() || self.vanilla.positions.is_empty() {
            return Err(PipelineError::Configuration(
                "vanilla subset needs a department and at least one position".to_string(),
            ));
        }
        Ok(())
    }

    /// Map a department to its lookup bucket.
    pub fn department_bucket(&self, department: &str) -> DepartmentBucket {
        if self
            .service_team_departments
            .iter()
            .any(|candidate| candidate == department)
        {
            self.service_team_bucket.clone()
        } else {
            department.to_string()
        }
    }

    /// Country of a job-label location, when known.
    pub fn country_for(&self, location: &str) -> Option<String> {
        self.location_countries.get(location).cloned()
    }

    /// Vanilla applications are allow-listed roles of the vanilla department with
    /// no extra specificities on the job label.
    pub fn is_vanilla(
        &self,
        department_bucket: &str,
        job_position: &str,
        specificities: Option<&str>,
    ) -> bool {
        specificities.is_none()
            && department_bucket == self.vanilla.department
            && self
                .vanilla
                .positions
                .iter()
                .any(|position| position == job_position)
    }

    /// True when `at` falls strictly after the department's policy cutover.
    ///
    /// Departments without a cutover never switch to the updated policy.
    pub fn policy_updated(&self, department_bucket: &str, at: NaiveDateTime) -> bool {
        self.policy_cutovers
            .get(department_bucket)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .is_some_and(|cutover| at > cutover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn support_departments_collapse_into_service_team() {
        let config = PipelineConfig::default();
        assert_eq!(config.department_bucket("IT"), "Service Team");
        assert_eq!(config.department_bucket("Office Management"), "Service Team");
        assert_eq!(
            config.department_bucket("Business Research"),
            "Business Research"
        );
    }

    #[test]
    fn unknown_location_has_no_country() {
        let config = PipelineConfig::default();
        assert_eq!(config.country_for("Cairo").as_deref(), Some("Egypt"));
        assert_eq!(config.country_for("Atlantis"), None);
    }

    #[test]
    fn vanilla_requires_allow_listed_role_without_specificities() {
        let config = PipelineConfig::default();
        assert!(config.is_vanilla("Business Research", "Research Analyst", None));
        assert!(!config.is_vanilla("Business Research", "Research Analyst", Some("Remote")));
        assert!(!config.is_vanilla("Business Research", "Team Lead", None));
        assert!(!config.is_vanilla("Data Analytics", "Research Analyst", None));
    }

    #[test]
    fn policy_cutover_is_strictly_after_midnight() {
        let config = PipelineConfig::default();
        assert!(!config.policy_updated("Business Research", at(2022, 5, 1, 0)));
        assert!(config.policy_updated("Business Research", at(2022, 5, 1, 9)));
        assert!(!config.policy_updated("Business Research", at(2022, 4, 30, 23)));
        assert!(!config.policy_updated("Service Team", at(2030, 1, 1, 0)));
    }

    #[test]
    fn json_overrides_keep_unspecified_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"location_countries": {{"Lisbon": "Portugal"}}, "policy_cutovers": {{"Data Analytics": "2024-01-01"}}}}"#
        )
        .unwrap();

        let config = PipelineConfig::from_json_path(&path).unwrap();
        assert_eq!(config.country_for("Lisbon").as_deref(), Some("Portugal"));
        assert_eq!(config.country_for("Cairo"), None);
        assert_eq!(config.service_team_bucket, "Service Team");
        assert!(!config.policy_updated("Data Analytics", at(2023, 6, 1, 0)));
        assert!(config.policy_updated("Data Analytics", at(2024, 1, 2, 0)));
    }

    #[test]
    fn empty_vanilla_positions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"vanilla": {"positions": []}}"#).unwrap();

        let err = PipelineConfig::from_json_path(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }
}
