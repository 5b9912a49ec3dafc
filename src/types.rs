/// Candidate identifier as it appears in the activity report.
/// Example: `Jane Doe`
pub type CandidateId = String;
/// Job label string in `<Department>-<JobPosition>-<Location>-<Specificities?>` form.
/// Examples: `Business Research-Research Analyst-Cairo`, `IT-Developer-Barcelona-Remote`
pub type JobLabelText = String;
/// Canonical (lowercase, trimmed) activity name.
/// Examples: `applied`, `disqualified`, `moved to job position`
pub type ActivityName = String;
/// Process-step label from the process-step map.
/// Examples: `Applied`, `Automated test`, `HR Interview`, `Offer`, `Hired`
pub type ProcessStepName = String;
/// Coarse department bucket used as a lookup key.
/// Examples: `Business Research`, `Service Team`
pub type DepartmentBucket = String;
/// Temporary per-candidate-job key built during segmentation.
/// Example: `Jane Doe_Business Research-Research Analyst-Cairo`
pub type TempId = String;
/// Resolved application identity: candidate, resolved job label and disqualification cycle.
/// Example: `Jane Doe_Business Research-Research Analyst-Cairo_1`
pub type ApplicationId = String;
/// Transition label between two consecutive process steps.
/// Example: `Applied ==> Automated test`
pub type StageAdvancement = String;
/// Logical input table name used in error messages and logs.
/// Examples: `activity_report`, `ranking_dictionary`
pub type TableName = String;
/// Free-form audit comment attached to output rows.
/// Examples: `OK`, `Actions not in the right order`
pub type Comment = String;
