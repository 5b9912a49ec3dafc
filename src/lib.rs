#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line entry point shared by the binary.
pub mod app;
/// Attempt counters and per-application audit.
pub mod cleaning;
/// Business constants with overridable defaults.
pub mod config;
/// Centralized constants used across stages, inputs, and outputs.
pub mod constants;
/// Row models carried between stages.
pub mod data;
/// Dictionary and roster join.
pub mod enrichment;
/// Per-group ordering and scan helpers.
pub mod grouping;
mod hash;
/// Reference tables joined onto the event stream.
pub mod lookups;
/// Run summary counts.
pub mod metrics;
/// End-to-end orchestration.
pub mod pipeline;
/// Step-order validation.
pub mod ranking;
/// Serializable output rows.
pub mod records;
/// Application id resolution.
pub mod resolution;
/// Activity and step rollups.
pub mod rollup;
/// Candidate segmentation.
pub mod segmentation;
/// Input tables and typed loaders.
pub mod source;
/// Elapsed time, status, and targets.
pub mod timeline;
/// Filesystem discovery and output writing.
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Text, flag, and timestamp helpers.
pub mod utils;

mod errors;

pub use config::{PipelineConfig, VanillaSubset};
pub use data::{
    ActivityRow, ApplicationEvent, EnrichedEvent, JobLabel, PipelineStatus, RankedRow, RawEvent,
    SegmentKind, StepRow, TimelineRow, TrackedEvent,
};
pub use errors::{PipelineError, PipelineResult};
pub use lookups::{
    ActivityDefinition, ActivityDictionary, HrRoster, ProcessStepMap, RankDictionary, RankEntry,
    StageTarget, TargetTable,
};
pub use metrics::RunSummary;
pub use pipeline::{GoldenSourcePipeline, PipelineInputs, PipelineOutput};
pub use records::GoldenSourceRecord;
pub use types::{ActivityName, ApplicationId, CandidateId, DepartmentBucket, ProcessStepName};
