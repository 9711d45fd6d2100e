pub use super::check::{CheckReport, ResultCheck, Verdict, FAILURE_STATUS};
pub use super::error::{Result, SweepError};
pub use super::exec::{
    CommandOutcome, CommandRunner, Invocation, Orchestrator, ProcessRunner, SweepSummary,
    Toolchain,
};
pub use super::inputs::{inspect, InputReport, InputStatus};
pub use super::log::StageTimer;
pub use super::plan::{
    Job, Layout, RotationSpec, SweepConfig, SweepPlan, TestMode, TrainingList, CONFIG_FILE_NAME,
    ROTATION_SWEEP,
};
