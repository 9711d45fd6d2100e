pub mod command;
pub mod orchestrator;

pub use command::{CommandOutcome, CommandRunner, Invocation, ProcessRunner, Toolchain};
pub use orchestrator::{Orchestrator, SweepSummary};
