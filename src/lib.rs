/*!
 * OS Emulator Library
 * Tick-driven multi-core scheduler emulation exposed as a library
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod shell;

// Re-exports
pub use config::{ConfigLoader, Policy, SchedulerConfig};
pub use core::errors::{ConfigError, EmulatorError, Result, SchedulerError, ShellError};
pub use monitoring::init_tracing;
pub use process::{Instruction, Process, ProcessInfo, ProcessState};
pub use report::UtilizationReport;
pub use scheduler::{AssignOutcome, ClockTask, Scheduler, SchedulerHandle, TickSummary};
pub use shell::{Console, Reply};
