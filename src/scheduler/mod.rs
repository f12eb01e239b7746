/*!
 * Scheduler Module
 * Tick-driven CPU scheduling, its lock boundary, and the clock driver
 */

pub mod clock;
pub mod engine;
pub mod handle;
pub mod types;

// Re-export public API
pub use clock::{ClockCommand, ClockTask, DEFAULT_TICK_PERIOD};
pub use engine::Scheduler;
pub use handle::SchedulerHandle;
pub use types::{AssignOutcome, SchedulerStats, TickSummary};
