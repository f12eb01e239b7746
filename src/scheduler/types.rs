/*!
 * Scheduler Types
 * Outcomes and statistics reported by the scheduler
 */

use crate::config::Policy;
use crate::core::types::{CoreId, Pid, Tick};
use crate::process::ProcessState;
use serde::Serialize;

/// Result of an out-of-band assignment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum AssignOutcome {
    /// Placed on an idle core by this request
    Assigned(CoreId),
    /// Already resident on a core
    AlreadyRunning(CoreId),
    /// No idle core; the process is in the ready queue exactly once
    Queued,
    /// Waiting or finished processes cannot be assigned
    Ineligible(ProcessState),
}

impl AssignOutcome {
    /// True when the process holds a core after the request
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_) | Self::AlreadyRunning(_))
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub tick: Tick,
    pub spawned: Option<Pid>,
    pub dispatched: usize,
    pub executed: usize,
    pub preempted: usize,
    pub blocked: usize,
    pub woken: usize,
    pub finished: usize,
}

/// Scheduler statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerStats {
    pub tick: Tick,
    pub policy: Policy,
    pub num_cpu: usize,
    pub generating: bool,
    pub total_processes: usize,
    pub ready: usize,
    pub waiting: usize,
    pub finished: usize,
    pub dispatches: u64,
    pub preemptions: u64,
    pub cpu_utilization: f64,
}
