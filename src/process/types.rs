/*!
 * Process Types
 * Lifecycle state and read-only snapshots for process introspection
 */

use crate::core::types::{format_timestamp, CoreId, Pid, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting in the ready queue for a core
    Ready,
    /// Resident on a core
    Running,
    /// Blocked by a sleep, counting down
    Waiting,
    /// Program exhausted (terminal)
    Finished,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::Finished => "FINISHED",
        };
        f.write_str(s)
    }
}

/// Outcome of giving a process one tick of CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Busy-waiting out the per-instruction delay
    Delayed,
    /// One instruction step ran
    Ran,
    /// A sleep was executed and the process asks to block
    Slept(u8),
    /// The cursor reached the end of the program
    Completed,
}

/// Point-in-time view of a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    pub current_line: usize,
    pub total_lines: usize,
    pub core: Option<CoreId>,
    pub execution_ticks: u64,
    pub wait_ticks: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub finished_tick: Option<Tick>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
}

impl ProcessInfo {
    pub fn is_finished(&self) -> bool {
        self.state == ProcessState::Finished
    }

    /// Timestamp shown in listings: finish time once finished, creation time before
    pub fn display_time(&self) -> String {
        format_timestamp(self.finished_at.unwrap_or(self.created_at))
    }
}
