/*!
 * Utilization Report
 * Read-only projection of core usage and process progress
 */

use crate::core::errors::Result;
use crate::core::types::{format_timestamp, Tick};
use crate::process::{ProcessInfo, ProcessState};
use crate::scheduler::Scheduler;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use time::OffsetDateTime;
use tracing::info;

const RULE: &str = "--------------------------------------";

#[derive(Debug, Clone, Serialize)]
pub struct UtilizationReport {
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub tick: Tick,
    pub cpu_utilization: f64,
    pub cores_used: usize,
    pub cores_available: usize,
    pub running: Vec<ProcessInfo>,
    pub finished: Vec<ProcessInfo>,
}

impl UtilizationReport {
    pub fn capture(scheduler: &Scheduler) -> Self {
        Self {
            generated_at: OffsetDateTime::now_utc(),
            tick: scheduler.ticks(),
            cpu_utilization: scheduler.cpu_utilization(),
            cores_used: scheduler.cores_used(),
            cores_available: scheduler.cores_available(),
            running: scheduler.running_processes(),
            finished: scheduler.finished_processes(),
        }
    }

    /// Text rendering shared by `screen -ls` and `report-util`
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "CPU utilization: {:.2}%", self.cpu_utilization);
        let _ = writeln!(out, "Cores used: {}", self.cores_used);
        let _ = writeln!(out, "Cores available: {}", self.cores_available);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", RULE);

        let _ = writeln!(out, "Running processes:");
        for p in &self.running {
            let _ = writeln!(out, "{}", running_line(p));
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Finished processes:");
        for p in &self.finished {
            let _ = writeln!(
                out,
                "{:<12} ({})   Finished   {} / {}",
                p.name,
                p.display_time(),
                p.current_line,
                p.total_lines
            );
        }
        let _ = writeln!(out, "{}", RULE);
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write the rendering to a log file, replacing previous contents
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        info!(path = %path.display(), "Utilization report written");
        Ok(())
    }
}

fn running_line(p: &ProcessInfo) -> String {
    let location = match (p.state, p.core) {
        (ProcessState::Running, Some(core)) => format!("Core: {}", core),
        (state, _) => state.to_string(),
    };
    format!(
        "{:<12} ({})   {:<9}   {} / {}",
        p.name,
        format_timestamp(p.created_at),
        location,
        p.current_line,
        p.total_lines
    )
}
