/*!
 * Scheduler Handle
 *
 * Shared, cloneable access to one scheduler. Every operation takes the same
 * mutex exactly once, so a tick and an interactive request never interleave.
 */

use super::engine::Scheduler;
use super::types::{AssignOutcome, SchedulerStats, TickSummary};
use crate::config::SchedulerConfig;
use crate::core::errors::SchedulerError;
use crate::core::types::Pid;
use crate::process::{Instruction, ProcessInfo};
use crate::report::UtilizationReport;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Arc<Mutex<Scheduler>>,
}

impl SchedulerHandle {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(scheduler)),
        }
    }

    pub fn initialize(&self, config: SchedulerConfig) -> Result<(), SchedulerError> {
        self.inner.lock().initialize(config)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_initialized()
    }

    /// Run one full tick under the lock
    pub fn tick(&self) -> TickSummary {
        self.inner.lock().tick()
    }

    pub fn start(&self) {
        self.inner.lock().start();
    }

    pub fn stop(&self) {
        self.inner.lock().stop();
    }

    pub fn is_generating(&self) -> bool {
        self.inner.lock().is_generating()
    }

    pub fn create_process(&self, name: &str) -> Result<Pid, SchedulerError> {
        self.inner.lock().create_process(name)
    }

    pub fn spawn_with_program(
        &self,
        name: &str,
        program: Vec<Instruction>,
    ) -> Result<Pid, SchedulerError> {
        self.inner.lock().spawn_with_program(name, program)
    }

    pub fn get_process(&self, name: &str) -> Option<ProcessInfo> {
        self.inner.lock().get_process(name)
    }

    /// Process snapshot together with its output log
    pub fn inspect(&self, name: &str) -> Option<(ProcessInfo, Vec<String>)> {
        let scheduler = self.inner.lock();
        scheduler
            .process(name)
            .map(|p| (p.info(), p.output_log().to_vec()))
    }

    pub fn try_assign(&self, name: &str) -> Result<AssignOutcome, SchedulerError> {
        self.inner.lock().try_assign(name)
    }

    pub fn running_processes(&self) -> Vec<ProcessInfo> {
        self.inner.lock().running_processes()
    }

    pub fn finished_processes(&self) -> Vec<ProcessInfo> {
        self.inner.lock().finished_processes()
    }

    pub fn cpu_utilization(&self) -> f64 {
        self.inner.lock().cpu_utilization()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.inner.lock().stats()
    }

    /// Consistent utilization snapshot taken between ticks
    pub fn report(&self) -> UtilizationReport {
        UtilizationReport::capture(&self.inner.lock())
    }

    /// Run a read-only closure against the scheduler
    pub fn with<R>(&self, f: impl FnOnce(&Scheduler) -> R) -> R {
        let scheduler = self.inner.lock();
        f(&*scheduler)
    }
}

impl Default for SchedulerHandle {
    fn default() -> Self {
        Self::new(Scheduler::new())
    }
}
