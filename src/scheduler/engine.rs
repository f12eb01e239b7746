/*!
 * Tick Scheduler
 *
 * Owns the process registry, the FIFO ready queue, and the core table, and
 * advances all of them one virtual tick at a time. FCFS and round-robin
 * share dispatch order and differ only in quantum preemption.
 */

use super::types::{AssignOutcome, SchedulerStats, TickSummary};
use crate::config::SchedulerConfig;
use crate::core::errors::SchedulerError;
use crate::core::types::{CoreId, Pid, Slot, Tick};
use crate::process::{Execution, Instruction, Process, ProcessInfo, ProcessState, ProgramGenerator};
use ahash::RandomState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, trace};

/// CPU scheduler driven by a virtual clock
pub struct Scheduler {
    config: SchedulerConfig,
    initialized: bool,

    // Registry is append-only; queues and the core table hold slots into it
    processes: Vec<Process>,
    names: HashMap<String, Slot, RandomState>,
    ready_queue: VecDeque<Slot>,
    cores: Vec<Option<Slot>>,
    quantum_used: HashMap<Slot, u32, RandomState>,
    waiting: Vec<Slot>,

    ticks: Tick,
    next_pid: Pid,
    auto_counter: u64,
    generating: bool,
    generator: ProgramGenerator,
    rng: StdRng,

    dispatches: u64,
    preemptions: u64,
}

impl Scheduler {
    /// Create an uninitialized scheduler
    pub fn new() -> Self {
        let config = SchedulerConfig::default();
        Self {
            generator: ProgramGenerator::new(config.min_ins, config.max_ins),
            config,
            initialized: false,
            processes: Vec::new(),
            names: HashMap::default(),
            ready_queue: VecDeque::new(),
            cores: Vec::new(),
            quantum_used: HashMap::default(),
            waiting: Vec::new(),
            ticks: 0,
            next_pid: 1,
            auto_counter: 0,
            generating: false,
            rng: StdRng::from_entropy(),
            dispatches: 0,
            preemptions: 0,
        }
    }

    /// Create and initialize in one step
    pub fn with_config(config: SchedulerConfig) -> Self {
        let mut scheduler = Self::new();
        scheduler.load(config);
        scheduler
    }

    /// Use a fixed seed for program generation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Load the configuration and reset the core table
    ///
    /// A second call leaves the scheduler untouched.
    pub fn initialize(&mut self, config: SchedulerConfig) -> Result<(), SchedulerError> {
        if self.initialized {
            return Err(SchedulerError::AlreadyInitialized);
        }
        self.load(config);
        Ok(())
    }

    fn load(&mut self, config: SchedulerConfig) {
        self.generator = ProgramGenerator::new(config.min_ins, config.max_ins);
        self.cores = vec![None; config.num_cpu];
        self.config = config;
        self.initialized = true;

        info!(
            num_cpu = self.config.num_cpu,
            policy = %self.config.policy,
            quantum = self.config.quantum_cycles,
            batch_freq = self.config.batch_process_freq,
            min_ins = self.config.min_ins,
            max_ins = self.config.max_ins,
            delays = self.config.delays_per_exec,
            "Scheduler initialized"
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn ticks(&self) -> Tick {
        self.ticks
    }

    /// Enable automatic process generation
    pub fn start(&mut self) {
        self.generating = true;
        info!(tick = self.ticks, "Automatic process generation started");
    }

    /// Disable automatic process generation; existing processes keep running
    pub fn stop(&mut self) {
        self.generating = false;
        info!(tick = self.ticks, "Automatic process generation stopped");
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Advance the virtual clock by one tick
    pub fn tick(&mut self) -> TickSummary {
        if !self.initialized {
            return TickSummary::default();
        }

        self.ticks += 1;
        let now = self.ticks;
        let mut summary = TickSummary {
            tick: now,
            ..TickSummary::default()
        };

        // 1. Batch arrival
        if self.generating && now % self.config.batch_process_freq.max(1) == 0 {
            summary.spawned = Some(self.spawn_auto());
        }

        // 2. Fill idle cores from the front of the queue
        summary.dispatched += self.dispatch_idle_cores();

        // 3. One instruction per resident process
        for core in 0..self.cores.len() {
            let Some(slot) = self.cores[core] else {
                continue;
            };
            summary.executed += 1;

            match self.processes[slot].execute() {
                Execution::Completed => {
                    self.processes[slot].finish(now);
                    self.release(core, slot);
                    summary.finished += 1;
                    debug!(
                        pid = self.processes[slot].pid(),
                        core,
                        tick = now,
                        "Process finished"
                    );
                }
                Execution::Slept(cycles) => {
                    self.processes[slot].block(cycles, now);
                    self.release(core, slot);
                    self.waiting.push(slot);
                    summary.blocked += 1;
                    debug!(pid = self.processes[slot].pid(), cycles, "Process sleeping");
                }
                Execution::Ran | Execution::Delayed => {
                    if self.config.policy.is_preemptive() && self.charge_quantum(slot) {
                        self.preempt(core, slot);
                        summary.preempted += 1;
                    }
                }
            }
        }

        // 4. Count down sleepers, requeue the ones that woke
        summary.woken = self.wake_sleepers(now);

        // 5. Idle cores never sit out a tick while work is queued
        summary.dispatched += self.dispatch_idle_cores();

        trace!(
            tick = now,
            dispatched = summary.dispatched,
            executed = summary.executed,
            preempted = summary.preempted,
            finished = summary.finished,
            "Tick complete"
        );
        summary
    }

    /// Create a named process with a generated program
    ///
    /// Names are unique; a duplicate request changes nothing.
    pub fn create_process(&mut self, name: &str) -> Result<Pid, SchedulerError> {
        self.check_name(name)?;
        let program = self.generator.generate(name, &mut self.rng);
        Ok(self.admit(name.to_string(), program))
    }

    /// Create a named process running the given program
    pub fn spawn_with_program(
        &mut self,
        name: &str,
        program: Vec<Instruction>,
    ) -> Result<Pid, SchedulerError> {
        self.check_name(name)?;
        Ok(self.admit(name.to_string(), program))
    }

    fn check_name(&self, name: &str) -> Result<(), SchedulerError> {
        if !self.initialized {
            return Err(SchedulerError::NotInitialized);
        }
        if self.names.contains_key(name) {
            return Err(SchedulerError::DuplicateProcess(name.to_string()));
        }
        Ok(())
    }

    fn spawn_auto(&mut self) -> Pid {
        let name = loop {
            self.auto_counter += 1;
            let candidate = format!("process{:02}", self.auto_counter);
            if !self.names.contains_key(&candidate) {
                break candidate;
            }
        };
        let program = self.generator.generate(&name, &mut self.rng);
        self.admit(name, program)
    }

    fn admit(&mut self, name: String, program: Vec<Instruction>) -> Pid {
        let pid = self.next_pid;
        self.next_pid += 1;

        let slot = self.processes.len();
        let process = Process::new(pid, name.clone(), program).with_delays(self.config.delays_per_exec);
        debug!(pid, name = %name, lines = process.total_lines(), "Process created");

        self.processes.push(process);
        self.names.insert(name, slot);
        self.ready_queue.push_back(slot);
        pid
    }

    /// Place a ready process on an idle core outside the tick
    pub fn try_assign(&mut self, name: &str) -> Result<AssignOutcome, SchedulerError> {
        let slot = self.slot(name)?;
        let process = &self.processes[slot];

        let outcome = match process.state() {
            ProcessState::Running => match process.core() {
                Some(core) => AssignOutcome::AlreadyRunning(core),
                None => AssignOutcome::Ineligible(ProcessState::Running),
            },
            state @ (ProcessState::Waiting | ProcessState::Finished) => {
                AssignOutcome::Ineligible(state)
            }
            ProcessState::Ready => match self.idle_core() {
                Some(core) => {
                    self.ready_queue.retain(|&queued| queued != slot);
                    self.assign(slot, core);
                    AssignOutcome::Assigned(core)
                }
                None => {
                    if !self.ready_queue.contains(&slot) {
                        self.ready_queue.push_back(slot);
                    }
                    AssignOutcome::Queued
                }
            },
        };

        debug!(name, ?outcome, "Out-of-band assignment");
        Ok(outcome)
    }

    fn dispatch_idle_cores(&mut self) -> usize {
        let mut dispatched = 0;
        for core in 0..self.cores.len() {
            if self.cores[core].is_some() {
                continue;
            }
            let Some(slot) = self.ready_queue.pop_front() else {
                break;
            };
            self.assign(slot, core);
            dispatched += 1;
        }
        dispatched
    }

    fn assign(&mut self, slot: Slot, core: CoreId) {
        self.cores[core] = Some(slot);
        self.processes[slot].dispatch(core);
        self.quantum_used.insert(slot, 0);
        self.dispatches += 1;
        debug!(pid = self.processes[slot].pid(), core, tick = self.ticks, "Process dispatched");
    }

    fn release(&mut self, core: CoreId, slot: Slot) {
        self.cores[core] = None;
        self.quantum_used.remove(&slot);
    }

    /// Charge one tick to the slice; true once the quantum is used up
    fn charge_quantum(&mut self, slot: Slot) -> bool {
        let used = self.quantum_used.entry(slot).or_insert(0);
        *used += 1;
        *used >= self.config.quantum_cycles
    }

    fn preempt(&mut self, core: CoreId, slot: Slot) {
        self.release(core, slot);
        self.processes[slot].make_ready();
        self.ready_queue.push_back(slot);
        self.preemptions += 1;
        debug!(pid = self.processes[slot].pid(), core, tick = self.ticks, "Process preempted");
    }

    fn wake_sleepers(&mut self, now: Tick) -> usize {
        let mut woken = 0;
        let mut still_waiting = Vec::with_capacity(self.waiting.len());

        for slot in std::mem::take(&mut self.waiting) {
            if self.processes[slot].count_down(now) {
                self.processes[slot].make_ready();
                self.ready_queue.push_back(slot);
                woken += 1;
            } else {
                still_waiting.push(slot);
            }
        }

        self.waiting = still_waiting;
        woken
    }

    fn idle_core(&self) -> Option<CoreId> {
        self.cores.iter().position(Option::is_none)
    }

    fn slot(&self, name: &str) -> Result<Slot, SchedulerError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SchedulerError::ProcessNotFound(name.to_string()))
    }

    /// Borrow a process by name
    pub fn process(&self, name: &str) -> Option<&Process> {
        self.names.get(name).map(|&slot| &self.processes[slot])
    }

    pub fn get_process(&self, name: &str) -> Option<ProcessInfo> {
        self.process(name).map(Process::info)
    }

    /// Every process ever created, in creation order
    pub fn all_processes(&self) -> Vec<ProcessInfo> {
        self.processes.iter().map(Process::info).collect()
    }

    /// Processes that have not finished yet
    pub fn running_processes(&self) -> Vec<ProcessInfo> {
        self.processes
            .iter()
            .filter(|p| !p.is_finished())
            .map(Process::info)
            .collect()
    }

    pub fn finished_processes(&self) -> Vec<ProcessInfo> {
        self.processes
            .iter()
            .filter(|p| p.is_finished())
            .map(Process::info)
            .collect()
    }

    /// PIDs in the ready queue, front first
    pub fn ready_queue(&self) -> Vec<Pid> {
        self.ready_queue
            .iter()
            .map(|&slot| self.processes[slot].pid())
            .collect()
    }

    /// PID resident on each core
    pub fn core_table(&self) -> Vec<Option<Pid>> {
        self.cores
            .iter()
            .map(|slot| slot.map(|s| self.processes[s].pid()))
            .collect()
    }

    pub fn cores_used(&self) -> usize {
        self.cores.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn cores_available(&self) -> usize {
        self.cores.len() - self.cores_used()
    }

    /// Busy-core percentage; 0 when no cores are configured
    pub fn cpu_utilization(&self) -> f64 {
        if self.cores.is_empty() {
            return 0.0;
        }
        self.cores_used() as f64 / self.cores.len() as f64 * 100.0
    }

    pub fn stats(&self) -> SchedulerStats {
        let count = |state: ProcessState| self.processes.iter().filter(|p| p.state() == state).count();

        SchedulerStats {
            tick: self.ticks,
            policy: self.config.policy,
            num_cpu: self.cores.len(),
            generating: self.generating,
            total_processes: self.processes.len(),
            ready: count(ProcessState::Ready),
            waiting: count(ProcessState::Waiting),
            finished: count(ProcessState::Finished),
            dispatches: self.dispatches,
            preemptions: self.preemptions,
            cpu_utilization: self.cpu_utilization(),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
