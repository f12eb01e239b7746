/*!
 * Process Control Block
 *
 * A process owns its program, cursor, memory, and lifecycle bookkeeping.
 * State transitions are driven by the scheduler; the process itself only
 * advances its cursor when given a tick of CPU.
 */

use super::instruction::{Effect, ExecContext, Instruction};
use super::memory::Memory;
use super::types::{Execution, ProcessInfo, ProcessState};
use crate::core::types::{CoreId, Pid, Tick, Word};
use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    name: String,
    state: ProcessState,
    program: Vec<Instruction>,
    current_line: usize,
    memory: Memory,
    core: Option<CoreId>,
    wait_ticks: u32,
    blocked_at: Option<Tick>,
    execution_ticks: u64,
    delays_per_exec: u32,
    delay_remaining: u32,
    created_at: OffsetDateTime,
    finished_tick: Option<Tick>,
    finished_at: Option<OffsetDateTime>,
}

impl Process {
    pub fn new(pid: Pid, name: impl Into<String>, program: Vec<Instruction>) -> Self {
        Self {
            pid,
            name: name.into(),
            state: ProcessState::Ready,
            program,
            current_line: 0,
            memory: Memory::default(),
            core: None,
            wait_ticks: 0,
            blocked_at: None,
            execution_ticks: 0,
            delays_per_exec: 0,
            delay_remaining: 0,
            created_at: OffsetDateTime::now_utc(),
            finished_tick: None,
            finished_at: None,
        }
    }

    /// Busy-wait this many ticks after every executed instruction
    pub fn with_delays(mut self, delays_per_exec: u32) -> Self {
        self.delays_per_exec = delays_per_exec;
        self
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn total_lines(&self) -> usize {
        self.program.len()
    }

    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    pub fn core(&self) -> Option<CoreId> {
        self.core
    }

    pub fn wait_ticks(&self) -> u32 {
        self.wait_ticks
    }

    pub fn execution_ticks(&self) -> u64 {
        self.execution_ticks
    }

    pub fn finished_tick(&self) -> Option<Tick> {
        self.finished_tick
    }

    pub fn is_finished(&self) -> bool {
        self.state == ProcessState::Finished
    }

    pub fn output_log(&self) -> &[String] {
        self.memory.output()
    }

    pub fn variable(&self, name: &str) -> Option<Word> {
        self.memory.get(name)
    }

    pub fn variables(&self) -> Vec<(String, Word)> {
        self.memory.variables()
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            name: self.name.clone(),
            state: self.state,
            current_line: self.current_line,
            total_lines: self.total_lines(),
            core: self.core,
            execution_ticks: self.execution_ticks,
            wait_ticks: self.wait_ticks,
            created_at: self.created_at,
            finished_tick: self.finished_tick,
            finished_at: self.finished_at,
        }
    }

    /// Advance by one tick of CPU time
    ///
    /// A slot advances the cursor only when its instruction completes, so a
    /// partially run loop keeps the process on the loop's line.
    pub fn execute(&mut self) -> Execution {
        if self.current_line >= self.program.len() {
            return Execution::Completed;
        }

        self.execution_ticks += 1;

        if self.delay_remaining > 0 {
            self.delay_remaining -= 1;
            return Execution::Delayed;
        }

        let ctx = ExecContext { core: self.core };
        let step = self.program[self.current_line].execute(&mut self.memory, &ctx);
        if step.completed {
            self.current_line += 1;
        }
        self.delay_remaining = self.delays_per_exec;

        if self.current_line >= self.program.len() {
            Execution::Completed
        } else {
            match step.effect {
                Effect::Sleep(cycles) => Execution::Slept(cycles),
                Effect::None => Execution::Ran,
            }
        }
    }

    pub(crate) fn dispatch(&mut self, core: CoreId) {
        self.state = ProcessState::Running;
        self.core = Some(core);
    }

    /// Return to the ready state, giving up any core
    pub(crate) fn make_ready(&mut self) {
        self.state = ProcessState::Ready;
        self.core = None;
        self.blocked_at = None;
    }

    pub(crate) fn block(&mut self, cycles: u8, tick: Tick) {
        self.state = ProcessState::Waiting;
        self.core = None;
        self.wait_ticks = u32::from(cycles);
        self.blocked_at = Some(tick);
    }

    /// Count down one tick of waiting; true once the wait has elapsed
    ///
    /// The tick in which the process blocked is not counted.
    pub(crate) fn count_down(&mut self, tick: Tick) -> bool {
        if self.blocked_at != Some(tick) {
            self.wait_ticks = self.wait_ticks.saturating_sub(1);
        }
        self.wait_ticks == 0
    }

    pub(crate) fn finish(&mut self, tick: Tick) {
        self.state = ProcessState::Finished;
        self.core = None;
        if self.finished_tick.is_none() {
            self.finished_tick = Some(tick);
            self.finished_at = Some(OffsetDateTime::now_utc());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_advances_cursor() {
        let mut p = Process::new(1, "p1", vec![Instruction::declare("x", 1), Instruction::print("hi")]);
        p.dispatch(0);

        assert_eq!(p.execute(), Execution::Ran);
        assert_eq!(p.current_line(), 1);
        assert_eq!(p.execute(), Execution::Completed);
        assert_eq!(p.current_line(), 2);
        assert_eq!(p.execution_ticks(), 2);
    }

    #[test]
    fn test_for_loop_holds_line_until_exhausted() {
        let program = vec![
            Instruction::for_loop(vec![Instruction::print("a")], 3),
            Instruction::print("after"),
        ];
        let mut p = Process::new(1, "p1", program);

        p.execute();
        p.execute();
        assert_eq!(p.current_line(), 0);
        p.execute();
        assert_eq!(p.current_line(), 1);
    }

    #[test]
    fn test_delays_busy_wait_between_instructions() {
        let program = vec![Instruction::print("a"), Instruction::print("b"), Instruction::print("c")];
        let mut p = Process::new(1, "p1", program).with_delays(2);

        assert_eq!(p.execute(), Execution::Ran);
        assert_eq!(p.execute(), Execution::Delayed);
        assert_eq!(p.execute(), Execution::Delayed);
        assert_eq!(p.execute(), Execution::Ran);
        assert_eq!(p.current_line(), 2);
    }

    #[test]
    fn test_sleep_then_count_down() {
        let mut p = Process::new(1, "p1", vec![Instruction::sleep(2), Instruction::print("x")]);
        assert_eq!(p.execute(), Execution::Slept(2));

        p.block(2, 5);
        assert_eq!(p.state(), ProcessState::Waiting);
        assert!(!p.count_down(5));
        assert!(!p.count_down(6));
        assert!(p.count_down(7));
    }

    #[test]
    fn test_finish_timestamp_set_once() {
        let mut p = Process::new(1, "p1", vec![]);
        p.finish(3);
        p.finish(9);
        assert_eq!(p.finished_tick(), Some(3));
        assert!(p.info().finished_at.is_some());
    }

    #[test]
    fn test_empty_program_completes() {
        let mut p = Process::new(1, "p1", vec![]);
        assert_eq!(p.execute(), Execution::Completed);
        assert_eq!(p.execution_ticks(), 0);
    }
}
