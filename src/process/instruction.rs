/*!
 * Instruction Set
 *
 * Closed set of synthetic instructions interpreted one step at a time.
 * Each step mutates the owning process's memory (variables or output log)
 * and reports whether the program slot is complete.
 */

use super::memory::Memory;
use crate::core::types::{format_timestamp, CoreId, Word};
use serde::Serialize;
use time::OffsetDateTime;

/// Environment an instruction executes in
#[derive(Debug, Clone, Copy)]
pub struct ExecContext {
    pub core: Option<CoreId>,
}

/// Side effect requested by an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Block the owning process for this many ticks
    Sleep(u8),
}

/// Result of one interpreter step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub effect: Effect,
    /// The program slot holding this instruction is done
    pub completed: bool,
}

impl Step {
    const fn done(effect: Effect) -> Self {
        Self {
            effect,
            completed: true,
        }
    }
}

/// A synthetic instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    Print {
        message: String,
    },
    Declare {
        var: String,
        value: Word,
    },
    /// `result = source + literal`, saturating at `u16::MAX`
    Add {
        result: String,
        source: String,
        literal: Word,
    },
    /// `result = source - literal`, floored at 0
    Subtract {
        result: String,
        source: String,
        literal: Word,
    },
    Sleep {
        cycles: u8,
    },
    ForLoop(ForLoop),
}

impl Instruction {
    pub fn print(message: impl Into<String>) -> Self {
        Self::Print {
            message: message.into(),
        }
    }

    pub fn declare(var: impl Into<String>, value: Word) -> Self {
        Self::Declare {
            var: var.into(),
            value,
        }
    }

    pub fn add(result: impl Into<String>, source: impl Into<String>, literal: Word) -> Self {
        Self::Add {
            result: result.into(),
            source: source.into(),
            literal,
        }
    }

    pub fn subtract(result: impl Into<String>, source: impl Into<String>, literal: Word) -> Self {
        Self::Subtract {
            result: result.into(),
            source: source.into(),
            literal,
        }
    }

    pub fn sleep(cycles: u8) -> Self {
        Self::Sleep { cycles }
    }

    pub fn for_loop(body: Vec<Instruction>, repeats: u32) -> Self {
        Self::ForLoop(ForLoop::new(body, repeats))
    }

    /// Execute one step against the owning process's memory
    pub fn execute(&mut self, memory: &mut Memory, ctx: &ExecContext) -> Step {
        match self {
            Self::Print { message } => {
                let core = ctx
                    .core
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string());
                memory.log(format!(
                    "({}) Core:{} \"{}\"",
                    format_timestamp(OffsetDateTime::now_utc()),
                    core,
                    message
                ));
                Step::done(Effect::None)
            }
            Self::Declare { var, value } => {
                memory.write(var, *value);
                Step::done(Effect::None)
            }
            Self::Add {
                result,
                source,
                literal,
            } => {
                let value = memory.read(source).saturating_add(*literal);
                memory.write(result, value);
                Step::done(Effect::None)
            }
            Self::Subtract {
                result,
                source,
                literal,
            } => {
                let value = memory.read(source).saturating_sub(*literal);
                memory.write(result, value);
                Step::done(Effect::None)
            }
            Self::Sleep { cycles } => Step::done(Effect::Sleep(*cycles)),
            Self::ForLoop(lp) => lp.step(memory, ctx),
        }
    }

    /// Number of leaf instructions executed before this slot completes
    pub fn leaf_count(&self) -> u64 {
        match self {
            Self::ForLoop(lp) => lp.leaf_count(),
            _ => 1,
        }
    }

    /// Rewind loop cursors so the instruction can run again
    fn reset(&mut self) {
        if let Self::ForLoop(lp) = self {
            lp.iteration = 0;
            lp.cursor = 0;
            lp.body.iter_mut().for_each(Instruction::reset);
        }
    }

    /// Short mnemonic used in process listings
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Print { .. } => "PRINT",
            Self::Declare { .. } => "DECLARE",
            Self::Add { .. } => "ADD",
            Self::Subtract { .. } => "SUBTRACT",
            Self::Sleep { .. } => "SLEEP",
            Self::ForLoop(_) => "FOR",
        }
    }
}

/// Repeating body that executes one leaf instruction per call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForLoop {
    body: Vec<Instruction>,
    repeats: u32,
    #[serde(skip)]
    iteration: u32,
    #[serde(skip)]
    cursor: usize,
}

impl ForLoop {
    pub fn new(body: Vec<Instruction>, repeats: u32) -> Self {
        Self {
            body,
            repeats,
            iteration: 0,
            cursor: 0,
        }
    }

    pub fn body(&self) -> &[Instruction] {
        &self.body
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Completed passes over the body
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn is_exhausted(&self) -> bool {
        self.body.is_empty() || self.iteration >= self.repeats
    }

    pub fn leaf_count(&self) -> u64 {
        let per_pass: u64 = self.body.iter().map(Instruction::leaf_count).sum();
        per_pass * u64::from(self.repeats)
    }

    fn step(&mut self, memory: &mut Memory, ctx: &ExecContext) -> Step {
        // Degenerate loops still consume the call that discovers them
        if self.is_exhausted() {
            return Step::done(Effect::None);
        }

        let inner = self.body[self.cursor].execute(memory, ctx);
        if inner.completed {
            self.body[self.cursor].reset();
            self.cursor += 1;
            if self.cursor == self.body.len() {
                self.cursor = 0;
                self.iteration += 1;
            }
        }

        Step {
            effect: inner.effect,
            completed: self.is_exhausted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ExecContext {
        ExecContext { core: Some(0) }
    }

    fn run_to_completion(ins: &mut Instruction, memory: &mut Memory) -> u64 {
        let mut calls = 0;
        loop {
            calls += 1;
            if ins.execute(memory, &ctx()).completed {
                return calls;
            }
        }
    }

    #[test]
    fn test_print_formats_core_and_message() {
        let mut memory = Memory::default();
        Instruction::print("hello").execute(&mut memory, &ctx());

        let entry = &memory.output()[0];
        assert!(entry.starts_with('('));
        assert!(entry.ends_with("Core:0 \"hello\""));
    }

    #[test]
    fn test_declare_overwrites() {
        let mut memory = Memory::default();
        Instruction::declare("x", 5).execute(&mut memory, &ctx());
        Instruction::declare("x", 9).execute(&mut memory, &ctx());
        assert_eq!(memory.get("x"), Some(9));
    }

    #[test]
    fn test_add_saturates() {
        let mut memory = Memory::default();
        Instruction::declare("x", u16::MAX - 1).execute(&mut memory, &ctx());
        Instruction::add("x", "x", 10).execute(&mut memory, &ctx());
        assert_eq!(memory.get("x"), Some(u16::MAX));
    }

    #[test]
    fn test_subtract_floors_at_zero() {
        let mut memory = Memory::default();
        Instruction::subtract("y", "unset", 3).execute(&mut memory, &ctx());
        assert_eq!(memory.get("y"), Some(0));
        // Reading an unseen operand declares it
        assert_eq!(memory.get("unset"), Some(0));
    }

    #[test]
    fn test_sleep_requests_block() {
        let mut memory = Memory::default();
        let step = Instruction::sleep(4).execute(&mut memory, &ctx());
        assert_eq!(step.effect, Effect::Sleep(4));
        assert!(step.completed);
    }

    #[test]
    fn test_for_loop_runs_body_times_repeats() {
        let mut memory = Memory::default();
        let mut lp = Instruction::for_loop(
            vec![Instruction::print("a"), Instruction::print("b")],
            3,
        );

        assert_eq!(lp.leaf_count(), 6);
        assert_eq!(run_to_completion(&mut lp, &mut memory), 6);
        assert_eq!(memory.output().len(), 6);
        assert!(memory.output()[1].ends_with("\"b\""));
    }

    #[test]
    fn test_nested_for_loop_reenters_inner_body() {
        let mut memory = Memory::default();
        let inner = Instruction::for_loop(vec![Instruction::add("n", "n", 1)], 2);
        let mut outer = Instruction::for_loop(vec![inner, Instruction::print("tick")], 3);

        assert_eq!(outer.leaf_count(), 9);
        assert_eq!(run_to_completion(&mut outer, &mut memory), 9);
        assert_eq!(memory.get("n"), Some(6));
        assert_eq!(memory.output().len(), 3);
    }

    #[test]
    fn test_empty_loop_completes_immediately() {
        let mut memory = Memory::default();
        let mut lp = Instruction::for_loop(vec![], 5);
        assert!(lp.execute(&mut memory, &ctx()).completed);

        let mut zero = Instruction::for_loop(vec![Instruction::print("never")], 0);
        assert!(zero.execute(&mut memory, &ctx()).completed);
        assert!(memory.output().is_empty());
    }

    #[test]
    fn test_sleep_inside_loop_propagates() {
        let mut memory = Memory::default();
        let mut lp = Instruction::for_loop(vec![Instruction::sleep(2)], 2);

        let first = lp.execute(&mut memory, &ctx());
        assert_eq!(first.effect, Effect::Sleep(2));
        assert!(!first.completed);

        let second = lp.execute(&mut memory, &ctx());
        assert!(second.completed);
    }
}
