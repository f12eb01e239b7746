/*!
 * Program Generator
 * Builds random instruction streams for synthetic processes
 */

use super::instruction::Instruction;
use crate::core::types::Word;
use rand::Rng;

const VARIABLES: [&str; 4] = ["x", "y", "z", "counter"];
const MAX_LITERAL: Word = 500;
const MAX_SLEEP: u8 = 5;
const MAX_LOOP_DEPTH: usize = 3;

/// Uniform program generator over the six instruction kinds
#[derive(Debug, Clone, Copy)]
pub struct ProgramGenerator {
    min_ins: u32,
    max_ins: u32,
}

impl ProgramGenerator {
    pub fn new(min_ins: u32, max_ins: u32) -> Self {
        let min_ins = min_ins.max(1);
        Self {
            min_ins,
            max_ins: max_ins.max(min_ins),
        }
    }

    /// Program for `name` with a uniformly chosen length in `[min_ins, max_ins]`
    pub fn generate<R: Rng>(&self, name: &str, rng: &mut R) -> Vec<Instruction> {
        let len = rng.gen_range(self.min_ins..=self.max_ins);
        (0..len).map(|_| self.instruction(name, rng, 1)).collect()
    }

    fn instruction<R: Rng>(&self, name: &str, rng: &mut R, depth: usize) -> Instruction {
        match rng.gen_range(0..6) {
            0 => greeting(name),
            1 => Instruction::declare(variable(rng), rng.gen_range(0..=MAX_LITERAL)),
            2 => Instruction::add(variable(rng), variable(rng), rng.gen_range(1..=MAX_LITERAL)),
            3 => Instruction::subtract(variable(rng), variable(rng), rng.gen_range(1..=MAX_LITERAL)),
            4 => Instruction::sleep(rng.gen_range(1..=MAX_SLEEP)),
            _ => self.for_loop(name, rng, depth),
        }
    }

    /// Loop of 1-3 body slots repeated 2-4 times; innermost bodies are prints
    fn for_loop<R: Rng>(&self, name: &str, rng: &mut R, depth: usize) -> Instruction {
        let body_len = rng.gen_range(1..=3);
        let body = (0..body_len)
            .map(|_| {
                if depth < MAX_LOOP_DEPTH && rng.gen_bool(0.25) {
                    self.for_loop(name, rng, depth + 1)
                } else {
                    greeting(name)
                }
            })
            .collect();
        Instruction::for_loop(body, rng.gen_range(2..=4))
    }
}

fn greeting(name: &str) -> Instruction {
    Instruction::print(format!("Hello world from {}!", name))
}

fn variable<R: Rng>(rng: &mut R) -> &'static str {
    VARIABLES[rng.gen_range(0..VARIABLES.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn loop_depth(ins: &Instruction) -> usize {
        match ins {
            Instruction::ForLoop(lp) => 1 + lp.body().iter().map(loop_depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    #[test]
    fn test_length_within_bounds() {
        let generator = ProgramGenerator::new(5, 10);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let program = generator.generate("p", &mut rng);
            assert!((5..=10).contains(&program.len()));
        }
    }

    #[test]
    fn test_fixed_length() {
        let generator = ProgramGenerator::new(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generator.generate("p", &mut rng).len(), 3);
    }

    #[test]
    fn test_all_kinds_generated() {
        let generator = ProgramGenerator::new(500, 500);
        let mut rng = StdRng::seed_from_u64(42);
        let program = generator.generate("p", &mut rng);

        for kind in ["PRINT", "DECLARE", "ADD", "SUBTRACT", "SLEEP", "FOR"] {
            assert!(program.iter().any(|i| i.mnemonic() == kind), "missing {}", kind);
        }
    }

    #[test]
    fn test_loop_shape() {
        let generator = ProgramGenerator::new(500, 500);
        let mut rng = StdRng::seed_from_u64(3);

        for ins in generator.generate("p", &mut rng) {
            if let Instruction::ForLoop(lp) = &ins {
                assert!((2..=4).contains(&lp.repeats()));
                assert!((1..=3).contains(&lp.body().len()));
                assert!(loop_depth(&ins) <= MAX_LOOP_DEPTH);
            }
        }
    }

    #[test]
    fn test_inverted_bounds_normalized() {
        let generator = ProgramGenerator::new(0, 0);
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(generator.generate("p", &mut rng).len(), 1);
    }
}
