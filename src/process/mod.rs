/*!
 * Process Module
 * Synthetic processes, their instruction set, and program generation
 */

pub mod control;
pub mod generator;
pub mod instruction;
pub mod memory;
pub mod types;

// Re-export for convenience
pub use control::Process;
pub use generator::ProgramGenerator;
pub use instruction::{Effect, ExecContext, ForLoop, Instruction, Step};
pub use memory::Memory;
pub use types::{Execution, ProcessInfo, ProcessState};
