/*!
 * Configuration Module
 * Scheduler configuration record and file loader
 */

pub mod loader;
pub mod types;

// Re-export public API
pub use loader::ConfigLoader;
pub use types::{
    Policy, SchedulerConfig, DEFAULT_BATCH_PROCESS_FREQ, DEFAULT_DELAYS_PER_EXEC, DEFAULT_MAX_INS,
    DEFAULT_MIN_INS, DEFAULT_NUM_CPU, DEFAULT_QUANTUM_CYCLES, MAX_NUM_CPU,
};
