/*!
 * Configuration Types
 * Scheduling policy and the validated configuration record
 */

use crate::core::errors::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Configuration bounds and defaults
pub const DEFAULT_NUM_CPU: usize = 4;
pub const MAX_NUM_CPU: usize = 128;
pub const DEFAULT_QUANTUM_CYCLES: u32 = 5;
pub const DEFAULT_BATCH_PROCESS_FREQ: u64 = 1;
pub const DEFAULT_MIN_INS: u32 = 1000;
pub const DEFAULT_MAX_INS: u32 = 2000;
pub const DEFAULT_DELAYS_PER_EXEC: u32 = 0;

/// Scheduling policy
///
/// Both policies dispatch in FIFO order; they differ only in preemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// First-come first-served, runs until it blocks or finishes
    #[default]
    Fcfs,
    /// Round-robin with a fixed quantum measured in ticks
    RoundRobin,
}

impl Policy {
    /// Convert to the config-file spelling
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::RoundRobin => "rr",
        }
    }

    #[inline]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"').to_lowercase().as_str() {
            "fcfs" => Ok(Self::Fcfs),
            "rr" | "round_robin" | "round-robin" | "roundrobin" => Ok(Self::RoundRobin),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::RoundRobin => write!(f, "Round Robin"),
        }
    }
}

impl Serialize for Policy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Scheduler configuration, loaded once at initialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SchedulerConfig {
    pub num_cpu: usize,
    #[serde(rename = "scheduler")]
    pub policy: Policy,
    /// Ticks per slice, ignored under FCFS
    pub quantum_cycles: u32,
    /// Ticks between automatic process spawns
    pub batch_process_freq: u64,
    pub min_ins: u32,
    pub max_ins: u32,
    /// Busy-wait ticks after each executed instruction
    pub delays_per_exec: u32,
}

impl SchedulerConfig {
    pub fn new(num_cpu: usize, policy: Policy) -> Self {
        Self {
            num_cpu,
            policy,
            ..Self::default()
        }
    }

    pub fn with_quantum(mut self, quantum_cycles: u32) -> Self {
        self.quantum_cycles = quantum_cycles;
        self
    }

    pub fn with_batch_freq(mut self, batch_process_freq: u64) -> Self {
        self.batch_process_freq = batch_process_freq;
        self
    }

    pub fn with_instruction_range(mut self, min_ins: u32, max_ins: u32) -> Self {
        self.min_ins = min_ins;
        self.max_ins = max_ins;
        self
    }

    pub fn with_delays(mut self, delays_per_exec: u32) -> Self {
        self.delays_per_exec = delays_per_exec;
        self
    }

    /// Clamp every field into its safe range
    pub fn sanitized(mut self) -> Self {
        self.num_cpu = self.num_cpu.clamp(1, MAX_NUM_CPU);
        self.quantum_cycles = self.quantum_cycles.max(1);
        self.batch_process_freq = self.batch_process_freq.max(1);
        self.min_ins = self.min_ins.max(1);
        self.max_ins = self.max_ins.max(self.min_ins);
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_cpu: DEFAULT_NUM_CPU,
            policy: Policy::Fcfs,
            quantum_cycles: DEFAULT_QUANTUM_CYCLES,
            batch_process_freq: DEFAULT_BATCH_PROCESS_FREQ,
            min_ins: DEFAULT_MIN_INS,
            max_ins: DEFAULT_MAX_INS,
            delays_per_exec: DEFAULT_DELAYS_PER_EXEC,
        }
    }
}
