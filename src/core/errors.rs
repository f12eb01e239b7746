/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Scheduler has not been initialized")]
    #[diagnostic(
        code(scheduler::not_initialized),
        help("Run 'initialize' before issuing scheduler commands.")
    )]
    NotInitialized,

    #[error("Scheduler is already initialized")]
    #[diagnostic(code(scheduler::already_initialized))]
    AlreadyInitialized,

    #[error("Process {0} already exists")]
    #[diagnostic(
        code(scheduler::duplicate_process),
        help("Process names are unique. Attach with 'screen -r' instead.")
    )]
    DuplicateProcess(String),

    #[error("Process {0} not found")]
    #[diagnostic(
        code(scheduler::process_not_found),
        help("The process may never have been created. Check 'screen -ls'.")
    )]
    ProcessNotFound(String),
}

/// Configuration errors. Never fatal: the loader falls back to defaults.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    #[diagnostic(code(config::io), help("Defaults are used when the file is missing."))]
    Io { path: String, reason: String },

    #[error("Missing value for key '{0}'")]
    #[diagnostic(code(config::missing_value))]
    MissingValue(String),

    #[error("Invalid value '{value}' for key '{key}'")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue { key: String, value: String },

    #[error("Unknown scheduler policy '{0}'")]
    #[diagnostic(code(config::unknown_policy), help("Use 'fcfs' or 'rr'."))]
    UnknownPolicy(String),

    #[error("Malformed JSON config: {0}")]
    #[diagnostic(code(config::json))]
    Json(String),
}

/// Shell command errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ShellError {
    #[error("Unknown command: {0}")]
    #[diagnostic(code(shell::unknown_command))]
    UnknownCommand(String),

    #[error("Command '{0}' requires a process name")]
    #[diagnostic(code(shell::missing_argument))]
    MissingArgument(String),

    #[error("Please initialize the system first using 'initialize' command.")]
    #[diagnostic(code(shell::not_initialized))]
    NotInitialized,

    #[error("Command '{0}' is only available inside a process screen")]
    #[diagnostic(code(shell::not_attached))]
    NotAttached(String),
}

/// Unified emulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum EmulatorError {
    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Config error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Shell error: {0}")]
    #[diagnostic(transparent)]
    Shell(#[from] ShellError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(emulator::io_error),
        help("Filesystem operation failed. Check file permissions and disk space.")
    )]
    Io(String),
}

impl From<std::io::Error> for EmulatorError {
    fn from(err: std::io::Error) -> Self {
        EmulatorError::Io(err.to_string())
    }
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;
