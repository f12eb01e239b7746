/*!
 * Console
 *
 * Dispatches parsed commands to the scheduler and renders replies. Holds
 * only presentation state (which process screen is attached).
 */

use super::command::Command;
use crate::config::ConfigLoader;
use crate::core::errors::{Result, SchedulerError, ShellError};
use crate::scheduler::SchedulerHandle;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

/// Reply to one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Exit,
}

pub struct Console {
    scheduler: SchedulerHandle,
    config_path: PathBuf,
    report_path: PathBuf,
    attached: Option<String>,
}

impl Console {
    pub fn new(
        scheduler: SchedulerHandle,
        config_path: impl Into<PathBuf>,
        report_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scheduler,
            config_path: config_path.into(),
            report_path: report_path.into(),
            attached: None,
        }
    }

    /// Name of the attached process screen
    pub fn attached(&self) -> Option<&str> {
        self.attached.as_deref()
    }

    pub fn prompt(&self) -> String {
        match &self.attached {
            Some(name) => format!("{}:\\> ", name),
            None => "root:\\> ".to_string(),
        }
    }

    /// Parse and run one input line
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        let command = Command::parse(line)?;
        debug!(?command, attached = ?self.attached, "Shell command");

        if self.attached.is_some() {
            return self.execute_in_screen(command, line);
        }

        match command {
            Command::Initialize => self.initialize(),
            Command::Exit => Ok(Reply::Exit),
            Command::ProcessSmi => Err(ShellError::NotAttached("process-smi".into()).into()),
            _ if !self.scheduler.is_initialized() => Err(ShellError::NotInitialized.into()),
            Command::ScreenCreate(name) => {
                self.scheduler.create_process(&name)?;
                self.attach(name)
            }
            Command::ScreenResume(name) => match self.scheduler.get_process(&name) {
                Some(info) if !info.is_finished() => self.attach(name),
                _ => Ok(Reply::Output(format!("Process {} not found.", name))),
            },
            Command::ScreenList => Ok(Reply::Output(self.scheduler.report().render())),
            Command::SchedulerStart => {
                self.scheduler.start();
                Ok(Reply::Output("Scheduler started generating processes.".into()))
            }
            Command::SchedulerStop => {
                self.scheduler.stop();
                Ok(Reply::Output("Scheduler stopped generating processes.".into()))
            }
            Command::ReportUtil => {
                let report = self.scheduler.report();
                report.write_to(&self.report_path)?;
                Ok(Reply::Output(format!(
                    "{}\nReport generated at {}",
                    report.render(),
                    self.report_path.display()
                )))
            }
        }
    }

    fn execute_in_screen(&mut self, command: Command, line: &str) -> Result<Reply> {
        match command {
            Command::ProcessSmi => self.process_smi(),
            Command::Exit => {
                self.attached = None;
                Ok(Reply::Output(String::new()))
            }
            _ => Err(ShellError::UnknownCommand(line.trim().to_string()).into()),
        }
    }

    fn initialize(&mut self) -> Result<Reply> {
        let config = ConfigLoader::load(&self.config_path);
        match self.scheduler.initialize(config.clone()) {
            Ok(()) => {
                let mut out = String::from("System initialized with:\n");
                let _ = writeln!(out, "CPUs: {}", config.num_cpu);
                let _ = writeln!(out, "Scheduler: {}", config.policy);
                if config.policy.is_preemptive() {
                    let _ = writeln!(out, "Quantum cycles: {}", config.quantum_cycles);
                }
                let _ = writeln!(out, "Batch process frequency: {}", config.batch_process_freq);
                let _ = writeln!(out, "Min instructions: {}", config.min_ins);
                let _ = writeln!(out, "Max instructions: {}", config.max_ins);
                let _ = write!(out, "Delays per exec: {}", config.delays_per_exec);
                Ok(Reply::Output(out))
            }
            Err(SchedulerError::AlreadyInitialized) => {
                Ok(Reply::Output("System already initialized.".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn attach(&mut self, name: String) -> Result<Reply> {
        let reply = self.screen_view(&name)?;
        self.attached = Some(name);
        Ok(reply)
    }

    /// Header shown when a screen opens
    fn screen_view(&self, name: &str) -> Result<Reply> {
        let info = self
            .scheduler
            .get_process(name)
            .ok_or_else(|| SchedulerError::ProcessNotFound(name.to_string()))?;

        Ok(Reply::Output(format!(
            "Process: {}\nID: {}\nCurrent instruction line: {}\nLines of code: {}\nCreated: {}",
            info.name,
            info.pid,
            info.current_line,
            info.total_lines,
            info.display_time()
        )))
    }

    fn process_smi(&mut self) -> Result<Reply> {
        let name = match &self.attached {
            Some(name) => name.clone(),
            None => return Err(ShellError::NotAttached("process-smi".into()).into()),
        };

        // Out-of-band placement so the process makes progress while inspected
        let outcome = self.scheduler.try_assign(&name)?;
        debug!(name = %name, ?outcome, "process-smi assignment");

        let (info, logs) = self
            .scheduler
            .inspect(&name)
            .ok_or_else(|| SchedulerError::ProcessNotFound(name.clone()))?;

        let mut out = String::new();
        let _ = writeln!(out, "Process: {}", info.name);
        let _ = writeln!(out, "ID: {}", info.pid);
        if info.is_finished() {
            let _ = writeln!(out, "Finished!");
        } else {
            let _ = writeln!(out, "State: {}", info.state);
            let _ = writeln!(out, "Current instruction line: {}", info.current_line);
            let _ = writeln!(out, "Lines of code: {}", info.total_lines);
        }
        let _ = writeln!(out, "\nLogs:");
        for entry in logs {
            let _ = writeln!(out, "{}", entry);
        }
        Ok(Reply::Output(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::EmulatorError;

    fn console() -> (Console, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.txt");
        std::fs::write(&config, "num-cpu 2\nscheduler fcfs\nmin-ins 3\nmax-ins 3\n").unwrap();
        let console = Console::new(
            SchedulerHandle::default(),
            config,
            dir.path().join("csopesy-log.txt"),
        );
        (console, dir)
    }

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            Reply::Exit => panic!("unexpected exit"),
        }
    }

    #[test]
    fn test_requires_initialize() {
        let (mut console, _dir) = console();
        let err = console.execute("screen -ls").unwrap_err();
        assert!(matches!(err, EmulatorError::Shell(ShellError::NotInitialized)));
    }

    #[test]
    fn test_initialize_twice() {
        let (mut console, _dir) = console();
        let first = output(console.execute("initialize").unwrap());
        assert!(first.contains("CPUs: 2"));
        let second = output(console.execute("initialize").unwrap());
        assert_eq!(second, "System already initialized.");
    }

    #[test]
    fn test_screen_create_attaches_and_detaches() {
        let (mut console, _dir) = console();
        console.execute("initialize").unwrap();

        let view = output(console.execute("screen -s p1").unwrap());
        assert!(view.contains("Process: p1"));
        assert!(view.contains("Lines of code: 3"));
        assert_eq!(console.attached(), Some("p1"));
        assert_eq!(console.prompt(), "p1:\\> ");

        console.execute("exit").unwrap();
        assert_eq!(console.attached(), None);
    }

    #[test]
    fn test_duplicate_screen_is_error_value() {
        let (mut console, _dir) = console();
        console.execute("initialize").unwrap();
        console.execute("screen -s p1").unwrap();
        console.execute("exit").unwrap();

        let err = console.execute("screen -s p1").unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::Scheduler(SchedulerError::DuplicateProcess(_))
        ));
        assert_eq!(console.attached(), None);
    }

    #[test]
    fn test_resume_missing_process() {
        let (mut console, _dir) = console();
        console.execute("initialize").unwrap();
        let reply = output(console.execute("screen -r ghost").unwrap());
        assert_eq!(reply, "Process ghost not found.");
    }

    #[test]
    fn test_process_smi_assigns_out_of_band() {
        let (mut console, _dir) = console();
        console.execute("initialize").unwrap();
        console.execute("screen -s p1").unwrap();

        let smi = output(console.execute("process-smi").unwrap());
        assert!(smi.contains("State: RUNNING"));
        assert_eq!(console.scheduler.get_process("p1").unwrap().core, Some(0));
    }

    #[test]
    fn test_main_menu_commands_rejected_in_screen() {
        let (mut console, _dir) = console();
        console.execute("initialize").unwrap();
        console.execute("screen -s p1").unwrap();
        assert!(console.execute("scheduler-start").is_err());
        assert!(!console.scheduler.is_generating());
    }

    #[test]
    fn test_report_util_writes_file() {
        let (mut console, dir) = console();
        console.execute("initialize").unwrap();
        let reply = output(console.execute("report-util").unwrap());
        assert!(reply.contains("CPU utilization: 0.00%"));
        assert!(dir.path().join("csopesy-log.txt").exists());
    }

    #[test]
    fn test_exit_from_main_menu() {
        let (mut console, _dir) = console();
        assert_eq!(console.execute("exit").unwrap(), Reply::Exit);
    }
}
