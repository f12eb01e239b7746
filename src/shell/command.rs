/*!
 * Shell Commands
 * Parsing of user input lines into commands
 */

use crate::core::errors::ShellError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Initialize,
    /// `screen -s <name>`: create and attach
    ScreenCreate(String),
    /// `screen -r <name>`: attach to an existing process
    ScreenResume(String),
    /// `screen -ls`
    ScreenList,
    SchedulerStart,
    SchedulerStop,
    ReportUtil,
    ProcessSmi,
    Exit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ShellError> {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        let command = match (parts.next(), parts.next()) {
            (Some("initialize"), None) => Self::Initialize,
            (Some("scheduler-start" | "scheduler-test"), None) => Self::SchedulerStart,
            (Some("scheduler-stop"), None) => Self::SchedulerStop,
            (Some("report-util"), None) => Self::ReportUtil,
            (Some("process-smi"), None) => Self::ProcessSmi,
            (Some("exit"), None) => Self::Exit,
            (Some("screen"), Some("-ls")) => Self::ScreenList,
            (Some("screen"), Some(flag @ ("-s" | "-r"))) => {
                let name = parts
                    .next()
                    .ok_or_else(|| ShellError::MissingArgument(format!("screen {}", flag)))?;
                if parts.next().is_some() {
                    return Err(ShellError::UnknownCommand(line.to_string()));
                }
                if flag == "-s" {
                    Self::ScreenCreate(name.to_string())
                } else {
                    Self::ScreenResume(name.to_string())
                }
            }
            _ => return Err(ShellError::UnknownCommand(line.to_string())),
        };

        if parts.next().is_some() {
            return Err(ShellError::UnknownCommand(line.to_string()));
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("initialize").unwrap(), Command::Initialize);
        assert_eq!(Command::parse("  exit ").unwrap(), Command::Exit);
        assert_eq!(Command::parse("scheduler-test").unwrap(), Command::SchedulerStart);
        assert_eq!(Command::parse("screen -ls").unwrap(), Command::ScreenList);
    }

    #[test]
    fn test_parse_screen_names() {
        assert_eq!(
            Command::parse("screen -s p1").unwrap(),
            Command::ScreenCreate("p1".into())
        );
        assert_eq!(
            Command::parse("screen -r p1").unwrap(),
            Command::ScreenResume("p1".into())
        );
        assert_eq!(
            Command::parse("screen -s"),
            Err(ShellError::MissingArgument("screen -s".into()))
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(Command::parse("dance"), Err(ShellError::UnknownCommand(_))));
        assert!(matches!(Command::parse("exit now"), Err(ShellError::UnknownCommand(_))));
        assert!(matches!(Command::parse(""), Err(ShellError::UnknownCommand(_))));
    }
}
