/*!
 * OS Emulator - Main Entry Point
 *
 * Starts the virtual clock and runs the interactive shell on stdin.
 * Environment:
 * - EMULATOR_CONFIG: config file path (default: config.txt)
 * - EMULATOR_TICK_MS: wall-clock milliseconds per tick (default: 100)
 * - EMULATOR_REPORT_PATH: report-util output file (default: csopesy-log.txt)
 */

use os_emulator::scheduler::DEFAULT_TICK_PERIOD;
use os_emulator::shell::spawn_line_reader;
use os_emulator::{init_tracing, ClockTask, Console, Reply, Scheduler, SchedulerHandle};
use std::io::{BufReader, Write};
use std::time::Duration;
use tracing::{info, warn};

fn banner() {
    println!("-----------------------------------------------");
    println!("Welcome to the OS Emulator!");
    println!("Type 'initialize' to load the configuration.");
    println!("-----------------------------------------------");
}

fn tick_period() -> Duration {
    match std::env::var("EMULATOR_TICK_MS") {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(e) => {
                warn!(value = %raw, error = %e, "Invalid EMULATOR_TICK_MS, using default");
                DEFAULT_TICK_PERIOD
            }
        },
        Err(_) => DEFAULT_TICK_PERIOD,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_path = std::env::var("EMULATOR_CONFIG").unwrap_or_else(|_| "config.txt".into());
    let report_path =
        std::env::var("EMULATOR_REPORT_PATH").unwrap_or_else(|_| "csopesy-log.txt".into());

    let scheduler = SchedulerHandle::new(Scheduler::new());
    let clock = ClockTask::spawn(scheduler.clone(), tick_period());
    let mut console = Console::new(scheduler, config_path, report_path);

    banner();

    let mut lines = spawn_line_reader(BufReader::new(std::io::stdin()));
    loop {
        print!("{}", console.prompt());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match console.execute(&line) {
            Ok(Reply::Output(text)) => {
                if !text.is_empty() {
                    println!("{}", text.trim_end());
                }
            }
            Ok(Reply::Exit) => break,
            Err(e) => println!("{}", e),
        }
    }

    info!("Shell exiting");
    clock.shutdown().await;
    Ok(())
}
