/*!
 * Clock Task - Periodic Tick Driver
 *
 * Background task that advances the scheduler one tick per interval,
 * independent of interactive command handling.
 */

use super::handle::SchedulerHandle;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Default wall-clock length of one tick
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Control messages for the clock task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    /// Stop advancing the clock
    Pause,
    /// Resume advancing the clock
    Resume,
    /// Stop the task
    Shutdown,
}

/// Handle to the clock background task
pub struct ClockTask {
    command_tx: mpsc::UnboundedSender<ClockCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl ClockTask {
    /// Spawn the clock on the current tokio runtime
    pub fn spawn(scheduler: SchedulerHandle, period: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            run_clock_loop(scheduler, period, command_rx).await;
        });

        info!(period_ms = period.as_millis() as u64, "Clock task spawned");

        Self {
            command_tx,
            handle: Some(handle),
        }
    }

    pub fn pause(&self) {
        let _ = self.command_tx.send(ClockCommand::Pause);
    }

    pub fn resume(&self) {
        let _ = self.command_tx.send(ClockCommand::Resume);
    }

    /// Ask the task to stop without waiting; safe to call repeatedly
    pub fn stop(&self) {
        let _ = self.command_tx.send(ClockCommand::Shutdown);
    }

    /// Stop the task and wait for it to finish
    pub async fn shutdown(mut self) {
        self.stop();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Clock task shutdown error: {}", e);
            } else {
                info!("Clock task shutdown complete");
            }
        }
    }
}

async fn run_clock_loop(
    scheduler: SchedulerHandle,
    period: Duration,
    mut command_rx: mpsc::UnboundedReceiver<ClockCommand>,
) {
    let mut active = true;
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Commands win ties so a shutdown is seen before the next tick
            biased;

            cmd = command_rx.recv() => {
                match cmd {
                    Some(ClockCommand::Pause) => {
                        info!("Clock paused");
                        active = false;
                    }
                    Some(ClockCommand::Resume) => {
                        info!("Clock resumed");
                        active = true;
                    }
                    Some(ClockCommand::Shutdown) | None => {
                        info!("Clock task shutting down");
                        break;
                    }
                }
            }

            _ = interval.tick() => {
                if active {
                    scheduler.tick();
                }
            }
        }
    }
}

impl Drop for ClockTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.command_tx.send(ClockCommand::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Policy, SchedulerConfig};
    use crate::scheduler::Scheduler;

    fn handle() -> SchedulerHandle {
        SchedulerHandle::new(Scheduler::with_config(SchedulerConfig::new(1, Policy::Fcfs)))
    }

    #[tokio::test]
    async fn test_clock_lifecycle() {
        let scheduler = handle();
        let clock = ClockTask::spawn(scheduler.clone(), Duration::from_millis(1));

        tokio::time::sleep(Duration::from_millis(20)).await;
        clock.shutdown().await;

        let ticks = scheduler.with(|s| s.ticks());
        assert!(ticks > 0);

        // No further ticks after shutdown
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(scheduler.with(|s| s.ticks()), ticks);
    }

    #[tokio::test]
    async fn test_pause_stops_ticking() {
        let scheduler = handle();
        let clock = ClockTask::spawn(scheduler.clone(), Duration::from_millis(1));

        clock.pause();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let paused_at = scheduler.with(|s| s.ticks());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(scheduler.with(|s| s.ticks()), paused_at);

        clock.resume();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(scheduler.with(|s| s.ticks()) > paused_at);

        clock.shutdown().await;
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let clock = ClockTask::spawn(handle(), Duration::from_millis(5));
        clock.stop();
        clock.stop();
        clock.shutdown().await;
    }
}
