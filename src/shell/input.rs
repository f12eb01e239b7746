/*!
 * Line Input
 * Blocking line reader bridged onto an async channel
 */

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;
use tracing::warn;

/// Forward lines from a blocking reader to an async channel
///
/// The reader runs on its own OS thread, so a read that never returns does
/// not hold up runtime shutdown. The channel closes at end of input or on
/// the first read error.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    let spawned = thread::Builder::new()
        .name("line-reader".into())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Input read failed");
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        warn!(error = %e, "Failed to spawn input reader");
    }

    line_rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    /// Reader whose first read blocks until the paired sender is dropped
    struct Stalled(std_mpsc::Receiver<()>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_lines_forwarded_then_closed() {
        let mut lines = spawn_line_reader(Cursor::new("initialize\nscreen -ls\n"));

        assert_eq!(lines.recv().await.as_deref(), Some("initialize"));
        assert_eq!(lines.recv().await.as_deref(), Some("screen -ls"));
        assert_eq!(lines.recv().await, None);
    }

    #[test]
    fn test_pending_read_does_not_block_runtime_drop() {
        let (release, stalled) = std_mpsc::channel::<()>();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();

        let received = runtime.block_on(async {
            let mut lines = spawn_line_reader(BufReader::new(Stalled(stalled)));
            tokio::time::timeout(Duration::from_millis(20), lines.recv()).await
        });
        assert!(received.is_err());

        // Read is still pending here; dropping the runtime must not wait on it
        drop(runtime);
        drop(release);
    }
}
