//! Live log following for the Server-Sent-Events endpoint.
//!
//! # Ownership
//!
//! ```text
//! tail -f <log> ──stdout──► pump task ──mpsc──► LogFollower ──► SSE body
//! ```
//!
//! The pump task owns the `tail -f` child.  It forwards one line at a time
//! and waits on `Sender::closed()` alongside the read, so the moment the
//! [`LogFollower`] is dropped (the browser went away and axum dropped the
//! response body) the task wakes up, kills the child and exits.  A `tail -f`
//! never outlives its HTTP client.

use std::path::Path;
use std::process::Stdio;

use futures_util::stream::{self, Stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use backup_core::PanelError;

/// Lines buffered between the pump task and a slow client.
const LINE_BUFFER: usize = 64;

/// Receiving end of a followed log.
pub struct LogFollower {
    lines: mpsc::Receiver<String>,
    pump: JoinHandle<()>,
}

impl LogFollower {
    /// Next line, or `None` once `tail` has exited.
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    /// Turns the follower into a stream of lines.  Dropping the stream stops
    /// the `tail` process.
    pub fn into_stream(self) -> impl Stream<Item = String> + Send + 'static {
        stream::unfold(self, |mut follower| async move {
            let line = follower.lines.recv().await?;
            Some((line, follower))
        })
    }

    /// Drops the receiver and waits for the pump task to kill `tail`.
    pub async fn close(self) {
        let Self { lines, pump } = self;
        drop(lines);
        if let Err(e) = pump.await {
            warn!(error = %e, "log pump task failed");
        }
    }
}

/// Starts `tail -f <path>` and returns the follower for its output.
///
/// # Errors
///
/// [`PanelError::Io`] if `tail_bin` cannot be started.
pub fn follow(tail_bin: &Path, path: &Path) -> Result<LogFollower, PanelError> {
    let mut child = Command::new(tail_bin)
        .arg("-f")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| PanelError::io(tail_bin, e))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| PanelError::upstream("tail started without a stdout pipe"))?;

    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    debug!(path = %path.display(), pid = ?child.id(), "following log");
    let pump = tokio::spawn(pump(child, stdout, tx));

    Ok(LogFollower { lines: rx, pump })
}

async fn pump(mut child: Child, stdout: ChildStdout, tx: mpsc::Sender<String>) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => match read {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(clean_line(&buf)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "log read failed");
                    break;
                }
            },
            () = tx.closed() => break,
        }
    }

    if let Err(e) = child.kill().await {
        debug!(error = %e, "tail already exited");
    }
}

/// Decodes one raw line for an SSE `data:` field.
///
/// Invalid UTF-8 is replaced, trailing whitespace is stripped, and any
/// remaining carriage return is dropped because SSE cannot carry one.
fn clean_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim_end().replace('\r', "")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
