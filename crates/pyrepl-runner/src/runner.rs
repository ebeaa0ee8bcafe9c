//! Interpreter subprocess runner
//!
//! Spawns `interpreter -c <code>`, accumulates both output streams as
//! data arrives, and races process completion against a hard timeout.
//! The run is classified into exactly one of: completed (with exit
//! code), timed out, or launch failed.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default wall-clock limit for a single execution
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default interpreter binary, resolved via PATH
pub const DEFAULT_INTERPRETER: &str = "python3";

/// How a single run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Process ran to completion with the given exit code
    Completed { exit_code: i32 },
    /// Process exceeded the wall-clock limit and was killed
    TimedOut,
    /// Process could not be started at all
    LaunchFailed { message: String },
}

/// Captured result of one run
///
/// Streams hold whatever the process emitted before it terminated,
/// including partial output from a timed-out run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Accumulated standard output, untrimmed
    pub stdout: String,

    /// Accumulated standard error, untrimmed
    pub stderr: String,

    /// Completion classification
    pub status: RunStatus,
}

impl RunOutcome {
    /// Exit code 0 and nothing on stderr
    pub fn is_clean(&self) -> bool {
        matches!(self.status, RunStatus::Completed { exit_code: 0 }) && self.stderr.is_empty()
    }

    fn launch_failed(message: String) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            status: RunStatus::LaunchFailed { message },
        }
    }
}

/// Executes one unit of source code per call in an isolated OS process
#[derive(Debug, Clone)]
pub struct Runner {
    interpreter: String,
    timeout: Duration,
}

impl Runner {
    /// Create a runner with the default interpreter and timeout
    pub fn new() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different interpreter binary
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Use a different wall-clock limit
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured wall-clock limit
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The configured interpreter binary
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Run the given code text as the interpreter's sole program argument
    ///
    /// Never returns an error: launch failures are absorbed into the
    /// outcome so the caller can persist them alongside script errors.
    pub async fn run(&self, code: &str) -> RunOutcome {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg("-c")
            .arg(code)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn interpreter '{}': {}", self.interpreter, e);
                return RunOutcome::launch_failed(e.to_string());
            }
        };

        let stdout_buf = Arc::new(RwLock::new(Vec::new()));
        let stderr_buf = Arc::new(RwLock::new(Vec::new()));

        let stdout_task = child.stdout.take().map(|pipe| capture(pipe, stdout_buf.clone()));
        let stderr_task = child.stderr.take().map(|pipe| capture(pipe, stderr_buf.clone()));

        let status = tokio::select! {
            result = child.wait() => match result {
                Ok(exit) => {
                    let exit_code = exit.code().unwrap_or(-1);
                    debug!("Interpreter exited with code {}", exit_code);
                    RunStatus::Completed { exit_code }
                }
                Err(e) => {
                    warn!("Failed waiting on interpreter: {}", e);
                    RunStatus::LaunchFailed { message: e.to_string() }
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                warn!("Execution exceeded {:?}, killing process", self.timeout);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed-out process: {}", e);
                }
                RunStatus::TimedOut
            }
        };

        // The pipes close once the process is gone; let the capture
        // tasks drain whatever was written before that.
        if let Some(task) = stdout_task {
            let _ = task.await;
        }
        if let Some(task) = stderr_task {
            let _ = task.await;
        }

        let stdout = String::from_utf8_lossy(&stdout_buf.read().await).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_buf.read().await).into_owned();

        RunOutcome {
            stdout,
            stderr,
            status,
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulate one output stream as bytes arrive
///
/// Bytes are kept raw and decoded lossily once the run ends, so
/// invalid UTF-8 never truncates the captured stream.
fn capture<R>(mut pipe: R, buf: Arc<RwLock<Vec<u8>>>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => buf.write().await.extend_from_slice(&chunk[..n]),
                Err(e) => {
                    warn!("Failed reading interpreter stream: {}", e);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // The runner only assumes a `-c <program>` invocation, so tests use
    // `sh` and stay independent of an installed Python.
    fn sh_runner() -> Runner {
        Runner::new().with_interpreter("sh")
    }

    #[tokio::test]
    async fn test_clean_run_captures_stdout() {
        let outcome = sh_runner().run("echo 'Hello, World!'").await;

        assert_eq!(outcome.status, RunStatus::Completed { exit_code: 0 });
        assert_eq!(outcome.stdout.trim(), "Hello, World!");
        assert!(outcome.stderr.is_empty());
        assert!(outcome.is_clean());
    }

    #[tokio::test]
    async fn test_script_error_captures_stderr_and_exit_code() {
        let outcome = sh_runner().run("echo oops >&2; exit 3").await;

        assert_eq!(outcome.status, RunStatus::Completed { exit_code: 3 });
        assert_eq!(outcome.stderr.trim(), "oops");
        assert!(!outcome.is_clean());
    }

    #[tokio::test]
    async fn test_stderr_alone_is_not_clean() {
        let outcome = sh_runner().run("echo warning >&2").await;

        assert_eq!(outcome.status, RunStatus::Completed { exit_code: 0 });
        assert!(!outcome.is_clean());
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = sh_runner().with_timeout(Duration::from_millis(200));
        let outcome = runner.run("sleep 5").await;

        assert_eq!(outcome.status, RunStatus::TimedOut);
    }

    #[tokio::test]
    async fn test_timeout_preserves_partial_output() {
        let runner = sh_runner().with_timeout(Duration::from_millis(500));
        let outcome = runner.run("echo partial; sleep 5").await;

        assert_eq!(outcome.status, RunStatus::TimedOut);
        assert_eq!(outcome.stdout.trim(), "partial");
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_launch_failure() {
        let runner = Runner::new().with_interpreter("definitely-not-a-real-binary");
        let outcome = runner.run("echo hi").await;

        assert!(matches!(outcome.status, RunStatus::LaunchFailed { .. }));
        assert!(outcome.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_truncate_stream() {
        // \377 is a lone 0xFF byte; output after it must still arrive
        let outcome = sh_runner().run("printf '\\377\\n'; echo after").await;

        assert_eq!(outcome.status, RunStatus::Completed { exit_code: 0 });
        assert!(outcome.stdout.contains('\u{FFFD}'));
        assert!(outcome.stdout.contains("after"));
    }

    #[tokio::test]
    async fn test_empty_code_completes_cleanly() {
        let outcome = sh_runner().run("").await;

        assert_eq!(outcome.status, RunStatus::Completed { exit_code: 0 });
        assert!(outcome.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_runs_share_no_state() {
        let runner = sh_runner();

        let first = runner.run("MARKER=set; echo ${MARKER:-unset}").await;
        let second = runner.run("echo ${MARKER:-unset}").await;

        assert_eq!(first.stdout.trim(), "set");
        assert_eq!(second.stdout.trim(), "unset");
    }
}
