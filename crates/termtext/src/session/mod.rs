//! PTY capture of a child process into a formatted log document.
//!
//! [`Session`] spawns a command on a pseudo-terminal so that it emits its
//! interactive output (colors, `\r` progress lines) and feeds everything it
//! prints through a [`Terminal`].
//!
//! # Key Operations
//!
//! - [`Session::spawn`] - open the PTY and start the command
//! - [`Session::pump`] - read whatever output is available
//! - [`Session::wait_for_exit`] - poll for the exit status
//! - [`Session::run_to_completion`] - pump until exit, under a deadline
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use termtext::session::{Session, SessionConfig};
//!
//! # fn example() -> termtext::TermtextResult<()> {
//! let config = SessionConfig::new("/bin/sh").args(["-c", "printf 'a\\rb\\n'"]);
//! let session = Session::spawn(config)?;
//! let capture = session.run_to_completion(Duration::from_secs(5), None)?;
//! assert_eq!(capture.document.lines()[0], "b");
//! # Ok(())
//! # }
//! ```
//!
//! Dropping a session kills the child if it is still running.

use crate::error::{TermtextError, TermtextResult};
use crate::model::{CaptureResult, ExitStatus, SessionId, TextFormat};
use crate::sgr::StaticFontCatalog;
use crate::terminal::Terminal;
#[cfg(unix)]
use nix::fcntl::{fcntl, FcntlArg, OFlag};
#[cfg(unix)]
use nix::sys::signal::{killpg, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

const READ_CHUNK: usize = 4096;
const POLL_INTERVAL: Duration = Duration::from_millis(5);
/// How long to keep draining output after the child has exited.
const DRAIN_WINDOW: Duration = Duration::from_millis(100);

/// What to run and how to render it.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: Option<String>,
    /// Extra environment variables on top of the inherited environment.
    pub env: Vec<(String, String)>,
    /// PTY width in columns; long lines are not wrapped into the document.
    pub cols: u16,
    pub rows: u16,
    /// Format that SGR resets return to.
    pub defaults: TextFormat,
    pub fonts: StaticFontCatalog,
}

impl SessionConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            cols: 120,
            rows: 40,
            defaults: TextFormat::default(),
            fonts: StaticFontCatalog::new(),
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn format(mut self, defaults: TextFormat, fonts: StaticFontCatalog) -> Self {
        self.defaults = defaults;
        self.fonts = fonts;
        self
    }
}

/// A running command attached to a PTY.
pub struct Session {
    session_id: SessionId,
    command: String,
    args: Vec<String>,
    terminal: Terminal,
    // Kept alive so the PTY stays open while the child runs.
    _master: Box<dyn portable_pty::MasterPty + Send>,
    reader: Box<dyn Read + Send>,
    child: Box<dyn portable_pty::Child + Send + Sync>,
    started_at: Instant,
    output_bytes: u64,
    eof: bool,
    exit_status: Option<ExitStatus>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("command", &self.command)
            .field("output_bytes", &self.output_bytes)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open a PTY and spawn the configured command on it.
    ///
    /// # Errors
    /// Returns `E_IO` if the PTY cannot be opened or the command cannot be
    /// spawned.
    pub fn spawn(config: SessionConfig) -> TermtextResult<Self> {
        let system = native_pty_system();
        let pair = system
            .openpty(PtySize {
                rows: config.rows,
                cols: config.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|err| TermtextError::io("failed to open pty", err))?;

        let mut cmd = CommandBuilder::new(&config.command);
        cmd.args(&config.args);
        if let Some(cwd) = &config.cwd {
            cmd.cwd(cwd);
        }
        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|err| TermtextError::io("failed to spawn command", err))?;
        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|err| TermtextError::io("failed to clone pty reader", err))?;

        #[cfg(unix)]
        {
            if let Some(fd) = pair.master.as_raw_fd() {
                let flags = OFlag::from_bits_truncate(
                    fcntl(fd, FcntlArg::F_GETFL)
                        .map_err(|err| TermtextError::io("failed to get fd flags", err))?,
                );
                fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))
                    .map_err(|err| TermtextError::io("failed to set nonblocking", err))?;
            }
        }

        let session_id = SessionId::new();
        debug!(%session_id, command = %config.command, "spawned session");

        Ok(Self {
            session_id,
            command: config.command,
            args: config.args,
            terminal: Terminal::new(config.defaults, config.fonts),
            _master: pair.master,
            reader,
            child,
            started_at: Instant::now(),
            output_bytes: 0,
            eof: false,
            exit_status: None,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn output_bytes(&self) -> u64 {
        self.output_bytes
    }

    /// Read available output for up to `timeout`, returning the byte count.
    ///
    /// Returns early once the PTY reports end of output.
    ///
    /// # Errors
    /// Returns `E_IO` on a read failure other than end of output.
    pub fn pump(&mut self, timeout: Duration) -> TermtextResult<usize> {
        let deadline = Instant::now() + timeout;
        let mut total = 0;
        let mut buffer = vec![0u8; READ_CHUNK];
        while !self.eof {
            match self.reader.read(&mut buffer) {
                Ok(0) => self.eof = true,
                Ok(count) => {
                    if let Some(chunk) = buffer.get(..count) {
                        self.terminal.process_bytes(chunk);
                    }
                    total += count;
                    self.output_bytes += count as u64;
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        break;
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) if is_closed_pty(&err) => self.eof = true,
                Err(err) => return Err(TermtextError::io("failed to read pty", err)),
            }
            if Instant::now() >= deadline {
                break;
            }
        }
        Ok(total)
    }

    /// Poll for the child's exit for up to `timeout`.
    ///
    /// # Errors
    /// Returns `E_IO` if the exit status cannot be queried.
    pub fn wait_for_exit(&mut self, timeout: Duration) -> TermtextResult<Option<ExitStatus>> {
        if let Some(status) = &self.exit_status {
            return Ok(Some(status.clone()));
        }
        let deadline = Instant::now() + timeout;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    let status = ExitStatus {
                        success: status.success(),
                        exit_code: Some(status.exit_code()),
                        terminated_by_harness: false,
                    };
                    debug!(session_id = %self.session_id, ?status, "child exited");
                    self.exit_status = Some(status.clone());
                    return Ok(Some(status));
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        return Ok(None);
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(err) => return Err(TermtextError::io("failed to wait for child", err)),
            }
        }
    }

    /// Pump output until the child exits and its output is drained.
    ///
    /// When `cancel` becomes true the child is killed and the capture so
    /// far is returned with `terminated_by_harness` set.
    ///
    /// # Errors
    /// - `E_TIMEOUT` if the child is still running at the deadline (it is killed)
    /// - `E_IO` on PTY or process failures
    pub fn run_to_completion(
        mut self,
        timeout: Duration,
        cancel: Option<&AtomicBool>,
    ) -> TermtextResult<CaptureResult> {
        let deadline = Instant::now() + timeout;
        let exit_status = loop {
            self.pump(Duration::from_millis(20))?;
            if let Some(status) = self.wait_for_exit(Duration::ZERO)? {
                self.drain()?;
                break status;
            }
            if cancel.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                debug!(session_id = %self.session_id, "capture cancelled");
                self.terminate()?;
                break ExitStatus {
                    success: false,
                    exit_code: None,
                    terminated_by_harness: true,
                };
            }
            if Instant::now() >= deadline {
                self.terminate()?;
                return Err(TermtextError::timeout(
                    "command did not exit before the deadline",
                    serde_json::json!({
                        "command": self.command,
                        "timeout_ms": duration_ms(timeout),
                    }),
                ));
            }
        };
        self.terminal.flush();
        Ok(CaptureResult {
            session_id: self.session_id,
            command: self.command.clone(),
            args: self.args.clone(),
            exit_status,
            output_bytes: self.output_bytes,
            duration_ms: duration_ms(self.started_at.elapsed()),
            document: self.terminal.snapshot(),
        })
    }

    /// Kill the child (its whole process group on unix).
    ///
    /// # Errors
    /// Returns `E_IO` if the signal cannot be delivered.
    pub fn terminate(&mut self) -> TermtextResult<()> {
        #[cfg(unix)]
        if let Some(pid) = self.child.process_id().and_then(|pid| i32::try_from(pid).ok()) {
            signal_process_group(Pid::from_raw(pid), Signal::SIGKILL)?;
            // Reap so the child does not linger as a zombie.
            let _ = self.child.wait();
            return Ok(());
        }
        self.child
            .kill()
            .map_err(|err| TermtextError::io("failed to terminate child", err))
    }

    fn drain(&mut self) -> TermtextResult<()> {
        let deadline = Instant::now() + DRAIN_WINDOW;
        while !self.eof && Instant::now() < deadline {
            if self.pump(POLL_INTERVAL)? == 0 && self.eof {
                break;
            }
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.exit_status.is_none() && matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Linux reports `EIO` on the master once every slave handle is closed.
fn is_closed_pty(err: &std::io::Error) -> bool {
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(nix::errno::Errno::EIO as i32)
    }
    #[cfg(not(unix))]
    {
        err.kind() == std::io::ErrorKind::BrokenPipe
    }
}

#[cfg(unix)]
fn signal_process_group(pgid: Pid, signal: Signal) -> TermtextResult<()> {
    match killpg(pgid, signal) {
        // ESRCH: already gone.
        Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
        Err(err) => Err(TermtextError::io("failed to signal process group", err)),
    }
}
