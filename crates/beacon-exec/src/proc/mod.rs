//! Producer side of the pipe-connected consumer process.
//!
//! The consumer runs as a separate OS process reading frames from its stdin.
//! [`ProcessUpdater`] owns the child, its stdin (the channel) and the send lock that serialises writers.
use std::{
    path::PathBuf,
    process::{ExitStatus, Stdio},
    sync::{Arc, OnceLock},
};

use beacon_core::SurfacePreference;
use beacon_model::{Envelope, Framing, StatusMessage, WorkerId};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin},
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    error::{ExecError, ExecResult, is_disconnect},
    util::{cmd_program, kill_graceful},
};

/// Where the consumer's stdout goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Share the parent's stdout (the consumer draws straight to the terminal).
    #[default]
    Inherit,
    /// Pipe stdout back; lines are logged and handed out by [`ProcessUpdater::take_output`].
    ///
    /// Lines arriving before the receiver is taken are only logged, never buffered.
    Capture,
}

/// How to launch the consumer process.
#[derive(Clone, Debug)]
pub struct ConsumerConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    pub framing: Framing,
    pub surface: SurfacePreference,
    /// Append `--framing <f> --surface <s>` after `args`.
    pub protocol_args: bool,
    pub output: OutputMode,
    /// Report a non-zero exit code from [`ProcessUpdater::stop`] as an error.
    pub fail_on_non_zero: bool,
}

impl ConsumerConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_surface(mut self, surface: SurfacePreference) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn validate(&self) -> ExecResult<()> {
        if self.program.as_os_str().is_empty() {
            return Err(ExecError::MissingProgram);
        }
        Ok(())
    }

    fn full_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        if self.protocol_args {
            args.extend([
                "--framing".to_string(),
                self.framing.as_str().to_string(),
                "--surface".to_string(),
                self.surface.as_str().to_string(),
            ]);
        }
        args
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::new(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            framing: Framing::default(),
            surface: SurfacePreference::default(),
            protocol_args: true,
            output: OutputMode::default(),
            fail_on_non_zero: true,
        }
    }
}

/// Handle to a running consumer process.
///
/// Shareable between tasks (`Arc<ProcessUpdater>`); all sends and the shutdown go through one async lock,
/// so frames from concurrent producers never interleave and arrive in lock order.
pub struct ProcessUpdater {
    link: Mutex<Link>,
    framing: Framing,
    fail_on_non_zero: bool,
    pid: Option<u32>,
}

struct Link {
    stdin: Option<ChildStdin>,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
    output: Option<Arc<OutputSink>>,
}

/// Sender installed by [`ProcessUpdater::take_output`]; empty until then.
type OutputSink = OnceLock<mpsc::UnboundedSender<String>>;

impl ProcessUpdater {
    /// Spawn the consumer process.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(level = "debug", skip(cfg), fields(program = %cfg.program.display(), framing = %cfg.framing))]
    pub fn start(cfg: ConsumerConfig) -> ExecResult<Self> {
        cfg.validate()?;

        let args = cfg.full_args();
        trace!(target: "beacon.exec.proc", ?args, "spawn");

        let mut cmd = cmd_program(&cfg.program, &args);
        if let Some(cwd) = &cfg.cwd {
            cmd.current_dir(cwd);
        }
        for (k, v) in &cfg.env {
            cmd.env(k, v);
        }
        cmd.stdin(Stdio::piped());
        cmd.stderr(Stdio::inherit());
        cmd.stdout(match cfg.output {
            OutputMode::Inherit => Stdio::inherit(),
            OutputMode::Capture => Stdio::piped(),
        });

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecError::Spawn(format!("{}: {e}", cfg.program.display())))?;
        let pid = child.id();

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExecError::Spawn("stdin was not piped".into()))?;

        let (reader, output) = match cfg.output {
            OutputMode::Inherit => (None, None),
            OutputMode::Capture => {
                let stdout = child
                    .stdout
                    .take()
                    .ok_or_else(|| ExecError::Spawn("stdout was not piped".into()))?;
                let sink = Arc::new(OutputSink::new());
                let forward = Arc::clone(&sink);
                let reader = tokio::spawn(async move {
                    let mut lines = BufReader::new(stdout).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        trace!(target: "beacon.exec.proc.out", %line);
                        if let Some(tx) = forward.get() {
                            let _ = tx.send(line);
                        }
                    }
                });
                (Some(reader), Some(sink))
            }
        };

        info!(target: "beacon.exec.proc", pid, "consumer process started");
        Ok(Self {
            link: Mutex::new(Link {
                stdin: Some(stdin),
                child: Some(child),
                reader,
                output,
            }),
            framing: cfg.framing,
            fail_on_non_zero: cfg.fail_on_non_zero,
            pid,
        })
    }

    /// OS process id of the consumer, if it was known at spawn time.
    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Take the receiver of captured consumer output lines.
    ///
    /// `None` unless started with [`OutputMode::Capture`], when already taken, or after stop / kill.
    /// Only lines printed after this call are delivered; the receiver ends on stop / kill.
    pub async fn take_output(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        let link = self.link.lock().await;
        let sink = link.output.as_ref()?;
        let (tx, rx) = mpsc::unbounded_channel();
        sink.set(tx).ok()?;
        Some(rx)
    }

    /// `false` after [`stop`](Self::stop) / [`kill`](Self::kill).
    pub async fn is_connected(&self) -> bool {
        self.link.lock().await.stdin.is_some()
    }

    /// Publish a fresh random status for `worker` and return it.
    pub async fn update(&self, worker: WorkerId) -> ExecResult<StatusMessage> {
        let mut link = self.link.lock().await;
        let msg = StatusMessage::random(worker);
        let line = self.framing.encode(&Envelope::Status(msg.clone()))?;
        write_line(&mut link, line).await?;
        trace!(target: "beacon.exec.proc", %worker, "status sent");
        Ok(msg)
    }

    /// Send `msg` as is.
    pub async fn send(&self, msg: StatusMessage) -> ExecResult<()> {
        let line = self.framing.encode(&Envelope::Status(msg))?;
        let mut link = self.link.lock().await;
        write_line(&mut link, line).await
    }

    /// Send shutdown, close the channel and wait until the consumer process has exited.
    ///
    /// If the consumer already closed its end, the shutdown frame is skipped and only the wait happens.
    #[instrument(level = "debug", skip(self), fields(pid = self.pid))]
    pub async fn stop(&self) -> ExecResult<ExitStatus> {
        let line = self.framing.encode(&Envelope::Shutdown)?;
        let mut link = self.link.lock().await;
        let mut child = link.child.take().ok_or(ExecError::NotConnected)?;

        if let Some(mut stdin) = link.stdin.take() {
            match send_raw(&mut stdin, line).await {
                Ok(()) => debug!(target: "beacon.exec.proc", "shutdown sent"),
                Err(e) if is_disconnect(&e) => {
                    debug!(target: "beacon.exec.proc", "consumer already closed its end")
                }
                Err(e) => warn!(target: "beacon.exec.proc", error = %e, "failed to send shutdown"),
            }
        }

        let status = child.wait().await?;
        if let Some(reader) = link.reader.take() {
            let _ = reader.await;
        }
        link.output = None;
        info!(target: "beacon.exec.proc", %status, "consumer process exited");
        check_exit(status, self.fail_on_non_zero)
    }

    /// Terminate the consumer without a shutdown frame (SIGTERM, then SIGKILL on Unix).
    pub async fn kill(&self) -> ExecResult<()> {
        let mut link = self.link.lock().await;
        link.stdin = None;
        let mut child = link.child.take().ok_or(ExecError::NotConnected)?;

        debug!(target: "beacon.exec.proc", pid = self.pid, "killing consumer");
        kill_graceful(&mut child).await?;
        if let Some(reader) = link.reader.take() {
            reader.abort();
        }
        link.output = None;
        Ok(())
    }
}

impl Drop for ProcessUpdater {
    fn drop(&mut self) {
        if let Ok(link) = self.link.try_lock()
            && link.child.is_some()
        {
            warn!(target: "beacon.exec.proc", pid = self.pid, "updater dropped without stop; consumer left running");
        }
    }
}

async fn write_line(link: &mut Link, line: String) -> ExecResult<()> {
    let stdin = link.stdin.as_mut().ok_or(ExecError::NotConnected)?;
    send_raw(stdin, line).await.map_err(ExecError::from)
}

async fn send_raw(stdin: &mut ChildStdin, mut line: String) -> std::io::Result<()> {
    line.push('\n');
    stdin.write_all(line.as_bytes()).await?;
    stdin.flush().await
}

fn check_exit(status: ExitStatus, fail_on_non_zero: bool) -> ExecResult<ExitStatus> {
    if status.success() || !fail_on_non_zero {
        return Ok(status);
    }
    match status.code() {
        Some(code) => Err(ExecError::NonZeroExit { code }),
        None => Err(ExecError::KilledBySignal),
    }
}
