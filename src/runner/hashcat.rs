// src/runner/hashcat.rs — Supervised hashcat invocation
//
// Spawns hashcat with a fixed mask-attack argument template, enforces the
// per-job deadline, captures output, and classifies the outcome.

use async_trait::async_trait;
use std::borrow::Cow;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use super::exit_code::ToolExitCode;
use super::{verify, ProcessRunner, RunRequest, ToolSettings};
use crate::core::types::{Challenge, PowResult, SessionToken};
use crate::infra::errors::PowError;

/// `-a 3`: brute-force over a mask.
const ATTACK_MODE_MASK: &str = "3";
/// `-D 2`: GPU devices only.
const DEVICE_TYPE_GPU: &str = "2";

/// How long output may stay open after hashcat itself has exited.
const OUTPUT_GRACE: Duration = Duration::from_millis(500);
/// Per-stream capture limit; anything beyond is read and discarded.
const MAX_CAPTURE_BYTES: u64 = 8 * 1024 * 1024;

/// Runs challenges through a local hashcat binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashcatRunner;

impl HashcatRunner {
    pub fn new() -> Self {
        Self
    }

    /// Drive one hashcat process to an outcome. The child is reaped on every
    /// path before this returns, and on timeout its whole process group is
    /// killed.
    async fn execute(&self, request: &RunRequest) -> Result<String, PowError> {
        let RunRequest {
            challenge,
            settings,
            session,
            started,
        } = request;
        let run_id = &challenge.run_id;

        let args = build_args(challenge, settings, session);
        tracing::trace!("{}", display_command(&settings.tool_path, &args));

        let mut cmd = Command::new(&settings.tool_path);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|source| PowError::Spawn {
            run_id: run_id.clone(),
            source,
        })?;
        let group = ProcessGroup(child.id());

        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        match tokio::time::timeout(settings.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!("{run_id}: hashcat exited with {status}");
                let (stdout, stderr) = tokio::try_join!(
                    drain_reader(run_id, stdout, group),
                    drain_reader(run_id, stderr, group),
                )
                .map_err(|source| PowError::Io {
                    run_id: run_id.clone(),
                    source,
                })?;
                classify(challenge, status.code(), &stdout, &stderr)
            }
            Ok(Err(source)) => {
                terminate(run_id, &mut child, group).await;
                stdout.abort();
                stderr.abort();
                Err(PowError::Io {
                    run_id: run_id.clone(),
                    source,
                })
            }
            Err(_) => {
                terminate(run_id, &mut child, group).await;
                stdout.abort();
                stderr.abort();
                Err(PowError::Timeout {
                    run_id: run_id.clone(),
                    elapsed: started.elapsed().as_secs_f64(),
                })
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for HashcatRunner {
    async fn run(&self, request: RunRequest) -> PowResult {
        let run_id = request.challenge.run_id.as_str();
        tracing::info!("{run_id}: challenge processing");

        let result = self.execute(&request).await;
        let elapsed = request.started.elapsed().as_secs_f64();

        match result {
            Ok(password) => {
                tracing::info!("{run_id}: challenge {password} found in {elapsed:.2} seconds");
                PowResult::found(password, elapsed)
            }
            Err(err) => {
                if err.is_unexpected() {
                    tracing::error!(error = ?err, "{err}");
                } else {
                    tracing::warn!("{err}");
                }
                PowResult::failed(err.to_string(), elapsed)
            }
        }
    }
}

/// The process group hashcat leads (its own pid, see `process_group(0)`).
#[derive(Debug, Clone, Copy)]
struct ProcessGroup(Option<u32>);

impl ProcessGroup {
    /// SIGKILL every process in the group. The direct child is still left
    /// for the caller to reap.
    fn kill(self, run_id: &str) {
        #[cfg(unix)]
        if let Some(pid) = self.0.and_then(|pid| i32::try_from(pid).ok()) {
            use nix::errno::Errno;
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => tracing::warn!("{run_id}: failed to kill process group {pid}: {e}"),
            }
        }
        #[cfg(not(unix))]
        let _ = run_id;
    }
}

/// Kill hashcat and everything it started, then reap hashcat.
async fn terminate(run_id: &str, child: &mut Child, group: ProcessGroup) {
    group.kill(run_id);
    if let Err(e) = child.kill().await {
        // Already-reaped children report InvalidInput here; nothing left to do.
        tracing::debug!("{run_id}: kill after failure: {e}");
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<std::io::Result<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        match pipe {
            Some(pipe) => read_capped(pipe, MAX_CAPTURE_BYTES).await,
            None => Ok(String::new()),
        }
    })
}

/// Collect a reader's output once hashcat has exited. If something it left
/// behind still holds the pipe open after `OUTPUT_GRACE`, the group is killed
/// so the pipe closes; output that still does not arrive is dropped.
async fn drain_reader(
    run_id: &str,
    mut reader: JoinHandle<std::io::Result<String>>,
    group: ProcessGroup,
) -> std::io::Result<String> {
    if let Ok(joined) = tokio::time::timeout(OUTPUT_GRACE, &mut reader).await {
        return joined.map_err(std::io::Error::other)?;
    }

    tracing::warn!("{run_id}: output still open after hashcat exited; killing its process group");
    group.kill(run_id);
    match tokio::time::timeout(OUTPUT_GRACE, &mut reader).await {
        Ok(joined) => joined.map_err(std::io::Error::other)?,
        Err(_) => {
            reader.abort();
            Ok(String::new())
        }
    }
}

/// Read up to `limit` bytes as lossy UTF-8, then discard the rest until EOF
/// so the writer never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(mut pipe: R, limit: u64) -> std::io::Result<String> {
    let mut buf = Vec::new();
    (&mut pipe).take(limit).read_to_end(&mut buf).await?;
    let discarded = tokio::io::copy(&mut pipe, &mut tokio::io::sink()).await?;
    if discarded > 0 {
        tracing::debug!("output truncated at {limit} bytes ({discarded} bytes discarded)");
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Map hashcat's exit code and output to the recovered password or a failure.
fn classify(
    challenge: &Challenge,
    code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> Result<String, PowError> {
    let run_id = challenge.run_id.clone();
    let stderr = stderr.trim_end().to_string();

    if code != Some(0) {
        return Err(PowError::ToolNonZeroExit {
            run_id,
            code: ToolExitCode::from_raw(code),
            stderr,
        });
    }

    if stdout.is_empty() {
        return Err(PowError::NoMatchFound { run_id, stderr });
    }

    verify::extract(&challenge.target_hash, stdout)
        .filter(|password| !password.is_empty())
        .ok_or(PowError::NoMatchFound { run_id, stderr })
}

/// Argument vector for one hashcat run (program name excluded).
///
/// `<hash>:<salt> -a 3 -D 2 -m <mode> -1 <charset> <mask> -w <profile>
/// --session <token> --optimized-kernel-enable [extended options...]`
pub fn build_args(
    challenge: &Challenge,
    settings: &ToolSettings,
    session: &SessionToken,
) -> Vec<String> {
    let mut args = vec![
        format!("{}:{}", challenge.target_hash, challenge.salt),
        "-a".to_string(),
        ATTACK_MODE_MASK.to_string(),
        "-D".to_string(),
        DEVICE_TYPE_GPU.to_string(),
        "-m".to_string(),
        challenge.mode.clone(),
        "-1".to_string(),
        challenge.charset.clone(),
        challenge.mask.clone(),
        "-w".to_string(),
        settings.workload_profile.clone(),
        "--session".to_string(),
        session.to_string(),
        "--optimized-kernel-enable".to_string(),
    ];
    args.extend(settings.extended_options.iter().cloned());
    args
}

/// Human-readable, POSIX-shell-quoted command line. Logging only.
pub fn display_command(program: &Path, args: &[String]) -> String {
    let program = program.to_string_lossy();
    std::iter::once(shell_quote(&program))
        .chain(args.iter().map(|a| shell_quote(a)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r#"'"'"'"#)))
    }
}
