// src/diagnostics.rs — GPU availability probe
//
// Informational only: the result is logged at startup and shown by
// `powjob doctor`, and never changes how jobs are dispatched.

use std::time::Duration;
use tokio::process::Command;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuAvailability {
    Available { devices: usize },
    /// `nvidia-smi` ran but listed no device.
    NoDevices,
    /// `nvidia-smi` is missing, failed, or timed out.
    Unavailable { reason: String },
}

impl GpuAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, GpuAvailability::Available { .. })
    }
}

/// Ask `nvidia-smi -L` which CUDA devices are present.
pub async fn probe_gpu() -> GpuAvailability {
    let Ok(smi) = which::which("nvidia-smi") else {
        return GpuAvailability::Unavailable {
            reason: "nvidia-smi not found in PATH".into(),
        };
    };

    let mut cmd = Command::new(&smi);
    cmd.arg("-L").kill_on_drop(true);
    match tokio::time::timeout(PROBE_TIMEOUT, cmd.output()).await {
        Ok(Ok(out)) if out.status.success() => {
            match count_gpu_devices(&String::from_utf8_lossy(&out.stdout)) {
                0 => GpuAvailability::NoDevices,
                devices => GpuAvailability::Available { devices },
            }
        }
        Ok(Ok(out)) => GpuAvailability::Unavailable {
            reason: format!(
                "nvidia-smi exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        },
        Ok(Err(e)) => GpuAvailability::Unavailable {
            reason: format!("nvidia-smi failed: {e}"),
        },
        Err(_) => GpuAvailability::Unavailable {
            reason: format!("nvidia-smi timed out after {}s", PROBE_TIMEOUT.as_secs()),
        },
    }
}

/// Probe and log the result.
pub async fn log_gpu_availability() -> GpuAvailability {
    let gpu = probe_gpu().await;
    match &gpu {
        GpuAvailability::Available { devices } => {
            tracing::info!("CUDA is available with {devices} CUDA device(s)");
        }
        GpuAvailability::NoDevices => {
            tracing::warn!("CUDA is not available: no CUDA device listed by nvidia-smi");
        }
        GpuAvailability::Unavailable { reason } => {
            tracing::warn!("CUDA is not available or not properly configured: {reason}");
        }
    }
    gpu
}

/// Count `GPU <n>: ...` lines in `nvidia-smi -L` output.
pub fn count_gpu_devices(output: &str) -> usize {
    output
        .lines()
        .filter(|line| {
            line.trim_start()
                .strip_prefix("GPU ")
                .and_then(|rest| rest.split(':').next())
                .is_some_and(|idx| !idx.is_empty() && idx.chars().all(|c| c.is_ascii_digit()))
        })
        .count()
}
