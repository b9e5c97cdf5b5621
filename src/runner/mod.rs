// src/runner/mod.rs — Process runner abstraction
//
// A runner takes one challenge, drives the external cracking tool to an
// outcome, and always reports that outcome as a PowResult.

pub mod exit_code;
pub mod hashcat;
pub mod verify;

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::core::types::{Challenge, PowResult, SessionToken};
use crate::infra::config::PowConfig;

pub use hashcat::HashcatRunner;

/// Tool settings that apply to every job dispatched by one orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub tool_path: PathBuf,
    pub timeout: Duration,
    pub workload_profile: String,
    pub extended_options: Vec<String>,
}

impl ToolSettings {
    pub fn from_config(pow: &PowConfig) -> Self {
        Self {
            tool_path: PathBuf::from(&pow.hashcat_path),
            timeout: Duration::from_secs(pow.timeout_secs),
            workload_profile: pow.workload_profile.clone(),
            extended_options: pow.extended_options_list(),
        }
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&PowConfig::default())
    }
}

/// Everything a runner needs for one invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub challenge: Challenge,
    pub settings: ToolSettings,
    pub session: SessionToken,
    /// When the job was dispatched; `local_execution_time` is measured from here.
    pub started: Instant,
}

/// Runs one challenge to completion.
///
/// Implementations must be total: every failure, including a timeout,
/// comes back as a `PowResult` with `error` set, and any child process is
/// terminated before `run` returns.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, request: RunRequest) -> PowResult;
}
