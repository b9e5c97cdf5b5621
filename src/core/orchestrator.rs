// src/core/orchestrator.rs — Job dispatch entry point
//
// Register -> run -> deregister, for every challenge. `dispatch` is total:
// whatever the runner does, including panicking, the caller gets a
// PowResult and the registry no longer holds the run id.

use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use super::registry::JobRegistry;
use super::types::{Challenge, PowResult, SessionToken};
use crate::infra::errors::PowError;
use crate::runner::{HashcatRunner, ProcessRunner, RunRequest, ToolSettings};

/// Dispatches challenges to a process runner and tracks them while in flight.
pub struct Orchestrator<R = HashcatRunner> {
    runner: Arc<R>,
    registry: JobRegistry,
    settings: ToolSettings,
}

impl<R> Clone for Orchestrator<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            registry: self.registry.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<R: ProcessRunner> Orchestrator<R> {
    pub fn new(runner: R, settings: ToolSettings) -> Self {
        Self::with_registry(runner, settings, JobRegistry::new())
    }

    /// Use an existing registry, e.g. one shared with a status reporter.
    pub fn with_registry(runner: R, settings: ToolSettings, registry: JobRegistry) -> Self {
        Self {
            runner: Arc::new(runner),
            registry,
            settings,
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Run ids currently executing, oldest first.
    pub fn running_jobs(&self) -> Vec<String> {
        self.registry.snapshot()
    }

    /// Run one challenge to completion.
    pub async fn dispatch(&self, challenge: Challenge) -> PowResult {
        let started = Instant::now();
        let run_id = challenge.run_id.clone();
        let session = SessionToken::generate();

        let _guard = self.registry.register(&run_id);
        tracing::debug!(
            "{run_id}: dispatched with session {session} ({} job(s) in flight)",
            self.registry.len()
        );

        let request = RunRequest {
            challenge,
            settings: self.settings.clone(),
            session,
            started,
        };

        match AssertUnwindSafe(self.runner.run(request))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => {
                let err = PowError::Internal {
                    run_id,
                    message: panic_message(panic.as_ref()),
                };
                tracing::error!("{err}");
                PowResult::failed(err.to_string(), started.elapsed().as_secs_f64())
            }
        }
    }

    /// Dispatch a batch concurrently. Results are in input order.
    pub async fn dispatch_all(&self, challenges: Vec<Challenge>) -> Vec<PowResult> {
        join_all(challenges.into_iter().map(|c| self.dispatch(c))).await
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("runner panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("runner panicked: {s}")
    } else {
        "runner panicked".to_string()
    }
}
