// src/core/registry.rs — In-flight job registry
//
// Tracks which run ids are currently executing. The registry only records;
// it does not serialize execution. Clones share the same underlying set.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, ordered record of run ids currently being dispatched.
///
/// Duplicates are tolerated: `add` twice means `remove` must be called twice.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<Mutex<VecDeque<String>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Nothing panics while holding the lock, but a poisoned registry must
    // still deregister jobs.
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, run_id: &str) {
        self.lock().push_back(run_id.to_string());
    }

    /// Remove one occurrence of `run_id`. Returns false if it was not present.
    pub fn remove(&self, run_id: &str) -> bool {
        let mut jobs = self.lock();
        match jobs.iter().position(|id| id == run_id) {
            Some(idx) => {
                jobs.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Add `run_id` and return a guard that removes it when dropped.
    pub fn register(&self, run_id: &str) -> JobGuard {
        self.add(run_id);
        JobGuard {
            registry: self.clone(),
            run_id: run_id.to_string(),
        }
    }

    pub fn contains(&self, run_id: &str) -> bool {
        self.lock().iter().any(|id| id == run_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run ids in registration order.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }
}

/// Registry membership for one dispatch. Dropping it deregisters the job,
/// including during unwinding.
#[derive(Debug)]
pub struct JobGuard {
    registry: JobRegistry,
    run_id: String,
}

impl JobGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        if !self.registry.remove(&self.run_id) {
            tracing::warn!("{}: job was already removed from the registry", self.run_id);
        }
    }
}
