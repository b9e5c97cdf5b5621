// src/core/types.rs — Shared types for the job engine

use serde::{Deserialize, Serialize};

/// A proof-of-work challenge: find the plaintext behind `target_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub run_id: String,
    #[serde(alias = "hash")]
    pub target_hash: String,
    pub salt: String,
    /// Hash-mode selector passed through to the tool (`-m`).
    pub mode: String,
    /// Custom character set bound to `?1` (`-1`).
    #[serde(alias = "chars")]
    pub charset: String,
    pub mask: String,
}

impl Challenge {
    pub fn new(
        run_id: impl Into<String>,
        target_hash: impl Into<String>,
        salt: impl Into<String>,
        mode: impl Into<String>,
        charset: impl Into<String>,
        mask: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            target_hash: target_hash.into(),
            salt: salt.into(),
            mode: mode.into(),
            charset: charset.into(),
            mask: mask.into(),
        }
    }
}

/// Per-invocation identifier namespacing the tool's restore/checkpoint state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// A fresh 128-bit random token, rendered as 32 hex characters.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one dispatch, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowResult {
    pub password: Option<String>,
    /// Seconds from dispatch start to outcome.
    pub local_execution_time: f64,
    pub error: Option<String>,
}

/// How a caller should read a `PowResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowOutcome {
    Found,
    Failed,
    /// Neither a password nor an error: treated as a failure by callers.
    Inconclusive,
}

impl PowResult {
    pub fn found(password: impl Into<String>, local_execution_time: f64) -> Self {
        Self {
            password: Some(password.into()),
            local_execution_time,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, local_execution_time: f64) -> Self {
        Self {
            password: None,
            local_execution_time,
            error: Some(error.into()),
        }
    }

    pub fn outcome(&self) -> PowOutcome {
        match (&self.password, &self.error) {
            (_, Some(_)) => PowOutcome::Failed,
            (Some(_), None) => PowOutcome::Found,
            (None, None) => PowOutcome::Inconclusive,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome() == PowOutcome::Found
    }
}
