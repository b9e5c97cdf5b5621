// src/infra/errors.rs — Error types for powjob

use thiserror::Error;

use crate::runner::exit_code::ToolExitCode;

#[derive(Error, Debug)]
pub enum PowError {
    // Tool-reported failures
    #[error("{run_id}: hashcat execution failed with code {code}: {stderr}")]
    ToolNonZeroExit {
        run_id: String,
        code: ToolExitCode,
        stderr: String,
    },

    #[error("{run_id}: hashcat execution failed with code 0 (no result matched the target hash): {stderr}")]
    NoMatchFound { run_id: String, stderr: String },

    #[error("{run_id}: hashcat execution timed out ({elapsed:.2})")]
    Timeout { run_id: String, elapsed: f64 },

    // Unexpected failures
    #[error("{run_id}: run_hashcat execution failed: could not start hashcat: {source}")]
    Spawn {
        run_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{run_id}: run_hashcat execution failed: {source}")]
    Io {
        run_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{run_id}: run_hashcat execution failed: {message}")]
    Internal { run_id: String, message: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PowError {
    /// Failures the operator should investigate, as opposed to outcomes the
    /// tool itself reported.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            PowError::Spawn { .. } | PowError::Io { .. } | PowError::Internal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_zero_exit_message() {
        let err = PowError::ToolNonZeroExit {
            run_id: "run-7".into(),
            code: ToolExitCode(Some(1)),
            stderr: "exhausted".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("run-7: "));
        assert!(msg.contains("code 1"));
        assert!(msg.contains("exhausted"));
        assert!(!err.is_unexpected());
    }

    #[test]
    fn test_signal_exit_message() {
        let err = PowError::ToolNonZeroExit {
            run_id: "r".into(),
            code: ToolExitCode(None),
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_timeout_message() {
        let err = PowError::Timeout {
            run_id: "abc".into(),
            elapsed: 30.0041,
        };
        assert_eq!(err.to_string(), "abc: hashcat execution timed out (30.00)");
    }

    #[test]
    fn test_spawn_is_unexpected() {
        let err = PowError::Spawn {
            run_id: "abc".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.is_unexpected());
        assert!(err.to_string().contains("no such file"));
    }
}
