// src/runner/exit_code.rs — hashcat exit status codes

/// Exit code reported by hashcat, `None` when the process was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExitCode(pub Option<i32>);

impl ToolExitCode {
    /// Normalize a process exit code as reported by the OS.
    ///
    /// Unix exit statuses are a single unsigned byte, so hashcat's negative
    /// codes (-1..=-8) arrive as 255..=248.
    pub fn from_raw(code: Option<i32>) -> Self {
        #[cfg(unix)]
        let code = code.map(|c| {
            if (248..=255).contains(&c) {
                i32::from(c as u8 as i8)
            } else {
                c
            }
        });
        Self(code)
    }
}

/// hashcat's meaning for its documented exit codes.
pub fn exit_code_meaning(code: i32) -> Option<&'static str> {
    let meaning = match code {
        0 => "cracked",
        1 => "exhausted",
        2 => "aborted",
        3 => "aborted by checkpoint",
        4 => "aborted by runtime limit",
        5 => "aborted by finish flag",
        -1 => "error",
        -2 => "gpu-watchdog alarm",
        -3 => "backend abort",
        -4 => "backend abort finish",
        -5 => "backend warning",
        -6 => "backend error",
        -7 => "invalid self-test",
        -8 => "setup error",
        _ => return None,
    };
    Some(meaning)
}

impl std::fmt::Display for ToolExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(code) => match exit_code_meaning(code) {
                Some(meaning) => write!(f, "{code} ({meaning})"),
                None => write!(f, "{code}"),
            },
            None => f.write_str("none (terminated by signal)"),
        }
    }
}
