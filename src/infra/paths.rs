// src/infra/paths.rs — Config path resolution
//
// All paths respect the POWJOB_HOME environment variable for isolation.
// When unset, config lives under ~/.powjob/.

use std::path::PathBuf;

/// Returns the POWJOB_HOME override, if set.
fn powjob_home() -> Option<PathBuf> {
    std::env::var_os("POWJOB_HOME").map(PathBuf::from)
}

/// Configuration directory: $POWJOB_HOME/ or ~/.powjob/
pub fn config_dir() -> PathBuf {
    if let Some(home) = powjob_home() {
        return home;
    }
    dirs_home().join(".powjob")
}

/// Home directory, or the working directory when none can be determined.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
