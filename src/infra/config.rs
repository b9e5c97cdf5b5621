// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::PowError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pow: PowConfig,
}

/// `[pow]` section: how challenges are handed to hashcat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowConfig {
    /// Hard wall-clock limit per job, in seconds.
    pub timeout_secs: u64,
    pub hashcat_path: String,
    /// Value of hashcat's `-w` flag.
    pub workload_profile: String,
    /// Extra flags appended after the fixed argument template,
    /// separated by whitespace. Empty by default.
    pub extended_options: String,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            hashcat_path: "hashcat".into(),
            workload_profile: "3".into(),
            extended_options: String::new(),
        }
    }
}

impl PowConfig {
    pub fn extended_options_list(&self) -> Vec<String> {
        self.extended_options
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self, PowError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PowError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PowError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| PowError::Config(format!("invalid {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PowError> {
        if self.pow.timeout_secs == 0 {
            return Err(PowError::Config("pow.timeout_secs must be at least 1".into()));
        }
        if self.pow.hashcat_path.trim().is_empty() {
            return Err(PowError::Config("pow.hashcat_path is empty".into()));
        }
        Ok(())
    }
}
