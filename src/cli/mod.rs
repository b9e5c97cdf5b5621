// src/cli/mod.rs — CLI definition (clap derive)

pub mod batch;
pub mod dispatch;
pub mod doctor;

use clap::{Args, Parser, Subcommand};

use crate::core::types::Challenge;
use crate::infra::config::Config;

#[derive(Parser)]
#[command(
    name = "powjob",
    about = "Run proof-of-work crack challenges through hashcat",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: ToolOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Command-line overrides for the `[pow]` config section.
#[derive(Args, Debug, Default, Clone)]
pub struct ToolOverrides {
    /// Per-job timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to the hashcat binary
    #[arg(long, global = true)]
    pub hashcat_path: Option<String>,

    /// hashcat workload profile (-w)
    #[arg(long, global = true)]
    pub workload_profile: Option<String>,
}

impl ToolOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.pow.timeout_secs = timeout;
        }
        if let Some(ref path) = self.hashcat_path {
            config.pow.hashcat_path = path.clone();
        }
        if let Some(ref profile) = self.workload_profile {
            config.pow.workload_profile = profile.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crack a single challenge and print the result as JSON
    Dispatch(ChallengeArgs),
    /// Crack every challenge in a JSON file concurrently
    Batch {
        /// JSON array of challenges
        file: String,
    },
    /// Check the hashcat binary and GPU availability
    Doctor,
}

#[derive(Args, Debug, Clone)]
pub struct ChallengeArgs {
    /// Caller-supplied run identifier
    #[arg(long)]
    pub run_id: String,
    /// Target hash
    #[arg(long)]
    pub hash: String,
    #[arg(long)]
    pub salt: String,
    /// hashcat hash mode (-m)
    #[arg(long)]
    pub mode: String,
    /// Custom charset bound to ?1
    #[arg(long)]
    pub charset: String,
    /// Search-space mask, e.g. ?1?1?1?1
    #[arg(long)]
    pub mask: String,
}

impl From<ChallengeArgs> for Challenge {
    fn from(args: ChallengeArgs) -> Self {
        Challenge::new(
            args.run_id,
            args.hash,
            args.salt,
            args.mode,
            args.charset,
            args.mask,
        )
    }
}
