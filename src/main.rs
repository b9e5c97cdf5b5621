// src/main.rs — powjob entry point

use clap::Parser;
use std::path::Path;

use powjob::cli::{Cli, Commands};
use powjob::core::orchestrator::Orchestrator;
use powjob::infra::config::Config;
use powjob::infra::logger;
use powjob::runner::{HashcatRunner, ToolSettings};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging (respects RUST_LOG)
    logger::init_logging(if cli.verbose { "debug" } else { "info" });

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(Path::new(path))?
    } else {
        Config::load()?
    };
    cli.overrides.apply(&mut config);
    config.validate()?;

    let settings = ToolSettings::from_config(&config.pow);

    match cli.command {
        Commands::Doctor => powjob::cli::doctor::run_doctor(&settings).await,
        Commands::Dispatch(args) => {
            let orchestrator = start_orchestrator(settings).await;
            powjob::cli::dispatch::run_dispatch(&orchestrator, args.into()).await
        }
        Commands::Batch { file } => {
            let orchestrator = start_orchestrator(settings).await;
            powjob::cli::batch::run_batch(&orchestrator, Path::new(&file)).await
        }
    }
}

/// Log GPU availability, then build the orchestrator around hashcat.
async fn start_orchestrator(settings: ToolSettings) -> Orchestrator {
    powjob::diagnostics::log_gpu_availability().await;
    Orchestrator::new(HashcatRunner::new(), settings)
}
