// src/cli/dispatch.rs — `powjob dispatch`

use crate::core::orchestrator::Orchestrator;
use crate::core::types::Challenge;
use crate::runner::ProcessRunner;

/// Dispatch one challenge and print its result as JSON on stdout.
pub async fn run_dispatch<R: ProcessRunner>(
    orchestrator: &Orchestrator<R>,
    challenge: Challenge,
) -> anyhow::Result<()> {
    let result = orchestrator.dispatch(challenge).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
