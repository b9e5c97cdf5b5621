// src/cli/batch.rs — `powjob batch <file>`

use anyhow::Context;
use std::collections::HashSet;
use std::path::Path;

use crate::core::orchestrator::Orchestrator;
use crate::core::types::{Challenge, PowOutcome};
use crate::runner::ProcessRunner;

/// Load challenges from a JSON array file.
///
/// Duplicate run ids are rejected up front: the registry would tolerate
/// them, but their results could not be told apart.
pub fn load_challenges(path: &Path) -> anyhow::Result<Vec<Challenge>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let challenges: Vec<Challenge> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid challenge file {}", path.display()))?;

    let mut seen = HashSet::new();
    for c in &challenges {
        if !seen.insert(c.run_id.as_str()) {
            anyhow::bail!("Duplicate run_id '{}' in {}", c.run_id, path.display());
        }
    }
    Ok(challenges)
}

/// Dispatch every challenge in `path` concurrently and print a JSON array
/// of results in file order.
pub async fn run_batch<R: ProcessRunner>(
    orchestrator: &Orchestrator<R>,
    path: &Path,
) -> anyhow::Result<()> {
    let challenges = load_challenges(path)?;
    tracing::info!("Dispatching {} challenge(s) from {}", challenges.len(), path.display());

    let results = orchestrator.dispatch_all(challenges).await;
    let found = results
        .iter()
        .filter(|r| r.outcome() == PowOutcome::Found)
        .count();
    tracing::info!("Batch finished: {found}/{} cracked", results.len());

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
