// src/cli/doctor.rs — `powjob doctor`

use crate::diagnostics::{self, GpuAvailability};
use crate::runner::ToolSettings;

/// Report whether the configured hashcat binary and a GPU are usable.
pub async fn run_doctor(settings: &ToolSettings) -> anyhow::Result<()> {
    println!("powjob doctor v{}", env!("CARGO_PKG_VERSION"));
    println!();

    eprint!("  Checking hashcat... ");
    match which::which(&settings.tool_path) {
        Ok(path) => eprintln!("ok ({})", path.display()),
        Err(_) => eprintln!("NOT FOUND ({})", settings.tool_path.display()),
    }

    eprintln!(
        "  Timeout: {}s, workload profile: {}",
        settings.timeout.as_secs(),
        settings.workload_profile
    );
    if !settings.extended_options.is_empty() {
        eprintln!("  Extended options: {}", settings.extended_options.join(" "));
    }

    eprint!("  Checking GPU... ");
    match diagnostics::probe_gpu().await {
        GpuAvailability::Available { devices } => eprintln!("{devices} CUDA device(s)"),
        GpuAvailability::NoDevices => eprintln!("no CUDA devices"),
        GpuAvailability::Unavailable { reason } => eprintln!("unavailable ({reason})"),
    }

    println!();
    println!("Done.");
    Ok(())
}
