//! Offline Labeling Run - Entry Point

use app::{init_logging, load_config, run_batch};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Coffee Pipeline (batch) v{} ===", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let summary = run_batch(&config)?;
    info!(
        "batch run complete: {} segments, {} rows written",
        summary.segments, summary.rows_written
    );

    Ok(())
}
