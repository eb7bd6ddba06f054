//! Live Prediction Loop - Entry Point

use app::{init_logging, load_config, run_live};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Coffee Pipeline (live) v{} ===", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    run_live(config).await?;

    Ok(())
}
