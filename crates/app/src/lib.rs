//! Coffee Pipeline Entry Points
//!
//! Two runs share one feature-engineering core: `coffee-batch` labels
//! historical logs into a training table, `coffee-live` predicts products
//! from the live sample feed. Divergence between the two would silently
//! corrupt the trained model's assumptions, so both paths are thin wiring
//! around the same crates.

mod batch;
mod config;
mod live;

pub use batch::{run_batch, BatchSummary};
pub use config::{load_config, AppConfig, PathsConfig, SegmentationConfig};
pub use live::run_live;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
