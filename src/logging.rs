//! File-backed tracing setup. The terminal belongs to the UI, so events go to
//! a log file in the data directory instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "biodata_manager=info";

/// Install the global subscriber writing to `log_path`. Returns `false` when
/// the file cannot be opened, in which case the app simply runs without logs.
pub fn init(log_path: &Path) -> bool {
    if let Some(parent) = log_path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(log_path) else {
        return false;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(path = %log_path.display(), "tracing initialized");
    }
    installed
}
