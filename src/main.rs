//! Binary entry point: resolve the data directory, start file logging, open
//! the one shared store and drive the Ratatui event loop until the user exits.
use std::rc::Rc;

use anyhow::Context;
use biodata_manager::config::AppConfig;
use biodata_manager::{logging, run_app, App, RecordStore};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_home()?;
    logging::init(&config.log_path());

    let db_path = config.database_path();
    let store = RecordStore::open(&db_path)
        .with_context(|| format!("failed to open biodata store at {}", db_path.display()))?;

    let mut app = App::new(Rc::new(store));
    run_app(&mut app)
}
