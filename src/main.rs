//! Binary entry point: resolve configuration, open the key-value store, load
//! the playlist and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use log::info;

use lyrical_float::{logging, run_app, App, Config, Session, SqliteStorage};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;
    info!("starting with data directory {}", config.data_dir.display());

    let storage = SqliteStorage::open(&config.db_path())
        .with_context(|| format!("failed to open {}", config.db_path().display()))?;
    let session = Session::load(storage);

    let mut app = App::new(session, config.import_dir.clone());
    run_app(&mut app)
}
