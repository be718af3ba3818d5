//! Logger setup. The terminal belongs to the UI while the app runs, so log
//! records go to a file inside the data directory instead of stderr.

use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

use crate::config::Config;

/// Install the global logger. The level defaults to `info` and can be changed
/// through `RUST_LOG` as usual.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("failed to open log file")?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()
        .context("failed to install logger")?;

    Ok(())
}
