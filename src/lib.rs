//! Core library surface for the Lyrical Float playlist TUI.
//!
//! The binary only wires these pieces together; everything it drives is
//! reachable from here so integration tests can use the same API.
pub mod config;
pub mod db;
pub mod drag;
pub mod import;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod theme;
pub mod ui;
pub mod view;

/// Persistence backends the session can run on.
pub use db::{MemoryStorage, SqliteStorage, Storage};

pub use config::Config;
pub use models::{ImportedSong, LyricLine, LyricSection, Song, SongInfo};
pub use session::{ImportSummary, Session};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
