//! Persistence module split across logical submodules.

mod connection;
mod songs;
mod storage;
mod theme;

pub use connection::{ensure_schema, open_in_memory};
pub use songs::{load_songs, save_songs, SONGS_KEY};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
pub use theme::{load_theme, save_theme, THEME_KEY};
