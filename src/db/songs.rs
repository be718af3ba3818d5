use anyhow::{Context, Result};

use crate::models::Song;

use super::storage::Storage;

/// Storage key holding the serialized playlist.
pub const SONGS_KEY: &str = "lyrical_songs";

/// Read the persisted playlist. `Ok(None)` means nothing was ever saved; a
/// value that does not parse is reported as an error so the caller can decide
/// how to recover.
pub fn load_songs(storage: &impl Storage) -> Result<Option<Vec<Song>>> {
    let Some(raw) = storage.get_item(SONGS_KEY)? else {
        return Ok(None);
    };

    let songs = serde_json::from_str(&raw).context("persisted playlist is malformed")?;
    Ok(Some(songs))
}

/// Overwrite the persisted playlist with `songs`, keeping their order.
pub fn save_songs(storage: &mut impl Storage, songs: &[Song]) -> Result<()> {
    let raw = serde_json::to_string(songs).context("failed to serialize playlist")?;
    storage.set_item(SONGS_KEY, &raw)
}
