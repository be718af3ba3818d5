//! The playlist: an ordered list of songs with a persisted mirror.
//!
//! Position in the list is the playlist order. Every successful mutation is
//! followed by a write of the whole list, except that an empty list is never
//! written, so a previously saved playlist survives until something new is
//! added.

use std::collections::HashSet;

use anyhow::Result;
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::db::{load_songs, save_songs, Storage};
use crate::models::{demo_song, ImportedSong, Song};

/// Direction for [`SongStore::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Proof that the user was asked before a song is deleted. Only
/// [`SongStore::request_delete`] hands these out; dropping one declines the
/// deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    id: String,
    title: String,
}

impl PendingDelete {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title of the song, for the confirmation prompt.
    pub fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongStore {
    songs: Vec<Song>,
}

impl SongStore {
    /// Load the persisted playlist. Missing or unreadable data falls back to the
    /// built-in example song; that fallback is not written back until the user
    /// changes something.
    pub fn load(storage: &impl Storage) -> Self {
        match load_songs(storage) {
            Ok(Some(songs)) => {
                info!("loaded {} song(s) from storage", songs.len());
                Self::from_songs(songs)
            }
            Ok(None) => {
                info!("no saved playlist, seeding example song");
                Self::from_songs(vec![demo_song()])
            }
            Err(err) => {
                error!("discarding saved playlist: {err:#}");
                Self::from_songs(vec![demo_song()])
            }
        }
    }

    /// Build a store from existing songs, reassigning identifiers that repeat
    /// an earlier one.
    pub fn from_songs(songs: Vec<Song>) -> Self {
        let mut store = Self {
            songs: Vec::with_capacity(songs.len()),
        };
        let mut seen = HashSet::new();
        for mut song in songs {
            if !seen.insert(song.id.clone()) {
                let fresh = store.fresh_id_excluding(&seen);
                warn!("duplicate song id {:?}, reassigned to {fresh}", song.id);
                seen.insert(fresh.clone());
                song.id = fresh;
            }
            store.songs.push(song);
        }
        store
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.songs.iter().position(|song| song.id == id)
    }

    /// Append imported songs in the given order, giving each a new identifier.
    /// Returns the identifiers that were assigned.
    pub fn import_songs(
        &mut self,
        storage: &mut impl Storage,
        items: Vec<ImportedSong>,
    ) -> Result<Vec<String>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = self.fresh_id();
            ids.push(id.clone());
            self.songs.push(Song::from_import(id, item));
        }
        info!("imported {} song(s)", ids.len());

        self.persist(storage)?;
        Ok(ids)
    }

    /// Swap the song at `index` with its neighbour. Returns `false` (and does
    /// nothing) at the ends of the list or for an out-of-range index.
    pub fn reorder(
        &mut self,
        storage: &mut impl Storage,
        index: usize,
        direction: Direction,
    ) -> Result<bool> {
        if index >= self.songs.len() {
            return Ok(false);
        }
        let target = match direction {
            Direction::Up if index == 0 => return Ok(false),
            Direction::Up => index - 1,
            Direction::Down if index + 1 == self.songs.len() => return Ok(false),
            Direction::Down => index + 1,
        };

        self.songs.swap(index, target);
        debug!("moved song {index} to {target}");
        self.persist(storage)?;
        Ok(true)
    }

    /// First half of a delete: look the song up and hand back a token the user
    /// must confirm. `None` when there is nothing to delete.
    pub fn request_delete(&self, id: &str) -> Option<PendingDelete> {
        self.get(id).map(|song| PendingDelete {
            id: song.id.clone(),
            title: song.display_title(),
        })
    }

    /// Second half of a delete: remove the confirmed song. Returns the removed
    /// song, or `None` if it had already gone.
    pub fn delete(
        &mut self,
        storage: &mut impl Storage,
        confirmed: PendingDelete,
    ) -> Result<Option<Song>> {
        let Some(index) = self.position(&confirmed.id) else {
            return Ok(None);
        };

        let removed = self.songs.remove(index);
        info!("deleted {:?} ({})", removed.song_info.title, removed.id);
        self.persist(storage)?;
        Ok(Some(removed))
    }

    /// Write the whole list to storage. An empty list is skipped.
    pub fn persist(&self, storage: &mut impl Storage) -> Result<()> {
        if self.songs.is_empty() {
            debug!("playlist is empty, keeping previously saved data");
            return Ok(());
        }
        save_songs(storage, &self.songs)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_id_excluding(&self, taken: &HashSet<String>) -> String {
        loop {
            let id = self.fresh_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }
}
