//! Application state shared by every screen: storage, playlist, view state and
//! theme. Operations that touch more than one of those live here so they
//! happen as one step (deleting the selected song also clears the selection
//! before anything can be drawn).

use std::path::PathBuf;

use anyhow::Result;
use log::{error, info};

use crate::db::{load_theme, save_theme, Storage};
use crate::import::{read_files, ImportError};
use crate::models::{ImportedSong, Song};
use crate::store::{Direction, PendingDelete, SongStore};
use crate::theme::Theme;
use crate::view::{Overlay, ViewController};

/// Outcome of importing a batch of files.
#[derive(Debug, Default)]
pub struct ImportSummary {
    /// Songs appended to the playlist.
    pub imported: usize,
    /// One entry per file (or array item) that could not be imported.
    pub failures: Vec<ImportError>,
    /// Set when the songs were added but could not be saved.
    pub persist_error: Option<anyhow::Error>,
}

impl ImportSummary {
    /// One-line description for the status bar.
    pub fn message(&self) -> String {
        let plural = if self.imported == 1 { "" } else { "s" };
        let mut message = format!("Imported {} song{plural}.", self.imported);
        match self.failures.as_slice() {
            [] => {}
            [only] => message.push_str(&format!(" {only}")),
            many => {
                let mut files: Vec<String> = Vec::new();
                for failure in many {
                    let path = failure.path();
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    if !files.contains(&name) {
                        files.push(name);
                    }
                }
                message.push_str(&format!(
                    " {} problems in {}, first: {}",
                    many.len(),
                    files.join(", "),
                    many[0]
                ));
            }
        }
        if let Some(err) = &self.persist_error {
            message.push_str(&format!(" Saving failed: {err}"));
        }
        message
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.persist_error.is_none()
    }
}

pub struct Session<S: Storage> {
    storage: S,
    store: SongStore,
    view: ViewController,
    theme: Theme,
}

impl<S: Storage> Session<S> {
    /// Hydrate the playlist and theme from `storage`.
    pub fn load(storage: S) -> Self {
        let store = SongStore::load(&storage);
        let theme = match load_theme(&storage) {
            Ok(Some(theme)) => theme,
            Ok(None) => Theme::detect(),
            Err(err) => {
                error!("failed to read theme preference: {err:#}");
                Theme::detect()
            }
        };

        Self {
            storage,
            store,
            view: ViewController::new(),
            theme,
        }
    }

    pub fn store(&self) -> &SongStore {
        &self.store
    }

    pub fn songs(&self) -> &[Song] {
        self.store.songs()
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn active_song(&self) -> Option<&Song> {
        self.view.active_song(self.store.songs())
    }

    pub fn select_song(&mut self, id: &str) -> bool {
        self.view.select_song(self.store.songs(), id)
    }

    pub fn go_back(&mut self) {
        self.view.go_back();
    }

    pub fn resume(&mut self) -> bool {
        self.view.resume(self.store.songs())
    }

    pub fn toggle_overlay(&mut self) -> Overlay {
        self.view.toggle_overlay(self.store.songs())
    }

    pub fn close_overlay(&mut self) {
        self.view.close_overlay();
    }

    pub fn next(&mut self) -> bool {
        self.view.next(self.store.songs())
    }

    pub fn prev(&mut self) -> bool {
        self.view.prev(self.store.songs())
    }

    pub fn has_next(&self) -> bool {
        self.view.has_next(self.store.songs())
    }

    pub fn has_prev(&self) -> bool {
        self.view.has_prev(self.store.songs())
    }

    pub fn reorder(&mut self, index: usize, direction: Direction) -> Result<bool> {
        self.store.reorder(&mut self.storage, index, direction)
    }

    pub fn request_delete(&self, id: &str) -> Option<PendingDelete> {
        self.store.request_delete(id)
    }

    /// Delete a confirmed song and fix up the view in the same step. The view
    /// is updated even when saving fails, since the song is gone from memory.
    pub fn delete(&mut self, confirmed: PendingDelete) -> Result<Option<Song>> {
        let id = confirmed.id().to_string();
        let result = self.store.delete(&mut self.storage, confirmed);
        self.view.song_removed(&id);
        self.view.reconcile(self.store.songs());
        result
    }

    /// Append already-parsed songs.
    pub fn import_songs(&mut self, items: Vec<ImportedSong>) -> Result<Vec<String>> {
        self.store.import_songs(&mut self.storage, items)
    }

    /// Read `paths` concurrently and append every song that parsed, one file at
    /// a time in path order. A broken file never blocks the others.
    pub fn import_files(&mut self, paths: &[PathBuf]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for file in read_files(paths) {
            summary.failures.extend(file.errors);
            if file.songs.is_empty() {
                continue;
            }

            let count = file.songs.len();
            if let Err(err) = self.store.import_songs(&mut self.storage, file.songs) {
                error!("failed to save after importing {}: {err:#}", file.path.display());
                summary.persist_error = Some(err);
            }
            summary.imported += count;
        }

        info!(
            "import finished: {} song(s), {} problem(s)",
            summary.imported,
            summary.failures.len()
        );
        summary
    }

    /// Flip between light and dark and remember the choice.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        save_theme(&mut self.storage, self.theme)?;
        Ok(self.theme)
    }
}
