//! Which song is active and what is on screen.
//!
//! The detail screen and the overlay both read the selection from here, so
//! stepping through songs in one is immediately reflected in the other.

use log::debug;

use crate::models::Song;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    List,
    Detail,
}

/// Floating lyrics panel visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewController {
    screen: Screen,
    overlay: Overlay,
    selection: Option<String>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Index of the selected song within `songs`.
    pub fn active_index(&self, songs: &[Song]) -> Option<usize> {
        let id = self.selection.as_deref()?;
        songs.iter().position(|song| song.id == id)
    }

    pub fn active_song<'a>(&self, songs: &'a [Song]) -> Option<&'a Song> {
        self.active_index(songs).map(|index| &songs[index])
    }

    /// Select `id` and show its lyrics. An unknown id drops back to the list.
    pub fn select_song(&mut self, songs: &[Song], id: &str) -> bool {
        if songs.iter().any(|song| song.id == id) {
            self.selection = Some(id.to_string());
            self.screen = Screen::Detail;
            true
        } else {
            debug!("ignoring selection of unknown song {id}");
            self.reset();
            false
        }
    }

    /// Back to the playlist. The selection stays so the list can offer to
    /// resume it.
    pub fn go_back(&mut self) {
        self.screen = Screen::List;
    }

    /// Return to the detail screen of the current selection, if any.
    pub fn resume(&mut self, songs: &[Song]) -> bool {
        if self.active_index(songs).is_some() {
            self.screen = Screen::Detail;
            true
        } else {
            false
        }
    }

    /// Open or close the overlay. Opening requires a selected song; without one
    /// nothing changes. Returns the resulting state.
    pub fn toggle_overlay(&mut self, songs: &[Song]) -> Overlay {
        self.overlay = match self.overlay {
            Overlay::Open => Overlay::Closed,
            Overlay::Closed if self.active_index(songs).is_some() => Overlay::Open,
            Overlay::Closed => Overlay::Closed,
        };
        self.overlay
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::Closed;
    }

    /// Move the selection to the following song. No-op at the end.
    pub fn next(&mut self, songs: &[Song]) -> bool {
        match self.active_index(songs) {
            Some(index) if index + 1 < songs.len() => {
                self.selection = Some(songs[index + 1].id.clone());
                true
            }
            _ => false,
        }
    }

    /// Move the selection to the preceding song. No-op at the start.
    pub fn prev(&mut self, songs: &[Song]) -> bool {
        match self.active_index(songs) {
            Some(index) if index > 0 => {
                self.selection = Some(songs[index - 1].id.clone());
                true
            }
            _ => false,
        }
    }

    pub fn has_next(&self, songs: &[Song]) -> bool {
        self.active_index(songs)
            .is_some_and(|index| index + 1 < songs.len())
    }

    pub fn has_prev(&self, songs: &[Song]) -> bool {
        self.active_index(songs).is_some_and(|index| index > 0)
    }

    /// A song was removed from the store. If it was the selected one, clear
    /// the selection, close the overlay and go back to the list.
    pub fn song_removed(&mut self, id: &str) {
        if self.selection.as_deref() == Some(id) {
            self.reset();
        }
    }

    /// Drop a selection that no longer points at a song.
    pub fn reconcile(&mut self, songs: &[Song]) {
        if self.selection.is_some() && self.active_index(songs).is_none() {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.selection = None;
        self.overlay = Overlay::Closed;
        self.screen = Screen::List;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SongInfo;

    fn songs() -> Vec<Song> {
        ["p", "q", "r"]
            .into_iter()
            .map(|id| Song {
                id: id.to_string(),
                song_info: SongInfo {
                    title: id.to_uppercase(),
                    artist: "X".to_string(),
                    genre: None,
                },
                order: None,
                lyrics: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn select_and_go_back_keeps_selection() {
        let songs = songs();
        let mut view = ViewController::new();
        assert!(view.select_song(&songs, "q"));
        assert_eq!(view.screen(), Screen::Detail);

        view.go_back();
        assert_eq!(view.screen(), Screen::List);
        assert_eq!(view.selection(), Some("q"));

        assert!(view.resume(&songs));
        assert_eq!(view.screen(), Screen::Detail);
    }

    #[test]
    fn selecting_unknown_song_falls_back_to_list() {
        let songs = songs();
        let mut view = ViewController::new();
        view.select_song(&songs, "q");
        view.toggle_overlay(&songs);

        assert!(!view.select_song(&songs, "zzz"));
        assert_eq!(view, ViewController::new());
    }

    #[test]
    fn overlay_needs_a_selection() {
        let songs = songs();
        let mut view = ViewController::new();
        assert_eq!(view.toggle_overlay(&songs), Overlay::Closed);

        view.select_song(&songs, "p");
        assert_eq!(view.toggle_overlay(&songs), Overlay::Open);
        view.go_back();
        assert_eq!(view.overlay(), Overlay::Open);
        assert_eq!(view.toggle_overlay(&songs), Overlay::Closed);
    }

    #[test]
    fn next_and_prev_stop_at_the_ends() {
        let songs = songs();
        let mut view = ViewController::new();
        assert!(!view.next(&songs));

        view.select_song(&songs, "q");
        assert!(view.next(&songs));
        assert_eq!(view.selection(), Some("r"));
        assert!(!view.has_next(&songs));
        assert!(!view.next(&songs));

        assert!(view.prev(&songs));
        assert!(view.prev(&songs));
        assert_eq!(view.selection(), Some("p"));
        assert!(!view.has_prev(&songs));
        assert!(!view.prev(&songs));
    }

    #[test]
    fn removing_selected_song_resets_everything() {
        let songs = songs();
        let mut view = ViewController::new();
        view.select_song(&songs, "q");
        view.toggle_overlay(&songs);

        view.song_removed("p");
        assert_eq!(view.selection(), Some("q"));

        view.song_removed("q");
        assert_eq!(view.selection(), None);
        assert_eq!(view.screen(), Screen::List);
        assert_eq!(view.overlay(), Overlay::Closed);
    }

    #[test]
    fn reconcile_drops_dangling_selection() {
        let mut songs = songs();
        let mut view = ViewController::new();
        view.select_song(&songs, "r");
        songs.pop();
        view.reconcile(&songs);
        assert_eq!(view, ViewController::new());
    }
}
