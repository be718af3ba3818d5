//! Domain models shared by the store, the importer and the TUI. The field
//! names deliberately mirror the JSON import format so the same types can be
//! deserialized from user files and written back to the persisted playlist
//! without a translation layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier used by the built-in example song that seeds an empty install.
pub const DEMO_SONG_ID: &str = "demo-song";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Descriptive metadata for a song. Imported once and never edited.
pub struct SongInfo {
    /// Title displayed in lists, headers and the overlay.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Optional genre shown next to the artist in the playlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One sung line in two languages.
pub struct LyricLine {
    /// Primary-language text.
    pub en: String,
    /// Translated text rendered underneath the primary line.
    pub ko: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A labelled group of lines such as "Verse 1" or "Chorus".
pub struct LyricSection {
    pub section: String,
    pub lines: Vec<LyricLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A song as stored in the playlist. The `id` is assigned at import time and
/// never changes afterwards, even when the song is moved around.
pub struct Song {
    pub id: String,
    pub song_info: SongInfo,
    /// Advisory ordering hint carried over from the import file. Playlist
    /// order is the position in the store, not this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    pub lyrics: Vec<LyricSection>,
}

impl Song {
    /// Attach a freshly generated identifier to an imported record.
    pub fn from_import(id: String, imported: ImportedSong) -> Self {
        Self {
            id,
            song_info: imported.song_info,
            order: imported.order,
            lyrics: imported.lyrics,
        }
    }

    /// Compose a `Title - Artist` string that omits the hyphen when the artist
    /// is blank.
    pub fn display_title(&self) -> String {
        let artist = self.song_info.artist.trim();
        if artist.is_empty() {
            self.song_info.title.clone()
        } else {
            format!("{} - {}", self.song_info.title, artist)
        }
    }

    /// Total number of lyric lines across every section.
    pub fn line_count(&self) -> usize {
        self.lyrics.iter().map(|section| section.lines.len()).sum()
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

/// The shape accepted from import files: a song without an identifier. Any
/// `id` present in the file is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportedSong {
    pub song_info: SongInfo,
    #[serde(default)]
    pub order: Option<f64>,
    pub lyrics: Vec<LyricSection>,
}

/// The example song shown when nothing has been persisted yet.
pub fn demo_song() -> Song {
    let line = |en: &str, ko: &str| LyricLine {
        en: en.to_string(),
        ko: ko.to_string(),
    };

    Song {
        id: DEMO_SONG_ID.to_string(),
        song_info: SongInfo {
            title: "Twinkle, Twinkle, Little Star".to_string(),
            artist: "Traditional".to_string(),
            genre: Some("Nursery Rhyme".to_string()),
        },
        order: Some(1.0),
        lyrics: vec![
            LyricSection {
                section: "Verse 1".to_string(),
                lines: vec![
                    line("Twinkle, twinkle, little star", "반짝반짝 작은 별"),
                    line("How I wonder what you are", "네가 무엇인지 궁금해"),
                    line("Up above the world so high", "세상 저 높은 곳 위에"),
                    line("Like a diamond in the sky", "하늘의 다이아몬드처럼"),
                ],
            },
            LyricSection {
                section: "Chorus".to_string(),
                lines: vec![
                    line("Twinkle, twinkle, little star", "반짝반짝 작은 별"),
                    line("How I wonder what you are", "네가 무엇인지 궁금해"),
                ],
            },
        ],
    }
}
