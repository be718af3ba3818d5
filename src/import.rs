//! Reading songs from user-supplied JSON files.
//!
//! A file holds either one song object or an array of them. Files are read on
//! a bounded set of scoped threads, and the outcomes are collected back in the
//! order the paths were given. Nothing here touches the store; the caller
//! appends each file's songs once the reads are done.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use crate::models::ImportedSong;

/// Extension the picker filters on.
pub const IMPORT_EXTENSION: &str = "json";
/// Reader threads used when the core count is unknown.
const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing file {}: invalid JSON ({source})", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain a song object or an array of songs", .path.display())]
    Shape { path: PathBuf },
    #[error("song #{} in {} is malformed: {source}", .index + 1, .path.display())]
    InvalidSong {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl ImportError {
    /// File the problem was found in.
    pub fn path(&self) -> &Path {
        match self {
            ImportError::Read { path, .. }
            | ImportError::Parse { path, .. }
            | ImportError::Shape { path }
            | ImportError::InvalidSong { path, .. } => path,
        }
    }
}

/// Everything learned from one file: the songs that parsed and the problems
/// that did not.
#[derive(Debug)]
pub struct FileImport {
    pub path: PathBuf,
    pub songs: Vec<ImportedSong>,
    pub errors: Vec<ImportError>,
}

impl FileImport {
    fn failed(path: PathBuf, error: ImportError) -> Self {
        Self {
            path,
            songs: Vec::new(),
            errors: vec![error],
        }
    }
}

/// Whether `path` carries the import extension (case-insensitive).
pub fn is_import_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(IMPORT_EXTENSION))
}

/// Parse the contents of one file. Invalid JSON or a payload that is neither an
/// object nor an array fails the whole file; a bad element inside an array only
/// fails that element.
pub fn parse_payload(path: &Path, text: &str) -> FileImport {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(source) => {
            return FileImport::failed(
                path.to_path_buf(),
                ImportError::Parse {
                    path: path.to_path_buf(),
                    source,
                },
            )
        }
    };

    let items = match value {
        Value::Array(items) => items,
        item @ Value::Object(_) => vec![item],
        _ => {
            return FileImport::failed(
                path.to_path_buf(),
                ImportError::Shape {
                    path: path.to_path_buf(),
                },
            )
        }
    };

    let mut songs = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ImportedSong>(item) {
            Ok(song) => songs.push(song),
            Err(source) => errors.push(ImportError::InvalidSong {
                path: path.to_path_buf(),
                index,
                source,
            }),
        }
    }

    FileImport {
        path: path.to_path_buf(),
        songs,
        errors,
    }
}

/// Read and parse a single file.
pub fn read_file(path: &Path) -> FileImport {
    match fs::read_to_string(path) {
        Ok(text) => parse_payload(path, &text),
        Err(source) => FileImport::failed(
            path.to_path_buf(),
            ImportError::Read {
                path: path.to_path_buf(),
                source,
            },
        ),
    }
}

/// Read every file concurrently and return one outcome per path, in input
/// order. Paths are split into contiguous batches, at most one per available
/// core, and each batch is read on its own scoped thread.
pub fn read_files(paths: &[PathBuf]) -> Vec<FileImport> {
    if paths.is_empty() {
        return Vec::new();
    }
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(DEFAULT_WORKERS);
    let batch_size = batch_size(paths.len(), workers);

    let imports: Vec<FileImport> = thread::scope(|scope| {
        let handles: Vec<_> = paths
            .chunks(batch_size)
            .map(|batch| {
                let handle =
                    scope.spawn(move || batch.iter().map(|path| read_file(path)).collect::<Vec<_>>());
                (batch, handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(batch, handle)| {
                handle.join().unwrap_or_else(|_| {
                    batch
                        .iter()
                        .map(|path| {
                            FileImport::failed(
                                path.clone(),
                                ImportError::Read {
                                    path: path.clone(),
                                    source: std::io::Error::other("reader thread panicked"),
                                },
                            )
                        })
                        .collect()
                })
            })
            .collect()
    });

    for import in &imports {
        debug!(
            "read {}: {} song(s), {} error(s)",
            import.path.display(),
            import.songs.len(),
            import.errors.len()
        );
        for error in &import.errors {
            warn!("{error}");
        }
    }

    imports
}

/// Paths per batch so that `len` paths need at most `workers` threads.
fn batch_size(len: usize, workers: usize) -> usize {
    len.div_ceil(workers.clamp(1, len.max(1))).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SONGS: &str = r#"[
        {"song_info": {"title": "A", "artist": "X"}, "lyrics": []},
        {"song_info": {"title": "B", "artist": "Y", "genre": "Pop"}, "order": 2,
         "lyrics": [{"section": "Verse 1", "lines": [{"en": "hi", "ko": "안녕"}]}]}
    ]"#;

    #[test]
    fn accepts_array_payload_in_order() {
        let import = parse_payload(Path::new("songs.json"), TWO_SONGS);
        assert!(import.errors.is_empty());
        let titles: Vec<_> = import
            .songs
            .iter()
            .map(|song| song.song_info.title.as_str())
            .collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(import.songs[1].order, Some(2.0));
        assert_eq!(import.songs[1].lyrics[0].lines[0].ko, "안녕");
    }

    #[test]
    fn accepts_single_object_payload() {
        let import = parse_payload(
            Path::new("one.json"),
            r#"{"song_info": {"title": "Solo", "artist": "Z"}, "lyrics": []}"#,
        );
        assert_eq!(import.songs.len(), 1);
        assert!(import.errors.is_empty());
    }

    #[test]
    fn invalid_json_fails_whole_file() {
        let import = parse_payload(Path::new("bad.json"), "{not json");
        assert!(import.songs.is_empty());
        assert!(matches!(import.errors[..], [ImportError::Parse { .. }]));
        assert!(import.errors[0].to_string().contains("bad.json"));
    }

    #[test]
    fn scalar_payload_is_a_shape_error() {
        let import = parse_payload(Path::new("n.json"), "42");
        assert!(matches!(import.errors[..], [ImportError::Shape { .. }]));
    }

    #[test]
    fn bad_items_fail_individually() {
        let import = parse_payload(
            Path::new("mixed.json"),
            r#"[
                {"song_info": {"title": "Good", "artist": "X"}, "lyrics": []},
                {"song_info": {"title": "No artist"}, "lyrics": []},
                {"song_info": {"title": "Also good", "artist": "Y"}, "lyrics": []}
            ]"#,
        );
        assert_eq!(import.songs.len(), 2);
        assert_eq!(import.errors.len(), 1);
        match &import.errors[0] {
            ImportError::InvalidSong { index, .. } => assert_eq!(*index, 1),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(import.errors[0].to_string().starts_with("song #2"));
    }

    #[test]
    fn recognises_extension_case_insensitively() {
        assert!(is_import_file(Path::new("a.json")));
        assert!(is_import_file(Path::new("a.JSON")));
        assert!(!is_import_file(Path::new("a.txt")));
        assert!(!is_import_file(Path::new("json")));
    }

    #[test]
    fn batches_never_exceed_worker_count() {
        assert_eq!(batch_size(300, 8), 38);
        assert_eq!(300usize.div_ceil(batch_size(300, 8)), 8);
        assert_eq!(batch_size(3, 8), 1);
        assert_eq!(batch_size(5, 0), 5);
        assert_eq!(batch_size(0, 4), 1);
    }

    #[test]
    fn read_files_keeps_input_order_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths: Vec<PathBuf> = (0..40)
            .map(|i| {
                let path = dir.path().join(format!("song{i}.json"));
                let body = format!(r#"{{"song_info": {{"title": "T{i}", "artist": "X"}}, "lyrics": []}}"#);
                fs::write(&path, body).unwrap();
                path
            })
            .collect();
        paths.insert(7, dir.path().join("missing.json"));

        let imports = read_files(&paths);
        assert_eq!(imports.len(), 41);
        for (import, path) in imports.iter().zip(&paths) {
            assert_eq!(&import.path, path);
        }
        assert!(matches!(imports[7].errors[..], [ImportError::Read { .. }]));
        assert_eq!(imports[8].songs[0].song_info.title, "T7");
        assert_eq!(imports[40].songs[0].song_info.title, "T39");
    }
}
