use std::fs;
use std::path::Path;

use lyrical_float::db::{load_songs, SONGS_KEY};
use lyrical_float::models::DEMO_SONG_ID;
use lyrical_float::store::Direction;
use lyrical_float::view::{Overlay, Screen};
use lyrical_float::{Session, SqliteStorage, Storage};

fn open(path: &Path) -> Session<SqliteStorage> {
    Session::load(SqliteStorage::open(path).unwrap())
}

fn titles(session: &Session<SqliteStorage>) -> Vec<String> {
    session
        .songs()
        .iter()
        .map(|song| song.song_info.title.clone())
        .collect()
}

#[test]
fn first_run_shows_demo_song_without_saving_it() {
    let dir = tempfile::tempdir().unwrap();
    let session = open(&dir.path().join("db.sqlite"));

    assert_eq!(session.songs().len(), 1);
    assert_eq!(session.songs()[0].id, DEMO_SONG_ID);
    assert_eq!(session.storage().get_item(SONGS_KEY).unwrap(), None);
}

#[test]
fn imported_songs_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db.sqlite");

    let single = dir.path().join("single.json");
    fs::write(
        &single,
        r#"{"song_info":{"title":"Solo","artist":"One","genre":"Pop"},
            "lyrics":[{"section":"Verse 1","lines":[{"en":"hi","ko":"안녕"}]}]}"#,
    )
    .unwrap();
    let many = dir.path().join("many.json");
    fs::write(
        &many,
        r#"[{"song_info":{"title":"A","artist":"X"},"lyrics":[]},
            {"title":"missing song_info"},
            {"song_info":{"title":"B","artist":"Y"},"lyrics":[]}]"#,
    )
    .unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "not json").unwrap();

    let mut session = open(&db_path);
    let summary = session.import_files(&[single, many, broken]);
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.failures.len(), 2);
    assert!(summary.persist_error.is_none());
    assert_eq!(titles(&session), ["Twinkle, Twinkle, Little Star", "Solo", "A", "B"]);

    let before = session.songs().to_vec();
    drop(session);

    let reopened = open(&db_path);
    assert_eq!(reopened.songs(), before.as_slice());
    assert_eq!(reopened.songs()[1].song_info.genre.as_deref(), Some("Pop"));
}

#[test]
fn reorder_and_delete_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db.sqlite");
    let file = dir.path().join("songs.json");
    fs::write(
        &file,
        r#"[{"song_info":{"title":"P","artist":"X"},"lyrics":[]},
            {"song_info":{"title":"Q","artist":"X"},"lyrics":[]},
            {"song_info":{"title":"R","artist":"X"},"lyrics":[]}]"#,
    )
    .unwrap();

    let mut session = open(&db_path);
    let demo = session.request_delete(DEMO_SONG_ID).unwrap();
    session.delete(demo).unwrap();
    assert!(session.songs().is_empty());
    session.import_files(&[file]);
    assert_eq!(titles(&session), ["P", "Q", "R"]);

    assert!(session.reorder(1, Direction::Up).unwrap());
    assert_eq!(titles(&session), ["Q", "P", "R"]);

    let r = session.songs()[2].id.clone();
    session.select_song(&r);
    session.toggle_overlay();
    let pending = session.request_delete(&r).unwrap();
    session.delete(pending).unwrap();
    assert_eq!(session.view().screen(), Screen::List);
    assert_eq!(session.view().overlay(), Overlay::Closed);
    assert_eq!(session.view().selection(), None);
    drop(session);

    let reopened = open(&db_path);
    assert_eq!(titles(&reopened), ["Q", "P"]);
    let stored = load_songs(reopened.storage()).unwrap().unwrap();
    assert_eq!(stored.len(), 2);
}

#[test]
fn theme_choice_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db.sqlite");

    let mut session = open(&db_path);
    let chosen = session.toggle_theme().unwrap();
    drop(session);

    assert_eq!(open(&db_path).theme(), chosen);
}
