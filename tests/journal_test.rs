use chrono::{Duration, NaiveDate, TimeZone, Utc};
use ecue::journal::{metadata, Entry, Exchange, Journal, JournalStore, SessionEnd};
use std::io::Cursor;
use tempfile::TempDir;

fn journal(dir: &TempDir) -> Journal {
    Journal {
        store: JournalStore::new(dir.path().join("entries")),
        metadata_path: dir.path().join("metadata.json"),
        min_words_for_streak: 5,
    }
}

fn entry_at(day: u32, text: &str) -> Entry {
    let started = Utc.with_ymd_and_hms(2025, 5, day, 20, 15, 0).unwrap();
    Entry::from_exchanges(
        vec![Exchange { user: text.into(), assistant: String::new() }],
        started,
    )
    .unwrap()
}

#[test]
fn entries_load_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = journal(&dir).store;
    for (day, text) in [(2, "middle"), (3, "newest"), (1, "oldest")] {
        store.save(&entry_at(day, text)).unwrap();
    }

    let contents: Vec<String> = store.load_all().unwrap().into_iter().map(|e| e.content).collect();
    assert_eq!(contents, ["newest", "middle", "oldest"]);
}

#[test]
fn missing_directory_means_no_entries() {
    let dir = TempDir::new().unwrap();
    let store = JournalStore::new(dir.path().join("nowhere"));
    assert!(store.load_all().unwrap().is_empty());
    assert!(store.load_by_id("abc").unwrap().is_none());
}

#[test]
fn unreadable_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let store = journal(&dir).store;
    let saved = entry_at(4, "kept entry");
    store.save(&saved).unwrap();
    std::fs::write(store.dir().join("2025-05-05-broken.json"), "{").unwrap();
    std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

    let entries = store.load_all().unwrap();
    assert_eq!(entries, vec![saved]);
}

#[test]
fn load_by_id_matches_file_name() {
    let dir = TempDir::new().unwrap();
    let store = journal(&dir).store;
    let first = entry_at(1, "first");
    let second = entry_at(2, "second");
    store.save(&first).unwrap();
    let path = store.save(&second).unwrap();

    assert!(path.file_name().unwrap().to_string_lossy().starts_with("2025-05-02-20-15-00-"));
    assert_eq!(store.load_by_id(&second.id).unwrap(), Some(second));
    assert_eq!(store.load_by_id("not-an-id").unwrap(), None);
}

#[test]
fn writing_session_saves_entry_and_metadata() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let started = Utc.with_ymd_and_hms(2025, 5, 10, 7, 30, 0).unwrap();
    let mut out = Vec::new();

    let input = "Woke up early and walked\n\nthe dog by the river\nsave\n";
    let end = journal
        .write_session(&mut Cursor::new(input), &mut out, started)
        .unwrap();

    let SessionEnd::Saved(entry) = end else {
        panic!("expected a saved entry");
    };
    assert_eq!(entry.exchanges.len(), 2);
    assert_eq!(entry.content, "Woke up early and walked the dog by the river");
    assert_eq!(entry.word_count, 10);

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("[5 words this entry, 5 words total]"));
    assert!(out.contains("[5 words this entry, 10 words total]"));

    let meta = metadata::load(&journal.metadata_path);
    assert_eq!(meta.total_entries, 1);
    assert_eq!(meta.current_daily_streak, 1);
    assert_eq!(meta.last_entry_date, NaiveDate::from_ymd_opt(2025, 5, 10));
}

#[test]
fn quitting_or_running_out_of_input_discards() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let started = Utc.with_ymd_and_hms(2025, 5, 10, 7, 30, 0).unwrap();

    for input in ["some words\nquit\n", "some words\n"] {
        let end = journal
            .write_session(&mut Cursor::new(input), &mut Vec::new(), started)
            .unwrap();
        assert!(matches!(end, SessionEnd::Discarded));
    }
    let end = journal
        .write_session(&mut Cursor::new("save\n"), &mut Vec::new(), started)
        .unwrap();
    assert!(matches!(end, SessionEnd::Empty));

    assert!(journal.store.load_all().unwrap().is_empty());
    assert!(!journal.metadata_path.exists());
}

#[test]
fn streak_metadata_spans_saved_entries() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let long = "one two three four five six";
    for day in [1, 2, 3, 5, 6] {
        journal.store.save(&entry_at(day, long)).unwrap();
    }
    journal.store.save(&entry_at(7, "too short")).unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
    let meta = journal.refresh_metadata(today).unwrap();
    assert_eq!(meta.all_time_daily_streak, 3);
    assert_eq!(meta.current_daily_streak, 2);
    assert_eq!(meta.total_word_count, 5 * 6 + 2);
    assert_eq!(meta.last_entry_date, NaiveDate::from_ymd_opt(2025, 5, 7));
    assert_eq!(metadata::load(&journal.metadata_path), meta);

    // one day later the run is broken by the short entry
    let meta = journal.refresh_metadata(today + Duration::days(1)).unwrap();
    assert_eq!(meta.current_daily_streak, 0);
}
