//! Integration tests for the collection facades
//!
//! These tests verify end-to-end behavior through the public API:
//! - Mutations keep data and indexes consistent
//! - Searches hydrate full records and never error on zero matches
//! - Corrupt index partitions are repaired transparently mid-query
//! - Address book and notes book coexist under one root

use std::fs;
use std::path::Path;

use cardfile::{AddressBook, CardfileError, Config, Contact, Note, NotesBook, RecordId};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup_book() -> (TempDir, AddressBook) {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();
    let book = AddressBook::open(&config).unwrap();
    (temp, book)
}

fn contact(first_name: &str, last_name: &str, phone: &str, email: &str) -> Contact {
    Contact {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phones: vec![phone.to_string()],
        emails: vec![email.to_string()],
        ..Contact::default()
    }
}

fn note(title: &str, content: &str, tags: &[&str]) -> Note {
    Note {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Note::default()
    }
}

fn first_names(records: &[cardfile::Record<Contact>]) -> Vec<&str> {
    let mut names: Vec<&str> = records.iter().map(|r| r.payload.first_name.as_str()).collect();
    names.sort();
    names
}

// =============================================================================
// Address Book — CRUD
// =============================================================================

#[test]
fn test_add_and_get_contact() {
    let (_temp, book) = setup_book();

    let added = book
        .add_contact(contact("John", "Doe", "+380501234567", "john@example.com"))
        .unwrap();
    let fetched = book.contact(&added.id).unwrap();

    assert_eq!(fetched.payload, added.payload);
}

#[test]
fn test_get_missing_contact_is_not_found() {
    let (_temp, book) = setup_book();

    let result = book.contact(&RecordId::from("missing"));

    assert!(matches!(result, Err(CardfileError::NotFound { .. })));
}

#[test]
fn test_list_contacts_returns_everything() {
    let (_temp, book) = setup_book();

    for name in ["Ann", "Bob", "Cleo"] {
        book.add_contact(contact(name, "", "", "")).unwrap();
    }

    let all = book.list_contacts().unwrap();

    assert_eq!(first_names(&all), vec!["Ann", "Bob", "Cleo"]);
}

// =============================================================================
// Address Book — Search
// =============================================================================

#[test]
fn test_search_by_first_name_prefix() {
    let (_temp, book) = setup_book();

    book.add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();
    book.add_contact(contact("Joan", "Arc", "+380502222222", "joan@example.com"))
        .unwrap();
    book.add_contact(contact("Mark", "Twain", "+380503333333", "mark@example.com"))
        .unwrap();

    let hits = book.search_by_first_name("jo").unwrap();

    assert_eq!(first_names(&hits), vec!["Joan", "John"]);
}

#[test]
fn test_search_by_last_name_prefix() {
    let (_temp, book) = setup_book();

    book.add_contact(contact("John", "Doe", "", "")).unwrap();
    book.add_contact(contact("Jane", "Dorsey", "", "")).unwrap();
    book.add_contact(contact("Mark", "Twain", "", "")).unwrap();

    let hits = book.search_by_last_name("do").unwrap();

    assert_eq!(first_names(&hits), vec!["Jane", "John"]);
}

#[test]
fn test_search_by_phone_exact() {
    let (_temp, book) = setup_book();

    let john = book
        .add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();
    book.add_contact(contact("Joan", "Arc", "+380502222222", "joan@example.com"))
        .unwrap();

    let hits = book.search_by_phone("+380501111111").unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, john.id);
}

#[test]
fn test_search_by_email_has_no_false_positives() {
    let (_temp, book) = setup_book();

    let john = book
        .add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();
    book.add_contact(contact("Joan", "Arc", "+380502222222", "joan@example.com"))
        .unwrap();

    let hits = book.search_by_email("john@example.com").unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, john.id);
}

#[test]
fn test_search_with_no_matches_returns_empty_not_error() {
    let (_temp, book) = setup_book();

    book.add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();

    assert!(book.search_by_first_name("zz").unwrap().is_empty());
    assert!(book.search_by_phone("+000000000000").unwrap().is_empty());
    assert!(book.search_by_email("nobody@example.com").unwrap().is_empty());
}

// =============================================================================
// Address Book — Index Consistency Across Mutations
// =============================================================================

#[test]
fn test_update_moves_contact_between_search_results() {
    let (_temp, book) = setup_book();

    let added = book
        .add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();

    book.update_contact(
        &added.id,
        contact("John", "Doe", "+380509999999", "john@new.example.com"),
    )
    .unwrap();

    // Old field values no longer match
    assert!(book.search_by_phone("+380501111111").unwrap().is_empty());
    assert!(book.search_by_email("john@example.com").unwrap().is_empty());

    // New field values do
    assert_eq!(book.search_by_phone("+380509999999").unwrap().len(), 1);
    assert_eq!(
        book.search_by_email("john@new.example.com").unwrap().len(),
        1
    );
}

#[test]
fn test_removed_contact_disappears_from_all_searches() {
    let (temp, book) = setup_book();

    let added = book
        .add_contact(contact("John", "Doe", "+380501234567", "john@example.com"))
        .unwrap();
    book.remove_contact(&added.id).unwrap();

    assert!(matches!(
        book.contact(&added.id),
        Err(CardfileError::NotFound { .. })
    ));
    assert!(book.search_by_first_name("jo").unwrap().is_empty());
    assert!(book.search_by_last_name("do").unwrap().is_empty());
    assert!(book.search_by_phone("+380501234567").unwrap().is_empty());
    assert!(book.search_by_email("john@example.com").unwrap().is_empty());

    // No partition anywhere still references the id
    assert!(!tree_mentions(
        &temp.path().join("index"),
        added.id.as_str()
    ));
}

#[test]
fn test_update_missing_contact_is_not_found() {
    let (_temp, book) = setup_book();

    let result = book.update_contact(&RecordId::from("missing"), contact("A", "", "", ""));

    assert!(matches!(result, Err(CardfileError::NotFound { .. })));
}

// =============================================================================
// Address Book — Repair
// =============================================================================

#[test]
fn test_corrupt_partition_is_rebuilt_mid_query() {
    let (temp, book) = setup_book();

    book.add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();
    book.add_contact(contact("Joan", "Arc", "+380502222222", "joan@example.com"))
        .unwrap();

    // Clobber the partition both names hash to
    let partition = temp
        .path()
        .join("index")
        .join("contacts")
        .join("first_name")
        .join("j")
        .join("o.idx");
    fs::write(&partition, b"** not json **").unwrap();

    // The query repairs the index transparently and still answers
    let hits = book.search_by_first_name("jo").unwrap();

    assert_eq!(first_names(&hits), vec!["Joan", "John"]);
}

#[test]
fn test_rebuild_after_manual_data_edits() {
    let (temp, book) = setup_book();

    book.add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();

    // Someone dropped the whole index tree on the floor
    fs::remove_dir_all(temp.path().join("index")).unwrap();

    let count = book.rebuild_indexes().unwrap();

    assert_eq!(count, 1);
    assert_eq!(book.search_by_first_name("jo").unwrap().len(), 1);
}

#[test]
fn test_stale_posting_is_skipped_during_hydration() {
    let (temp, book) = setup_book();

    let added = book
        .add_contact(contact("John", "Doe", "+380501111111", "john@example.com"))
        .unwrap();

    // Simulate a crash that removed the data file but left the postings
    fs::remove_file(
        temp.path()
            .join("data")
            .join("contacts")
            .join(format!("{}.rec", added.id)),
    )
    .unwrap();

    let hits = book.search_by_first_name("jo").unwrap();

    assert!(hits.is_empty());
}

// =============================================================================
// Notes Book
// =============================================================================

#[test]
fn test_note_crud_round_trip() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();
    let notes = NotesBook::open(&config).unwrap();

    let added = notes
        .add_note(note("Groceries", "milk, bread", &["shopping"]))
        .unwrap();

    let fetched = notes.note(&added.id).unwrap();
    assert_eq!(fetched.payload, added.payload);

    notes.delete_note(&added.id).unwrap();
    assert!(matches!(
        notes.note(&added.id),
        Err(CardfileError::NotFound { .. })
    ));
}

#[test]
fn test_search_notes_by_title_prefix() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();
    let notes = NotesBook::open(&config).unwrap();

    notes
        .add_note(note("Meeting notes", "standup agenda", &[]))
        .unwrap();
    notes
        .add_note(note("Meal plan", "pasta on friday", &[]))
        .unwrap();

    let hits = notes.search_by_title("mee").unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].payload.title, "Meeting notes");
}

#[test]
fn test_search_notes_by_tag_exact() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();
    let notes = NotesBook::open(&config).unwrap();

    let tagged = notes
        .add_note(note("Groceries", "milk", &["shopping", "urgent"]))
        .unwrap();
    notes.add_note(note("Diary", "dear diary", &[])).unwrap();

    let hits = notes.search_by_tag("urgent").unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, tagged.id);

    // Tag removed on update → no longer matches
    notes
        .update_note(&tagged.id, note("Groceries", "milk", &["shopping"]))
        .unwrap();
    assert!(notes.search_by_tag("urgent").unwrap().is_empty());
}

#[test]
fn test_search_notes_by_content_substring() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();
    let notes = NotesBook::open(&config).unwrap();

    notes
        .add_note(note("Groceries", "Buy MILK and bread", &[]))
        .unwrap();
    notes.add_note(note("Diary", "dear diary", &[])).unwrap();

    let hits = notes.search_by_content("milk").unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].payload.title, "Groceries");
}

#[test]
fn test_notes_for_contact_follows_back_references() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();
    let book = AddressBook::open(&config).unwrap();
    let notes = NotesBook::open(&config).unwrap();

    let john = book
        .add_contact(contact("John", "Doe", "+380501234567", "john@example.com"))
        .unwrap();

    let mut linked = note("Call John", "about the meetup", &[]);
    linked.contact_ids = vec![john.id.to_string()];
    let linked = notes.add_note(linked).unwrap();
    notes.add_note(note("Diary", "dear diary", &[])).unwrap();

    let hits = notes.notes_for_contact(&john.id).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, linked.id);
}

// =============================================================================
// Shared Root
// =============================================================================

#[test]
fn test_books_share_one_root_without_collisions() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();
    let book = AddressBook::open(&config).unwrap();
    let notes = NotesBook::open(&config).unwrap();

    book.add_contact(contact("John", "Doe", "+380501234567", "john@example.com"))
        .unwrap();
    notes.add_note(note("Groceries", "milk", &["shopping"])).unwrap();

    assert!(temp.path().join("data").join("contacts").is_dir());
    assert!(temp.path().join("data").join("notes").is_dir());
    assert_eq!(book.list_contacts().unwrap().len(), 1);
    assert_eq!(notes.list_notes().unwrap().len(), 1);
}

#[test]
fn test_reopen_finds_existing_data_and_indexes() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = Config::builder().root_dir(temp.path()).build();

    {
        let book = AddressBook::open(&config).unwrap();
        book.add_contact(contact("John", "Doe", "+380501234567", "john@example.com"))
            .unwrap();
    }

    let reopened = AddressBook::open(&config).unwrap();

    assert_eq!(reopened.search_by_first_name("jo").unwrap().len(), 1);
    assert_eq!(reopened.search_by_phone("+380501234567").unwrap().len(), 1);
}

// =============================================================================
// Helpers
// =============================================================================

/// True if any file under `dir` mentions `needle`
fn tree_mentions(dir: &Path, needle: &str) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            if tree_mentions(&path, needle) {
                return true;
            }
        } else if let Ok(content) = fs::read_to_string(&path) {
            if content.contains(needle) {
                return true;
            }
        }
    }
    false
}
